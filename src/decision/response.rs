// src/decision/response.rs

use serde::{Deserialize, Serialize};

use crate::decision::tracking::Tracking;
use crate::model::value::DynamicValue;

/// 响应信封：`{success, data, errors, warnings}`
///
/// HTTP 200 的响应依然可能带 warnings，调用方需要自行检查。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponseBody<T> {
    pub success: bool,
    pub data: Option<T>,
    pub errors: Option<Vec<ApiMessage>>,
    pub warnings: Option<Vec<ApiMessage>>,
}

impl<T> ApiResponseBody<T> {
    pub fn errors(&self) -> &[ApiMessage] {
        self.errors.as_deref().unwrap_or_default()
    }

    pub fn warnings(&self) -> &[ApiMessage] {
        self.warnings.as_deref().unwrap_or_default()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings().is_empty()
    }
}

/// 服务端返回的错误 / 警告条目
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiMessage {
    pub code: i64,
    pub message: String,
}

impl ApiMessage {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// 决策响应：每个广告位一条 Decision
pub type DecisionResponse = Vec<Decision>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Decision {
    pub placement: String, // 对应请求中的广告位 key
    #[serde(default)]
    pub creatives: Option<Vec<Creative>>,
}

impl Decision {
    pub fn creatives(&self) -> &[Creative] {
        self.creatives.as_deref().unwrap_or_default()
    }
}

/// 单个创意
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Creative {
    #[serde(default)]
    pub contents: Vec<Content>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub advertiser: Advertiser,
    #[serde(default)]
    pub template: Option<Template>,
    #[serde(default)]
    pub tracking: Tracking,
    /// 投放方式："vast_tag" | "vast_xml" | "json"
    #[serde(default)]
    pub delivery: Option<String>,
    #[serde(default)]
    pub vast: Option<Vast>,
    #[serde(default)]
    pub verification_script_resources: Option<Vec<VerificationScriptResource>>,
}

/// 创意内容字段，value 的实际类型由 `type` 区分（text / image / url / ...）
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Content {
    pub key: String,
    pub value: DynamicValue,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// `[Content]` 上的便捷查询
pub trait ContentsExt {
    /// 按 key 查找，key 不保证唯一，取第一个
    fn get_content(&self, key: &str) -> Option<&Content>;
    fn has_contents(&self) -> bool;
    fn is_type(&self, key: &str, content_type: &str) -> bool;
}

impl ContentsExt for [Content] {
    fn get_content(&self, key: &str) -> Option<&Content> {
        self.iter().find(|c| c.key == key)
    }

    fn has_contents(&self) -> bool {
        !self.is_empty()
    }

    fn is_type(&self, key: &str, content_type: &str) -> bool {
        self.iter()
            .any(|c| c.key == key && c.content_type == content_type)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub ad_id: Option<String>,
    #[serde(default)]
    pub creative_id: Option<String>,
    #[serde(default)]
    pub advertiser_id: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub placement_id: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    // 视频创意
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub is_skippable: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Advertiser {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub legal_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Template {
    pub key: String,
    #[serde(default)]
    pub style: Option<String>,
}

/// VAST 负载，tag 地址或 base64 编码的 XML 二选一
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Vast {
    #[serde(default)]
    pub tag_url: Option<String>,
    #[serde(default)]
    pub xml_base64: Option<String>,
}

/// Open Measurement 验证脚本
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationScriptResource {
    pub vendor_key: String,
    pub script_url: String,
    #[serde(default)]
    pub verification_parameters: Option<String>,
}
