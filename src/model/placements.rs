// src/model/placements.rs

use serde::{Deserialize, Deserializer, Serialize};
use std::convert::TryFrom;

/// 广告位格式，目前服务端只支持 native
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "String", into = "String")]
pub enum Format {
    #[default]
    Native,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Native => "native",
        }
    }
}

impl TryFrom<String> for Format {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "native" => Ok(Format::Native),
            _ => Err(format!("Invalid value for Format: {}", value)),
        }
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.as_str().to_string()
    }
}

/// 请求中的单个广告位
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub key: String,                   // 广告位 key
    #[serde(default = "default_count", deserialize_with = "deserialize_count")]
    count: u32,                        // 请求的创意数量，至少为 1，只能经由 with_count 修改
    #[serde(default)]
    pub format: Format,                // 广告位格式
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub advertiser_id: Option<String>, // 只返回该广告主的创意
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub template_id: Option<String>,   // 只返回该模板的创意
}

fn default_count() -> u32 {
    1
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u32::deserialize(deserializer)?.max(1))
}

impl Placement {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            count: default_count(),
            format: Format::Native,
            advertiser_id: None,
            template_id: None,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// count 小于 1 时按 1 处理
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count.max(1);
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn with_advertiser_id(mut self, advertiser_id: impl Into<String>) -> Self {
        self.advertiser_id = Some(advertiser_id.into());
        self
    }

    pub fn with_template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }
}
