// src/decision/video.rs

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::decision::response::{ContentsExt, Creative, VerificationScriptResource};

/// `<MediaFile ...>` 开始标签（不匹配 `<MediaFiles>`）
static MEDIA_FILE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<MediaFile\b[^>]*>").expect("valid MediaFile pattern"));
// 属性值可以用单引号或双引号，等号两侧允许空白
static TYPE_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\s)type\s*=\s*("[^"]*"|'[^']*')"#).expect("valid type pattern")
});
static DELIVERY_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\s)delivery\s*=\s*("[^"]*"|'[^']*')"#).expect("valid delivery pattern")
});

/// 创意投放方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    VastTag,
    VastXml,
    Json,
}

impl Delivery {
    /// 精确匹配，大小写敏感
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "vast_tag" => Some(Delivery::VastTag),
            "vast_xml" => Some(Delivery::VastXml),
            "json" => Some(Delivery::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Delivery::VastTag => "vast_tag",
            Delivery::VastXml => "vast_xml",
            Delivery::Json => "json",
        }
    }
}

impl Creative {
    pub fn delivery_mode(&self) -> Option<Delivery> {
        self.delivery.as_deref().and_then(Delivery::parse)
    }

    pub fn is_vast_tag_delivery(&self) -> bool {
        self.delivery_mode() == Some(Delivery::VastTag)
    }

    pub fn is_vast_xml_delivery(&self) -> bool {
        self.delivery_mode() == Some(Delivery::VastXml)
    }

    pub fn is_json_delivery(&self) -> bool {
        self.delivery_mode() == Some(Delivery::Json)
    }

    /// 返回 VAST tag 地址，按需追加 `mediaType` / `mediaDelivery` 查询参数
    ///
    /// 已有查询串时用 `&` 连接，否则用 `?`。没有 tag 地址时返回 None。
    pub fn get_vast_tag_url(
        &self,
        media_type: Option<&str>,
        media_delivery: Option<&str>,
    ) -> Option<String> {
        let base_url = self.vast.as_ref()?.tag_url.as_deref()?;
        Some(append_media_params(base_url, media_type, media_delivery))
    }

    /// 返回 base64 编码的 VAST XML，按需改写每个 `<MediaFile>` 的 type / delivery 属性
    ///
    /// 负载无法解码成 UTF-8 文本时原样返回，不报错。
    pub fn get_vast_xml_base64(
        &self,
        media_type: Option<&str>,
        media_delivery: Option<&str>,
    ) -> Option<String> {
        let payload = self.vast.as_ref()?.xml_base64.as_deref()?;
        if media_type.is_none() && media_delivery.is_none() {
            return Some(payload.to_string());
        }
        Some(rewrite_vast_xml_base64(payload, media_type, media_delivery))
    }

    pub fn is_skippable(&self) -> bool {
        self.contents
            .get_content("isSkippable")
            .and_then(|c| c.value.as_bool())
            .or_else(|| self.metadata.as_ref().and_then(|m| m.is_skippable))
            .unwrap_or(false)
    }

    pub fn get_skip_offset(&self) -> Option<String> {
        self.contents
            .get_content("skipOffset")
            .map(|c| c.value.description())
    }

    pub fn get_verification_resources(&self) -> Option<&[VerificationScriptResource]> {
        self.verification_script_resources.as_deref()
    }

    pub fn has_om_verification(&self) -> bool {
        self.get_verification_resources()
            .map(|resources| !resources.is_empty())
            .unwrap_or(false)
    }
}

pub(crate) fn append_media_params(
    base_url: &str,
    media_type: Option<&str>,
    media_delivery: Option<&str>,
) -> String {
    let mut params = Vec::new();
    if let Some(media_type) = media_type {
        params.push(format!("mediaType={}", urlencoding::encode(media_type)));
    }
    if let Some(media_delivery) = media_delivery {
        params.push(format!("mediaDelivery={}", urlencoding::encode(media_delivery)));
    }
    if params.is_empty() {
        return base_url.to_string();
    }
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base_url, separator, params.join("&"))
}

pub(crate) fn rewrite_vast_xml_base64(
    payload: &str,
    media_type: Option<&str>,
    media_delivery: Option<&str>,
) -> String {
    let xml = match BASE64
        .decode(payload.trim())
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
    {
        Some(xml) => xml,
        None => {
            debug!("VAST XML payload is not valid base64 UTF-8 text, returning it unchanged");
            return payload.to_string();
        }
    };
    let rewritten = rewrite_media_files(&xml, media_type, media_delivery);
    BASE64.encode(rewritten.as_bytes())
}

pub(crate) fn rewrite_media_files(
    xml: &str,
    media_type: Option<&str>,
    media_delivery: Option<&str>,
) -> String {
    MEDIA_FILE_TAG
        .replace_all(xml, |caps: &Captures| {
            let mut tag = caps[0].to_string();
            if let Some(value) = media_type {
                tag = set_attribute(&tag, &TYPE_ATTR, "type", value);
            }
            if let Some(value) = media_delivery {
                tag = set_attribute(&tag, &DELIVERY_ATTR, "delivery", value);
            }
            tag
        })
        .into_owned()
}

/// 属性已存在则替换取值，否则插到标签结尾之前
fn set_attribute(tag: &str, pattern: &Regex, name: &str, value: &str) -> String {
    let value = escape_attribute(value);
    if pattern.is_match(tag) {
        return pattern
            .replace(tag, |caps: &Captures| format!("{}{}=\"{}\"", &caps[1], name, value))
            .into_owned();
    }
    let end = if tag.ends_with("/>") { tag.len() - 2 } else { tag.len() - 1 };
    format!("{} {}=\"{}\"{}", &tag[..end], name, value, &tag[end..])
}

fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}
