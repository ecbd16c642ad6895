// src/decision/tracking.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// 不指定 key 时使用的默认追踪 key
pub const DEFAULT_TRACKING_KEY: &str = "default";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TrackingItem {
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingType {
    Impression,
    Click,
    Custom,
    VideoEvent,
}

impl fmt::Display for TrackingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackingType::Impression => "impression",
            TrackingType::Click => "click",
            TrackingType::Custom => "custom",
            TrackingType::VideoEvent => "videoEvent",
        };
        f.write_str(name)
    }
}

/// 创意的追踪地址
///
/// 每个通道都可能缺失，缺失与空列表等价：都表示没有可用的追踪地址。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    #[serde(default)]
    pub impressions: Option<Vec<TrackingItem>>,
    #[serde(default)]
    pub clicks: Option<Vec<TrackingItem>>,
    #[serde(default)]
    pub custom: Option<Vec<TrackingItem>>,
    #[serde(default)]
    pub video_events: Option<Vec<TrackingItem>>,
}

impl Tracking {
    /// 取某个通道的全部条目，缺失的通道返回空切片
    pub fn channel(&self, tracking_type: TrackingType) -> &[TrackingItem] {
        let items = match tracking_type {
            TrackingType::Impression => &self.impressions,
            TrackingType::Click => &self.clicks,
            TrackingType::Custom => &self.custom,
            TrackingType::VideoEvent => &self.video_events,
        };
        items.as_deref().unwrap_or_default()
    }

    pub fn has_tracking_for(&self, tracking_type: TrackingType, key: &str) -> bool {
        self.get_tracking_url(tracking_type, key).is_some()
    }

    /// 同一 key 出现多次时取第一个
    pub fn get_tracking_url(&self, tracking_type: TrackingType, key: &str) -> Option<&str> {
        self.channel(tracking_type)
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.url.as_str())
    }

    pub fn get_impression_url(&self, key: &str) -> Option<&str> {
        self.get_tracking_url(TrackingType::Impression, key)
    }

    pub fn get_click_url(&self, key: &str) -> Option<&str> {
        self.get_tracking_url(TrackingType::Click, key)
    }

    pub fn get_custom_url(&self, key: &str) -> Option<&str> {
        self.get_tracking_url(TrackingType::Custom, key)
    }

    pub fn get_video_event_url(&self, key: &str) -> Option<&str> {
        self.get_tracking_url(TrackingType::VideoEvent, key)
    }
}
