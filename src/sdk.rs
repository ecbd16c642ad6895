// src/sdk.rs

use std::sync::Arc;
use tracing::debug;

use crate::client::api_client::{AdMoaiClient, ApiResponse};
use crate::client::error::Result;
use crate::client::http::HttpRequest;
use crate::config::config_manager::ConfigManager;
use crate::config::profiles::{AppConfig, DeviceConfig, UserConfig, UserConfigPatch};
use crate::config::sdk_config::SdkConfig;
use crate::decision::builder::DecisionRequestBuilder;
use crate::decision::request::DecisionRequest;
use crate::decision::response::DecisionResponse;
use crate::decision::tracking::Tracking;
use crate::model::adapters::{DetailsProvider, SystemDetailsProvider};

/// **SDK 入口**
///
/// 持有 SDK 配置、app / device / user 三份配置以及传输客户端。
/// 每次 `create_request_builder` 都会拿到当前配置的快照。
pub struct AdMoai {
    config: SdkConfig,
    client: AdMoaiClient,
    profiles: ConfigManager,
}

impl AdMoai {
    /// 使用系统探测到的 app / device 默认值
    pub fn new(config: SdkConfig) -> Result<Self> {
        Self::with_details_provider(config, Arc::new(SystemDetailsProvider))
    }

    pub fn with_details_provider(
        config: SdkConfig,
        details: Arc<dyn DetailsProvider>,
    ) -> Result<Self> {
        let client = AdMoaiClient::new(&config)?;
        debug!(base_url = %config.base_url, "AdMoai SDK initialized");
        Ok(Self {
            config,
            client,
            profiles: ConfigManager::new(details),
        })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn app_config(&self) -> &AppConfig {
        self.profiles.app()
    }

    pub fn device_config(&self) -> &DeviceConfig {
        self.profiles.device()
    }

    pub fn user_config(&self) -> &UserConfig {
        self.profiles.user()
    }

    // ========== App ==========

    /// 只覆盖 patch 中给出的字段
    pub fn set_app_config(&mut self, patch: AppConfig) {
        self.profiles.set_app(patch);
    }

    pub fn clear_app_config(&mut self) {
        self.profiles.clear_app();
    }

    /// 恢复为系统默认值
    pub fn reset_app_config(&mut self) {
        self.profiles.reset_app();
    }

    // ========== Device ==========

    pub fn set_device_config(&mut self, patch: DeviceConfig) {
        self.profiles.set_device(patch);
    }

    pub fn clear_device_config(&mut self) {
        self.profiles.clear_device();
    }

    pub fn reset_device_config(&mut self) {
        self.profiles.reset_device();
    }

    // ========== User ==========

    pub fn set_user_config(&mut self, patch: UserConfigPatch) {
        self.profiles.set_user(patch);
    }

    pub fn clear_user_config(&mut self) {
        self.profiles.clear_user();
    }

    // ========== 请求 ==========

    pub fn create_request_builder(&self) -> DecisionRequestBuilder {
        DecisionRequestBuilder::new(self.profiles.app(), self.profiles.device(), self.profiles.user())
    }

    pub async fn request_ads(&self, request: &DecisionRequest) -> Result<ApiResponse<DecisionResponse>> {
        self.client.request_decision(request).await
    }

    /// 只生成 HTTP 请求描述，不发送
    pub fn get_http_request(&self, request: &DecisionRequest) -> Result<HttpRequest> {
        self.client.create_decision_request(request)
    }

    // ========== 追踪 ==========

    pub fn fire_tracking(&self, url: &str) {
        self.client.fire_tracking(url);
    }

    pub fn fire_impression(&self, tracking: &Tracking, key: &str) {
        if let Some(url) = tracking.get_impression_url(key) {
            self.fire_tracking(url);
        }
    }

    pub fn fire_click(&self, tracking: &Tracking, key: &str) {
        if let Some(url) = tracking.get_click_url(key) {
            self.fire_tracking(url);
        }
    }

    pub fn fire_custom(&self, tracking: &Tracking, key: &str) {
        if let Some(url) = tracking.get_custom_url(key) {
            self.fire_tracking(url);
        }
    }

    pub fn fire_video_event(&self, tracking: &Tracking, key: &str) {
        if let Some(url) = tracking.get_video_event_url(key) {
            self.fire_tracking(url);
        }
    }
}
