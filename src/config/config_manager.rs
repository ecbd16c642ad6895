// src/config/config_manager.rs

use std::sync::Arc;

use crate::config::profiles::{AppConfig, DeviceConfig, UserConfig, UserConfigPatch};
use crate::model::adapters::DetailsProvider;

/// 管理 app / device / user 三份配置
///
/// app 和 device 的默认值来自 `DetailsProvider`，构造时探测一次；
/// user 没有系统默认值，初始为空。
#[derive(Clone)]
pub struct ConfigManager {
    details: Arc<dyn DetailsProvider>,
    app: AppConfig,
    device: DeviceConfig,
    user: UserConfig,
}

impl ConfigManager {
    pub fn new(details: Arc<dyn DetailsProvider>) -> Self {
        let app = AppConfig::from_details(details.app_details());
        let device = DeviceConfig::from_details(details.device_details());
        ConfigManager {
            details,
            app,
            device,
            user: UserConfig::clear(),
        }
    }

    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn device(&self) -> &DeviceConfig {
        &self.device
    }

    pub fn user(&self) -> &UserConfig {
        &self.user
    }

    pub fn set_app(&mut self, patch: AppConfig) {
        self.app = std::mem::take(&mut self.app).patch(patch);
    }

    pub fn clear_app(&mut self) {
        self.app = AppConfig::clear();
    }

    pub fn reset_app(&mut self) {
        self.app = AppConfig::from_details(self.details.app_details());
    }

    pub fn set_device(&mut self, patch: DeviceConfig) {
        self.device = std::mem::take(&mut self.device).patch(patch);
    }

    pub fn clear_device(&mut self) {
        self.device = DeviceConfig::clear();
    }

    pub fn reset_device(&mut self) {
        self.device = DeviceConfig::from_details(self.details.device_details());
    }

    pub fn set_user(&mut self, patch: UserConfigPatch) {
        self.user = std::mem::take(&mut self.user).patch(patch);
    }

    pub fn clear_user(&mut self) {
        self.user = UserConfig::clear();
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("app", &self.app)
            .field("device", &self.device)
            .field("user", &self.user)
            .finish()
    }
}
