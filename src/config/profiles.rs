// src/config/profiles.rs

use crate::model::adapters::{AppDetails, DeviceDetails};
use crate::model::context::{App, Consent, Device, User};

/// 应用配置。所有字段可选，`patch` 只覆盖补丁里给出的字段
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub name: Option<String>,
    pub version: Option<String>,
    pub build_number: Option<String>,
    pub identifier: Option<String>,
    pub language: Option<String>,
}

impl AppConfig {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn from_details(details: AppDetails) -> Self {
        Self {
            name: details.name,
            version: details.version,
            build_number: details.build_number,
            identifier: details.identifier,
            language: details.language,
        }
    }

    pub fn patch(self, patch: AppConfig) -> Self {
        Self {
            name: patch.name.or(self.name),
            version: patch.version.or(self.version),
            build_number: patch.build_number.or(self.build_number),
            identifier: patch.identifier.or(self.identifier),
            language: patch.language.or(self.language),
        }
    }

    pub fn to_app(&self) -> App {
        App {
            name: self.name.clone(),
            version: self.version.clone(),
            build_number: self.build_number.clone(),
            identifier: self.identifier.clone(),
            language: self.language.clone(),
        }
    }
}

/// 设备配置
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceConfig {
    pub id: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
}

impl DeviceConfig {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn from_details(details: DeviceDetails) -> Self {
        Self {
            id: details.id,
            model: details.model,
            manufacturer: details.manufacturer,
            os: details.os,
            os_version: details.os_version,
            timezone: details.timezone,
            language: details.language,
        }
    }

    pub fn patch(self, patch: DeviceConfig) -> Self {
        Self {
            id: patch.id.or(self.id),
            model: patch.model.or(self.model),
            manufacturer: patch.manufacturer.or(self.manufacturer),
            os: patch.os.or(self.os),
            os_version: patch.os_version.or(self.os_version),
            timezone: patch.timezone.or(self.timezone),
            language: patch.language.or(self.language),
        }
    }

    pub fn to_device(&self) -> Device {
        Device {
            id: self.id.clone(),
            model: self.model.clone(),
            manufacturer: self.manufacturer.clone(),
            os: self.os.clone(),
            os_version: self.os_version.clone(),
            timezone: self.timezone.clone(),
            language: self.language.clone(),
        }
    }
}

/// 用户配置。consent 始终存在，默认 gdpr = false
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserConfig {
    pub id: Option<String>,
    pub ip: Option<String>,
    pub timezone: Option<String>,
    pub consent: Consent,
}

/// 用户配置补丁，None 表示保持当前值
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserConfigPatch {
    pub id: Option<String>,
    pub ip: Option<String>,
    pub timezone: Option<String>,
    pub consent: Option<Consent>,
}

impl UserConfig {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn patch(self, patch: UserConfigPatch) -> Self {
        Self {
            id: patch.id.or(self.id),
            ip: patch.ip.or(self.ip),
            timezone: patch.timezone.or(self.timezone),
            consent: patch.consent.unwrap_or(self.consent),
        }
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            ip: self.ip.clone(),
            timezone: self.timezone.clone(),
            consent: Some(self.consent),
        }
    }
}
