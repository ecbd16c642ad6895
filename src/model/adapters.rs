// src/model/adapters.rs

use chrono::Local;
use once_cell::sync::Lazy;
use std::env;
use uuid::Uuid;

/// 进程内稳定的设备 ID，首次访问时生成
static DEVICE_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// 系统探测到的设备信息
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeviceDetails {
    pub id: Option<String>,
    pub model: Option<String>,
    pub manufacturer: Option<String>,
    pub os: Option<String>,
    pub os_version: Option<String>,
    pub timezone: Option<String>,
    pub language: Option<String>,
}

/// 系统探测到的应用信息
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppDetails {
    pub name: Option<String>,
    pub version: Option<String>,
    pub build_number: Option<String>,
    pub identifier: Option<String>,
    pub language: Option<String>,
}

/// 设备/应用元数据来源。SDK 构造时调用一次，reset 时再次调用
pub trait DetailsProvider: Send + Sync {
    fn device_details(&self) -> DeviceDetails;
    fn app_details(&self) -> AppDetails;
}

/// 从当前进程环境读取元数据
#[derive(Debug, Clone, Default)]
pub struct SystemDetailsProvider;

impl DetailsProvider for SystemDetailsProvider {
    fn device_details(&self) -> DeviceDetails {
        DeviceDetails {
            id: Some(DEVICE_ID.clone()),
            model: Some(env::consts::ARCH.to_string()),
            manufacturer: None,
            os: Some(env::consts::OS.to_string()),
            os_version: None,
            timezone: Some(system_timezone()),
            language: system_language(),
        }
    }

    fn app_details(&self) -> AppDetails {
        let exe_name = env::current_exe()
            .ok()
            .and_then(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()));
        AppDetails {
            name: Some(exe_name.clone().unwrap_or_else(|| "Unknown".to_string())),
            version: Some("Unknown".to_string()),
            build_number: Some("Unknown".to_string()),
            identifier: Some(exe_name.unwrap_or_else(|| "Unknown".to_string())),
            language: system_language(),
        }
    }
}

/// 固定返回给定值，测试和嵌入方使用
#[derive(Debug, Clone, Default)]
pub struct StaticDetailsProvider {
    pub device: DeviceDetails,
    pub app: AppDetails,
}

impl DetailsProvider for StaticDetailsProvider {
    fn device_details(&self) -> DeviceDetails {
        self.device.clone()
    }

    fn app_details(&self) -> AppDetails {
        self.app.clone()
    }
}

/// 优先读 TZ，否则用本地 UTC 偏移，例如 "+08:00"
fn system_timezone() -> String {
    match env::var("TZ") {
        Ok(tz) if !tz.is_empty() => tz,
        _ => Local::now().offset().to_string(),
    }
}

/// "en_US.UTF-8" -> "en-US"，"C"/"POSIX" 视为未知
fn system_language() -> Option<String> {
    let raw = env::var("LC_ALL")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| env::var("LANG").ok())?;
    normalize_locale(&raw)
}

pub(crate) fn normalize_locale(raw: &str) -> Option<String> {
    let base = raw.split(['.', '@']).next().unwrap_or_default();
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }
    Some(base.replace('_', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("en_US.UTF-8"), Some("en-US".to_string()));
        assert_eq!(normalize_locale("de_DE@euro"), Some("de-DE".to_string()));
        assert_eq!(normalize_locale("fr"), Some("fr".to_string()));
        assert_eq!(normalize_locale("C"), None);
        assert_eq!(normalize_locale(""), None);
    }

    #[test]
    fn test_device_id_is_stable_within_process() {
        let provider = SystemDetailsProvider;
        assert_eq!(provider.device_details().id, provider.device_details().id);
        assert_eq!(provider.device_details().os.as_deref(), Some(env::consts::OS));
    }
}
