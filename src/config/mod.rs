pub mod config_manager;
pub mod profiles;
pub mod sdk_config;

pub use config_manager::ConfigManager;
pub use profiles::{AppConfig, DeviceConfig, UserConfig, UserConfigPatch};
pub use sdk_config::{ConfigError, SdkConfig};
