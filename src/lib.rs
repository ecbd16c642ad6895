//! AdMoai 决策 API 的 Rust 客户端
//!
//! 用构造器拼装 `DecisionRequest`，发送到决策服务，解析返回的创意、追踪地址和校验信息。
//!
//! ```rust,ignore
//! use admoai::{AdMoai, Placement, SdkConfig};
//!
//! let sdk = AdMoai::new(SdkConfig::new("https://mock.api.admoai.com"))?;
//! let request = sdk
//!     .create_request_builder()
//!     .add_placement(Placement::new("home"))
//!     .add_custom_targeting("category", "sports")
//!     .build();
//! let response = sdk.request_ads(&request).await?;
//! for decision in response.body.data.unwrap_or_default() {
//!     for creative in decision.creatives() {
//!         sdk.fire_impression(&creative.tracking, admoai::DEFAULT_TRACKING_KEY);
//!     }
//! }
//! ```

pub mod client;
pub mod config;
pub mod decision;
pub mod logging;
pub mod mock_server;
pub mod model;
pub mod sdk;

pub use client::{AdMoaiClient, ApiError, ApiResponse, HttpMethod, HttpRequest, HttpStatus, Result};
pub use config::{AppConfig, ConfigError, ConfigManager, DeviceConfig, SdkConfig, UserConfig, UserConfigPatch};
pub use decision::{
    Advertiser, ApiMessage, ApiResponseBody, Content, ContentsExt, Creative, Decision,
    DecisionRequest, DecisionRequestBuilder, DecisionResponse, Delivery, Metadata, Template,
    Tracking, TrackingItem, TrackingType, Vast, VerificationScriptResource, DEFAULT_TRACKING_KEY,
};
pub use model::{
    App, AppDetails, Consent, CustomKeyValue, DetailsProvider, Device, DeviceDetails,
    DynamicValue, Format, LocationCoordinate, Placement, StaticDetailsProvider,
    SystemDetailsProvider, Targeting, User,
};
pub use sdk::AdMoai;
