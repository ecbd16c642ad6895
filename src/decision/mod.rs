pub mod builder;
pub mod request;
pub mod response;
pub mod tracking;
pub mod video;

pub use builder::DecisionRequestBuilder;
pub use request::DecisionRequest;
pub use response::{
    Advertiser, ApiMessage, ApiResponseBody, Content, ContentsExt, Creative, Decision,
    DecisionResponse, Metadata, Template, Vast, VerificationScriptResource,
};
pub use tracking::{Tracking, TrackingItem, TrackingType, DEFAULT_TRACKING_KEY};
pub use video::Delivery;
