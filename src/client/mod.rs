pub mod api_client;
pub mod error;
pub mod http;

pub use api_client::{AdMoaiClient, ApiResponse, DECISION_PATH};
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpStatus};
