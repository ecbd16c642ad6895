pub mod adapters;
pub mod context;
pub mod placements;
pub mod targeting;
pub mod value;

pub use adapters::{AppDetails, DetailsProvider, DeviceDetails, StaticDetailsProvider, SystemDetailsProvider};
pub use context::{App, Consent, Device, User};
pub use placements::{Format, Placement};
pub use targeting::{CustomKeyValue, LocationCoordinate, Targeting};
pub use value::DynamicValue;
