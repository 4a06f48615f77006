pub mod client;
pub mod provider;
pub mod pvgis;
pub mod pvwatts;

pub use self::provider::{ProductionSource, SiteParameters, Source};
