use async_trait::async_trait;
use bon::Builder;

use crate::{core::azimuth::Azimuth, core::sample::HourlySample, prelude::*};

/// Which remote API serves the production estimate.
#[derive(Copy, Clone, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum Source {
    Pvgis,
    Pvwatts,
}

/// The seam between the core and a remote production API: a provider takes
/// the normalized site description and returns normalized hourly samples.
/// Provider-specific JSON shapes stay behind this trait.
#[async_trait]
pub trait ProductionSource {
    async fn fetch_hourly(&self, site: &SiteParameters) -> Result<Vec<HourlySample>>;
}

/// The PV installation as both providers understand it.
#[derive(Builder, Clone, Debug, PartialEq)]
pub struct SiteParameters {
    /// Decimal degrees, positive north.
    pub latitude: f64,

    /// Decimal degrees, positive east.
    pub longitude: f64,

    /// Installed peak power in kilowatts-peak.
    pub peak_power_kw: f64,

    /// Panel inclination from horizontal, degrees.
    pub tilt: f64,

    /// South-referenced panel azimuth.
    pub azimuth: Azimuth,

    /// System losses in percent.
    pub losses_percent: f64,
}

impl SiteParameters {
    /// Checked before any fetch; nothing is sent upstream on failure.
    pub fn validate(&self) -> Result {
        ensure!(
            self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude),
            "latitude out of range: {}",
            self.latitude,
        );
        ensure!(
            self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude),
            "longitude out of range: {}",
            self.longitude,
        );
        ensure!(
            self.tilt.is_finite() && (0.0..=90.0).contains(&self.tilt),
            "tilt out of range: {}",
            self.tilt,
        );
        ensure!(
            self.azimuth.is_finite() && (-180.0..=180.0).contains(&self.azimuth.0),
            "azimuth out of range: {}",
            self.azimuth,
        );
        ensure!(
            self.peak_power_kw.is_finite() && self.peak_power_kw > 0.0,
            "peak power must be positive: {} kWp",
            self.peak_power_kw,
        );
        ensure!(
            self.losses_percent.is_finite() && (0.0..=100.0).contains(&self.losses_percent),
            "losses out of range: {}%",
            self.losses_percent,
        );
        Ok(())
    }

    /// The same site with another panel azimuth, for the comparison fetch.
    #[must_use]
    pub fn with_azimuth(&self, azimuth: Azimuth) -> Self {
        Self { azimuth, ..self.clone() }
    }
}
