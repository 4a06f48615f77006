//! [PVWatts v8](https://developer.nrel.gov/docs/solar/pvwatts/v8/) client.
//!
//! PVWatts wants north-clockwise bearings, so the site's south-referenced
//! azimuth crosses the convention boundary here. The hourly AC array is
//! implicitly dated from the reference year.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use itertools::Itertools;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    api::{client, provider::{ProductionSource, SiteParameters}},
    core::sample::HourlySample,
    prelude::*,
    quantity::energy::KilowattHours,
};

pub const DEFAULT_ENDPOINT: &str = "https://developer.nrel.gov/api/pvwatts/v8.json";

/// Path under the proxy base URL.
pub const PROXY_PATH: &str = "api/pvwatts";

/// The year the 0-indexed hourly array is dated from.
pub const REFERENCE_YEAR: i32 = 2020;

pub struct Api {
    client: Client,
    endpoints: Vec<Url>,
    api_key: String,
}

impl Api {
    pub fn try_new(api_key: String, proxy_base_url: Option<&Url>) -> Result<Self> {
        let mut endpoints = Vec::new();
        if let Some(base_url) = proxy_base_url {
            endpoints.push(base_url.join(PROXY_PATH)?);
        }
        endpoints.push(Url::parse(DEFAULT_ENDPOINT)?);
        Ok(Self { client: client::try_new()?, endpoints, api_key })
    }
}

#[async_trait]
impl ProductionSource for Api {
    #[instrument(skip_all)]
    async fn fetch_hourly(&self, site: &SiteParameters) -> Result<Vec<HourlySample>> {
        info!("fetching…");
        let request = PvWattsRequest {
            api_key: &self.api_key,
            lat: site.latitude,
            lon: site.longitude,
            system_capacity: site.peak_power_kw,
            module_type: 0,
            losses: site.losses_percent,
            array_type: 0,
            tilt: site.tilt,
            azimuth: site.azimuth.to_bearing().0,
            timeframe: "hourly",
        };
        let response: PvWattsResponse =
            client::get_json(&self.client, "PVWatts", &self.endpoints, &request).await?;
        if !response.errors.is_empty() {
            bail!("PVWatts: {}", response.errors.iter().join(", "));
        }
        let ac = response.outputs.and_then(|outputs| outputs.ac).unwrap_or_default();
        ensure!(!ac.is_empty(), "PVWatts returned no hourly AC output");
        let samples = samples_from_ac(&ac);
        info!(n_samples = samples.len(), "fetched");
        Ok(samples)
    }
}

fn samples_from_ac(ac: &[f64]) -> Vec<HourlySample> {
    let start = reference_start();
    let mut samples = Vec::with_capacity(ac.len());
    for (index, power_watts) in ac.iter().enumerate() {
        if !power_watts.is_finite() {
            continue;
        }
        #[allow(clippy::cast_possible_wrap)]
        let timestamp = start + TimeDelta::hours(index as i64);
        samples.push(HourlySample::new(
            timestamp.date(),
            timestamp.hour(),
            KilowattHours(power_watts / 1000.0),
        ));
    }
    samples
}

fn reference_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(REFERENCE_YEAR, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap()
}

#[derive(serde::Serialize)]
struct PvWattsRequest<'a> {
    api_key: &'a str,
    lat: f64,
    lon: f64,
    system_capacity: f64,
    module_type: u8,
    losses: f64,
    array_type: u8,
    tilt: f64,

    /// North-clockwise bearing in degrees.
    azimuth: f64,

    timeframe: &'static str,
}

#[derive(Deserialize)]
struct PvWattsResponse {
    #[serde(default)]
    errors: Vec<String>,

    outputs: Option<PvWattsOutputs>,
}

#[derive(Deserialize)]
struct PvWattsOutputs {
    /// AC power per hour of the reference year, in watts.
    ac: Option<Vec<f64>>,
}
