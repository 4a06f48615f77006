//! [PVGIS](https://re.jrc.ec.europa.eu/pvg_tools/en/) hourly series client.
//!
//! PVGIS shares the south-referenced azimuth convention, so the site's
//! azimuth goes on the wire unchanged (the `aspect` parameter).

use async_trait::async_trait;
use chrono::{NaiveDateTime, Timelike};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    api::{client, provider::{ProductionSource, SiteParameters}},
    core::sample::HourlySample,
    prelude::*,
    quantity::energy::KilowattHours,
};

pub const DEFAULT_ENDPOINT: &str = "https://re.jrc.ec.europa.eu/api/v5_2/seriescalc";

/// Path under the proxy base URL.
pub const PROXY_PATH: &str = "api/pvgis";

const TIME_FORMAT: &str = "%Y%m%d:%H%M";

pub struct Api {
    client: Client,
    endpoints: Vec<Url>,
}

impl Api {
    /// With a proxy base URL, the chain is proxy first, public endpoint
    /// second; each is tried once per fetch.
    pub fn try_new(proxy_base_url: Option<&Url>) -> Result<Self> {
        let mut endpoints = Vec::new();
        if let Some(base_url) = proxy_base_url {
            endpoints.push(base_url.join(PROXY_PATH)?);
        }
        endpoints.push(Url::parse(DEFAULT_ENDPOINT)?);
        Ok(Self { client: client::try_new()?, endpoints })
    }
}

#[async_trait]
impl ProductionSource for Api {
    #[instrument(skip_all)]
    async fn fetch_hourly(&self, site: &SiteParameters) -> Result<Vec<HourlySample>> {
        info!("fetching…");
        let request = SeriesCalcRequest {
            lat: site.latitude,
            lon: site.longitude,
            peakpower: site.peak_power_kw,
            angle: site.tilt,
            aspect: site.azimuth.0,
            loss: site.losses_percent,
            outputformat: "json",
            pvcalculation: 1,
        };
        let response: SeriesCalcResponse =
            client::get_json(&self.client, "PVGIS", &self.endpoints, &request).await?;
        let rows = response.outputs.and_then(|outputs| outputs.hourly).unwrap_or_default();
        ensure!(!rows.is_empty(), "PVGIS returned no hourly data");
        let samples = parse_hourly_rows(rows)?;
        info!(n_samples = samples.len(), "fetched");
        Ok(samples)
    }
}

/// Rows with a missing power field or an unparsable timestamp are skipped;
/// a response where *no* row carried the power field is a provider error.
fn parse_hourly_rows(rows: Vec<HourlyRow>) -> Result<Vec<HourlySample>> {
    let mut has_power_field = false;
    let mut samples = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(power_watts) = row.power_watts else {
            continue;
        };
        has_power_field = true;
        if !power_watts.is_finite() {
            continue;
        }
        let Ok(timestamp) = NaiveDateTime::parse_from_str(&row.time, TIME_FORMAT) else {
            continue;
        };
        samples.push(HourlySample::new(
            timestamp.date(),
            timestamp.hour(),
            KilowattHours(power_watts / 1000.0),
        ));
    }
    ensure!(
        has_power_field,
        "PVGIS returned no PV power field `P`, check the request parameters",
    );
    Ok(samples)
}

#[derive(serde::Serialize)]
struct SeriesCalcRequest {
    lat: f64,
    lon: f64,
    peakpower: f64,
    angle: f64,
    aspect: f64,
    loss: f64,
    outputformat: &'static str,
    pvcalculation: u8,
}

#[derive(Deserialize)]
struct SeriesCalcResponse {
    outputs: Option<SeriesCalcOutputs>,
}

#[derive(Deserialize)]
struct SeriesCalcOutputs {
    hourly: Option<Vec<HourlyRow>>,
}

#[derive(Deserialize)]
struct HourlyRow {
    time: String,

    /// PV power in watts.
    #[serde(rename = "P")]
    power_watts: Option<f64>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::core::azimuth::Azimuth;

    #[test]
    fn test_parse_response() {
        let response: SeriesCalcResponse = serde_json::from_value(serde_json::json!({
            "inputs": {"location": {"latitude": 46.5, "longitude": 2.5}},
            "outputs": {"hourly": [
                {"time": "20200621:1210", "P": 2500.0, "G(i)": 800.0},
                {"time": "20200621:1310", "P": 1250.0},
            ]},
        }))
        .unwrap();
        let samples = parse_hourly_rows(response.outputs.unwrap().hourly.unwrap()).unwrap();
        assert_eq!(samples, vec![
            HourlySample::new(
                NaiveDate::from_ymd_opt(2020, 6, 21).unwrap(),
                12,
                KilowattHours(2.5),
            ),
            HourlySample::new(
                NaiveDate::from_ymd_opt(2020, 6, 21).unwrap(),
                13,
                KilowattHours(1.25),
            ),
        ]);
    }

    #[test]
    fn test_rows_without_power_are_skipped() {
        let rows = vec![
            HourlyRow { time: "20200101:0010".to_owned(), power_watts: None },
            HourlyRow { time: "20200101:0110".to_owned(), power_watts: Some(100.0) },
        ];
        let samples = parse_hourly_rows(rows).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].hour, 1);
    }

    #[test]
    fn test_unparsable_time_is_skipped() {
        let rows = vec![
            HourlyRow { time: "not a time".to_owned(), power_watts: Some(100.0) },
            HourlyRow { time: "20200101:0010".to_owned(), power_watts: Some(100.0) },
        ];
        assert_eq!(parse_hourly_rows(rows).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_power_field_everywhere_is_an_error() {
        let rows = vec![HourlyRow { time: "20200101:0010".to_owned(), power_watts: None }];
        assert!(parse_hourly_rows(rows).is_err());
    }

    #[tokio::test]
    #[ignore = "makes the API request"]
    async fn test_fetch_hourly_ok() -> Result {
        let site = SiteParameters::builder()
            .latitude(46.5)
            .longitude(2.5)
            .peak_power_kw(3.0)
            .tilt(30.0)
            .azimuth(Azimuth(0.0))
            .losses_percent(14.0)
            .build();
        let samples = Api::try_new(None)?.fetch_hourly(&site).await?;
        assert!(!samples.is_empty());
        Ok(())
    }
}
