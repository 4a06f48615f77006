mod estimate;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use reqwest::Url;

use crate::{
    api::{ProductionSource, SiteParameters, Source, pvgis, pvwatts},
    core::azimuth::{Azimuth, AzimuthPair},
    prelude::*,
    quantity::power::Kilowatts,
};

pub use self::estimate::estimate;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch hourly production for a site and print the estimate reports.
    #[clap(name = "estimate")]
    Estimate(Box<EstimateArgs>),
}

#[derive(Parser)]
pub struct EstimateArgs {
    #[clap(flatten)]
    pub site: SiteArgs,

    #[clap(flatten)]
    pub source: SourceArgs,

    #[clap(flatten)]
    pub comparison: ComparisonArgs,

    #[clap(flatten)]
    pub report: ReportArgs,
}

#[derive(Parser)]
pub struct SiteArgs {
    /// Site latitude in decimal degrees.
    #[clap(long, env = "SITE_LATITUDE", allow_negative_numbers = true)]
    pub latitude: f64,

    /// Site longitude in decimal degrees.
    #[clap(long, env = "SITE_LONGITUDE", allow_negative_numbers = true)]
    pub longitude: f64,

    /// Installed peak power in watts.
    #[clap(long = "peak-power-watts", default_value = "3000", env = "PEAK_POWER_WATTS")]
    pub peak_power_watts: f64,

    /// Panel inclination from horizontal, in degrees.
    #[clap(long, default_value = "30", env = "PANEL_TILT")]
    pub tilt: f64,

    /// South-referenced panel azimuth in degrees:
    /// 0 = due south, negative = east of south, positive = west of south.
    #[clap(long, default_value = "0", env = "PANEL_AZIMUTH", allow_negative_numbers = true)]
    pub azimuth: Azimuth,

    /// System losses in percent.
    #[clap(long = "losses-percent", default_value = "14", env = "SYSTEM_LOSSES_PERCENT")]
    pub losses_percent: f64,
}

impl SiteArgs {
    /// The form is filled in watts; the APIs want kilowatts-peak.
    #[must_use]
    pub fn to_parameters(&self) -> SiteParameters {
        SiteParameters::builder()
            .latitude(self.latitude)
            .longitude(self.longitude)
            .peak_power_kw(self.peak_power_watts / 1000.0)
            .tilt(self.tilt)
            .azimuth(self.azimuth)
            .losses_percent(self.losses_percent)
            .build()
    }
}

#[derive(Parser)]
pub struct SourceArgs {
    /// Production data provider.
    #[clap(long, value_enum, default_value = "pvgis", env = "PRODUCTION_SOURCE")]
    pub source: Source,

    /// PVWatts API key; required when the source is `pvwatts`.
    #[clap(long = "pvwatts-api-key", env = "PVWATTS_API_KEY")]
    pub pvwatts_api_key: Option<String>,

    /// Same-origin proxy base URL, tried before the public endpoint.
    #[clap(long = "proxy-base-url", env = "PROXY_BASE_URL")]
    pub proxy_base_url: Option<Url>,
}

impl SourceArgs {
    pub fn try_new_source(&self) -> Result<Box<dyn ProductionSource>> {
        match self.source {
            Source::Pvgis => {
                Ok(Box::new(pvgis::Api::try_new(self.proxy_base_url.as_ref())?))
            }
            Source::Pvwatts => {
                let api_key = self
                    .pvwatts_api_key
                    .clone()
                    .context("PVWatts requires an API key (`--pvwatts-api-key` or `PVWATTS_API_KEY`)")?;
                Ok(Box::new(pvwatts::Api::try_new(api_key, self.proxy_base_url.as_ref())?))
            }
        }
    }
}

#[derive(Parser)]
pub struct ComparisonArgs {
    /// Also estimate the opposing roof orientation.
    #[clap(long)]
    pub compare: bool,

    /// Manual second azimuth; implies `--compare` and detaches the second
    /// azimuth from the first.
    #[clap(long = "second-azimuth", allow_negative_numbers = true)]
    pub second_azimuth: Option<Azimuth>,
}

impl ComparisonArgs {
    /// The pair starts auto-linked to the opposite orientation; a manual
    /// second azimuth detaches it.
    #[must_use]
    pub fn to_pair(&self, primary: Azimuth) -> Option<AzimuthPair> {
        if !self.compare && self.second_azimuth.is_none() {
            return None;
        }
        let mut pair = AzimuthPair::linked(primary);
        if let Some(second_azimuth) = self.second_azimuth {
            pair.set_secondary(second_azimuth);
        }
        Some(pair)
    }
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Print the average hourly profile of this month (1–12).
    #[clap(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Print the hourly profile of this calendar day (YYYY-MM-DD).
    #[clap(long)]
    pub day: Option<NaiveDate>,

    /// Assumed flat household load; enables the self-consumption report.
    #[clap(long = "consumption-kilowatts", env = "CONSUMPTION_KILOWATTS")]
    pub consumption: Option<Kilowatts>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::azimuth::SecondaryLink;

    #[test]
    fn test_no_comparison_by_default() {
        let args = ComparisonArgs { compare: false, second_azimuth: None };
        assert!(args.to_pair(Azimuth(0.0)).is_none());
    }

    #[test]
    fn test_compare_defaults_to_the_opposite() {
        let args = ComparisonArgs { compare: true, second_azimuth: None };
        let pair = args.to_pair(Azimuth(-30.0)).unwrap();
        assert_eq!(pair.secondary(), Azimuth(150.0));
        assert_eq!(pair.link(), SecondaryLink::Auto);
    }

    #[test]
    fn test_manual_second_azimuth_detaches() {
        let args = ComparisonArgs { compare: true, second_azimuth: Some(Azimuth(90.0)) };
        let pair = args.to_pair(Azimuth(0.0)).unwrap();
        assert_eq!(pair.secondary(), Azimuth(90.0));
        assert_eq!(pair.link(), SecondaryLink::Manual);
    }

    #[test]
    fn test_peak_power_is_sent_in_kilowatts() {
        let site = SiteArgs {
            latitude: 46.5,
            longitude: 2.5,
            peak_power_watts: 3000.0,
            tilt: 30.0,
            azimuth: Azimuth(0.0),
            losses_percent: 14.0,
        }
        .to_parameters();
        approx::assert_abs_diff_eq!(site.peak_power_kw, 3.0);
    }

    #[test]
    fn test_args_parse() {
        Args::try_parse_from([
            "solarcurve",
            "estimate",
            "--latitude",
            "46.5",
            "--longitude",
            "2.5",
            "--azimuth",
            "-45",
            "--compare",
        ])
        .unwrap();
    }
}
