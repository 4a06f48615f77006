//! Headline statistics of a completed estimate.

use ordered_float::OrderedFloat;

use crate::{
    core::{
        series::{self, DailyTotal},
        session::EstimateOutcome,
    },
    prelude::*,
    quantity::energy::KilowattHours,
};

/// How the annual production splits between the two compared orientations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationShares {
    pub primary_percent: f64,
    pub secondary_percent: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Summary {
    pub annual_total: KilowattHours,
    pub mean_per_day: KilowattHours,
    pub weakest_day: DailyTotal,
    pub best_day: DailyTotal,

    /// Present only for dual-azimuth estimates.
    pub shares: Option<OrientationShares>,
}

impl Summary {
    /// For a dual-azimuth outcome the headline figures are computed over the
    /// day-wise combined series.
    pub fn from_outcome(outcome: &EstimateOutcome) -> Result<Self> {
        match &outcome.secondary {
            Some(secondary) => {
                let combined = series::combine_daily(&outcome.primary.daily, &secondary.daily);
                let mut summary = Self::from_daily(&combined)?;
                let primary_total: KilowattHours =
                    outcome.primary.daily.iter().map(|total| total.energy).sum();
                let secondary_total: KilowattHours =
                    secondary.daily.iter().map(|total| total.energy).sum();
                let total = primary_total + secondary_total;
                if total > KilowattHours::ZERO {
                    summary.shares = Some(OrientationShares {
                        primary_percent: primary_total / total * 100.0,
                        secondary_percent: secondary_total / total * 100.0,
                    });
                }
                Ok(summary)
            }
            None => Self::from_daily(&outcome.primary.daily),
        }
    }

    pub fn from_daily(daily: &[DailyTotal]) -> Result<Self> {
        ensure!(!daily.is_empty(), "no production data to summarize");
        let annual_total: KilowattHours = daily.iter().map(|total| total.energy).sum();
        #[allow(clippy::cast_precision_loss)]
        let mean_per_day = annual_total / daily.len() as f64;
        let weakest_day = *daily
            .iter()
            .min_by_key(|total| OrderedFloat(total.energy.0))
            .context("no production data to summarize")?;
        let best_day = *daily
            .iter()
            .max_by_key(|total| OrderedFloat(total.energy.0))
            .context("no production data to summarize")?;
        Ok(Self { annual_total, mean_per_day, weakest_day, best_day, shares: None })
    }
}
