//! Owner of the current estimate.
//!
//! The result cell is replaced wholesale by each completed request. A
//! monotonically increasing generation guards against a stale response
//! landing after a newer request has started.

use crate::{
    core::{
        azimuth::Azimuth,
        sample::HourlySample,
        series::{self, DailyTotal},
    },
    prelude::*,
};

/// One orientation's fetched series with its derived daily totals.
#[derive(Clone, Debug)]
pub struct OrientationResult {
    pub azimuth: Azimuth,
    pub hourly: Vec<HourlySample>,
    pub daily: Vec<DailyTotal>,
}

impl OrientationResult {
    #[must_use]
    pub fn new(azimuth: Azimuth, hourly: Vec<HourlySample>) -> Self {
        let daily = series::aggregate_daily(&hourly);
        Self { azimuth, hourly, daily }
    }
}

/// A completed estimate: the primary orientation and, when comparing, the
/// secondary one.
#[derive(Clone, Debug)]
pub struct EstimateOutcome {
    pub primary: OrientationResult,
    pub secondary: Option<OrientationResult>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RequestToken(u64);

#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    current: Option<EstimateOutcome>,
}

impl Session {
    /// Start a new request, superseding any still in flight.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        RequestToken(self.generation)
    }

    /// Install the outcome unless a newer request has begun since the token
    /// was issued. Returns whether the outcome was installed.
    pub fn complete(&mut self, token: RequestToken, outcome: EstimateOutcome) -> bool {
        if token.0 == self.generation {
            self.current = Some(outcome);
            true
        } else {
            warn!(
                stale_generation = token.0,
                current_generation = self.generation,
                "discarding a stale estimate",
            );
            false
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&EstimateOutcome> {
        self.current.as_ref()
    }
}
