use chrono::{Datelike, NaiveDate};

use crate::quantity::energy::KilowattHours;

/// One hour of production, tagged with its calendar day.
///
/// Produced once per fetch and replaced wholesale on every new estimate,
/// never mutated in place.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    derive_more::Constructor,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct HourlySample {
    pub day: NaiveDate,

    /// Hour of day, 0–23.
    pub hour: u32,

    pub energy: KilowattHours,
}

impl HourlySample {
    /// Calendar month, 1–12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.day.month()
    }
}
