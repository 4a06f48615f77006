//! Flat-load self-consumption: how much of the hourly production a constant
//! household draw would absorb ("shave") and how much would be exported.

use crate::{
    core::{sample::HourlySample, series::MonthlyTotals},
    quantity::{energy::KilowattHours, power::Kilowatts},
};

/// Average day counts; February at 28.25 approximates leap years over a
/// multi-year series.
pub const DAYS_IN_MONTH: [f64; 12] =
    [31.0, 28.25, 31.0, 30.0, 31.0, 30.0, 31.0, 31.0, 30.0, 31.0, 30.0, 31.0];

pub const HOURS_PER_YEAR: f64 = 24.0 * 365.25;

/// Per-month split of production into self-consumed and exported energy
/// against a constant load.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShavingReport {
    load: Kilowatts,
    shaved: MonthlyTotals,
    surplus: MonthlyTotals,
}

impl ShavingReport {
    /// For every hourly sample: `shaved = min(production, load × 1 h)` and
    /// `surplus = max(0, production − load × 1 h)`, accumulated per month.
    #[must_use]
    pub fn estimate(samples: &[HourlySample], load: Kilowatts) -> Self {
        let hourly_load = load.over_one_hour();
        let mut shaved = MonthlyTotals::ZERO;
        let mut surplus = MonthlyTotals::ZERO;
        for sample in samples {
            let month = sample.month() as usize - 1;
            shaved.0[month] += sample.energy.min(hourly_load);
            surplus.0[month] += (sample.energy - hourly_load).max(KilowattHours::ZERO);
        }
        Self { load, shaved, surplus }
    }

    #[must_use]
    pub const fn load(&self) -> Kilowatts {
        self.load
    }

    #[must_use]
    pub const fn shaved_by_month(&self) -> &MonthlyTotals {
        &self.shaved
    }

    #[must_use]
    pub const fn surplus_by_month(&self) -> &MonthlyTotals {
        &self.surplus
    }

    /// Load energy left to buy from the grid in a 1-based month.
    #[must_use]
    pub fn remaining_consumption(&self, month: u32) -> KilowattHours {
        let monthly_load =
            self.load.over_one_hour() * (24.0 * DAYS_IN_MONTH[month as usize - 1]);
        (monthly_load - self.shaved.for_month(month)).max(KilowattHours::ZERO)
    }

    #[must_use]
    pub fn total_shaved(&self) -> KilowattHours {
        self.shaved.total()
    }

    #[must_use]
    pub fn total_surplus(&self) -> KilowattHours {
        self.surplus.total()
    }

    /// Share of the annual load covered by self-consumed production, in
    /// percent.
    #[must_use]
    pub fn self_consumption_rate(&self) -> f64 {
        self.total_shaved() / (self.load.over_one_hour() * HOURS_PER_YEAR) * 100.0
    }

    /// Share of a month's production that was self-consumed, in percent;
    /// 0 for months without production.
    #[must_use]
    pub fn monthly_rate(&self, month: u32) -> f64 {
        let production = self.shaved.for_month(month) + self.surplus.for_month(month);
        if production > KilowattHours::ZERO {
            self.shaved.for_month(month) / production * 100.0
        } else {
            0.0
        }
    }
}
