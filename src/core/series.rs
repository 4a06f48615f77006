//! Aggregation of the hourly production series into the reporting shapes:
//! daily totals, hour-of-day profiles, and monthly totals.

use std::{
    array,
    collections::{BTreeMap, BTreeSet},
    ops::Index,
};

use chrono::{Datelike, NaiveDate};

use crate::{core::sample::HourlySample, quantity::energy::KilowattHours};

/// Production of one calendar day, rounded to watt-hours.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    derive_more::Constructor,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct DailyTotal {
    pub day: NaiveDate,
    pub energy: KilowattHours,
}

/// A "typical day" shape: one energy value per hour of day.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct HourProfile(pub [KilowattHours; 24]);

impl HourProfile {
    pub const ZERO: Self = Self([KilowattHours::ZERO; 24]);

    /// Elementwise sum of two profiles, rounded to watt-hours.
    #[must_use]
    pub fn sum(&self, rhs: &Self) -> Self {
        Self(array::from_fn(|hour| (self.0[hour] + rhs.0[hour]).round_to_watt_hours()))
    }

    #[must_use]
    pub fn total(&self) -> KilowattHours {
        self.0.iter().copied().sum()
    }
}

impl Index<usize> for HourProfile {
    type Output = KilowattHours;

    fn index(&self, hour: usize) -> &Self::Output {
        &self.0[hour]
    }
}

/// One energy value per calendar month.
#[derive(Clone, Copy, Debug, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct MonthlyTotals(pub [KilowattHours; 12]);

impl MonthlyTotals {
    pub const ZERO: Self = Self([KilowattHours::ZERO; 12]);

    /// Value for a 1-based calendar month.
    #[must_use]
    pub fn for_month(&self, month: u32) -> KilowattHours {
        self.0[month as usize - 1]
    }

    #[must_use]
    pub fn total(&self) -> KilowattHours {
        self.0.iter().copied().sum()
    }
}

/// Group the samples by day, sum, and sort chronologically.
///
/// Empty input yields empty output; callers treat that as a failed fetch.
#[must_use]
pub fn aggregate_daily(samples: &[HourlySample]) -> Vec<DailyTotal> {
    let mut by_day = BTreeMap::<NaiveDate, KilowattHours>::new();
    for sample in samples {
        *by_day.entry(sample.day).or_default() += sample.energy;
    }
    by_day
        .into_iter()
        .map(|(day, energy)| DailyTotal::new(day, energy.round_to_watt_hours()))
        .collect()
}

/// Average hourly shape of a month: per-hour sums divided by the number of
/// distinct days seen in that month. The divisor is floored at 1 so a month
/// without data yields zeros instead of a division error.
#[must_use]
pub fn month_average_profile(samples: &[HourlySample], month: u32) -> HourProfile {
    let mut sums = [KilowattHours::ZERO; 24];
    let mut days = BTreeSet::new();
    for sample in samples.iter().filter(|sample| sample.month() == month) {
        sums[sample.hour as usize] += sample.energy;
        days.insert(sample.day);
    }
    #[allow(clippy::cast_precision_loss)]
    let divisor = days.len().max(1) as f64;
    HourProfile(sums.map(|energy| (energy / divisor).round_to_watt_hours()))
}

/// Hourly shape of one exact calendar day.
#[must_use]
pub fn day_profile(samples: &[HourlySample], day: NaiveDate) -> HourProfile {
    let mut sums = [KilowattHours::ZERO; 24];
    for sample in samples.iter().filter(|sample| sample.day == day) {
        sums[sample.hour as usize] += sample.energy;
    }
    HourProfile(sums.map(KilowattHours::round_to_watt_hours))
}

/// Monthly totals of the daily series. A month observed across several
/// distinct years is divided by that year count, so a multi-year series
/// still reports one representative year.
#[must_use]
pub fn monthly_totals_from_daily(daily: &[DailyTotal]) -> MonthlyTotals {
    let mut sums = [KilowattHours::ZERO; 12];
    let mut years: [BTreeSet<i32>; 12] = array::from_fn(|_| BTreeSet::new());
    for total in daily {
        let month = total.day.month0() as usize;
        sums[month] += total.energy;
        years[month].insert(total.day.year());
    }
    MonthlyTotals(array::from_fn(|month| {
        #[allow(clippy::cast_precision_loss)]
        let year_count = years[month].len().max(1) as f64;
        (sums[month] / year_count).round_to_watt_hours()
    }))
}

/// Additive merge of two orientations' hourly series on the `(day, hour)`
/// key. This is the input shape the self-consumption estimator expects when
/// two azimuths are compared: summed, never averaged.
#[must_use]
pub fn merge_hourly(primary: &[HourlySample], secondary: &[HourlySample]) -> Vec<HourlySample> {
    let mut by_key = BTreeMap::<(NaiveDate, u32), KilowattHours>::new();
    for sample in primary.iter().chain(secondary) {
        *by_key.entry((sample.day, sample.hour)).or_default() += sample.energy;
    }
    by_key
        .into_iter()
        .map(|((day, hour), energy)| HourlySample::new(day, hour, energy))
        .collect()
}

/// Day-wise sum of two daily series, rounded and sorted, for the combined
/// statistics of a dual-azimuth estimate.
#[must_use]
pub fn combine_daily(primary: &[DailyTotal], secondary: &[DailyTotal]) -> Vec<DailyTotal> {
    let mut by_day = BTreeMap::<NaiveDate, KilowattHours>::new();
    for total in primary.iter().chain(secondary) {
        *by_day.entry(total.day).or_default() += total.energy;
    }
    by_day
        .into_iter()
        .map(|(day, energy)| DailyTotal::new(day, energy.round_to_watt_hours()))
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_aggregate_daily_reproduces_split_totals() {
        // 3.111 and 2.222 kWh split arbitrarily across the day.
        let samples = vec![
            HourlySample::new(date(2020, 1, 1), 9, KilowattHours(1.011)),
            HourlySample::new(date(2020, 1, 1), 12, KilowattHours(2.0)),
            HourlySample::new(date(2020, 1, 1), 15, KilowattHours(0.1)),
            HourlySample::new(date(2020, 1, 2), 10, KilowattHours(2.0)),
            HourlySample::new(date(2020, 1, 2), 14, KilowattHours(0.222)),
        ];
        let daily = aggregate_daily(&samples);
        assert_eq!(daily, vec![
            DailyTotal::new(date(2020, 1, 1), KilowattHours(3.111)),
            DailyTotal::new(date(2020, 1, 2), KilowattHours(2.222)),
        ]);
    }

    #[test]
    fn test_aggregate_daily_sorts_and_matches_grand_total() {
        let samples = vec![
            HourlySample::new(date(2020, 6, 2), 12, KilowattHours(1.5)),
            HourlySample::new(date(2020, 6, 1), 11, KilowattHours(0.25)),
            HourlySample::new(date(2020, 6, 1), 13, KilowattHours(0.75)),
        ];
        let daily = aggregate_daily(&samples);
        assert!(daily.is_sorted_by_key(|total| total.day));

        let grand_total: KilowattHours = samples.iter().map(|sample| sample.energy).sum();
        let daily_total: KilowattHours = daily.iter().map(|total| total.energy).sum();
        assert_abs_diff_eq!(grand_total.0, daily_total.0, epsilon = 0.0005 * daily.len() as f64);
    }

    #[test]
    fn test_aggregate_daily_is_idempotent() {
        let samples = vec![
            HourlySample::new(date(2020, 3, 1), 10, KilowattHours(1.2)),
            HourlySample::new(date(2020, 3, 1), 11, KilowattHours(0.8)),
            HourlySample::new(date(2020, 3, 2), 12, KilowattHours(2.5)),
        ];
        let daily = aggregate_daily(&samples);
        let reinterpreted: Vec<HourlySample> = daily
            .iter()
            .map(|total| HourlySample::new(total.day, 0, total.energy))
            .collect();
        assert_eq!(aggregate_daily(&reinterpreted), daily);
    }

    #[test]
    fn test_aggregate_daily_empty() {
        assert!(aggregate_daily(&[]).is_empty());
    }

    #[test]
    fn test_month_average_profile_single_day_equals_day_profile() {
        let samples = vec![
            HourlySample::new(date(2020, 6, 21), 10, KilowattHours(1.0)),
            HourlySample::new(date(2020, 6, 21), 12, KilowattHours(3.0)),
        ];
        let average = month_average_profile(&samples, 6);
        let single = day_profile(&samples, date(2020, 6, 21));
        assert_eq!(average, single);
        assert_eq!(average.total(), single.total());
        assert_eq!(average.0.len(), 24);
    }

    #[test]
    fn test_month_average_profile_divides_by_distinct_days() {
        let samples = vec![
            HourlySample::new(date(2020, 6, 1), 12, KilowattHours(2.0)),
            HourlySample::new(date(2020, 6, 2), 12, KilowattHours(4.0)),
        ];
        let average = month_average_profile(&samples, 6);
        assert_eq!(average[12], KilowattHours(3.0));
    }

    #[test]
    fn test_month_average_profile_empty_month_is_zeros() {
        let samples =
            vec![HourlySample::new(date(2020, 6, 21), 12, KilowattHours(4.0))];
        assert_eq!(month_average_profile(&samples, 1), HourProfile::ZERO);
    }

    #[test]
    fn test_sum_profiles_is_commutative() {
        let mut a = HourProfile::ZERO;
        let mut b = HourProfile::ZERO;
        a.0[8] = KilowattHours(1.25);
        b.0[8] = KilowattHours(0.5);
        b.0[20] = KilowattHours(0.125);
        assert_eq!(a.sum(&b), b.sum(&a));
        assert_eq!(a.sum(&b)[8], KilowattHours(1.75));
        assert_eq!(a.sum(&b).0.len(), 24);
    }

    #[test]
    fn test_monthly_totals_from_daily() {
        let daily = vec![
            DailyTotal::new(date(2020, 1, 1), KilowattHours(3.0)),
            DailyTotal::new(date(2020, 1, 2), KilowattHours(2.0)),
            DailyTotal::new(date(2020, 2, 1), KilowattHours(1.5)),
        ];
        let monthly = monthly_totals_from_daily(&daily);
        assert_eq!(monthly.for_month(1), KilowattHours(5.0));
        assert_eq!(monthly.for_month(2), KilowattHours(1.5));
        assert_eq!(monthly.for_month(3), KilowattHours::ZERO);
    }

    #[test]
    fn test_monthly_totals_average_across_distinct_years() {
        let daily = vec![
            DailyTotal::new(date(2019, 7, 1), KilowattHours(4.0)),
            DailyTotal::new(date(2020, 7, 1), KilowattHours(2.0)),
            DailyTotal::new(date(2021, 7, 1), KilowattHours(3.0)),
        ];
        let monthly = monthly_totals_from_daily(&daily);
        assert_eq!(monthly.for_month(7), KilowattHours(3.0));
    }

    #[test]
    fn test_merge_hourly_is_additive_on_matching_keys() {
        let primary = vec![
            HourlySample::new(date(2020, 6, 21), 12, KilowattHours(2.0)),
            HourlySample::new(date(2020, 6, 21), 13, KilowattHours(1.0)),
        ];
        let secondary = vec![
            HourlySample::new(date(2020, 6, 21), 12, KilowattHours(0.5)),
            HourlySample::new(date(2020, 6, 22), 12, KilowattHours(0.25)),
        ];
        let merged = merge_hourly(&primary, &secondary);
        assert_eq!(merged, vec![
            HourlySample::new(date(2020, 6, 21), 12, KilowattHours(2.5)),
            HourlySample::new(date(2020, 6, 21), 13, KilowattHours(1.0)),
            HourlySample::new(date(2020, 6, 22), 12, KilowattHours(0.25)),
        ]);
    }

    #[test]
    fn test_combine_daily() {
        let primary = vec![DailyTotal::new(date(2020, 1, 1), KilowattHours(3.0))];
        let secondary = vec![
            DailyTotal::new(date(2020, 1, 1), KilowattHours(1.0)),
            DailyTotal::new(date(2020, 1, 2), KilowattHours(2.0)),
        ];
        assert_eq!(combine_daily(&primary, &secondary), vec![
            DailyTotal::new(date(2020, 1, 1), KilowattHours(4.0)),
            DailyTotal::new(date(2020, 1, 2), KilowattHours(2.0)),
        ]);
    }
}
