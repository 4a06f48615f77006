use std::{
    fmt::{Debug, Display, Formatter},
    ops::{Div, Mul},
};

#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct KilowattHours(pub f64);

impl KilowattHours {
    pub const ZERO: Self = Self(0.0);

    /// Round to the reporting resolution: one watt-hour.
    #[must_use]
    pub fn round_to_watt_hours(self) -> Self {
        Self((self.0 * 1000.0).round() / 1000.0)
    }

    #[must_use]
    pub fn min(mut self, rhs: Self) -> Self {
        if rhs < self {
            self = rhs;
        }
        self
    }

    #[must_use]
    pub fn max(mut self, rhs: Self) -> Self {
        if rhs > self {
            self = rhs;
        }
        self
    }
}

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}kWh", self.0)
    }
}

impl Mul<f64> for KilowattHours {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for KilowattHours {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

/// Dimensionless ratio of two energies.
impl Div<KilowattHours> for KilowattHours {
    type Output = f64;

    fn div(self, rhs: KilowattHours) -> Self::Output {
        self.0 / rhs.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_watt_hours() {
        assert_eq!(KilowattHours(1.23456).round_to_watt_hours(), KilowattHours(1.235));
        assert_eq!(KilowattHours(0.0004).round_to_watt_hours(), KilowattHours::ZERO);
    }

    #[test]
    fn test_min_max() {
        assert_eq!(KilowattHours(1.0).min(KilowattHours(2.0)), KilowattHours(1.0));
        assert_eq!(KilowattHours(1.0).max(KilowattHours(2.0)), KilowattHours(2.0));
    }
}
