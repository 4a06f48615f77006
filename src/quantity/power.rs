use std::fmt::{Debug, Display, Formatter};

use crate::quantity::energy::KilowattHours;

#[derive(
    Clone,
    Copy,
    Default,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct Kilowatts(pub f64);

impl Kilowatts {
    pub const ZERO: Self = Self(0.0);

    /// Energy drawn over one hour at this constant power.
    #[must_use]
    pub const fn over_one_hour(self) -> KilowattHours {
        KilowattHours(self.0)
    }
}

impl Display for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2} kW", self.0)
    }
}

impl Debug for Kilowatts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.0}W", self.0 * 1000.0)
    }
}
