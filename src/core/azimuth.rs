//! Compass conventions.
//!
//! The UI and PVGIS speak south-referenced azimuths (0° = due south,
//! positive towards west); PVWatts and the map speak north-clockwise
//! bearings (0° = due north). Everything crossing that boundary goes
//! through these two types.

use std::fmt::{Debug, Display, Formatter};

/// South-referenced panel azimuth in degrees, canonical range (−180, 180].
#[derive(
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Sub,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct Azimuth(pub f64);

impl Azimuth {
    /// Map any real angle into (−180, 180], reporting the boundary as +180.
    #[must_use]
    pub fn normalized(self) -> Self {
        let normalized = ((self.0 + 180.0) % 360.0 + 360.0) % 360.0 - 180.0;
        Self(if normalized == -180.0 { 180.0 } else { normalized })
    }

    /// The opposing roof orientation.
    #[must_use]
    pub fn opposite(self) -> Self {
        Self(self.0 + 180.0).normalized()
    }

    #[must_use]
    pub fn to_bearing(self) -> Bearing {
        Bearing(180.0 - self.0).normalized()
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }
}

impl Display for Azimuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

impl Debug for Azimuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// North-clockwise compass bearing in degrees, canonical range [0, 360).
#[derive(
    Clone,
    Copy,
    PartialEq,
    PartialOrd,
    derive_more::Add,
    derive_more::From,
    derive_more::Sub,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct Bearing(pub f64);

impl Bearing {
    #[must_use]
    pub fn normalized(self) -> Self {
        Self((self.0 % 360.0 + 360.0) % 360.0)
    }

    #[must_use]
    pub fn to_azimuth(self) -> Azimuth {
        Azimuth(180.0 - self.0).normalized()
    }
}

impl Display for Bearing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}

impl Debug for Bearing {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Whether the second azimuth still follows the first one.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SecondaryLink {
    /// The second azimuth is recomputed as the opposite of the first.
    Auto,
    /// The user overrode the second azimuth; it no longer follows the first.
    Manual,
}

/// The pair of compared orientations with its explicit link state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AzimuthPair {
    primary: Azimuth,
    secondary: Azimuth,
    link: SecondaryLink,
}

impl AzimuthPair {
    /// Start a comparison: the second azimuth opposes the first.
    #[must_use]
    pub fn linked(primary: Azimuth) -> Self {
        Self { primary, secondary: primary.opposite(), link: SecondaryLink::Auto }
    }

    pub fn set_primary(&mut self, primary: Azimuth) {
        self.primary = primary;
        if self.link == SecondaryLink::Auto {
            self.secondary = primary.opposite();
        }
    }

    /// A manual edit detaches the second azimuth from the first.
    pub fn set_secondary(&mut self, secondary: Azimuth) {
        self.secondary = secondary;
        self.link = SecondaryLink::Manual;
    }

    /// Re-enabling the comparison restores auto-linking.
    pub fn relink(&mut self) {
        self.link = SecondaryLink::Auto;
        self.secondary = self.primary.opposite();
    }

    #[must_use]
    pub const fn primary(&self) -> Azimuth {
        self.primary
    }

    #[must_use]
    pub const fn secondary(&self) -> Azimuth {
        self.secondary
    }

    #[must_use]
    pub const fn link(&self) -> SecondaryLink {
        self.link
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn test_to_bearing() {
        assert_eq!(Azimuth(0.0).to_bearing(), Bearing(180.0));
        assert_eq!(Azimuth(90.0).to_bearing(), Bearing(90.0));
        assert_eq!(Azimuth(-90.0).to_bearing(), Bearing(270.0));
        assert_eq!(Azimuth(180.0).to_bearing(), Bearing(0.0));
    }

    #[test]
    fn test_round_trip() {
        for degrees in -179..=180 {
            let azimuth = Azimuth(f64::from(degrees));
            let round_tripped = azimuth.to_bearing().to_azimuth();
            assert_abs_diff_eq!(round_tripped.0, azimuth.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_normalized_boundary() {
        assert_eq!(Azimuth(-180.0).normalized(), Azimuth(180.0));
        assert_eq!(Azimuth(540.0).normalized(), Azimuth(180.0));
        assert_eq!(Azimuth(-190.0).normalized(), Azimuth(170.0));
    }

    #[test]
    fn test_opposite_involution() {
        for degrees in -179..=180 {
            let azimuth = Azimuth(f64::from(degrees));
            assert_abs_diff_eq!(azimuth.opposite().opposite().0, azimuth.0, epsilon = 1e-9);
            let separation = (azimuth - azimuth.opposite()).normalized();
            assert_abs_diff_eq!(separation.0.abs(), 180.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_pair_follows_primary_while_linked() {
        let mut pair = AzimuthPair::linked(Azimuth(0.0));
        assert_eq!(pair.secondary(), Azimuth(180.0));

        pair.set_primary(Azimuth(-45.0));
        assert_eq!(pair.secondary(), Azimuth(135.0));
    }

    #[test]
    fn test_pair_manual_edit_detaches() {
        let mut pair = AzimuthPair::linked(Azimuth(0.0));
        pair.set_secondary(Azimuth(90.0));
        assert_eq!(pair.link(), SecondaryLink::Manual);

        pair.set_primary(Azimuth(30.0));
        assert_eq!(pair.secondary(), Azimuth(90.0));

        pair.relink();
        assert_eq!(pair.link(), SecondaryLink::Auto);
        assert_eq!(pair.secondary(), Azimuth(-150.0));
    }
}
