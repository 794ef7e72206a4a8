use serde::{Deserialize, Serialize};

/// Smallest marker radius, in screen pixels at the reference scale.
pub const MIN_MARKER_RADIUS: f64 = 15.0;

/// Largest marker radius, in screen pixels at the reference scale.
pub const MAX_MARKER_RADIUS: f64 = 40.0;

/// Pixels of radius per unit of magnitude before clamping.
pub const RADIUS_PER_MAGNITUDE: f64 = 6.0;

/// Fill color of the magnitude badge and the map marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeverityColor {
    DarkRed,
    Red,
    OrangeRed,
    Orange,
    Gold,
    LightGreen,
}

impl SeverityColor {
    /// Pick the color for a magnitude. NaN falls through to the lowest band.
    pub fn from_magnitude(magnitude: f64) -> Self {
        if magnitude >= 7.0 {
            Self::DarkRed
        } else if magnitude >= 6.0 {
            Self::Red
        } else if magnitude >= 5.0 {
            Self::OrangeRed
        } else if magnitude >= 4.0 {
            Self::Orange
        } else if magnitude >= 3.0 {
            Self::Gold
        } else {
            Self::LightGreen
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::DarkRed => (0x8B, 0x00, 0x00),
            Self::Red => (0xFF, 0x00, 0x00),
            Self::OrangeRed => (0xFF, 0x45, 0x00),
            Self::Orange => (0xFF, 0xA5, 0x00),
            Self::Gold => (0xFF, 0xD7, 0x00),
            Self::LightGreen => (0x90, 0xEE, 0x90),
        }
    }

    /// Whether dark text reads better than light text on this fill.
    pub const fn prefers_dark_text(self) -> bool {
        matches!(self, Self::Orange | Self::Gold | Self::LightGreen)
    }
}

/// Marker radius for a magnitude: `clamp(magnitude * 6, 15, 40)`.
///
/// An unparseable magnitude (NaN) gets the smallest radius.
pub fn marker_radius(magnitude: f64) -> f64 {
    if magnitude.is_nan() {
        return MIN_MARKER_RADIUS;
    }
    (magnitude * RADIUS_PER_MAGNITUDE).clamp(MIN_MARKER_RADIUS, MAX_MARKER_RADIUS)
}
