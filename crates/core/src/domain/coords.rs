use serde::{Deserialize, Serialize};

/// Hemisphere marker for southern latitudes (lintang selatan).
pub const SOUTH_MARKER: &str = "LS";

/// Hemisphere marker for western longitudes (bujur barat).
pub const WEST_MARKER: &str = "BB";

/// A position in signed decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// False when either component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Parse the feed's locale coordinate strings (e.g. `"6.20 LS"`, `"106.80 BT"`)
/// into signed degrees.
///
/// Malformed input is not an error: it produces NaN in the affected component.
pub fn parse_coordinates(lintang: &str, bujur: &str) -> GeoPoint {
    GeoPoint {
        lat: parse_locale_degrees(lintang, SOUTH_MARKER),
        lon: parse_locale_degrees(bujur, WEST_MARKER),
    }
}

fn parse_locale_degrees(raw: &str, negative_marker: &str) -> f64 {
    let numeric: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value = leading_float(&numeric);
    if raw.contains(negative_marker) {
        -value
    } else {
        value
    }
}

/// Parse the longest prefix of `s` that reads as a decimal number, the way a
/// lenient float reader does: `"1.5.2"` reads as 1.5, `"5.5 SR"` as 5.5,
/// `"-"` or `""` as NaN. Only digits count, so `"inf"` and `"nan"` are NaN too.
pub(crate) fn leading_float(s: &str) -> f64 {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'-' | b'+')) {
        end = 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return f64::NAN;
    }

    s[..end]
        .trim_end_matches('.')
        .parse::<f64>()
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_south_west_are_negative() {
        let p = parse_coordinates("3.45 LS", "98.12 BB");
        assert_eq!((p.lat, p.lon), (-3.45, -98.12));
    }

    #[test]
    fn test_north_east_are_positive() {
        let p = parse_coordinates("3.45 LU", "98.12 BT");
        assert_eq!((p.lat, p.lon), (3.45, 98.12));
    }

    #[test]
    fn test_missing_marker_is_positive() {
        let p = parse_coordinates("6.2", "106.8");
        assert_eq!((p.lat, p.lon), (6.2, 106.8));
    }

    #[test]
    fn test_feed_sample() {
        let p = parse_coordinates("6.2 LS", "106.8 BT");
        assert_eq!((p.lat, p.lon), (-6.2, 106.8));
        assert!(p.is_finite());
    }

    #[test]
    fn test_malformed_input_yields_nan() {
        let p = parse_coordinates("LS", "unknown");
        assert!(p.lat.is_nan());
        assert!(p.lon.is_nan());
        assert!(!p.is_finite());
    }

    #[test]
    fn test_lenient_prefix() {
        assert_eq!(leading_float("1.5.2"), 1.5);
        assert_eq!(leading_float("12."), 12.0);
        assert_eq!(leading_float(".5"), 0.5);
        assert!(leading_float("-").is_nan());
        assert!(leading_float("").is_nan());
        assert_eq!(leading_float("+2"), 2.0);
        assert_eq!(leading_float("5.5 SR"), 5.5);
        assert!(leading_float("inf").is_nan());
    }

    #[test]
    fn test_stray_characters_are_stripped() {
        let p = parse_coordinates("  0,75° LS", "127.3°BT ");
        // the comma is dropped, leaving "075"
        assert_eq!(p.lat, -75.0);
        assert_eq!(p.lon, 127.3);
    }
}
