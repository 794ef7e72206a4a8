//! Render descriptions for the info panel and the map marker.
//!
//! These are plain data built from an [`EventRecord`]; the TUI draws them.
//! Labels are in Indonesian, matching the feed.

use crate::domain::{marker_radius, parse_coordinates, EventRecord, GeoPoint, SeverityColor};

pub const PANEL_HEADING: &str = "Gempabumi Terbaru";
pub const FAILURE_MESSAGE: &str = "Gagal memuat data. Mencoba kembali...";
pub const SHAKEMAP_HEADING: &str = "Peta Guncangan (Shakemap)";
pub const SHAKEMAP_PENDING: &str = "Memuat shakemap...";
pub const SHAKEMAP_UNAVAILABLE: &str = "Shakemap tidak tersedia";

/// Outline drawn around every marker.
pub const MARKER_OUTLINE_RGB: (u8, u8, u8) = (0xFF, 0xFF, 0xFF);

/// Magnitude badge at the top of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct Badge {
    pub text: String,
    pub color: SeverityColor,
}

/// One labelled line of the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub label: &'static str,
    pub value: String,
}

/// State of the shakemap image reference.
#[derive(Debug, Clone, PartialEq)]
pub enum ShakemapRef {
    /// The record names no shakemap
    Missing,
    /// Not probed yet
    Pending { url: String },
    Available { url: String },
    /// The image could not be retrieved; the panel shows the fallback notice
    Unavailable { url: String },
}

impl ShakemapRef {
    pub fn url(&self) -> Option<&str> {
        match self {
            ShakemapRef::Missing => None,
            ShakemapRef::Pending { url }
            | ShakemapRef::Available { url }
            | ShakemapRef::Unavailable { url } => Some(url),
        }
    }

    /// Record the outcome of a probe. Ignored if `url` is not this reference.
    pub fn resolve(&mut self, url: &str, available: bool) {
        if self.url() != Some(url) {
            return;
        }
        let url = url.to_string();
        *self = if available {
            ShakemapRef::Available { url }
        } else {
            ShakemapRef::Unavailable { url }
        };
    }

    /// Text to show in place of the image.
    pub fn display_text(&self) -> &str {
        match self {
            ShakemapRef::Missing | ShakemapRef::Unavailable { .. } => SHAKEMAP_UNAVAILABLE,
            ShakemapRef::Pending { .. } => SHAKEMAP_PENDING,
            ShakemapRef::Available { url } => url,
        }
    }
}

/// Everything the info panel shows for one event.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub heading: &'static str,
    pub badge: Badge,
    pub rows: Vec<PanelRow>,
    pub shakemap: ShakemapRef,
}

impl PanelView {
    pub fn row(&self, label: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.label == label)
            .map(|row| row.value.as_str())
    }
}

/// Popup attached to the marker.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupView {
    pub title: String,
    pub lines: Vec<String>,
}

/// Everything the map needs to place one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: GeoPoint,
    /// Radius in screen pixels at the reference scale
    pub radius: f64,
    pub fill: SeverityColor,
    pub outline: (u8, u8, u8),
    pub popup: PopupView,
}

/// Join the fixed shakemap base path and a filename.
pub fn shakemap_url(base: &str, file: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        file.trim_start_matches('/')
    )
}

/// Build the info panel for a record.
pub fn render_panel(record: &EventRecord, shakemap_base: &str) -> PanelView {
    let color = SeverityColor::from_magnitude(record.magnitude_value());

    let mut rows = vec![
        PanelRow { label: "Lokasi", value: record.region.clone() },
        PanelRow { label: "Kedalaman", value: record.depth.clone() },
        PanelRow { label: "Tanggal", value: record.date.clone() },
        PanelRow { label: "Waktu", value: record.time.clone() },
        PanelRow {
            label: "Koordinat",
            value: format!("{}, {}", record.latitude, record.longitude),
        },
        PanelRow { label: "Potensi", value: record.potential.clone() },
    ];

    if let Some(felt) = record.felt_report() {
        rows.push(PanelRow { label: "Dirasakan", value: felt.to_string() });
    }

    let shakemap = match record.shakemap_file() {
        Some(file) => ShakemapRef::Pending { url: shakemap_url(shakemap_base, file) },
        None => ShakemapRef::Missing,
    };

    PanelView {
        heading: PANEL_HEADING,
        badge: Badge { text: format!("M {}", record.magnitude), color },
        rows,
        shakemap,
    }
}

/// Build the map marker and its popup for a record.
pub fn render_marker(record: &EventRecord) -> MarkerSpec {
    let magnitude = record.magnitude_value();

    MarkerSpec {
        position: parse_coordinates(&record.latitude, &record.longitude),
        radius: marker_radius(magnitude),
        fill: SeverityColor::from_magnitude(magnitude),
        outline: MARKER_OUTLINE_RGB,
        popup: PopupView {
            title: format!("Gempa M{}", record.magnitude),
            lines: vec![
                record.region.clone(),
                format!("Kedalaman: {}", record.depth),
                format!("{} {}", record.date, record.time),
                record.potential.clone(),
            ],
        },
    }
}
