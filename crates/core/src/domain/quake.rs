use super::coords::leading_float;
use serde::{Deserialize, Deserializer, Serialize};

/// Top-level document published by the feed:
/// `{ "Infogempa": { "gempa": { ... } } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedDocument {
    #[serde(rename = "Infogempa")]
    pub info: InfoGempa,
}

/// Wrapper object holding the single latest event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoGempa {
    #[serde(rename = "gempa")]
    pub event: EventRecord,
}

impl FeedDocument {
    /// Extract the nested event record.
    pub fn into_record(self) -> EventRecord {
        self.info.event
    }
}

/// One earthquake report as supplied by the feed.
///
/// Field names on the wire are the feed's own (Indonesian) names. Values are
/// kept as the strings the feed sends so the panel can show them exactly as
/// published; numeric views are derived on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "DateTime")]
    pub date_time: String,

    #[serde(rename = "Wilayah")]
    pub region: String,

    #[serde(rename = "Magnitude", deserialize_with = "string_or_number")]
    pub magnitude: String,

    #[serde(rename = "Kedalaman", default)]
    pub depth: String,

    #[serde(rename = "Tanggal", default)]
    pub date: String,

    #[serde(rename = "Jam", default)]
    pub time: String,

    #[serde(rename = "Lintang")]
    pub latitude: String,

    #[serde(rename = "Bujur")]
    pub longitude: String,

    #[serde(rename = "Potensi", default)]
    pub potential: String,

    #[serde(rename = "Dirasakan", default, skip_serializing_if = "Option::is_none")]
    pub felt: Option<String>,

    #[serde(rename = "Shakemap", default, skip_serializing_if = "Option::is_none")]
    pub shakemap: Option<String>,
}

impl EventRecord {
    /// Magnitude as a number, read from the leading decimal of the field the
    /// same way coordinates are. A value with no leading number yields NaN,
    /// which every severity threshold treats as "below".
    pub fn magnitude_value(&self) -> f64 {
        leading_float(self.magnitude.trim())
    }

    /// Felt report, if present and not blank.
    pub fn felt_report(&self) -> Option<&str> {
        self.felt.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Shakemap filename, if present and not blank.
    pub fn shakemap_file(&self) -> Option<&str> {
        self.shakemap.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// The (timestamp, region) pair that identifies an event.
    pub fn identity(&self) -> (&str, &str) {
        (&self.date_time, &self.region)
    }
}

impl std::fmt::Display for EventRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M{} {} ({})", self.magnitude, self.region, self.date_time)
    }
}

/// The feed publishes magnitude as a string, but a bare number is accepted too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
