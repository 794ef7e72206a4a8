use super::quake::EventRecord;
use crate::app::Trigger;
use crate::error::FetchError;

/// Events emitted by the monitor service
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A fetch was started; the loading indicator goes up and the panel is hidden
    FetchStarted { trigger: Trigger },

    /// A trigger arrived while a fetch was already in flight and was dropped
    FetchSkipped { trigger: Trigger },

    /// The fetched record differs from the last shown one and must be rendered
    QuakeUpdated { record: EventRecord },

    /// The fetched record is the one already on screen
    QuakeUnchanged,

    /// The fetch failed (network, HTTP status, malformed body or timeout)
    FetchFailed { error: FetchError },

    /// The fetch is over, whatever the outcome; emitted exactly once per
    /// `FetchStarted`
    FetchFinished { checked_at: i64, ok: bool },

    /// Result of probing the shakemap image of the current event
    ShakemapChecked { url: String, available: bool },

    /// User requested to quit the application
    QuitRequested,
}
