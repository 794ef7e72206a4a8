use super::render::{render_marker, render_panel, MarkerSpec, PanelView, FAILURE_MESSAGE};
use crate::domain::Event;

/// What the info panel currently holds
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PanelState {
    /// Nothing fetched yet
    #[default]
    Empty,

    /// The last shown event
    Event(PanelView),

    /// The localized failure message
    Error(String),
}

/// Read-only projection of monitor state for UI consumption
#[derive(Debug, Default)]
pub struct ReadProjection {
    /// Base URL shakemap filenames are appended to
    pub shakemap_base: String,

    /// Whether a fetch is in flight (drives the loading indicator)
    pub loading: bool,

    /// Whether the info panel is shown
    pub panel_visible: bool,

    pub panel: PanelState,

    /// Panel of the last shown event, kept while an error is displayed
    pub last_event_panel: Option<PanelView>,

    /// The single marker on the map
    pub marker: Option<MarkerSpec>,

    /// Unix time of the last completed fetch
    pub last_checked: Option<i64>,

    /// Number of events rendered so far
    pub renders: u64,

    /// Number of fetches that failed so far
    pub failures: u64,
}

impl ReadProjection {
    pub fn new(shakemap_base: impl Into<String>) -> Self {
        Self {
            shakemap_base: shakemap_base.into(),
            ..Self::default()
        }
    }

    /// Apply an event to update the projection.
    ///
    /// The panel is hidden while a fetch runs and shown again when it
    /// finishes, even if the event did not change, as long as it has
    /// content. An unchanged fetch after a failure swaps the error message
    /// back for the last event panel; counters and marker stay as they are.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::FetchStarted { .. } => {
                self.loading = true;
                self.panel_visible = false;
            }

            Event::FetchSkipped { .. } => {
                // Nothing changes while the running fetch is outstanding
            }

            Event::QuakeUpdated { record } => {
                let panel = render_panel(record, &self.shakemap_base);
                self.last_event_panel = Some(panel.clone());
                self.panel = PanelState::Event(panel);
                self.panel_visible = true;
                // replaces any previous marker
                self.marker = Some(render_marker(record));
                self.renders += 1;
            }

            Event::QuakeUnchanged => {
                if matches!(self.panel, PanelState::Error(_)) {
                    if let Some(panel) = &self.last_event_panel {
                        self.panel = PanelState::Event(panel.clone());
                    }
                }
            }

            Event::FetchFailed { .. } => {
                self.panel = PanelState::Error(FAILURE_MESSAGE.to_string());
                self.panel_visible = true;
                self.failures += 1;
            }

            Event::FetchFinished { checked_at, .. } => {
                self.loading = false;
                self.last_checked = Some(*checked_at);
                if !matches!(self.panel, PanelState::Empty) {
                    self.panel_visible = true;
                }
            }

            Event::ShakemapChecked { url, available } => {
                if let PanelState::Event(panel) = &mut self.panel {
                    panel.shakemap.resolve(url, *available);
                }
                if let Some(panel) = &mut self.last_event_panel {
                    panel.shakemap.resolve(url, *available);
                }
            }

            Event::QuitRequested => {
                // No state change needed
            }
        }
    }

    /// Panel of the event currently displayed, if any
    pub fn event_panel(&self) -> Option<&PanelView> {
        match &self.panel {
            PanelState::Event(panel) => Some(panel),
            _ => None,
        }
    }
}
