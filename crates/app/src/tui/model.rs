use super::camera::{Camera, CameraView};
use super::layers::BaseLayer;
use gempa_core::app::{ReadProjection, Trigger};
use gempa_core::domain::{Event, GeoPoint};
use gempa_core::ports::{AppConfig, MapConfig};
use std::time::{Duration, Instant};
use tracing::warn;

/// How long the refresh control keeps spinning after its fetch completes or is skipped
pub const SPIN_AFTER_FETCH: Duration = Duration::from_secs(1);

/// The TUI Model - this represents the complete UI state
/// This is separate from the core ReadProjection to allow UI-specific state
#[derive(Debug, Default)]
pub struct TuiModel {
    /// Core data from the monitor service
    pub projection: ReadProjection,

    /// UI-specific state
    pub ui_state: UiState,

    /// Current view mode
    pub mode: ViewMode,

    /// Whether the application should quit
    pub should_quit: bool,
}

/// Map camera settings taken from the config
#[derive(Debug, Clone)]
pub struct MapSettings {
    pub home: CameraView,
    pub focus_zoom: f64,
    pub fly_duration: Duration,
}

impl MapSettings {
    pub fn from_config(map: &MapConfig) -> Self {
        Self {
            home: CameraView::new(GeoPoint::new(map.home_lat, map.home_lon), map.home_zoom),
            focus_zoom: map.focus_zoom,
            fly_duration: map.fly_duration(),
        }
    }
}

/// Marker popup lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PopupState {
    #[default]
    Closed,

    /// Opens once the camera lands on the marker
    AwaitingLanding,

    Open,
}

/// Refresh control animation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpinState {
    #[default]
    Idle,

    /// Spinning until the next fetch completes or the manual refresh is skipped
    AwaitingFetch,

    /// Spinning until the given instant
    Until(Instant),
}

/// UI-specific state (layer, camera, popup, etc.)
#[derive(Debug)]
pub struct UiState {
    pub layer: BaseLayer,
    pub camera: Camera,
    pub map: MapSettings,
    pub popup: PopupState,
    pub refresh_spin: SpinState,

    /// Reference point for frame-based animations
    pub started: Instant,

    /// Terminal size
    pub terminal_width: u16,
    pub terminal_height: u16,
}

impl UiState {
    pub fn from_config(map: &MapConfig) -> Self {
        let settings = MapSettings::from_config(map);
        Self {
            layer: if map.satellite { BaseLayer::Satellite } else { BaseLayer::Street },
            camera: Camera::new(settings.home),
            map: settings,
            popup: PopupState::Closed,
            refresh_spin: SpinState::Idle,
            started: Instant::now(),
            terminal_width: 0,
            terminal_height: 0,
        }
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::from_config(&MapConfig::default())
    }
}

/// Different view modes for the TUI
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    /// Map and event panel
    Map,

    /// Help view
    Help,
}

impl TuiModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &AppConfig) -> Self {
        Self {
            projection: ReadProjection::new(config.feed.shakemap_base_url.clone()),
            ui_state: UiState::from_config(&config.map),
            mode: ViewMode::Map,
            should_quit: false,
        }
    }

    /// Apply an event to update both projection and UI state
    pub fn apply_event(&mut self, event: &Event, now: Instant) {
        // First update the projection
        self.projection.apply(event);

        // Then handle UI-specific updates
        match event {
            Event::QuakeUpdated { record } => {
                let Some(marker) = &self.projection.marker else {
                    return;
                };
                let target = CameraView::new(marker.position, self.ui_state.map.focus_zoom);
                let duration = self.ui_state.map.fly_duration;

                if self.ui_state.camera.fly_to(target, now, duration) {
                    self.ui_state.popup = PopupState::AwaitingLanding;
                } else {
                    warn!(
                        "Unusable coordinates {:?} / {:?}, map not moved",
                        record.latitude, record.longitude
                    );
                    self.ui_state.popup = PopupState::Closed;
                }
            }

            // A manual refresh dropped by the in-flight guard is over at once
            Event::FetchFinished { .. } | Event::FetchSkipped { trigger: Trigger::Manual } => {
                if self.ui_state.refresh_spin == SpinState::AwaitingFetch {
                    self.ui_state.refresh_spin = SpinState::Until(now + SPIN_AFTER_FETCH);
                }
            }

            Event::QuitRequested => {
                self.should_quit = true;
            }

            _ => {}
        }
    }

    /// Advance time-driven state: land flights, open the popup after
    /// landing, stop the refresh spinner.
    pub fn tick(&mut self, now: Instant) {
        self.ui_state.camera.settle(now);

        let landed = !self.ui_state.camera.is_flying(now);
        if self.ui_state.popup == PopupState::AwaitingLanding && landed {
            self.ui_state.popup = PopupState::Open;
        }

        if let SpinState::Until(deadline) = self.ui_state.refresh_spin {
            if now >= deadline {
                self.ui_state.refresh_spin = SpinState::Idle;
            }
        }
    }

    pub fn toggle_layer(&mut self) {
        self.ui_state.layer = self.ui_state.layer.toggle();
    }

    /// Jump back to the default regional view
    pub fn recenter(&mut self) {
        self.ui_state.camera.jump_to(self.ui_state.map.home);
    }

    /// Open or close the marker popup by hand
    pub fn toggle_popup(&mut self) {
        if self.drawable_marker().is_none() {
            return;
        }
        self.ui_state.popup = match self.ui_state.popup {
            PopupState::Open => PopupState::Closed,
            PopupState::Closed | PopupState::AwaitingLanding => PopupState::Open,
        };
    }

    pub fn start_refresh_spin(&mut self) {
        self.ui_state.refresh_spin = SpinState::AwaitingFetch;
    }

    pub fn is_spinning(&self) -> bool {
        self.ui_state.refresh_spin != SpinState::Idle
    }

    /// The marker, if its position can be placed on the map
    pub fn drawable_marker(&self) -> Option<&gempa_core::app::MarkerSpec> {
        self.projection
            .marker
            .as_ref()
            .filter(|m| m.position.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gempa_core::domain::EventRecord;

    fn record(lat: &str) -> EventRecord {
        EventRecord {
            date_time: "2024-01-01T00:00:00+07:00".to_string(),
            region: "Jakarta".to_string(),
            magnitude: "5.5".to_string(),
            depth: "10 km".to_string(),
            date: "01 Jan 2024".to_string(),
            time: "00:00:00 WIB".to_string(),
            latitude: lat.to_string(),
            longitude: "106.8 BT".to_string(),
            potential: "Tidak berpotensi tsunami".to_string(),
            felt: None,
            shakemap: None,
        }
    }

    #[test]
    fn test_new_event_flies_then_opens_popup() {
        let mut model = TuiModel::with_config(&AppConfig::default());
        let now = Instant::now();

        model.apply_event(&Event::QuakeUpdated { record: record("6.2 LS") }, now);
        assert_eq!(model.ui_state.popup, PopupState::AwaitingLanding);
        assert!(model.ui_state.camera.is_flying(now));

        model.tick(now + Duration::from_millis(1000));
        assert_eq!(model.ui_state.popup, PopupState::AwaitingLanding);

        let landed = now + Duration::from_millis(2000);
        model.tick(landed);
        assert_eq!(model.ui_state.popup, PopupState::Open);

        let view = model.ui_state.camera.view_at(landed);
        assert_eq!(view.center, GeoPoint::new(-6.2, 106.8));
        assert_eq!(view.zoom, 8.0);
    }

    #[test]
    fn test_malformed_coordinates_keep_camera() {
        let mut model = TuiModel::with_config(&AppConfig::default());
        let now = Instant::now();

        model.apply_event(&Event::QuakeUpdated { record: record("LS") }, now);

        assert!(model.projection.marker.is_some());
        assert!(model.drawable_marker().is_none());
        assert!(!model.ui_state.camera.is_flying(now));
        assert_eq!(model.ui_state.popup, PopupState::Closed);
        // the panel still shows the event
        assert!(model.projection.event_panel().is_some());
    }

    #[test]
    fn test_spin_lasts_one_second_after_fetch() {
        let mut model = TuiModel::new();
        let now = Instant::now();

        model.start_refresh_spin();
        model.apply_event(&Event::FetchStarted { trigger: Trigger::Manual }, now);
        model.tick(now + Duration::from_secs(5));
        assert!(model.is_spinning());

        let finished = now + Duration::from_secs(6);
        model.apply_event(&Event::FetchFinished { checked_at: 0, ok: false }, finished);
        model.tick(finished + Duration::from_millis(999));
        assert!(model.is_spinning());

        model.tick(finished + Duration::from_secs(1));
        assert!(!model.is_spinning());
    }

    #[test]
    fn test_skipped_manual_refresh_spins_one_second() {
        let mut model = TuiModel::new();
        let now = Instant::now();

        model.apply_event(&Event::FetchStarted { trigger: Trigger::Interval }, now);
        model.start_refresh_spin();
        model.apply_event(&Event::FetchSkipped { trigger: Trigger::Manual }, now);

        model.tick(now + Duration::from_millis(999));
        assert!(model.is_spinning());
        model.tick(now + Duration::from_secs(1));
        assert!(!model.is_spinning());

        // the interval fetch finishing later does not restart it
        let later = now + Duration::from_secs(15);
        model.apply_event(&Event::FetchFinished { checked_at: 0, ok: true }, later);
        model.tick(later);
        assert!(!model.is_spinning());
    }

    #[test]
    fn test_skipped_interval_tick_keeps_waiting() {
        let mut model = TuiModel::new();
        let now = Instant::now();

        model.start_refresh_spin();
        model.apply_event(&Event::FetchSkipped { trigger: Trigger::Interval }, now);
        model.tick(now + Duration::from_secs(5));
        assert!(model.is_spinning());
    }

    #[test]
    fn test_recenter_cancels_flight() {
        let mut model = TuiModel::new();
        let now = Instant::now();
        model.apply_event(&Event::QuakeUpdated { record: record("6.2 LS") }, now);

        model.recenter();
        assert!(!model.ui_state.camera.is_flying(now));
        assert_eq!(model.ui_state.camera.view_at(now), model.ui_state.map.home);
    }

    #[test]
    fn test_toggle_popup_needs_marker() {
        let mut model = TuiModel::new();
        model.toggle_popup();
        assert_eq!(model.ui_state.popup, PopupState::Closed);

        model.apply_event(&Event::QuakeUpdated { record: record("6.2 LS") }, Instant::now());
        model.toggle_popup();
        assert_eq!(model.ui_state.popup, PopupState::Open);
        model.toggle_popup();
        assert_eq!(model.ui_state.popup, PopupState::Closed);
    }

    #[test]
    fn test_satellite_from_config() {
        let mut config = AppConfig::default();
        config.map.satellite = true;
        let mut model = TuiModel::with_config(&config);
        assert_eq!(model.ui_state.layer, BaseLayer::Satellite);

        model.toggle_layer();
        assert_eq!(model.ui_state.layer, BaseLayer::Street);
    }

    #[test]
    fn test_quit_event() {
        let mut model = TuiModel::new();
        model.apply_event(&Event::QuitRequested, Instant::now());
        assert!(model.should_quit);
    }
}
