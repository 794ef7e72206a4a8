use gempa_core::domain::GeoPoint;
use std::time::{Duration, Instant};

/// Map width, in pixels, that zoom levels and marker radii are calibrated against
pub const REFERENCE_WIDTH_PX: f64 = 1400.0;

const TILE_SIZE_PX: f64 = 256.0;

/// Where the map looks: a center and a web-map style zoom level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub center: GeoPoint,
    pub zoom: f64,
}

impl CameraView {
    pub const fn new(center: GeoPoint, zoom: f64) -> Self {
        Self { center, zoom }
    }

    /// Degrees of longitude covered by one reference pixel
    pub fn degrees_per_px(&self) -> f64 {
        360.0 / (TILE_SIZE_PX * 2f64.powf(self.zoom))
    }

    /// Degrees of longitude visible across the map
    pub fn lon_span(&self) -> f64 {
        self.degrees_per_px() * REFERENCE_WIDTH_PX
    }

    /// Canvas x (longitude) and y (latitude) bounds for a map area of
    /// `width` x `height` terminal cells. Braille cells hold 2x4 dots, which
    /// makes a dot roughly square.
    pub fn bounds(&self, width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
        let lon_span = self.lon_span();
        let lat_span = if width == 0 {
            lon_span
        } else {
            lon_span * (f64::from(height) * 4.0) / (f64::from(width) * 2.0)
        };

        let GeoPoint { lat, lon } = self.center;
        (
            [lon - lon_span / 2.0, lon + lon_span / 2.0],
            [lat - lat_span / 2.0, lat + lat_span / 2.0],
        )
    }
}

#[derive(Debug, Clone)]
struct Flight {
    from: CameraView,
    to: CameraView,
    started: Instant,
    duration: Duration,
}

impl Flight {
    fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let total = self.duration.as_secs_f64();
        if total <= 0.0 {
            1.0
        } else {
            (elapsed / total).min(1.0)
        }
    }

    fn landed(&self, now: Instant) -> bool {
        now >= self.started + self.duration
    }
}

/// Map camera with an optional animated flight between two views
#[derive(Debug, Clone)]
pub struct Camera {
    view: CameraView,
    flight: Option<Flight>,
}

impl Camera {
    pub fn new(view: CameraView) -> Self {
        Self { view, flight: None }
    }

    /// Move immediately, cancelling any flight
    pub fn jump_to(&mut self, view: CameraView) {
        self.view = view;
        self.flight = None;
    }

    /// Animate from the current position to `target` over `duration`.
    /// A target with a non-finite center or zoom is ignored; returns whether
    /// the camera will move.
    pub fn fly_to(&mut self, target: CameraView, now: Instant, duration: Duration) -> bool {
        if !target.center.is_finite() || !target.zoom.is_finite() {
            return false;
        }

        let from = self.view_at(now);
        self.view = from;
        self.flight = Some(Flight {
            from,
            to: target,
            started: now,
            duration,
        });
        true
    }

    /// The view to draw at `now`
    pub fn view_at(&self, now: Instant) -> CameraView {
        let Some(flight) = &self.flight else {
            return self.view;
        };

        let progress = flight.progress(now);
        if progress >= 1.0 {
            return flight.to;
        }

        let t = ease_in_out(progress);
        CameraView {
            center: GeoPoint::new(
                lerp(flight.from.center.lat, flight.to.center.lat, t),
                lerp(flight.from.center.lon, flight.to.center.lon, t),
            ),
            zoom: lerp(flight.from.zoom, flight.to.zoom, t),
        }
    }

    pub fn is_flying(&self, now: Instant) -> bool {
        self.flight.as_ref().is_some_and(|f| !f.landed(now))
    }

    /// Retire a flight that has landed. Returns true if one landed on this call.
    pub fn settle(&mut self, now: Instant) -> bool {
        match &self.flight {
            Some(flight) if flight.landed(now) => {
                self.view = flight.to;
                self.flight = None;
                true
            }
            _ => false,
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn ease_in_out(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}
