//! Caller-side rebuild cadence.

use std::time::{Duration, Instant};

use glam::DVec3;
use planetoid_config::RebuildConfig;

/// Decides when a moving camera warrants a new rebuild.
///
/// A rebuild is due on the first poll, after [`RebuildThrottle::force`], or
/// once both the minimum interval has elapsed and the camera has moved at
/// least the minimum travel since the last rebuild.
#[derive(Debug, Clone)]
pub struct RebuildThrottle {
    min_interval: Duration,
    min_travel: f64,
    last: Option<(Instant, DVec3)>,
    forced: bool,
}

impl RebuildThrottle {
    /// Throttle with the configured interval and travel; the first poll is
    /// always due.
    pub fn new(config: &RebuildConfig) -> Self {
        Self {
            min_interval: Duration::from_millis(config.min_interval_ms),
            min_travel: config.min_camera_travel.max(0.0),
            last: None,
            forced: false,
        }
    }

    /// Whether a rebuild is due, without recording one.
    pub fn is_due(&self, camera: DVec3, now: Instant) -> bool {
        match self.last {
            None => true,
            Some(_) if self.forced => true,
            Some((at, position)) => {
                now.saturating_duration_since(at) >= self.min_interval
                    && position.distance(camera) >= self.min_travel
            }
        }
    }

    /// Returns `true` and records the rebuild if one is due.
    pub fn poll(&mut self, camera: DVec3, now: Instant) -> bool {
        if !self.is_due(camera, now) {
            return false;
        }
        self.last = Some((now, camera));
        self.forced = false;
        true
    }

    /// Make the next poll trigger regardless of time and travel.
    pub fn force(&mut self) {
        self.forced = true;
    }
}
