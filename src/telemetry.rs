use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::line::LineTelemetry;

/// Read-only snapshot of the kite's pose, handed across the external
/// boundary in SI units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KiteTelemetry {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub linear_velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
    pub apparent_wind: Vector3<f64>,
    pub lift: Vector3<f64>,
    pub drag: Vector3<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub distance: f64,
    pub taut: bool,
    pub tension: f64,
}

impl From<LineTelemetry> for LineSnapshot {
    fn from(t: LineTelemetry) -> Self {
        LineSnapshot { distance: t.distance, taut: t.taut, tension: t.tension }
    }
}

/// Counts every time the integrator/solver had to revert a non-finite
/// result (§7 recovery path). Never reset except by `reset()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonFiniteRecoveryCounter {
    count: u64,
}

impl NonFiniteRecoveryCounter {
    pub fn record(&mut self) {
        self.count += 1;
        log::warn!("non-finite kite state detected, reverting to previous tick (total recoveries: {})", self.count);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increments_and_resets() {
        let mut counter = NonFiniteRecoveryCounter::default();
        counter.record();
        counter.record();
        assert_eq!(counter.count(), 2);
        counter.reset();
        assert_eq!(counter.count(), 0);
    }
}
