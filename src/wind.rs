use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::KiteConfigError;

const KMH_TO_MS: f64 = 1.0 / 3.6;

/// Wind update as it crosses the external boundary: km/h and degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WindUpdate {
    pub speed_kmh: Option<f64>,
    pub direction_deg: Option<f64>,
    pub turbulence_pct: Option<f64>,
}

/// Deterministic procedural wind field with bounded pseudo-turbulence.
#[derive(Debug, Clone)]
pub struct WindField {
    speed_ms: f64,
    direction_rad: f64,
    turbulence: f64,
    phase: f64,
}

impl WindField {
    pub fn new(speed_kmh: f64, direction_deg: f64, turbulence_pct: f64) -> Result<Self, KiteConfigError> {
        let mut field = WindField {
            speed_ms: 0.0,
            direction_rad: 0.0,
            turbulence: 0.0,
            phase: 0.0,
        };
        field.set_speed_kmh(speed_kmh)?;
        field.direction_rad = direction_deg.to_radians();
        field.set_turbulence_pct(turbulence_pct)?;
        Ok(field)
    }

    pub fn set_speed_kmh(&mut self, speed_kmh: f64) -> Result<(), KiteConfigError> {
        if speed_kmh < 0.0 {
            return Err(KiteConfigError::NegativeWindSpeed(speed_kmh));
        }
        self.speed_ms = speed_kmh * KMH_TO_MS;
        Ok(())
    }

    pub fn set_direction_deg(&mut self, direction_deg: f64) {
        self.direction_rad = direction_deg.to_radians();
    }

    pub fn set_turbulence_pct(&mut self, turbulence_pct: f64) -> Result<(), KiteConfigError> {
        let frac = turbulence_pct / 100.0;
        if !(0.0..=1.0).contains(&frac) {
            return Err(KiteConfigError::TurbulenceOutOfRange(frac));
        }
        self.turbulence = frac;
        Ok(())
    }

    pub fn apply_update(&mut self, update: WindUpdate) -> Result<(), KiteConfigError> {
        if let Some(speed) = update.speed_kmh {
            self.set_speed_kmh(speed)?;
        }
        if let Some(dir) = update.direction_deg {
            self.set_direction_deg(dir);
        }
        if let Some(turb) = update.turbulence_pct {
            self.set_turbulence_pct(turb)?;
        }
        Ok(())
    }

    pub fn speed_ms(&self) -> f64 {
        self.speed_ms
    }

    fn base_wind(&self) -> Vector3<f64> {
        Vector3::new(
            self.direction_rad.sin() * self.speed_ms,
            0.0,
            -self.direction_rad.cos() * self.speed_ms,
        )
    }

    fn turbulent_gust(&self) -> Vector3<f64> {
        if self.turbulence <= 0.0 {
            return Vector3::zeros();
        }
        let amp = self.turbulence * self.speed_ms;
        Vector3::new(
            amp * 0.6 * (self.phase * 0.9).sin(),
            amp * 0.3 * (self.phase * 1.7 + 1.1).sin(),
            amp * 0.5 * (self.phase * 1.3 + 2.3).sin(),
        )
    }

    /// Advances the turbulence phase and returns the apparent wind seen by
    /// a point moving with `kite_velocity`.
    pub fn apparent_wind(&mut self, kite_velocity: Vector3<f64>, dt: f64) -> Vector3<f64> {
        self.phase += dt;
        self.base_wind() + self.turbulent_gust() - kite_velocity
    }
}
