use nalgebra::Vector3;

use crate::error::KiteConfigError;

/// Indicative stiffness/damping parameters for a tether line. Lines never
/// apply a spring force to the integrator; they act only as unilateral
/// distance constraints (see `constraints`). This config exists purely to
/// produce a telemetry tension estimate.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct LineConfig {
    pub length: f64,
    pub stiffness: f64,
    pub pre_tension: f64,
    pub max_tension: f64,
    pub damping_coeff: f64,
}

impl LineConfig {
    pub fn new(length: f64) -> Result<Self, KiteConfigError> {
        if length <= 0.0 {
            return Err(KiteConfigError::NonPositiveLineLength(length));
        }
        Ok(LineConfig {
            length,
            stiffness: 4000.0,
            pre_tension: 2.0,
            max_tension: 400.0,
            damping_coeff: 20.0,
        })
    }
}

/// Per-side runtime state: the previous end-to-end distance, used to
/// estimate the radial velocity feeding the telemetry tension model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineRuntime {
    previous_distance: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct LineTelemetry {
    pub distance: f64,
    pub taut: bool,
    pub tension: f64,
}

impl LineRuntime {
    pub fn reset(&mut self) {
        self.previous_distance = None;
    }

    /// Computes telemetry for one line given its current handle/ctrl
    /// endpoints. Does not mutate the rigid body; the constraint solver
    /// owns that.
    pub fn update(&mut self, config: &LineConfig, ctrl_world: Vector3<f64>, handle_world: Vector3<f64>, dt: f64) -> LineTelemetry {
        let distance = (ctrl_world - handle_world).norm();
        let taut = distance > config.length;

        let tension = if taut {
            let radial_velocity = match self.previous_distance {
                Some(prev) if dt > 0.0 => (distance - prev) / dt,
                _ => 0.0,
            };
            let raw = config.pre_tension
                + config.stiffness * (distance - config.length)
                + config.damping_coeff * radial_velocity;
            raw.clamp(0.0, config.max_tension)
        } else {
            0.0
        };

        self.previous_distance = Some(distance);

        LineTelemetry { distance, taut, tension }
    }
}
