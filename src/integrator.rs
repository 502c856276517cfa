use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::body::KitePose;

pub const DT_MAX: f64 = 1.0 / 30.0;

#[derive(Debug, Clone, Copy)]
pub struct IntegratorConfig {
    pub smoothing_rate: f64,
    pub linear_accel_max: f64,
    pub linear_velocity_max: f64,
    pub angular_accel_max: f64,
    pub angular_velocity_max: f64,
    pub linear_damping: f64,
    pub angular_drag: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        IntegratorConfig {
            smoothing_rate: 8.0,
            linear_accel_max: 60.0,
            linear_velocity_max: 25.0,
            angular_accel_max: 40.0,
            angular_velocity_max: 20.0,
            linear_damping: 0.05,
            angular_drag: 0.4,
        }
    }
}

/// Force/torque memory carried between ticks. Owned by the core alongside
/// the kite pose, not by the pose itself, because it is integrator-internal
/// state rather than physical state.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegratorState {
    pub smoothed_force: Vector3<f64>,
    pub smoothed_torque: Vector3<f64>,
}

impl IntegratorState {
    pub fn reset(&mut self) {
        self.smoothed_force = Vector3::zeros();
        self.smoothed_torque = Vector3::zeros();
    }
}

fn clamp_magnitude(v: Vector3<f64>, max: f64) -> Vector3<f64> {
    let n = v.norm();
    if n > max && n > 0.0 {
        v * (max / n)
    } else {
        v
    }
}

/// Advances the rigid body's *predicted* pose by one semi-implicit Euler
/// step with exponentially smoothed forcing. Does not run the constraint
/// solver and does not validate for non-finite results — the caller owns
/// both of those (see `core::KiteSession::update`).
pub fn integrate(
    state: &mut IntegratorState,
    pose: &mut KitePose,
    mass: f64,
    inertia: f64,
    force: Vector3<f64>,
    torque: Vector3<f64>,
    config: &IntegratorConfig,
    dt: f64,
) {
    let alpha = 1.0 - (-config.smoothing_rate * dt).exp();
    state.smoothed_force += (force - state.smoothed_force) * alpha;
    state.smoothed_torque += (torque - state.smoothed_torque) * alpha;

    let linear_accel = clamp_magnitude(state.smoothed_force / mass, config.linear_accel_max);
    pose.linear_velocity += linear_accel * dt;
    pose.linear_velocity = clamp_magnitude(pose.linear_velocity, config.linear_velocity_max);
    pose.linear_velocity *= (-config.linear_damping * dt).exp();
    pose.position += pose.linear_velocity * dt;

    let drag_torque = -inertia * config.angular_drag * pose.angular_velocity;
    let effective_torque = state.smoothed_torque + drag_torque;
    let angular_accel = clamp_magnitude(effective_torque / inertia, config.angular_accel_max);
    pose.angular_velocity += angular_accel * dt;
    pose.angular_velocity = clamp_magnitude(pose.angular_velocity, config.angular_velocity_max);

    let omega_dt = pose.angular_velocity * dt;
    let angle = omega_dt.norm();
    if angle > 1e-12 {
        let axis = Unit::new_normalize(omega_dt / angle);
        let dq = UnitQuaternion::from_axis_angle(&axis, angle);
        pose.orientation = UnitQuaternion::new_normalize((dq * pose.orientation).into_inner());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_only_accelerates_downward() {
        let mut state = IntegratorState::default();
        let mut pose = KitePose::at_rest(Vector3::new(0.0, 10.0, 0.0));
        let config = IntegratorConfig::default();
        for _ in 0..120 {
            integrate(&mut state, &mut pose, 0.3, 0.04, Vector3::new(0.0, -0.3 * 9.80665, 0.0), Vector3::zeros(), &config, 1.0 / 60.0);
        }
        assert!(pose.position.y < 10.0);
        assert!(pose.linear_velocity.y < 0.0);
    }

    #[test]
    fn linear_acceleration_is_clamped() {
        let mut state = IntegratorState::default();
        let mut pose = KitePose::at_rest(Vector3::zeros());
        let mut config = IntegratorConfig::default();
        config.linear_accel_max = 5.0;
        config.smoothing_rate = 1000.0;
        for _ in 0..5 {
            integrate(&mut state, &mut pose, 1.0, 1.0, Vector3::new(0.0, 0.0, -1000.0), Vector3::zeros(), &config, 1.0 / 60.0);
        }
        assert!(pose.linear_velocity.norm() <= config.linear_velocity_max + 1e-6);
    }

    #[test]
    fn orientation_stays_unit() {
        let mut state = IntegratorState::default();
        let mut pose = KitePose::at_rest(Vector3::zeros());
        let config = IntegratorConfig::default();
        for _ in 0..600 {
            integrate(&mut state, &mut pose, 0.3, 0.04, Vector3::zeros(), Vector3::new(0.5, 0.1, -0.2), &config, 1.0 / 60.0);
        }
        assert!((pose.orientation.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn smoothing_suppresses_single_tick_spike() {
        let mut state = IntegratorState::default();
        let mut pose = KitePose::at_rest(Vector3::zeros());
        let config = IntegratorConfig::default();
        integrate(&mut state, &mut pose, 0.3, 0.04, Vector3::new(0.0, 0.0, -1000.0), Vector3::zeros(), &config, 1.0 / 60.0);
        assert!(state.smoothed_force.norm() < 1000.0);
    }
}
