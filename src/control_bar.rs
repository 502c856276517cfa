use nalgebra::{Rotation3, Vector3};

const MAX_BAR_ROTATION: f64 = std::f64::consts::FRAC_PI_3;

/// Pilot input and geometry for the handle bar. The bar follows the lines
/// (its natural axis is derived from the two control-point positions) and
/// the pilot's rotation command is superimposed on top of that.
#[derive(Debug, Clone, Copy)]
pub struct ControlBarState {
    pub position: Vector3<f64>,
    pub half_width: f64,
    rotation: f64,
}

impl ControlBarState {
    pub fn new(position: Vector3<f64>, half_width: f64) -> Self {
        ControlBarState { position, half_width, rotation: 0.0 }
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn set_rotation(&mut self, radians: f64) {
        self.rotation = radians.clamp(-MAX_BAR_ROTATION, MAX_BAR_ROTATION);
    }

    /// Returns (left handle, right handle) world positions given the
    /// kite's current control-point world positions.
    pub fn handle_positions(&self, ctrl_gauche_world: Vector3<f64>, ctrl_droit_world: Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
        let raw_axis = ctrl_droit_world - ctrl_gauche_world;
        let natural_axis = if raw_axis.norm() > 1e-6 {
            raw_axis.normalize()
        } else {
            Vector3::new(1.0, 0.0, 0.0)
        };

        let yaw = Rotation3::from_axis_angle(&Vector3::y_axis(), self.rotation);
        let axis = yaw * natural_axis;

        let left = self.position - axis * self.half_width;
        let right = self.position + axis * self.half_width;
        (left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rotation_is_clamped() {
        let mut bar = ControlBarState::new(Vector3::zeros(), 0.3);
        bar.set_rotation(10.0);
        assert_relative_eq!(bar.rotation(), MAX_BAR_ROTATION, epsilon = 1e-9);
        bar.set_rotation(-10.0);
        assert_relative_eq!(bar.rotation(), -MAX_BAR_ROTATION, epsilon = 1e-9);
    }

    #[test]
    fn zero_rotation_follows_natural_axis() {
        let bar = ControlBarState::new(Vector3::new(0.0, 1.0, 8.0), 0.3);
        let (left, right) = bar.handle_positions(Vector3::new(-0.3, 1.0, 7.5), Vector3::new(0.3, 1.0, 7.5));
        assert!(left.x < bar.position.x);
        assert!(right.x > bar.position.x);
        assert_relative_eq!((right - left).norm(), 0.6, epsilon = 1e-9);
    }

    #[test]
    fn nonzero_rotation_shifts_handles() {
        let mut bar = ControlBarState::new(Vector3::new(0.0, 1.0, 8.0), 0.3);
        bar.set_rotation(0.5);
        let (left, _right) = bar.handle_positions(Vector3::new(-0.3, 1.0, 7.5), Vector3::new(0.3, 1.0, 7.5));
        let (left0, _) = ControlBarState::new(Vector3::new(0.0, 1.0, 8.0), 0.3)
            .handle_positions(Vector3::new(-0.3, 1.0, 7.5), Vector3::new(0.3, 1.0, 7.5));
        assert!((left - left0).norm() > 1e-3);
    }
}
