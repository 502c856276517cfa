use nalgebra::{UnitQuaternion, Vector3};

use crate::geometry::{AnchorId, KiteGeometry};

/// The kite's rigid-body state. Mutated only by the integrator's commit
/// step and by the constraint solver's projection.
#[derive(Debug, Clone)]
pub struct KitePose {
    pub position: Vector3<f64>,
    pub orientation: UnitQuaternion<f64>,
    pub linear_velocity: Vector3<f64>,
    pub angular_velocity: Vector3<f64>,
}

impl KitePose {
    pub fn at_rest(position: Vector3<f64>) -> Self {
        KitePose {
            position,
            orientation: UnitQuaternion::identity(),
            linear_velocity: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.orientation.as_vector().iter().all(|v| v.is_finite())
            && self.linear_velocity.iter().all(|v| v.is_finite())
            && self.angular_velocity.iter().all(|v| v.is_finite())
    }
}

/// Owns pose and geometry together; exposes read-only world-frame queries.
pub struct KiteBody {
    pub pose: KitePose,
    pub geometry: KiteGeometry,
}

impl KiteBody {
    pub fn new(pose: KitePose, geometry: KiteGeometry) -> Self {
        KiteBody { pose, geometry }
    }

    pub fn anchor_world(&self, id: AnchorId) -> Vector3<f64> {
        self.pose.position + self.pose.orientation * self.geometry.anchor(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::KiteGeometryBuilder;

    fn test_geometry() -> KiteGeometry {
        KiteGeometryBuilder::new()
            .anchor(AnchorId::Nez, Vector3::new(0.0, 0.9, 0.0))
            .anchor(AnchorId::SpineBas, Vector3::new(0.0, 0.0, 0.05))
            .anchor(AnchorId::BordGauche, Vector3::new(-1.1, 0.1, 0.1))
            .anchor(AnchorId::BordDroit, Vector3::new(1.1, 0.1, 0.1))
            .anchor(AnchorId::WhiskerGauche, Vector3::new(-0.5, 0.3, -0.15))
            .anchor(AnchorId::WhiskerDroit, Vector3::new(0.5, 0.3, -0.15))
            .anchor(AnchorId::InterGauche, Vector3::new(-0.3, 0.45, 0.05))
            .anchor(AnchorId::InterDroit, Vector3::new(0.3, 0.45, 0.05))
            .anchor(AnchorId::Centre, Vector3::new(0.0, 0.3, 0.2))
            .anchor(AnchorId::FixGauche, Vector3::new(-0.05, 0.0, 0.05))
            .anchor(AnchorId::FixDroit, Vector3::new(0.05, 0.0, 0.05))
            .facet([AnchorId::Nez, AnchorId::SpineBas, AnchorId::BordGauche])
            .facet([AnchorId::Nez, AnchorId::SpineBas, AnchorId::BordDroit])
            .frame_mass(0.08)
            .fabric_mass(0.15)
            .accessory_mass(0.02)
            .inertia(0.035)
            .build_with_bridles(0.65, 0.65, 0.65)
            .unwrap()
    }

    #[test]
    fn anchor_world_matches_position_at_identity() {
        let body = KiteBody::new(KitePose::at_rest(Vector3::new(1.0, 2.0, 3.0)), test_geometry());
        let world = body.anchor_world(AnchorId::Nez);
        assert_eq!(world, Vector3::new(1.0, 2.9, 3.0));
    }

    #[test]
    fn at_rest_pose_is_finite_and_unit() {
        let pose = KitePose::at_rest(Vector3::zeros());
        assert!(pose.is_finite());
        assert!((pose.orientation.norm() - 1.0).abs() < 1e-10);
    }
}
