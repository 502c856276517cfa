use nalgebra::{UnitQuaternion, Vector3};

use crate::geometry::KiteGeometry;

pub const G: f64 = 9.80665;
pub const RHO_AIR_SEA_LEVEL: f64 = 1.225;

const MIN_WIND_SPEED: f64 = 0.1;
const GRAZING_EPSILON: f64 = 1e-6;

/// Tunable scaling applied to the per-facet lift/drag coefficients.
#[derive(Debug, Clone, Copy)]
pub struct AeroConfig {
    pub lift_scale: f64,
    pub drag_scale: f64,
    pub air_density: f64,
}

impl Default for AeroConfig {
    fn default() -> Self {
        AeroConfig {
            lift_scale: 1.0,
            drag_scale: 1.0,
            air_density: RHO_AIR_SEA_LEVEL,
        }
    }
}

/// Totals accumulated across every facet for one tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct AeroTotals {
    pub lift: Vector3<f64>,
    pub drag: Vector3<f64>,
    pub gravity: Vector3<f64>,
    pub torque: Vector3<f64>,
}

impl AeroTotals {
    pub fn net_force(&self) -> Vector3<f64> {
        self.lift + self.drag + self.gravity
    }
}

fn facet_normal(vertices: [Vector3<f64>; 3]) -> Vector3<f64> {
    let [a, b, c] = vertices;
    (b - a).cross(&(c - a)).normalize()
}

/// Accumulates lift, drag, gravity, and torque across every facet of the
/// kite's sail. Turning is never scripted here: the only asymmetry the
/// caller introduces is the kite's orientation relative to `apparent_wind`,
/// and the cross products below are what turn that asymmetry into torque.
pub fn accumulate(
    apparent_wind: Vector3<f64>,
    orientation: UnitQuaternion<f64>,
    geometry: &KiteGeometry,
    config: AeroConfig,
) -> AeroTotals {
    let mut totals = AeroTotals::default();
    let mut aero_torque_unscaled = Vector3::zeros();

    let wind_speed = apparent_wind.norm();
    let has_wind = wind_speed >= MIN_WIND_SPEED;
    let w_hat = if has_wind { apparent_wind / wind_speed } else { Vector3::zeros() };
    let q = 0.5 * config.air_density * wind_speed * wind_speed;

    for facet in geometry.facets() {
        let body_normal = facet_normal([
            geometry.anchor(facet.vertices[0]),
            geometry.anchor(facet.vertices[1]),
            geometry.anchor(facet.vertices[2]),
        ]);
        let n = orientation * body_normal;
        let r = orientation * facet.centroid;

        let gravity_i = Vector3::new(0.0, -facet.surface_mass * G, 0.0);
        totals.gravity += gravity_i;
        totals.torque += r.cross(&gravity_i);

        if !has_wind {
            continue;
        }

        let c = w_hat.dot(&n);
        if c.abs() <= GRAZING_EPSILON {
            continue;
        }

        let sin_alpha = c.abs();
        let cos_alpha = (1.0 - sin_alpha * sin_alpha).max(0.0).sqrt();
        let c_l = sin_alpha * cos_alpha;
        let c_d = sin_alpha * sin_alpha;

        let n_face = n * c.signum();
        let lift_raw = n_face - (n_face.dot(&w_hat)) * w_hat;
        let lift_dir = if lift_raw.norm() > 1e-9 {
            lift_raw.normalize()
        } else {
            n_face
        };

        let lift_force_raw = q * facet.area * c_l * lift_dir;
        let drag_force_raw = q * facet.area * c_d * w_hat;

        totals.lift += lift_force_raw * config.lift_scale;
        totals.drag += drag_force_raw * config.drag_scale;
        aero_torque_unscaled += r.cross(&(lift_force_raw + drag_force_raw));
    }

    totals.torque += aero_torque_unscaled * ((config.lift_scale + config.drag_scale) / 2.0);

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AnchorId, KiteGeometryBuilder};

    fn symmetric_geometry() -> KiteGeometry {
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
    fn zero_wind_gives_zero_aero_force_but_nonzero_gravity() {
        let geom = symmetric_geometry();
        let totals = accumulate(Vector3::zeros(), UnitQuaternion::identity(), &geom, AeroConfig::default());
        assert_eq!(totals.lift, Vector3::zeros());
        assert_eq!(totals.drag, Vector3::zeros());
        assert!(totals.gravity.y < 0.0);
    }

    #[test]
    fn symmetric_wind_produces_no_lateral_torque() {
        let geom = symmetric_geometry();
        let wind = Vector3::new(0.0, 0.0, -10.0);
        let totals = accumulate(wind, UnitQuaternion::identity(), &geom, AeroConfig::default());
        assert!(totals.torque.x.abs() < 1e-6);
        assert!(totals.torque.z.abs() < 1e-6);
    }

    #[test]
    fn aero_is_idempotent() {
        let geom = symmetric_geometry();
        let wind = Vector3::new(1.0, -0.5, -12.0);
        let orient = UnitQuaternion::from_euler_angles(0.1, 0.2, 0.0);
        let a = accumulate(wind, orient, &geom, AeroConfig::default());
        let b = accumulate(wind, orient, &geom, AeroConfig::default());
        assert_eq!(a.lift, b.lift);
        assert_eq!(a.drag, b.drag);
        assert_eq!(a.torque, b.torque);
    }

    #[test]
    fn grazing_incidence_contributes_no_aero_force() {
        let geom = symmetric_geometry();
        // Both facets share the Nez->SpineBas edge, so wind along that edge
        // lies exactly in both facet planes regardless of their normals.
        let wind = Vector3::new(0.0, -0.9, 0.05) * 10.0;
        let totals = accumulate(wind, UnitQuaternion::identity(), &geom, AeroConfig::default());
        assert!(totals.lift.norm() < 1e-6);
        assert!(totals.drag.norm() < 1e-6);
    }
}
