use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::body::KitePose;
use crate::geometry::{AnchorId, KiteGeometry};

pub const OUTER_ITERATIONS: usize = 2;
pub const GROUND_Y: f64 = 0.0;
pub const GROUND_FRICTION: f64 = 0.95;

/// A unilateral distance constraint between a body-attached point
/// (`anchor`, given in body frame) and a fixed world point `target`.
/// Only resists stretching past `length`.
#[derive(Debug, Clone, Copy)]
pub struct LineConstraint {
    pub anchor: AnchorId,
    pub target: Vector3<f64>,
    pub length: f64,
}

/// Projects one unilateral distance constraint; returns the constraint
/// error (0 if already satisfied or slack).
fn project_constraint(pose: &mut KitePose, mass: f64, inertia: f64, body_offset: Vector3<f64>, target: Vector3<f64>, length: f64) -> f64 {
    let anchor_world = pose.position + pose.orientation * body_offset;
    let d = anchor_world - target;
    let dist = d.norm();
    if dist <= length || dist < 1e-12 {
        return 0.0;
    }
    let n = d / dist;
    let c = dist - length;
    let r = anchor_world - pose.position;

    let w_eff = 1.0 / mass + r.cross(&n).norm_squared() / inertia;
    if w_eff <= 0.0 {
        return 0.0;
    }
    let lambda = c / w_eff;

    pose.position -= (lambda / mass) * n;

    let dtheta = -(lambda / inertia) * r.cross(&n);
    let angle = dtheta.norm();
    if angle > 1e-12 {
        let axis = Unit::new_normalize(dtheta / angle);
        let dq = UnitQuaternion::from_axis_angle(&axis, angle);
        pose.orientation = UnitQuaternion::new_normalize((dq * pose.orientation).into_inner());
    }

    // Recompute after the position/orientation correction and resolve any
    // remaining separating velocity along the constraint normal.
    let anchor_world2 = pose.position + pose.orientation * body_offset;
    let d2 = anchor_world2 - target;
    let dist2 = d2.norm();
    if dist2 < 1e-12 {
        return c;
    }
    let n2 = d2 / dist2;
    let r2 = anchor_world2 - pose.position;
    let w_eff2 = 1.0 / mass + r2.cross(&n2).norm_squared() / inertia;
    if w_eff2 <= 0.0 {
        return c;
    }

    let v_anchor = pose.linear_velocity + pose.angular_velocity.cross(&r2);
    let vn = v_anchor.dot(&n2);
    if vn > 0.0 {
        let j = -vn / w_eff2;
        pose.linear_velocity += (j / mass) * n2;
        pose.angular_velocity += (j / inertia) * r2.cross(&n2);
    }

    c
}

fn apply_ground_contact(pose: &mut KitePose, geometry: &KiteGeometry, anchors: &[AnchorId]) {
    let mut max_penetration: f64 = 0.0;
    for id in anchors {
        let world = pose.position + pose.orientation * geometry.anchor(*id);
        if world.y < GROUND_Y {
            max_penetration = max_penetration.max(GROUND_Y - world.y);
        }
    }
    if max_penetration > 0.0 {
        pose.position.y += max_penetration;
        pose.linear_velocity.y = pose.linear_velocity.y.max(0.0);
        pose.linear_velocity.x *= GROUND_FRICTION;
        pose.linear_velocity.z *= GROUND_FRICTION;
    }
}

/// One full solver pass: `OUTER_ITERATIONS` rounds of (lines, bridles)
/// projection, then ground contact. `lines` carries the two tether
/// constraints; `bridle_targets` carries the six bridle cords expressed
/// as (ctrl anchor, fixed-anchor id, length) — the fixed end is resolved
/// to a world point once per outer iteration since both ends live on the
/// same rigid body.
pub fn solve(
    pose: &mut KitePose,
    geometry: &KiteGeometry,
    lines: &[LineConstraint],
    bridle_cords: &[(AnchorId, AnchorId, f64)],
    all_anchors: &[AnchorId],
) {
    let mass = geometry.mass();
    let inertia = geometry.inertia();

    for _ in 0..OUTER_ITERATIONS {
        for line in lines {
            project_constraint(pose, mass, inertia, geometry.anchor(line.anchor), line.target, line.length);
        }
        for (ctrl, fixed, length) in bridle_cords {
            let fixed_world = pose.position + pose.orientation * geometry.anchor(*fixed);
            project_constraint(pose, mass, inertia, geometry.anchor(*ctrl), fixed_world, *length);
        }
    }

    apply_ground_contact(pose, geometry, all_anchors);
}
