use nalgebra::Vector3;

use crate::error::KiteConfigError;

/// Finds the point lying at distance `r1`/`r2`/`r3` from `p1`/`p2`/`p3`
/// respectively. Two such points exist in general, mirrored across the
/// plane through `p1`, `p2`, `p3`; `bias` selects which one to return by
/// picking the root whose offset from that plane has the larger dot
/// product with `bias`.
pub fn trilaterate(
    p1: Vector3<f64>,
    r1: f64,
    p2: Vector3<f64>,
    r2: f64,
    p3: Vector3<f64>,
    r3: f64,
    bias: Vector3<f64>,
) -> Result<Vector3<f64>, KiteConfigError> {
    let d_vec = p2 - p1;
    let d = d_vec.norm();
    if d < 1e-9 {
        return Err(KiteConfigError::DegenerateTrilateration {
            nez: r1,
            inter: r2,
            centre: r3,
        });
    }
    let ex = d_vec / d;

    let p3_off = p3 - p1;
    let i = ex.dot(&p3_off);
    let ey_raw = p3_off - ex * i;
    let ey_norm = ey_raw.norm();
    if ey_norm < 1e-9 {
        return Err(KiteConfigError::DegenerateTrilateration {
            nez: r1,
            inter: r2,
            centre: r3,
        });
    }
    let ey = ey_raw / ey_norm;
    let ez = ex.cross(&ey);
    let j = ey.dot(&p3_off);

    let x = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let y = (r1 * r1 - r3 * r3 + i * i + j * j - 2.0 * i * x) / (2.0 * j);
    let z_sq = r1 * r1 - x * x - y * y;

    if z_sq < 0.0 {
        return Err(KiteConfigError::DegenerateTrilateration {
            nez: r1,
            inter: r2,
            centre: r3,
        });
    }
    let z = z_sq.sqrt();

    let base = p1 + ex * x + ey * y;
    let plus = base + ez * z;
    let minus = base - ez * z;

    if ez.dot(&bias) >= 0.0 {
        Ok(if (plus - base).dot(&bias) >= (minus - base).dot(&bias) {
            plus
        } else {
            minus
        })
    } else {
        Ok(if (minus - base).dot(&bias) >= (plus - base).dot(&bias) {
            minus
        } else {
            plus
        })
    }
}
