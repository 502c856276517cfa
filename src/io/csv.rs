use std::io::{self, Write};

use crate::telemetry::KiteTelemetry;

/// Write a per-tick telemetry trace to CSV.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z,
///          quat_w, quat_x, quat_y, quat_z, wind_x, wind_y, wind_z,
///          lift_mag, drag_mag
pub fn write_trace<W: Write>(writer: &mut W, ticks: &[(f64, KiteTelemetry)]) -> io::Result<()> {
    writeln!(
        writer,
        "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,\
         quat_w,quat_x,quat_y,quat_z,wind_x,wind_y,wind_z,\
         lift_mag,drag_mag"
    )?;

    for (time, t) in ticks {
        let q = t.orientation.quaternion();
        writeln!(
            writer,
            "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},\
             {:.6},{:.6},{:.6},{:.6},{:.4},{:.4},{:.4},\
             {:.4},{:.4}",
            time,
            t.position.x, t.position.y, t.position.z,
            t.linear_velocity.x, t.linear_velocity.y, t.linear_velocity.z,
            q.w, q.i, q.j, q.k,
            t.apparent_wind.x, t.apparent_wind.y, t.apparent_wind.z,
            t.lift.norm(), t.drag.norm(),
        )?;
    }

    Ok(())
}

pub fn write_trace_file(path: &str, ticks: &[(f64, KiteTelemetry)]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_trace(&mut file, ticks)
}
