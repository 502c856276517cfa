use std::io::{self, Write};

use crate::telemetry::KiteTelemetry;

/// Summary statistics computed from a telemetry trace.
#[derive(Debug, Clone)]
pub struct FlightSummary {
    pub max_altitude_m: f64,
    pub max_speed_ms: f64,
    pub max_lift_n: f64,
    pub max_drag_n: f64,
    pub non_finite_recoveries: u64,
    pub duration_s: f64,
}

impl FlightSummary {
    pub fn from_trace(ticks: &[(f64, KiteTelemetry)], non_finite_recoveries: u64) -> Self {
        let max_altitude_m = ticks.iter().map(|(_, t)| t.position.y).fold(f64::MIN, f64::max);
        let max_speed_ms = ticks.iter().map(|(_, t)| t.linear_velocity.norm()).fold(0.0_f64, f64::max);
        let max_lift_n = ticks.iter().map(|(_, t)| t.lift.norm()).fold(0.0_f64, f64::max);
        let max_drag_n = ticks.iter().map(|(_, t)| t.drag.norm()).fold(0.0_f64, f64::max);
        let duration_s = ticks.last().map(|(t, _)| *t).unwrap_or(0.0);

        FlightSummary {
            max_altitude_m,
            max_speed_ms,
            max_lift_n,
            max_drag_n,
            non_finite_recoveries,
            duration_s,
        }
    }
}

pub fn write_summary<W: Write>(writer: &mut W, summary: &FlightSummary) -> io::Result<()> {
    writeln!(writer, "{{")?;
    writeln!(writer, "  \"max_altitude_m\": {:.3},", summary.max_altitude_m)?;
    writeln!(writer, "  \"max_speed_ms\": {:.3},", summary.max_speed_ms)?;
    writeln!(writer, "  \"max_lift_n\": {:.3},", summary.max_lift_n)?;
    writeln!(writer, "  \"max_drag_n\": {:.3},", summary.max_drag_n)?;
    writeln!(writer, "  \"non_finite_recoveries\": {},", summary.non_finite_recoveries)?;
    writeln!(writer, "  \"duration_s\": {:.3}", summary.duration_s)?;
    writeln!(writer, "}}")?;
    Ok(())
}

pub fn write_summary_file(path: &str, summary: &FlightSummary) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_summary(&mut file, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    fn sample_trace() -> Vec<(f64, KiteTelemetry)> {
        vec![
            (0.0, KiteTelemetry {
                position: Vector3::new(0.0, 10.0, -10.0),
                orientation: UnitQuaternion::identity(),
                linear_velocity: Vector3::new(0.0, 0.0, 1.0),
                angular_velocity: Vector3::zeros(),
                apparent_wind: Vector3::new(0.0, 0.0, -5.0),
                lift: Vector3::new(0.0, 3.0, 0.0),
                drag: Vector3::new(0.0, 0.0, 1.0),
            }),
            (1.0, KiteTelemetry {
                position: Vector3::new(0.0, 15.0, -9.0),
                orientation: UnitQuaternion::identity(),
                linear_velocity: Vector3::new(0.0, 2.0, 1.0),
                angular_velocity: Vector3::zeros(),
                apparent_wind: Vector3::new(0.0, 0.0, -5.0),
                lift: Vector3::new(0.0, 4.0, 0.0),
                drag: Vector3::new(0.0, 0.0, 1.5),
            }),
        ]
    }

    #[test]
    fn summary_finds_max_altitude() {
        let summary = FlightSummary::from_trace(&sample_trace(), 0);
        assert!((summary.max_altitude_m - 15.0).abs() < 1e-9);
        assert!((summary.duration_s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn json_output_is_well_formed() {
        let summary = FlightSummary::from_trace(&sample_trace(), 2);
        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let json = String::from_utf8(buf).unwrap();
        assert!(json.contains("\"max_altitude_m\""));
        assert!(json.contains("\"non_finite_recoveries\": 2"));
    }
}
