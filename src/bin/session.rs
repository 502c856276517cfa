use kite_sim::bridle::BridleLengths;
use kite_sim::body::KitePose;
use kite_sim::core::{KiteSession, KiteSessionConfig};
use kite_sim::geometry::{AnchorId, KiteGeometryBuilder};
use kite_sim::io::{csv, json};
use kite_sim::telemetry::KiteTelemetry;
use nalgebra::Vector3;

fn delta_kite_geometry() -> KiteGeometryBuilder {
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
}

fn main() {
    env_logger::init();

    let config = KiteSessionConfig {
        geometry: delta_kite_geometry(),
        bridle_lengths: BridleLengths { nez: 0.65, inter: 0.65, centre: 0.65 },
        line_length: 30.0,
        wind_speed_kmh: 20.0,
        wind_direction_deg: 180.0,
        wind_turbulence_pct: 5.0,
        pilot_position: Vector3::new(0.0, 1.2, 8.0),
        bar_half_width: 0.3,
        initial_pose: KitePose::at_rest(Vector3::new(0.0, 15.0, -14.5)),
    };

    let mut session = match KiteSession::initialize(config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("failed to initialize session: {err}");
            std::process::exit(1);
        }
    };

    let dt = 1.0 / 60.0;
    let duration_s = 12.0;
    let steer_at_s = 4.0;
    let n_steps = (duration_s / dt) as usize;

    let mut trace: Vec<(f64, KiteTelemetry)> = Vec::with_capacity(n_steps);

    println!("+----------+----------+----------+----------+----------+----------+");
    println!("| time (s) |  x (m)   |  y (m)   |  z (m)   | wind (m/s)| lift (N) |");
    println!("+----------+----------+----------+----------+----------+----------+");

    for step in 0..n_steps {
        let time = step as f64 * dt;
        if (time - steer_at_s).abs() < dt / 2.0 {
            session.set_bar_rotation(0.35);
        }

        session.update(dt);

        let pose = session.pose();
        let aero = session.aero_totals();
        let telemetry = KiteTelemetry {
            position: pose.position,
            orientation: pose.orientation,
            linear_velocity: pose.linear_velocity,
            angular_velocity: pose.angular_velocity,
            apparent_wind: session.apparent_wind(),
            lift: aero.lift,
            drag: aero.drag,
        };
        trace.push((time, telemetry));

        if step % 60 == 0 {
            println!(
                "| {:8.2} | {:8.2} | {:8.2} | {:8.2} | {:9.2} | {:8.2} |",
                time,
                pose.position.x,
                pose.position.y,
                pose.position.z,
                session.apparent_wind().norm(),
                aero.lift.norm(),
            );
        }
    }
    println!("+----------+----------+----------+----------+----------+----------+");
    println!("non-finite recoveries: {}", session.non_finite_recoveries());

    if let Err(err) = csv::write_trace_file("kite_trace.csv", &trace) {
        eprintln!("failed to write trace: {err}");
    }

    let summary = json::FlightSummary::from_trace(&trace, session.non_finite_recoveries());
    if let Err(err) = json::write_summary_file("kite_summary.json", &summary) {
        eprintln!("failed to write summary: {err}");
    }
}
