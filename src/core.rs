use nalgebra::Vector3;

use crate::aerodynamics::{self, AeroConfig, AeroTotals};
use crate::body::{KiteBody, KitePose};
use crate::bridle::{self, BridleLengths, BridleRuntime};
use crate::constraints::{self, LineConstraint};
use crate::control_bar::ControlBarState;
use crate::error::KiteConfigError;
use crate::geometry::{AnchorId, KiteGeometryBuilder};
use crate::integrator::{self, IntegratorConfig, IntegratorState};
use crate::line::{LineConfig, LineRuntime, LineTelemetry};
use crate::telemetry::NonFiniteRecoveryCounter;
use crate::wind::{WindField, WindUpdate};

/// Everything needed to bring up a session, grouped the way a builder
/// hands off a finished product rather than threading a dozen arguments.
pub struct KiteSessionConfig {
    pub geometry: KiteGeometryBuilder,
    pub bridle_lengths: BridleLengths,
    pub line_length: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub wind_turbulence_pct: f64,
    pub pilot_position: Vector3<f64>,
    pub bar_half_width: f64,
    pub initial_pose: KitePose,
}

/// The core simulation handle: owns the kite body, every subsystem's
/// configuration, and the single-threaded per-tick pipeline.
pub struct KiteSession {
    body: KiteBody,
    geometry_recipe: KiteGeometryBuilder,
    bridle_lengths: BridleLengths,
    line_config: LineConfig,
    wind: WindField,
    bar: ControlBarState,
    integrator_state: IntegratorState,
    integrator_config: IntegratorConfig,
    aero_config: AeroConfig,
    line_runtime_gauche: LineRuntime,
    line_runtime_droit: LineRuntime,
    bridle_runtime: BridleRuntime,
    non_finite: NonFiniteRecoveryCounter,
    last_apparent_wind: Vector3<f64>,
    last_aero: AeroTotals,
    last_line_telemetry: (LineTelemetry, LineTelemetry),
    last_bridle_telemetry: [LineTelemetry; 6],
    all_anchors: [AnchorId; 13],
}

const ZERO_LINE_TELEMETRY: LineTelemetry = LineTelemetry { distance: 0.0, taut: false, tension: 0.0 };

const ALL_ANCHORS: [AnchorId; 13] = [
    AnchorId::Nez,
    AnchorId::SpineBas,
    AnchorId::BordGauche,
    AnchorId::BordDroit,
    AnchorId::WhiskerGauche,
    AnchorId::WhiskerDroit,
    AnchorId::InterGauche,
    AnchorId::InterDroit,
    AnchorId::Centre,
    AnchorId::FixGauche,
    AnchorId::FixDroit,
    AnchorId::CtrlGauche,
    AnchorId::CtrlDroit,
];

impl KiteSession {
    pub fn initialize(config: KiteSessionConfig) -> Result<Self, KiteConfigError> {
        config.bridle_lengths.validate()?;
        let geometry = config
            .geometry
            .clone()
            .build_with_bridles(config.bridle_lengths.nez, config.bridle_lengths.inter, config.bridle_lengths.centre)?;
        let line_config = LineConfig::new(config.line_length)?;
        let wind = WindField::new(config.wind_speed_kmh, config.wind_direction_deg, config.wind_turbulence_pct)?;
        let bar = ControlBarState::new(config.pilot_position, config.bar_half_width);
        let body = KiteBody::new(config.initial_pose, geometry);

        Ok(KiteSession {
            body,
            geometry_recipe: config.geometry,
            bridle_lengths: config.bridle_lengths,
            line_config,
            wind,
            bar,
            integrator_state: IntegratorState::default(),
            integrator_config: IntegratorConfig::default(),
            aero_config: AeroConfig::default(),
            line_runtime_gauche: LineRuntime::default(),
            line_runtime_droit: LineRuntime::default(),
            bridle_runtime: BridleRuntime::default(),
            non_finite: NonFiniteRecoveryCounter::default(),
            last_apparent_wind: Vector3::zeros(),
            last_aero: AeroTotals::default(),
            last_line_telemetry: (ZERO_LINE_TELEMETRY, ZERO_LINE_TELEMETRY),
            last_bridle_telemetry: [ZERO_LINE_TELEMETRY; 6],
            all_anchors: ALL_ANCHORS,
        })
    }

    pub fn set_wind(&mut self, update: WindUpdate) -> Result<(), KiteConfigError> {
        self.wind.apply_update(update)
    }

    pub fn set_line_length(&mut self, meters: f64) -> Result<(), KiteConfigError> {
        let new_config = LineConfig::new(meters)?;
        self.line_config = new_config;
        self.line_runtime_gauche.reset();
        self.line_runtime_droit.reset();
        Ok(())
    }

    pub fn set_bridle_lengths(&mut self, lengths: BridleLengths) -> Result<(), KiteConfigError> {
        lengths.validate()?;
        let new_geometry = self
            .geometry_recipe
            .clone()
            .build_with_bridles(lengths.nez, lengths.inter, lengths.centre)?;
        self.body.geometry = new_geometry;
        self.bridle_lengths = lengths;
        self.bridle_runtime.reset();
        Ok(())
    }

    pub fn set_bar_rotation(&mut self, radians: f64) {
        self.bar.set_rotation(radians);
    }

    pub fn reset(&mut self, initial_pose: KitePose) {
        self.body.pose = initial_pose;
        self.integrator_state.reset();
        self.line_runtime_gauche.reset();
        self.line_runtime_droit.reset();
        self.bridle_runtime.reset();
        self.non_finite.reset();
        self.last_apparent_wind = Vector3::zeros();
        self.last_aero = AeroTotals::default();
        self.last_line_telemetry = (ZERO_LINE_TELEMETRY, ZERO_LINE_TELEMETRY);
        self.last_bridle_telemetry = [ZERO_LINE_TELEMETRY; 6];
    }

    /// Runs one tick of the fixed pipeline: wind, control-bar kinematics,
    /// aerodynamics, integration, constraint solve, telemetry.
    pub fn update(&mut self, dt_seconds: f64) {
        let dt = dt_seconds.min(integrator::DT_MAX).max(0.0);

        let ctrl_gauche_world = self.body.anchor_world(AnchorId::CtrlGauche);
        let ctrl_droit_world = self.body.anchor_world(AnchorId::CtrlDroit);
        let (handle_gauche, handle_droit) = self.bar.handle_positions(ctrl_gauche_world, ctrl_droit_world);

        let apparent_wind = self.wind.apparent_wind(self.body.pose.linear_velocity, dt);
        self.last_apparent_wind = apparent_wind;

        let aero = aerodynamics::accumulate(apparent_wind, self.body.pose.orientation, &self.body.geometry, self.aero_config);
        self.last_aero = aero;

        let previous_pose = self.body.pose.clone();

        integrator::integrate(
            &mut self.integrator_state,
            &mut self.body.pose,
            self.body.geometry.mass(),
            self.body.geometry.inertia(),
            aero.net_force(),
            aero.torque,
            &self.integrator_config,
            dt,
        );

        let lines = [
            LineConstraint { anchor: AnchorId::CtrlGauche, target: handle_gauche, length: self.line_config.length },
            LineConstraint { anchor: AnchorId::CtrlDroit, target: handle_droit, length: self.line_config.length },
        ];
        let bridle_cords: Vec<(AnchorId, AnchorId, f64)> = bridle::cords(&self.bridle_lengths)
            .iter()
            .map(|c| (c.to, c.from, c.length))
            .collect();

        constraints::solve(&mut self.body.pose, &self.body.geometry, &lines, &bridle_cords, &self.all_anchors);

        if !self.body.pose.is_finite() {
            self.non_finite.record();
            self.body.pose.position = previous_pose.position;
            self.body.pose.orientation = previous_pose.orientation;
            self.body.pose.linear_velocity = Vector3::zeros();
            if !self.body.pose.orientation.as_vector().iter().all(|v| v.is_finite()) {
                self.body.pose.orientation = nalgebra::UnitQuaternion::identity();
            }
        }

        let ctrl_gauche_world = self.body.anchor_world(AnchorId::CtrlGauche);
        let ctrl_droit_world = self.body.anchor_world(AnchorId::CtrlDroit);
        let line_gauche = self.line_runtime_gauche.update(&self.line_config, ctrl_gauche_world, handle_gauche, dt);
        let line_droit = self.line_runtime_droit.update(&self.line_config, ctrl_droit_world, handle_droit, dt);
        self.last_line_telemetry = (line_gauche, line_droit);

        let pose_position = self.body.pose.position;
        let pose_orientation = self.body.pose.orientation;
        let geometry = &self.body.geometry;
        let bridle_lengths = self.bridle_lengths;
        self.last_bridle_telemetry = self
            .bridle_runtime
            .update(&bridle_lengths, |id| pose_position + pose_orientation * geometry.anchor(id), dt);
    }

    pub fn pose(&self) -> &KitePose {
        &self.body.pose
    }

    pub fn apparent_wind(&self) -> Vector3<f64> {
        self.last_apparent_wind
    }

    pub fn aero_totals(&self) -> AeroTotals {
        self.last_aero
    }

    /// Per-line tension snapshot from the most recent `update()` tick.
    pub fn line_telemetry(&self) -> (LineTelemetry, LineTelemetry) {
        self.last_line_telemetry
    }

    /// Per-bridle-cord tension snapshot from the most recent `update()` tick.
    pub fn bridle_telemetry(&self) -> [LineTelemetry; 6] {
        self.last_bridle_telemetry
    }

    pub fn non_finite_recoveries(&self) -> u64 {
        self.non_finite.count()
    }
}
