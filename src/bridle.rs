use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::KiteConfigError;
use crate::geometry::AnchorId;
use crate::line::{LineRuntime, LineTelemetry};

/// The three bridle length scalars. Changing any of these retriangulates
/// `CtrlGauche`/`CtrlDroit` (see `geometry::KiteGeometryBuilder`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BridleLengths {
    pub nez: f64,
    pub inter: f64,
    pub centre: f64,
}

impl BridleLengths {
    pub fn validate(&self) -> Result<(), KiteConfigError> {
        if self.nez <= 0.0 {
            return Err(KiteConfigError::NonPositiveBridleLength { name: "nez", value: self.nez });
        }
        if self.inter <= 0.0 {
            return Err(KiteConfigError::NonPositiveBridleLength { name: "inter", value: self.inter });
        }
        if self.centre <= 0.0 {
            return Err(KiteConfigError::NonPositiveBridleLength { name: "centre", value: self.centre });
        }
        Ok(())
    }
}

/// One internal bridle cord: an anchor pair plus its target length, drawn
/// from `BridleLengths`.
#[derive(Debug, Clone, Copy)]
pub struct BridleCord {
    pub from: AnchorId,
    pub to: AnchorId,
    pub length: f64,
}

/// The six cords (three per side) implied by a given `BridleLengths`.
pub fn cords(lengths: &BridleLengths) -> [BridleCord; 6] {
    [
        BridleCord { from: AnchorId::Nez, to: AnchorId::CtrlGauche, length: lengths.nez },
        BridleCord { from: AnchorId::InterGauche, to: AnchorId::CtrlGauche, length: lengths.inter },
        BridleCord { from: AnchorId::Centre, to: AnchorId::CtrlGauche, length: lengths.centre },
        BridleCord { from: AnchorId::Nez, to: AnchorId::CtrlDroit, length: lengths.nez },
        BridleCord { from: AnchorId::InterDroit, to: AnchorId::CtrlDroit, length: lengths.inter },
        BridleCord { from: AnchorId::Centre, to: AnchorId::CtrlDroit, length: lengths.centre },
    ]
}

/// Telemetry runtime for all six bridle cords.
#[derive(Default)]
pub struct BridleRuntime {
    runtimes: [LineRuntime; 6],
}

impl BridleRuntime {
    pub fn reset(&mut self) {
        for r in &mut self.runtimes {
            r.reset();
        }
    }

    pub fn update(
        &mut self,
        lengths: &BridleLengths,
        anchor_world: impl Fn(AnchorId) -> Vector3<f64>,
        dt: f64,
    ) -> [LineTelemetry; 6] {
        let cs = cords(lengths);
        let mut out = [LineTelemetry { distance: 0.0, taut: false, tension: 0.0 }; 6];
        for (i, cord) in cs.iter().enumerate() {
            let config = crate::line::LineConfig {
                length: cord.length,
                stiffness: 6000.0,
                pre_tension: 1.0,
                max_tension: 300.0,
                damping_coeff: 10.0,
            };
            out[i] = self.runtimes[i].update(&config, anchor_world(cord.to), anchor_world(cord.from), dt);
        }
        out
    }
}
