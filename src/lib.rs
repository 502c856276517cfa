pub mod aerodynamics;
pub mod body;
pub mod bridle;
pub mod constraints;
pub mod control_bar;
pub mod core;
pub mod error;
pub mod geometry;
pub mod integrator;
pub mod io;
pub mod line;
pub mod telemetry;
pub mod wind;

pub use crate::core::{KiteSession, KiteSessionConfig};
pub use crate::error::KiteConfigError;
