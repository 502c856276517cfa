use thiserror::Error;

/// Rejected configuration changes. The caller's previous value is always
/// retained; nothing here unwinds past a tick boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KiteConfigError {
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),

    #[error("moment of inertia must be positive, got {0}")]
    NonPositiveInertia(f64),

    #[error("line length must be positive, got {0}")]
    NonPositiveLineLength(f64),

    #[error("bridle length `{name}` must be positive, got {value}")]
    NonPositiveBridleLength { name: &'static str, value: f64 },

    #[error("bridle lengths {nez}, {inter}, {centre} have no real trilateration solution")]
    DegenerateTrilateration { nez: f64, inter: f64, centre: f64 },

    #[error("wind speed must be non-negative, got {0} km/h")]
    NegativeWindSpeed(f64),

    #[error("turbulence fraction must be within [0, 1], got {0}")]
    TurbulenceOutOfRange(f64),
}
