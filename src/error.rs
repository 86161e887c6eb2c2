//! Unified error types for the DamGate core.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level control loop's error handling uniform. All variants are `Copy`
//! so they can be cheaply passed through the mode controller without
//! allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level core error
// ---------------------------------------------------------------------------

/// Every fallible operation in the core funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned out-of-range data.
    Sensor(SensorError),
    /// A threshold commit failed validation.
    Validation(ValidationError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Non-fatal sensor failures. The control loop keeps running on the
/// last-known water level and shows a "Sensor Error" row instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Ambient humidity/temperature probe did not answer (DHT-class failure).
    EnvUnavailable,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnvUnavailable => write!(f, "environment probe unavailable"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Threshold validation errors
// ---------------------------------------------------------------------------

/// Rejections from threshold commits. These are user-facing: the mode
/// controller turns them into an error screen plus a buzzer chirp and the
/// stored thresholds stay untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Entered value is outside the permitted `0..=50` window.
    OutOfRange(u8),
    /// New high threshold would not stay strictly above the current low.
    HighNotAboveLow { low: u8 },
    /// New low threshold would not stay strictly below the current high.
    LowNotBelowHigh { high: u8 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange(v) => write!(f, "value {v} outside 0-50"),
            Self::HighNotAboveLow { low } => write!(f, "high must exceed low ({low}%)"),
            Self::LowNotBelowHigh { high } => write!(f, "low must stay under high ({high}%)"),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
