//! Threshold policy and automatic gate control.
//!
//! Pure functions plus the validated [`Thresholds`] pair. The auto
//! schedule drains on HIGH (gate 2 open) and retains on LOW (gate 1
//! open); within band both gates stay closed.

use log::info;

use crate::error::ValidationError;

/// Highest value either threshold may take (percent).
pub const THRESHOLD_MAX: u8 = 50;

/// Water-level classification against the live thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaterState {
    #[default]
    Ok,
    Low,
    High,
}

/// `level < low → Low`, `level > high → High`, otherwise `Ok`.
/// Boundary values classify as `Ok` (strict comparisons).
pub fn classify(level: u8, low: u8, high: u8) -> WaterState {
    if level < low {
        WaterState::Low
    } else if level > high {
        WaterState::High
    } else {
        WaterState::Ok
    }
}

/// Commanded angles for the two floodgate servos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateAngles {
    pub gate1: u8,
    pub gate2: u8,
}

/// Compute the auto-mode gate targets from the current level.
///
/// Only runs while auto mode is enabled; manual mode never calls this.
pub fn auto_control(level: u8, low: u8, high: u8, open: u8, closed: u8) -> GateAngles {
    match classify(level, low, high) {
        WaterState::Low => GateAngles {
            gate1: open,
            gate2: closed,
        },
        WaterState::High => GateAngles {
            gate1: closed,
            gate2: open,
        },
        WaterState::Ok => GateAngles {
            gate1: closed,
            gate2: closed,
        },
    }
}

/// Which threshold a commit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdField {
    High,
    Low,
}

/// The validated low/high threshold pair.
///
/// Invariant: `low < high` in steady state — enforced at every commit,
/// never violated between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    low: u8,
    high: u8,
}

impl Thresholds {
    /// Construct from already-validated configuration values.
    pub fn new(low: u8, high: u8) -> Self {
        debug_assert!(low < high && high <= THRESHOLD_MAX);
        Self { low, high }
    }

    pub fn low(&self) -> u8 {
        self.low
    }

    pub fn high(&self) -> u8 {
        self.high
    }

    /// Commit a new high threshold. Rejects values outside `0..=50` and
    /// values that would not stay strictly above the current low.
    pub fn set_high(&mut self, value: u8) -> Result<(), ValidationError> {
        if value > THRESHOLD_MAX {
            return Err(ValidationError::OutOfRange(value));
        }
        if value <= self.low {
            return Err(ValidationError::HighNotAboveLow { low: self.low });
        }
        self.high = value;
        info!("thresholds: high set to {value}%");
        Ok(())
    }

    /// Commit a new low threshold. Rejects values outside `0..=50` and
    /// values that would not stay strictly below the current high.
    pub fn set_low(&mut self, value: u8) -> Result<(), ValidationError> {
        if value > THRESHOLD_MAX {
            return Err(ValidationError::OutOfRange(value));
        }
        if value >= self.high {
            return Err(ValidationError::LowNotBelowHigh { high: self.high });
        }
        self.low = value;
        info!("thresholds: low set to {value}%");
        Ok(())
    }

    /// Dispatch a commit to the named field.
    pub fn set(&mut self, field: ThresholdField, value: u8) -> Result<(), ValidationError> {
        match field {
            ThresholdField::High => self.set_high(value),
            ThresholdField::Low => self.set_low(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_bands() {
        assert_eq!(classify(5, 10, 40), WaterState::Low);
        assert_eq!(classify(10, 10, 40), WaterState::Ok, "boundary is in band");
        assert_eq!(classify(25, 10, 40), WaterState::Ok);
        assert_eq!(classify(40, 10, 40), WaterState::Ok, "boundary is in band");
        assert_eq!(classify(41, 10, 40), WaterState::High);
    }

    #[test]
    fn auto_control_schedule() {
        // LOW: retain — gate 1 open, gate 2 closed.
        assert_eq!(
            auto_control(5, 10, 40, 90, 0),
            GateAngles { gate1: 90, gate2: 0 }
        );
        // HIGH: drain — gate 1 closed, gate 2 open.
        assert_eq!(
            auto_control(50, 10, 40, 90, 0),
            GateAngles { gate1: 0, gate2: 90 }
        );
        // OK: both closed.
        assert_eq!(
            auto_control(25, 10, 40, 90, 0),
            GateAngles { gate1: 0, gate2: 0 }
        );
    }

    #[test]
    fn high_must_exceed_low() {
        let mut t = Thresholds::new(10, 40);
        assert_eq!(
            t.set_high(5),
            Err(ValidationError::HighNotAboveLow { low: 10 })
        );
        assert_eq!(
            t.set_high(10),
            Err(ValidationError::HighNotAboveLow { low: 10 })
        );
        assert_eq!(t.high(), 40, "rejected commit must leave state unchanged");
    }

    #[test]
    fn low_must_stay_under_high() {
        let mut t = Thresholds::new(10, 40);
        // Tighten high first so the interesting rejection triggers.
        t.set_high(11).unwrap();
        t.set_low(5).unwrap();
        assert_eq!(
            t.set_low(15),
            Err(ValidationError::LowNotBelowHigh { high: 11 })
        );
        assert_eq!(t.low(), 5);
    }

    #[test]
    fn out_of_range_rejected() {
        let mut t = Thresholds::new(10, 40);
        assert_eq!(t.set_high(51), Err(ValidationError::OutOfRange(51)));
        assert_eq!(t.set_low(99), Err(ValidationError::OutOfRange(99)));
    }

    #[test]
    fn valid_commits_observable() {
        let mut t = Thresholds::new(10, 40);
        t.set(ThresholdField::High, 45).unwrap();
        t.set(ThresholdField::Low, 20).unwrap();
        assert_eq!((t.low(), t.high()), (20, 45));
    }

    #[test]
    fn ordering_invariant_survives_commit_sequences() {
        let mut t = Thresholds::new(10, 40);
        for v in [0u8, 9, 39, 41, 50, 55, 40, 10] {
            let _ = t.set_high(v);
            let _ = t.set_low(v);
            assert!(t.low() < t.high());
        }
    }
}
