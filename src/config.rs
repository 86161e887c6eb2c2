//! System configuration parameters
//!
//! All tunable parameters for the DamGate controller. Values can be
//! overridden by the bootstrap layer before the service is constructed;
//! everything here is volatile (no persistence across power loss).

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Joystick axis classification thresholds (raw 12-bit ADC counts).
///
/// Axes are evaluated UP, then DOWN, then LEFT, then RIGHT — the first
/// threshold crossed wins, so no diagonal directions exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JoystickThresholds {
    /// Y-axis below this → UP.
    pub up: u16,
    /// Y-axis above this → DOWN.
    pub down: u16,
    /// X-axis below this → LEFT.
    pub left: u16,
    /// X-axis above this → RIGHT.
    pub right: u16,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Access control ---
    /// Initial operator password (exactly 4 ASCII digits).
    pub password: heapless::String<8>,
    /// Consecutive failures before the console locks.
    pub max_password_failures: u8,
    /// Lockout duration after too many failures (milliseconds).
    pub lockout_duration_ms: u32,

    // --- Water thresholds ---
    /// Low water threshold (percent, `0..=50`).
    pub threshold_low: u8,
    /// High water threshold (percent, `0..=50`).
    pub threshold_high: u8,

    // --- Floodgates ---
    /// Servo angle for a fully open gate (degrees).
    pub gate_open_angle: u8,
    /// Servo angle for a fully closed gate (degrees).
    pub gate_closed_angle: u8,

    // --- Input ---
    pub joystick: JoystickThresholds,

    // --- Environment ---
    /// Ambient temperature (Celsius) at which the warning LED lights.
    pub ambient_warn_temp_c: u8,

    // --- Timing ---
    /// Environment probe poll interval (milliseconds).
    pub sensor_poll_ms: u32,
    /// Clock snapshot interval (milliseconds).
    pub clock_poll_ms: u32,
    /// Water-level log/indicator refresh interval (milliseconds).
    pub log_update_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut password = heapless::String::new();
        // Cannot overflow: "1234" fits the 8-byte backing store.
        let _ = password.push_str("1234");
        Self {
            password,
            max_password_failures: 5,
            lockout_duration_ms: 60_000, // one minute

            threshold_low: 10,
            threshold_high: 40,

            gate_open_angle: 90,
            gate_closed_angle: 0,

            joystick: JoystickThresholds {
                up: 2000,
                down: 3150,
                left: 2000,
                right: 4000,
            },

            ambient_warn_temp_c: 30,

            sensor_poll_ms: 2000,
            clock_poll_ms: 1000,
            log_update_ms: 1000,
        }
    }
}

impl SystemConfig {
    /// Range-check the configuration before it reaches the service.
    pub fn validate(&self) -> Result<()> {
        if self.password.len() != 4 || !self.password.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::Config("password must be exactly 4 ASCII digits"));
        }
        if self.max_password_failures == 0 {
            return Err(Error::Config("max_password_failures must be nonzero"));
        }
        if self.threshold_low >= self.threshold_high {
            return Err(Error::Config("threshold_low must stay below threshold_high"));
        }
        if self.threshold_high > 50 {
            return Err(Error::Config("threshold_high outside 0-50"));
        }
        if self.gate_open_angle > 90 || self.gate_closed_angle > 90 {
            return Err(Error::Config("gate angles limited to 0-90 degrees"));
        }
        if self.sensor_poll_ms == 0 || self.clock_poll_ms == 0 || self.log_update_ms == 0 {
            return Err(Error::Config("poll intervals must be nonzero"));
        }
        Ok(())
    }
}
