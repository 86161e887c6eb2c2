//! Port traits — the hexagonal boundary between the control core and the
//! board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (keypad/joystick scanners, the ADC front-end, the RTC,
//! the character display, servos and annunciators) implement these traits.
//! The [`AppService`](super::service::AppService) consumes them via
//! generics, so the control core never touches a register.

use crate::error::SensorError;
use crate::fsm::context::{CalendarDate, EnvReading, TimeOfDay};
use crate::input::Key;

// ───────────────────────────────────────────────────────────────
// Operator input (driven adapter: panel → domain)
// ───────────────────────────────────────────────────────────────

/// Debounced operator-input samples for one tick.
pub trait InputPort {
    /// The keypad press registered since the last poll, if any.
    /// Scanning and debounce belong to the adapter; at most one key is
    /// reported per tick.
    fn poll_key(&mut self) -> Option<Key>;

    /// Raw joystick axis samples `(x, y)`, 12-bit ADC counts.
    fn read_axes(&mut self) -> (u16, u16);

    /// True on the tick the joystick button's press edge was seen.
    fn button_pressed(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Sensors (driven adapter: probes → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the water and ambient probes.
pub trait SensorPort {
    /// Current water level as a percentage (0–100). The adapter owns the
    /// ADC scaling; the domain only sees percent.
    fn read_water_level(&mut self) -> u8;

    /// Ambient temperature/humidity. Single-wire probes fail routinely;
    /// the service keeps the previous reading policy (display shows an
    /// error row) rather than stopping control.
    fn read_env(&mut self) -> Result<EnvReading, SensorError>;

    /// Board temperature from the internal sense channel (°C).
    fn read_system_temp(&mut self) -> f32;
}

/// 12-bit ADC counts to a water-level percentage.
pub fn level_percent_from_adc(raw: u16) -> u8 {
    ((u32::from(raw) * 100) / 4095) as u8
}

/// 12-bit internal temperature-sense counts to °C (3.3 V reference,
/// 0.76 V at 25 °C, 2.5 mV/°C slope).
pub fn system_temp_from_adc(raw: u16) -> f32 {
    let v = f32::from(raw) * 3.3 / 4095.0;
    ((v - 0.76) / 0.0025) + 25.0
}

// ───────────────────────────────────────────────────────────────
// Real-time clock (driven adapter: RTC ↔ domain)
// ───────────────────────────────────────────────────────────────

/// Wall-clock access. Time and date are separate reads because the
/// underlying RTC latches them separately.
pub trait ClockPort {
    fn read_time(&mut self) -> TimeOfDay;
    fn read_date(&mut self) -> CalendarDate;
    fn set_time(&mut self, time: TimeOfDay);
    fn set_date(&mut self, date: CalendarDate);
}

// ───────────────────────────────────────────────────────────────
// Display (domain → 16x2 character panel)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the 16x2 character display. The service hands the
/// adapter complete space-padded rows, so adapters never need to clear
/// trailing columns themselves.
pub trait DisplayPort {
    /// Replace one full row (`row` is 0 or 1; `text` is exactly 16 columns).
    fn write_row(&mut self, row: u8, text: &str);

    /// Blank the whole panel.
    fn clear(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuators (domain → gates and annunciators)
// ───────────────────────────────────────────────────────────────

/// Which floodgate servo a command targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Upstream retention gate.
    One,
    /// Downstream drain gate.
    Two,
}

/// Write-side port: gates, indicator, buzzer, feedback LEDs.
pub trait ActuatorPort {
    /// Command a gate servo to an absolute angle in degrees.
    fn set_gate_angle(&mut self, gate: Gate, degrees: u8);

    /// Water-state indicator colour (red, green, blue).
    fn set_indicator(&mut self, r: bool, g: bool, b: bool);

    fn set_buzzer(&mut self, on: bool);

    /// Error/warning feedback LED.
    fn set_red_led(&mut self, on: bool);

    /// Success feedback LED.
    fn set_green_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Event sink (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, a
/// supervisory link, a test recorder).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
