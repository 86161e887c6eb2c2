//! Shared mutable context threaded through every mode handler.
//!
//! `ControlContext` is the single struct the mode handlers read from and
//! write to: the latest sensor/clock snapshot, display and actuator
//! command outputs, thresholds, the auth gate, the water-event log, and
//! the deferred auto-off timers. Nothing outside the control loop ever
//! mutates it.

use crate::auth::AuthGate;
use crate::config::SystemConfig;
use crate::control::{Thresholds, WaterState, classify};
use crate::display::{Row, blank_row};
use crate::error::Result;
use crate::scheduler::{DeferredTimers, Tick};
use crate::waterlog::WaterLog;

// ---------------------------------------------------------------------------
// Clock snapshot types
// ---------------------------------------------------------------------------

/// Wall-clock time as read from the RTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

/// Calendar date as read from the RTC (two-digit year, 20xx).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: u8,
    pub month: u8,
    pub day: u8,
}

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to mode handlers; written by the service)
// ---------------------------------------------------------------------------

/// Ambient probe reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvReading {
    /// Ambient temperature (°C, 0–100).
    pub temperature_c: u8,
    /// Relative humidity (%, 0–100).
    pub humidity_pct: u8,
}

/// A point-in-time snapshot of every sensor the core consumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SensorSnapshot {
    /// Last successful ambient reading; `None` after a probe failure.
    pub env: Option<EnvReading>,
    /// Water level (percent, 0–100).
    pub water_level: u8,
    /// Board temperature from the internal sense channel (°C).
    pub system_temp_c: f32,
}

// ---------------------------------------------------------------------------
// Output commands (written by mode handlers; applied by the service)
// ---------------------------------------------------------------------------

/// Desired output state. The service diffs this against what it last
/// applied and forwards only the changes to the ports.
#[derive(Debug, Clone)]
pub struct OutputCommands {
    /// The two display rows (always 16 columns, space-padded).
    pub rows: [Row; 2],
    /// Floodgate servo targets (degrees).
    pub gate1_angle: u8,
    pub gate2_angle: u8,
    /// Water-state indicator colour.
    pub indicator_rgb: (bool, bool, bool),
    pub buzzer: bool,
    pub led_red: bool,
    pub led_green: bool,
}

impl OutputCommands {
    fn new(config: &SystemConfig) -> Self {
        Self {
            rows: [blank_row(), blank_row()],
            gate1_angle: config.gate_closed_angle,
            gate2_angle: config.gate_closed_angle,
            indicator_rgb: (false, false, false),
            buzzer: false,
            led_red: false,
            led_green: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// The shared context passed to every mode handler.
pub struct ControlContext {
    /// Current monotonic tick (milliseconds).
    pub now: Tick,
    pub config: SystemConfig,

    pub sensors: SensorSnapshot,
    pub time: TimeOfDay,
    pub date: CalendarDate,

    pub auth: AuthGate,
    pub thresholds: Thresholds,
    pub log: WaterLog,
    pub timers: DeferredTimers,

    pub commands: OutputCommands,
    /// Transient two-row message shown instead of the mode's normal
    /// screen until `timers.message_clear` fires.
    pub overlay: Option<[Row; 2]>,

    /// Threshold-driven gate control enabled.
    pub auto_mode: bool,
    /// Operator has authenticated this session.
    pub logged_in: bool,
}

impl ControlContext {
    /// Build the context from a validated configuration.
    pub fn new(config: SystemConfig) -> Result<Self> {
        config.validate()?;
        let auth = AuthGate::new(
            config.password.clone(),
            config.max_password_failures,
            config.lockout_duration_ms,
        );
        let thresholds = Thresholds::new(config.threshold_low, config.threshold_high);
        let commands = OutputCommands::new(&config);
        Ok(Self {
            now: 0,
            sensors: SensorSnapshot::default(),
            time: TimeOfDay::default(),
            date: CalendarDate::default(),
            auth,
            thresholds,
            log: WaterLog::new(),
            timers: DeferredTimers::new(),
            commands,
            overlay: None,
            auto_mode: false,
            logged_in: false,
            config,
        })
    }

    /// Classify the live water level against the current thresholds.
    pub fn water_state(&self) -> WaterState {
        classify(
            self.sensors.water_level,
            self.thresholds.low(),
            self.thresholds.high(),
        )
    }

    /// Replace both display rows.
    pub fn show(&mut self, top: Row, bottom: Row) {
        self.commands.rows = [top, bottom];
    }

    /// Show a transient message for `duration_ms`; `auto_return` wipes
    /// the display when the message expires.
    pub fn show_message(&mut self, top: Row, bottom: Row, duration_ms: u32, auto_return: bool) {
        self.overlay = Some([top, bottom]);
        self.timers.message_clear.schedule(self.now + Tick::from(duration_ms));
        self.timers.auto_return = auto_return;
    }

    /// True while a transient message owns the display.
    pub fn message_active(&self) -> bool {
        self.overlay.is_some()
    }

    /// Error feedback: buzzer chirp plus red LED, both on auto-off timers.
    pub fn feedback_error(&mut self) {
        self.commands.buzzer = true;
        self.commands.led_red = true;
        self.timers.buzzer_off.schedule(self.now + 500);
        self.timers.led_off.schedule(self.now + 1000);
    }

    /// Success feedback: green LED on an auto-off timer.
    pub fn feedback_success(&mut self) {
        self.commands.led_green = true;
        self.timers.led_off.schedule(self.now + 1000);
    }

    /// Short confirmation chirp.
    pub fn chirp(&mut self, duration_ms: u32) {
        self.commands.buzzer = true;
        self.timers.buzzer_off.schedule(self.now + Tick::from(duration_ms));
    }
}
