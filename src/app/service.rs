//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the mode controller and the shared control
//! context. It exposes a clean, hardware-agnostic API; all I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!   InputPort ──▶ ┌────────────────────────┐ ──▶ DisplayPort
//!  SensorPort ──▶ │       AppService        │ ──▶ ActuatorPort
//!   ClockPort ──▶ │  Modes · Gates · Log    │ ──▶ EventSink
//!                 └────────────────────────┘
//! ```
//!
//! Per tick: sample sensors → run deferred timers → classify input →
//! step the mode controller → apply auto control → diff-apply outputs →
//! emit events for every observable change.

use log::{info, warn};

use crate::config::SystemConfig;
use crate::control::auto_control;
use crate::display::{Row, blank_row};
use crate::error::Result;
use crate::fsm::context::{CalendarDate, ControlContext, TimeOfDay};
use crate::fsm::{InputSample, Mode, ModeController, ModeKind};
use crate::input::classify_axes;
use crate::row;
use crate::scheduler::{Periodic, Tick};

use super::events::AppEvent;
use super::ports::{ActuatorPort, ClockPort, DisplayPort, EventSink, Gate, InputPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// Output diffing
// ───────────────────────────────────────────────────────────────

/// Last state actually pushed to the ports, for change detection.
#[derive(Debug, Clone)]
struct Applied {
    rows: [Row; 2],
    gate1: u8,
    gate2: u8,
    indicator: (bool, bool, bool),
    buzzer: bool,
    led_red: bool,
    led_green: bool,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates the whole control core.
pub struct AppService {
    controller: ModeController,
    ctx: ControlContext,
    env_poll: Periodic,
    clock_poll: Periodic,
    log_poll: Periodic,
    /// `None` until the first apply, which then writes everything.
    applied: Option<Applied>,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from a validated configuration.
    ///
    /// Does **not** touch hardware — call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Result<Self> {
        let env_poll = Periodic::new(Tick::from(config.sensor_poll_ms));
        let clock_poll = Periodic::new(Tick::from(config.clock_poll_ms));
        let log_poll = Periodic::new(Tick::from(config.log_update_ms));
        let ctx = ControlContext::new(config)?;
        Ok(Self {
            controller: ModeController::new(),
            ctx,
            env_poll,
            clock_poll,
            log_poll,
            applied: None,
            tick_count: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Clear the panel, latch the initial clock reading, and post the
    /// boot banner. The banner rides the normal message overlay, so the
    /// first [`tick`](Self::tick) paints it.
    pub fn start(
        &mut self,
        hw: &mut (impl DisplayPort + ClockPort),
        sink: &mut impl EventSink,
    ) {
        hw.clear();
        self.ctx.time = hw.read_time();
        self.ctx.date = hw.read_date();
        self.ctx
            .show_message(row!("Dam System Ready"), row!("Enter Password"), 2000, true);
        sink.emit(&AppEvent::Started(self.controller.mode_kind()));
        info!("service started in {:?}", self.controller.mode_kind());
    }

    /// Write a new wall-clock value to the RTC and adopt it immediately.
    pub fn set_clock(
        &mut self,
        hw: &mut impl ClockPort,
        time: TimeOfDay,
        date: CalendarDate,
    ) {
        hw.set_time(time);
        hw.set_date(date);
        self.ctx.time = time;
        self.ctx.date = date;
        info!(
            "clock set to 20{:02}-{:02}-{:02} {:02}:{:02}:{:02}",
            date.year, date.month, date.day, time.hours, time.minutes, time.seconds
        );
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle at monotonic tick `now`.
    ///
    /// The `hw` parameter satisfies **all five** hardware ports — one
    /// adapter struct per board avoids a pile of mutable borrows while
    /// keeping each boundary explicit.
    pub fn tick(
        &mut self,
        now: Tick,
        hw: &mut (impl InputPort + SensorPort + ClockPort + DisplayPort + ActuatorPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        self.ctx.now = now;

        // Pre-tick observables, for event diffing at the end.
        let prev_kind = self.controller.mode_kind();
        let prev_logged_in = self.ctx.logged_in;
        let prev_fails = self.ctx.auth.fail_count();
        let prev_latched = self.ctx.auth.is_latched();
        let prev_thresholds = (self.ctx.thresholds.low(), self.ctx.thresholds.high());
        let prev_auto = self.ctx.auto_mode;
        let prev_water = self.ctx.log.live_state();

        // 1. Sensors. Water level every tick; the slower probes on their
        //    own cadence.
        self.ctx.sensors.water_level = hw.read_water_level();
        if self.env_poll.poll(now) {
            match hw.read_env() {
                Ok(reading) => self.ctx.sensors.env = Some(reading),
                Err(e) => {
                    warn!("sensors: ambient probe read failed: {e}");
                    self.ctx.sensors.env = None;
                }
            }
            self.ctx.sensors.system_temp_c = hw.read_system_temp();
        }
        if self.clock_poll.poll(now) {
            self.ctx.time = hw.read_time();
            self.ctx.date = hw.read_date();
        }

        // 2. Water-event log, sessions only.
        if self.ctx.logged_in && self.log_poll.poll(now) {
            let (time, date) = (self.ctx.time, self.ctx.date);
            self.ctx.log.update(
                self.ctx.sensors.water_level,
                self.ctx.thresholds.low(),
                self.ctx.thresholds.high(),
                time,
                date,
            );
        }

        // 3. Deferred auto-offs.
        if self.ctx.timers.buzzer_off.poll(now) {
            self.ctx.commands.buzzer = false;
        }
        if self.ctx.timers.led_off.poll(now) {
            self.ctx.commands.led_red = false;
            self.ctx.commands.led_green = false;
        }
        if self.ctx.timers.message_clear.poll(now) {
            self.ctx.overlay = None;
            if self.ctx.timers.auto_return {
                // Wipe; the mode handler repaints on this same tick.
                self.ctx.commands.rows = [blank_row(), blank_row()];
            }
        }

        // 4. Classify this tick's input.
        let (x, y) = hw.read_axes();
        let input = InputSample {
            key: hw.poll_key(),
            direction: classify_axes(x, y, &self.ctx.config.joystick),
            clicked: hw.button_pressed(),
        };

        // 5. Mode controller.
        self.controller.step(&mut self.ctx, &input);

        // 6. Auto control overrides manual gate commands while enabled.
        if self.ctx.auto_mode {
            let gates = auto_control(
                self.ctx.sensors.water_level,
                self.ctx.thresholds.low(),
                self.ctx.thresholds.high(),
                self.ctx.config.gate_open_angle,
                self.ctx.config.gate_closed_angle,
            );
            self.ctx.commands.gate1_angle = gates.gate1;
            self.ctx.commands.gate2_angle = gates.gate2;
        }

        // 7. Indicator: dark until login, then colour-coded water state.
        self.ctx.commands.indicator_rgb = if !self.ctx.logged_in {
            (false, false, false)
        } else {
            match self.ctx.log.live_state() {
                crate::control::WaterState::Low => (true, false, false),
                crate::control::WaterState::Ok => (false, true, false),
                crate::control::WaterState::High => (false, false, true),
            }
        };

        // 8. Push only what changed.
        self.apply_outputs(hw);

        // 9. Events from observable diffs.
        let kind = self.controller.mode_kind();
        if kind != prev_kind {
            sink.emit(&AppEvent::ModeChanged {
                from: prev_kind,
                to: kind,
            });
        }
        if !prev_logged_in && self.ctx.logged_in {
            sink.emit(&AppEvent::LoginSucceeded);
        }
        if prev_logged_in && !self.ctx.logged_in && prev_kind == ModeKind::PasswordChange {
            sink.emit(&AppEvent::PasswordChanged);
        }
        let fails = self.ctx.auth.fail_count();
        let latched = self.ctx.auth.is_latched();
        if fails > prev_fails && !latched {
            sink.emit(&AppEvent::LoginFailed { fail_count: fails });
        }
        if !prev_latched && latched {
            sink.emit(&AppEvent::LockedOut);
        }
        if prev_latched && !latched {
            sink.emit(&AppEvent::LockReleased);
        }
        let thresholds = (self.ctx.thresholds.low(), self.ctx.thresholds.high());
        if thresholds != prev_thresholds {
            sink.emit(&AppEvent::ThresholdChanged {
                low: thresholds.0,
                high: thresholds.1,
            });
        }
        if self.ctx.auto_mode != prev_auto {
            sink.emit(&AppEvent::AutoModeChanged(self.ctx.auto_mode));
        }
        let water = self.ctx.log.live_state();
        if water != prev_water {
            match water {
                crate::control::WaterState::Ok => sink.emit(&AppEvent::WaterEventClosed),
                state => sink.emit(&AppEvent::WaterEventOpened {
                    state,
                    level: self.ctx.sensors.water_level,
                }),
            }
        }
    }

    // ── Output application ────────────────────────────────────

    fn apply_outputs(&mut self, hw: &mut (impl DisplayPort + ActuatorPort)) {
        let cmd = &self.ctx.commands;
        let rows = match &self.ctx.overlay {
            Some(overlay) => overlay.clone(),
            None => cmd.rows.clone(),
        };

        let prev = self.applied.as_ref();
        if prev.is_none_or(|a| a.rows[0] != rows[0]) {
            hw.write_row(0, rows[0].as_str());
        }
        if prev.is_none_or(|a| a.rows[1] != rows[1]) {
            hw.write_row(1, rows[1].as_str());
        }
        if prev.is_none_or(|a| a.gate1 != cmd.gate1_angle) {
            hw.set_gate_angle(Gate::One, cmd.gate1_angle);
        }
        if prev.is_none_or(|a| a.gate2 != cmd.gate2_angle) {
            hw.set_gate_angle(Gate::Two, cmd.gate2_angle);
        }
        if prev.is_none_or(|a| a.indicator != cmd.indicator_rgb) {
            let (r, g, b) = cmd.indicator_rgb;
            hw.set_indicator(r, g, b);
        }
        if prev.is_none_or(|a| a.buzzer != cmd.buzzer) {
            hw.set_buzzer(cmd.buzzer);
        }
        if prev.is_none_or(|a| a.led_red != cmd.led_red) {
            hw.set_red_led(cmd.led_red);
        }
        if prev.is_none_or(|a| a.led_green != cmd.led_green) {
            hw.set_green_led(cmd.led_green);
        }

        self.applied = Some(Applied {
            rows,
            gate1: cmd.gate1_angle,
            gate2: cmd.gate2_angle,
            indicator: cmd.indicator_rgb,
            buzzer: cmd.buzzer,
            led_red: cmd.led_red,
            led_green: cmd.led_green,
        });
    }

    // ── Introspection ─────────────────────────────────────────

    pub fn mode(&self) -> &Mode {
        self.controller.mode()
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.controller.mode_kind()
    }

    pub fn context(&self) -> &ControlContext {
        &self.ctx
    }

    /// Mutable context access for adapters that restore persisted state
    /// (thresholds, log) at boot.
    pub fn context_mut(&mut self) -> &mut ControlContext {
        &mut self.ctx
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
