//! Integration tests: AppService → mode controller → ports.

use std::collections::VecDeque;

use damgate::app::events::AppEvent;
use damgate::app::ports::{
    ActuatorPort, ClockPort, DisplayPort, EventSink, Gate, InputPort, SensorPort,
};
use damgate::app::service::AppService;
use damgate::config::SystemConfig;
use damgate::control::WaterState;
use damgate::error::SensorError;
use damgate::fsm::ModeKind;
use damgate::fsm::context::{CalendarDate, EnvReading, TimeOfDay};
use damgate::input::Key;

// ── Mock implementations ──────────────────────────────────────

struct MockHw {
    keys: VecDeque<Key>,
    axes: (u16, u16),
    clicked: bool,
    water_level: u8,
    env: Option<EnvReading>,
    time: TimeOfDay,
    date: CalendarDate,

    rows: [String; 2],
    row_writes: Vec<(u8, String)>,
    gate_calls: Vec<(Gate, u8)>,
    indicator: (bool, bool, bool),
    buzzer: bool,
    red_led: bool,
    green_led: bool,
}

impl MockHw {
    fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            axes: (3100, 3000), // centred
            clicked: false,
            water_level: 25,
            env: Some(EnvReading {
                temperature_c: 24,
                humidity_pct: 55,
            }),
            time: TimeOfDay {
                hours: 12,
                minutes: 0,
                seconds: 0,
            },
            date: CalendarDate {
                year: 26,
                month: 8,
                day: 28,
            },
            rows: [String::new(), String::new()],
            row_writes: Vec::new(),
            gate_calls: Vec::new(),
            indicator: (false, false, false),
            buzzer: false,
            red_led: false,
            green_led: false,
        }
    }
}

impl InputPort for MockHw {
    fn poll_key(&mut self) -> Option<Key> {
        self.keys.pop_front()
    }
    fn read_axes(&mut self) -> (u16, u16) {
        self.axes
    }
    fn button_pressed(&mut self) -> bool {
        std::mem::take(&mut self.clicked)
    }
}

impl SensorPort for MockHw {
    fn read_water_level(&mut self) -> u8 {
        self.water_level
    }
    fn read_env(&mut self) -> Result<EnvReading, SensorError> {
        self.env.ok_or(SensorError::EnvUnavailable)
    }
    fn read_system_temp(&mut self) -> f32 {
        27.5
    }
}

impl ClockPort for MockHw {
    fn read_time(&mut self) -> TimeOfDay {
        self.time
    }
    fn read_date(&mut self) -> CalendarDate {
        self.date
    }
    fn set_time(&mut self, time: TimeOfDay) {
        self.time = time;
    }
    fn set_date(&mut self, date: CalendarDate) {
        self.date = date;
    }
}

impl DisplayPort for MockHw {
    fn write_row(&mut self, row: u8, text: &str) {
        self.rows[row as usize] = text.to_string();
        self.row_writes.push((row, text.to_string()));
    }
    fn clear(&mut self) {
        self.rows = [" ".repeat(16), " ".repeat(16)];
    }
}

impl ActuatorPort for MockHw {
    fn set_gate_angle(&mut self, gate: Gate, degrees: u8) {
        self.gate_calls.push((gate, degrees));
    }
    fn set_indicator(&mut self, r: bool, g: bool, b: bool) {
        self.indicator = (r, g, b);
    }
    fn set_buzzer(&mut self, on: bool) {
        self.buzzer = on;
    }
    fn set_red_led(&mut self, on: bool) {
        self.red_led = on;
    }
    fn set_green_led(&mut self, on: bool) {
        self.green_led = on;
    }
}

#[derive(Default)]
struct RecordingSink {
    events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Harness ───────────────────────────────────────────────────

const TICK_MS: u64 = 50;

struct Harness {
    service: AppService,
    hw: MockHw,
    sink: RecordingSink,
    now: u64,
}

impl Harness {
    fn new() -> Self {
        let mut service = AppService::new(SystemConfig::default()).unwrap();
        let mut hw = MockHw::new();
        let mut sink = RecordingSink::default();
        service.start(&mut hw, &mut sink);
        Self {
            service,
            hw,
            sink,
            now: 0,
        }
    }

    fn tick(&mut self) {
        self.now += TICK_MS;
        self.service.tick(self.now, &mut self.hw, &mut self.sink);
    }

    fn press(&mut self, key: Key) {
        self.hw.keys.push_back(key);
        self.tick();
    }

    fn click(&mut self) {
        self.hw.clicked = true;
        self.tick();
    }

    /// One joystick deflection plus the release tick.
    fn flick_up(&mut self) {
        self.hw.axes = (3100, 100);
        self.tick();
        self.hw.axes = (3100, 3000);
        self.tick();
    }

    fn type_password(&mut self, digits: [u8; 4]) {
        for d in digits {
            self.press(Key::Digit(d));
        }
        self.press(Key::Hash);
    }

    fn login(&mut self) {
        self.type_password([1, 2, 3, 4]);
        assert_eq!(self.service.mode_kind(), ModeKind::MenuSelect);
    }

    fn run_for(&mut self, ms: u64) {
        let end = self.now + ms;
        while self.now < end {
            self.tick();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn boot_banner_paints_then_yields_to_password_screen() {
    let mut h = Harness::new();
    assert!(matches!(h.sink.events[0], AppEvent::Started(ModeKind::PasswordInput)));

    h.tick();
    assert_eq!(h.hw.rows[0], "Dam System Ready");
    assert_eq!(h.hw.rows[1], "Enter Password  ");

    // Banner expires after 2 s; the password screen takes over.
    h.run_for(2_100);
    assert_eq!(h.hw.rows[0], "Enter Password: ");
    assert_eq!(h.hw.rows[1], "____            ");
}

#[test]
fn login_emits_events_and_lights_indicator() {
    let mut h = Harness::new();
    assert_eq!(h.hw.indicator, (false, false, false), "dark until login");

    h.login();
    assert!(h.sink.events.contains(&AppEvent::LoginSucceeded));
    assert!(h.sink.events.contains(&AppEvent::ModeChanged {
        from: ModeKind::PasswordInput,
        to: ModeKind::MenuSelect,
    }));
    // Level 25 is in band: green.
    assert_eq!(h.hw.indicator, (false, true, false));
    assert!(h.hw.green_led, "success feedback LED");
}

#[test]
fn wrong_password_emits_failures_then_lockout_and_release() {
    let mut h = Harness::new();
    for _ in 0..4 {
        h.type_password([0, 0, 0, 0]);
    }
    assert!(h.sink.events.contains(&AppEvent::LoginFailed { fail_count: 4 }));
    assert!(!h.sink.events.contains(&AppEvent::LockedOut));

    h.type_password([0, 0, 0, 0]);
    assert!(h.sink.events.contains(&AppEvent::LockedOut));
    assert!(h.hw.buzzer, "lockout chirps");

    // Lock lasts 60 s from the latch.
    h.now += 60_000;
    h.tick();
    assert!(h.sink.events.contains(&AppEvent::LockReleased));

    h.run_for(2_000); // release message expires
    h.type_password([1, 2, 3, 4]);
    assert_eq!(h.service.mode_kind(), ModeKind::MenuSelect);
}

#[test]
fn feedback_outputs_auto_expire() {
    let mut h = Harness::new();
    h.type_password([9, 9, 9, 9]);
    assert!(h.hw.buzzer);
    assert!(h.hw.red_led);

    h.run_for(600); // buzzer off at +500 ms
    assert!(!h.hw.buzzer);
    assert!(h.hw.red_led, "LED holds for a full second");
    h.run_for(500);
    assert!(!h.hw.red_led);
}

#[test]
fn auto_mode_drives_gates_from_level() {
    let mut h = Harness::new();
    h.login();
    h.service.context_mut().auto_mode = true;

    h.hw.water_level = 45; // above high(40): drain
    h.tick();
    assert_eq!(h.hw.gate_calls.last(), Some(&(Gate::Two, 90)));

    h.hw.water_level = 5; // below low(10): retain
    h.tick();
    let gate1 = h
        .hw
        .gate_calls
        .iter()
        .rev()
        .find(|(g, _)| *g == Gate::One)
        .unwrap();
    assert_eq!(gate1.1, 90);
    let gate2 = h
        .hw
        .gate_calls
        .iter()
        .rev()
        .find(|(g, _)| *g == Gate::Two)
        .unwrap();
    assert_eq!(gate2.1, 0);

    h.hw.water_level = 25; // back in band: both closed
    h.tick();
    assert_eq!(h.hw.gate_calls.last(), Some(&(Gate::One, 0)));
}

#[test]
fn threshold_commit_through_the_console() {
    let mut h = Harness::new();
    h.login();
    h.run_for(1_200); // let the CORRECT! message clear

    h.flick_up();
    h.flick_up(); // menu item 2 = Threshold Set
    h.click();
    assert_eq!(h.service.mode_kind(), ModeKind::ThresholdSet);
    h.click(); // cursor 0 = High
    assert_eq!(h.service.mode_kind(), ModeKind::ThresholdInput);

    h.press(Key::Digit(4));
    h.press(Key::Digit(5));
    h.press(Key::Hash);
    assert!(h.sink.events.contains(&AppEvent::ThresholdChanged { low: 10, high: 45 }));
    assert_eq!(h.service.mode_kind(), ModeKind::ThresholdSet);
}

#[test]
fn water_log_runs_only_while_logged_in() {
    let mut h = Harness::new();
    h.hw.water_level = 5;
    h.run_for(3_000);
    assert_eq!(h.service.context().log.count(), 0, "no logging before login");

    h.login();
    h.run_for(1_500); // past the log update period
    assert_eq!(h.service.context().log.count(), 1);
    assert!(h.sink.events.contains(&AppEvent::WaterEventOpened {
        state: WaterState::Low,
        level: 5,
    }));
    // Low: red indicator.
    assert_eq!(h.hw.indicator, (true, false, false));

    h.hw.water_level = 25;
    h.run_for(1_500);
    assert!(h.sink.events.contains(&AppEvent::WaterEventClosed));
    assert_eq!(h.hw.indicator, (false, true, false));
}

#[test]
fn display_rows_rewritten_only_on_change() {
    let mut h = Harness::new();
    h.tick();
    let writes = h.hw.row_writes.len();
    h.tick();
    h.tick();
    assert_eq!(h.hw.row_writes.len(), writes, "static screen, no rewrites");
}

#[test]
fn clock_poll_adopts_rtc_time() {
    let mut h = Harness::new();
    h.hw.time = TimeOfDay {
        hours: 13,
        minutes: 37,
        seconds: 0,
    };
    h.run_for(1_100); // clock poll period
    assert_eq!(h.service.context().time.hours, 13);
    assert_eq!(h.service.context().time.minutes, 37);
}

#[test]
fn set_clock_writes_rtc_and_context() {
    let mut h = Harness::new();
    let t = TimeOfDay {
        hours: 6,
        minutes: 30,
        seconds: 0,
    };
    let d = CalendarDate {
        year: 26,
        month: 12,
        day: 1,
    };
    let Harness { service, hw, .. } = &mut h;
    service.set_clock(hw, t, d);
    assert_eq!(hw.time, t);
    assert_eq!(hw.date, d);
    assert_eq!(service.context().date, d);
}

#[test]
fn env_probe_failure_shows_error_row() {
    let mut h = Harness::new();
    h.hw.env = None;
    h.login();
    h.run_for(2_500); // env poll + message expiry

    // Navigate to Environment (menu item 3).
    h.flick_up();
    h.flick_up();
    h.flick_up();
    h.click();
    assert_eq!(h.service.mode_kind(), ModeKind::Environment);
    h.tick();
    assert_eq!(h.hw.rows[0], "Sensor Error!   ");
}

#[test]
fn password_change_emits_and_requires_relogin() {
    let mut h = Harness::new();
    h.login();
    h.run_for(1_200);

    // Menu item 5 = Change PW: five forward flicks.
    for _ in 0..5 {
        h.flick_up();
    }
    h.click();
    assert_eq!(h.service.mode_kind(), ModeKind::PasswordChange);

    h.type_password([4, 3, 2, 1]);
    assert!(h.sink.events.contains(&AppEvent::PasswordChanged));
    assert_eq!(h.service.mode_kind(), ModeKind::PasswordInput);
    assert_eq!(h.hw.indicator, (false, false, false), "dark after logout");

    h.run_for(2_000);
    h.type_password([4, 3, 2, 1]);
    assert_eq!(h.service.mode_kind(), ModeKind::MenuSelect);
}
