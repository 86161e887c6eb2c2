//! Per-mode tick handlers.
//!
//! Each handler consumes the mode's own sub-state by value, reads the
//! tick's input sample, renders its screen into `ctx.commands` (unless a
//! transient message owns the display), and returns the next mode.
//! Constructing a fresh variant on every transition is what cancels
//! half-typed entries and resets cursors.

use log::info;

use crate::control::{ThresholdField, WaterState};
use crate::error::ValidationError;
use crate::display::{Row, blank_row, marker_row};
use crate::fsm::context::ControlContext;
use crate::input::{DigitBuffer, DirectionLatch, JoyDirection, Key};
use crate::nav::{ListNav, LogNav, LogRow};
use crate::row;
use crate::auth::{LockStatus, SubmitOutcome};

use super::{InputSample, Mode, PASSWORD_DIGITS, THRESHOLD_DIGITS};

/// Top-level menu, in joystick-forward order.
pub const MENU_ITEMS: [&str; 7] = [
    "1.Water Status",
    "2.Dam Control",
    "3.Threshold Set",
    "4.Environment",
    "5.Clock",
    "6.Change PW",
    "7.Event Log",
];

const MENU_WATER_STATUS: usize = 0;
const MENU_DAM_CONTROL: usize = 1;
const MENU_THRESHOLD_SET: usize = 2;
const MENU_ENVIRONMENT: usize = 3;
const MENU_CLOCK: usize = 4;
const MENU_CHANGE_PW: usize = 5;
const MENU_EVENT_LOG: usize = 6;

fn confirm_pressed(input: &InputSample) -> bool {
    matches!(input.key, Some(Key::Hash)) || input.clicked
}

/// `****` / `__` style entry mask, `filled` of `width` positions typed.
fn masked(filled: usize, width: usize) -> heapless::String<4> {
    let mut s = heapless::String::new();
    for i in 0..width.min(4) {
        let _ = s.push(if i < filled { '*' } else { '_' });
    }
    s
}

// ---------------------------------------------------------------------------
// Password entry
// ---------------------------------------------------------------------------

pub(super) fn password_input(
    ctx: &mut ControlContext,
    mut entry: DigitBuffer<PASSWORD_DIGITS>,
    input: &InputSample,
) -> Mode {
    match ctx.auth.check_locked(ctx.now) {
        LockStatus::Locked { remaining_secs } => {
            // All input is dead while locked.
            if !ctx.message_active() {
                ctx.show(row!("LOCKED!"), row!("Wait {:2}s", remaining_secs));
            }
            return Mode::PasswordInput { entry };
        }
        LockStatus::JustReleased => {
            ctx.show_message(row!("Lock Released"), row!("Enter Password"), 1500, true);
            entry.clear();
            return Mode::PasswordInput { entry };
        }
        LockStatus::Unlocked => {}
    }

    match input.key {
        Some(Key::Digit(d)) => {
            entry.push(d);
        }
        Some(Key::Star) => entry.clear(),
        _ => {}
    }

    if confirm_pressed(input) && entry.is_full() {
        match ctx.auth.submit(entry.as_str(), ctx.now) {
            SubmitOutcome::Accepted => {
                ctx.logged_in = true;
                ctx.feedback_success();
                ctx.show_message(row!("Enter Password:"), row!("CORRECT!"), 1000, true);
                return Mode::menu_at(0);
            }
            SubmitOutcome::Rejected { fail_count } => {
                ctx.feedback_error();
                ctx.show_message(
                    row!("Enter Password:"),
                    row!("WRONG! ({}/{})", fail_count, ctx.auth.max_failures()),
                    1000,
                    false,
                );
                entry.clear();
            }
            SubmitOutcome::Locked => {
                ctx.feedback_error();
                ctx.show_message(row!("Too Many Fails!"), row!("Wait 60s"), 1500, true);
                entry.clear();
            }
        }
    }

    if !ctx.message_active() {
        let mask = masked(entry.len(), PASSWORD_DIGITS);
        ctx.show(row!("Enter Password:"), row!("{mask}"));
    }
    Mode::PasswordInput { entry }
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

pub(super) fn menu_select(
    ctx: &mut ControlContext,
    mut selected: usize,
    mut latch: DirectionLatch,
    input: &InputSample,
) -> Mode {
    match latch.edge(input.direction) {
        // Forward through the ring is UP, backward is DOWN.
        Some(JoyDirection::Up) => selected = (selected + 1) % MENU_ITEMS.len(),
        Some(JoyDirection::Down) => {
            selected = if selected == 0 {
                MENU_ITEMS.len() - 1
            } else {
                selected - 1
            }
        }
        _ => {}
    }

    if input.clicked {
        return match selected {
            MENU_WATER_STATUS => Mode::WaterStatus,
            MENU_DAM_CONTROL => Mode::DamControl { nav: ListNav::new() },
            MENU_THRESHOLD_SET => Mode::ThresholdSet { nav: ListNav::new() },
            MENU_ENVIRONMENT => Mode::Environment,
            MENU_CLOCK => Mode::Clock,
            MENU_CHANGE_PW => Mode::PasswordChange {
                entry: DigitBuffer::new(),
            },
            _ => Mode::Log { nav: LogNav::new() },
        };
    }

    if !ctx.message_active() {
        ctx.show(row!("{}", MENU_ITEMS[selected]), row!("Click to Enter"));
    }
    Mode::MenuSelect { selected, latch }
}

// ---------------------------------------------------------------------------
// Water status
// ---------------------------------------------------------------------------

pub(super) fn water_status(ctx: &mut ControlContext, input: &InputSample) -> Mode {
    if input.clicked {
        return Mode::menu_at(MENU_WATER_STATUS);
    }
    if !ctx.message_active() {
        let state = match ctx.water_state() {
            WaterState::Low => "LOW ",
            WaterState::Ok => "OK  ",
            WaterState::High => "HIGH",
        };
        ctx.show(
            row!(
                "Water:{:3}% {:02}:{:02}",
                ctx.sensors.water_level,
                ctx.time.hours,
                ctx.time.minutes
            ),
            row!("{state}  (Back)"),
        );
    }
    Mode::WaterStatus
}

// ---------------------------------------------------------------------------
// Dam control submenu tree
// ---------------------------------------------------------------------------

/// Render a 2-row window over `items` with the cursor marker.
fn render_list(ctx: &mut ControlContext, nav: &ListNav, items: &[Row]) {
    if ctx.message_active() {
        return;
    }
    let mut rows = [blank_row(), blank_row()];
    for (slot, idx) in nav.visible(items.len()).enumerate() {
        rows[slot] = marker_row(idx == nav.cursor(), items[idx].as_str().trim_end());
    }
    let [top, bottom] = rows;
    ctx.show(top, bottom);
}

fn nav_step(nav: &mut ListNav, item_count: usize, input: &InputSample) {
    match nav.latch.edge(input.direction) {
        Some(JoyDirection::Right) => {
            nav.advance(item_count);
        }
        Some(JoyDirection::Left) => {
            nav.retreat();
        }
        _ => {}
    }
}

pub(super) fn dam_control(
    ctx: &mut ControlContext,
    mut nav: ListNav,
    input: &InputSample,
) -> Mode {
    nav_step(&mut nav, 3, input);

    if input.clicked {
        return match nav.cursor() {
            0 => Mode::DamManual { nav: ListNav::new() },
            1 => Mode::DamAuto { nav: ListNav::new() },
            _ => Mode::menu_at(MENU_DAM_CONTROL),
        };
    }

    let items = [row!("Manual Mode"), row!("Auto Mode"), row!("Back")];
    render_list(ctx, &nav, &items);
    Mode::DamControl { nav }
}

pub(super) fn dam_manual(
    ctx: &mut ControlContext,
    mut nav: ListNav,
    input: &InputSample,
) -> Mode {
    nav_step(&mut nav, 3, input);

    if input.clicked {
        let open = ctx.config.gate_open_angle;
        let closed = ctx.config.gate_closed_angle;
        match nav.cursor() {
            0 => {
                let angle = &mut ctx.commands.gate1_angle;
                *angle = if *angle == open { closed } else { open };
                info!("gates: gate 1 commanded to {}°", *angle);
            }
            1 => {
                let angle = &mut ctx.commands.gate2_angle;
                *angle = if *angle == open { closed } else { open };
                info!("gates: gate 2 commanded to {}°", *angle);
            }
            _ => return Mode::DamControl { nav: ListNav::new() },
        }
    }

    let open = ctx.config.gate_open_angle;
    let gate_label = |angle: u8| if angle == open { "OPEN " } else { "SHUT " };
    let items = [
        row!("Gate1: {}", gate_label(ctx.commands.gate1_angle)),
        row!("Gate2: {}", gate_label(ctx.commands.gate2_angle)),
        row!("Back"),
    ];
    render_list(ctx, &nav, &items);
    Mode::DamManual { nav }
}

pub(super) fn dam_auto(ctx: &mut ControlContext, mut nav: ListNav, input: &InputSample) -> Mode {
    nav_step(&mut nav, 3, input);

    if input.clicked {
        match nav.cursor() {
            0 => {
                ctx.auto_mode = !ctx.auto_mode;
                info!(
                    "gates: auto mode {}",
                    if ctx.auto_mode { "enabled" } else { "disabled" }
                );
            }
            1 => {} // status row is not actionable
            _ => return Mode::DamControl { nav: ListNav::new() },
        }
    }

    let items = [
        row!("{}", if ctx.auto_mode { "Turn OFF" } else { "Turn ON" }),
        row!("Now: {}", if ctx.auto_mode { "ON" } else { "OFF" }),
        row!("Back"),
    ];
    render_list(ctx, &nav, &items);
    Mode::DamAuto { nav }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

fn threshold_cursor(field: ThresholdField) -> usize {
    match field {
        ThresholdField::High => 0,
        ThresholdField::Low => 1,
    }
}

pub(super) fn threshold_set(
    ctx: &mut ControlContext,
    mut nav: ListNav,
    input: &InputSample,
) -> Mode {
    nav_step(&mut nav, 3, input);

    if input.clicked {
        return match nav.cursor() {
            0 => Mode::ThresholdInput {
                field: ThresholdField::High,
                entry: DigitBuffer::new(),
            },
            1 => Mode::ThresholdInput {
                field: ThresholdField::Low,
                entry: DigitBuffer::new(),
            },
            _ => Mode::menu_at(MENU_THRESHOLD_SET),
        };
    }

    let items = [
        row!("High:{:2}%", ctx.thresholds.high()),
        row!("Low: {:2}%", ctx.thresholds.low()),
        row!("Back"),
    ];
    render_list(ctx, &nav, &items);
    Mode::ThresholdSet { nav }
}

pub(super) fn threshold_input(
    ctx: &mut ControlContext,
    field: ThresholdField,
    mut entry: DigitBuffer<THRESHOLD_DIGITS>,
    input: &InputSample,
) -> Mode {
    match input.key {
        Some(Key::Digit(d)) => {
            entry.push(d);
        }
        Some(Key::Star) => {
            // Cancel discards the buffer and restores the cursor.
            return Mode::ThresholdSet {
                nav: ListNav::at(threshold_cursor(field)),
            };
        }
        Some(Key::Hash) => {
            if let Some(value) = entry.value() {
                match ctx.thresholds.set(field, value) {
                    Ok(()) => {
                        ctx.feedback_success();
                        let label = match field {
                            ThresholdField::High => "High",
                            ThresholdField::Low => "Low",
                        };
                        ctx.show_message(
                            row!("{label} Set: {value}%"),
                            row!("Success!"),
                            1500,
                            true,
                        );
                        return Mode::ThresholdSet {
                            nav: ListNav::at(threshold_cursor(field)),
                        };
                    }
                    Err(e) => {
                        ctx.chirp(300);
                        // Short forms; the full Display text overflows 16 columns.
                        let top = match e {
                            ValidationError::OutOfRange(_) => row!("Error: 0-50 Only"),
                            ValidationError::HighNotAboveLow { low } => {
                                row!("High > Low({low}%)")
                            }
                            ValidationError::LowNotBelowHigh { high } => {
                                row!("Low < High({high}%)")
                            }
                        };
                        ctx.show_message(top, row!("Try Again"), 1500, true);
                        entry.clear();
                    }
                }
            }
        }
        _ => {}
    }

    if !ctx.message_active() {
        let label = match field {
            ThresholdField::High => "Set High (0-50)",
            ThresholdField::Low => "Set Low  (0-50)",
        };
        let mask = {
            let typed = entry.as_str();
            let mut s: heapless::String<2> = heapless::String::new();
            for i in 0..THRESHOLD_DIGITS {
                let _ = s.push(typed.as_bytes().get(i).map_or('_', |b| *b as char));
            }
            s
        };
        ctx.show(row!("{label}"), row!("{mask} (#:OK *:Bk)"));
    }
    Mode::ThresholdInput { field, entry }
}

// ---------------------------------------------------------------------------
// Read-only screens
// ---------------------------------------------------------------------------

pub(super) fn environment(ctx: &mut ControlContext, input: &InputSample) -> Mode {
    if input.clicked {
        ctx.commands.led_red = false;
        return Mode::menu_at(MENU_ENVIRONMENT);
    }

    // Warning LED tracks the live reading while this screen is up.
    let warm = ctx
        .sensors
        .env
        .is_some_and(|e| e.temperature_c >= ctx.config.ambient_warn_temp_c);
    ctx.commands.led_red = warm;

    if !ctx.message_active() {
        let top = match ctx.sensors.env {
            Some(e) => row!("T:{:2}C H:{:2}%", e.temperature_c, e.humidity_pct),
            None => row!("Sensor Error!"),
        };
        ctx.show(top, row!("Sys:{:.1}C (Back)", ctx.sensors.system_temp_c));
    }
    Mode::Environment
}

pub(super) fn clock(ctx: &mut ControlContext, input: &InputSample) -> Mode {
    if input.clicked {
        return Mode::menu_at(MENU_CLOCK);
    }
    if !ctx.message_active() {
        ctx.show(
            row!(
                "20{:02}-{:02}-{:02}",
                ctx.date.year,
                ctx.date.month,
                ctx.date.day
            ),
            row!(
                "{:02}:{:02}:{:02} (Back)",
                ctx.time.hours,
                ctx.time.minutes,
                ctx.time.seconds
            ),
        );
    }
    Mode::Clock
}

// ---------------------------------------------------------------------------
// Password change
// ---------------------------------------------------------------------------

pub(super) fn password_change(
    ctx: &mut ControlContext,
    mut entry: DigitBuffer<PASSWORD_DIGITS>,
    input: &InputSample,
) -> Mode {
    match input.key {
        Some(Key::Digit(d)) => {
            entry.push(d);
        }
        Some(Key::Star) => return Mode::menu_at(MENU_CHANGE_PW),
        _ => {}
    }

    if confirm_pressed(input) && entry.is_full() {
        ctx.auth.change_password(entry.as_str());
        ctx.logged_in = false;
        ctx.chirp(300);
        ctx.show_message(row!("PW CHANGED!"), row!("Re-login Please"), 1500, true);
        return Mode::password();
    }

    if !ctx.message_active() {
        let mask = masked(entry.len(), PASSWORD_DIGITS);
        ctx.show(row!("New Password:"), row!("{mask} (#:OK)"));
    }
    Mode::PasswordChange { entry }
}

// ---------------------------------------------------------------------------
// Event log
// ---------------------------------------------------------------------------

pub(super) fn log_screen(ctx: &mut ControlContext, mut nav: LogNav, input: &InputSample) -> Mode {
    let count = ctx.log.count();
    match nav.latch.edge(input.direction) {
        Some(JoyDirection::Right) => {
            nav.advance(count);
        }
        Some(JoyDirection::Left) => {
            nav.retreat();
        }
        _ => {}
    }

    if input.clicked && nav.selected() == LogRow::Back {
        return Mode::menu_at(MENU_EVENT_LOG);
    }

    if !ctx.message_active() {
        match nav.selected() {
            LogRow::Back => {
                let summary = if count > 0 {
                    row!("Logs:{:2}/10", count)
                } else {
                    row!("No Logs")
                };
                ctx.show(marker_row(true, "Back"), summary);
            }
            LogRow::Entry(i) => match ctx.log.get_by_view_index(i) {
                Some(ev) => {
                    let tag = match ev.state {
                        WaterState::Low => "L",
                        WaterState::High => "H",
                        WaterState::Ok => "?",
                    };
                    let top = row!(
                        "{}/{} {} {:02}:{:02}:{:02}",
                        i + 1,
                        count,
                        tag,
                        ev.start_time.hours,
                        ev.start_time.minutes,
                        ev.start_time.seconds
                    );
                    let bottom = if ev.ended {
                        row!(
                            "    ~ {:02}:{:02}:{:02}",
                            ev.end_time.hours,
                            ev.end_time.minutes,
                            ev.end_time.seconds
                        )
                    } else {
                        row!("    (ongoing)")
                    };
                    ctx.show(top, bottom);
                }
                None => ctx.show(blank_row(), blank_row()),
            },
        }
    }
    Mode::Log { nav }
}
