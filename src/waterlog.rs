//! Circular water-event history with start/end hysteresis.
//!
//! An event opens when the classified level leaves the Ok band and closes
//! when it returns. Repeated updates inside the same episode are no-ops,
//! so transient sampling noise within an episode never multiplies rows.
//! At capacity the ring overwrites oldest-first.
//!
//! A direct Low↔High jump opens a new event without closing the previous
//! one — preserved from the fielded behaviour, see DESIGN.md.

use log::info;

use crate::control::{WaterState, classify};
use crate::fsm::context::{CalendarDate, TimeOfDay};

/// Ring capacity.
pub const WATERLOG_CAP: usize = 10;

/// One out-of-range episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaterEvent {
    /// `Low` or `High` — never `Ok` (an Ok reading closes, never opens).
    pub state: WaterState,
    /// Water level at the moment the episode opened (percent).
    pub level_percent: u8,
    pub start_time: TimeOfDay,
    pub start_date: CalendarDate,
    pub end_time: TimeOfDay,
    pub end_date: CalendarDate,
    /// False while the episode is still running.
    pub ended: bool,
}

/// Fixed-capacity circular event log.
pub struct WaterLog {
    events: [Option<WaterEvent>; WATERLOG_CAP],
    /// Next write index.
    head: usize,
    count: usize,
    live_state: WaterState,
}

impl WaterLog {
    pub const fn new() -> Self {
        Self {
            events: [None; WATERLOG_CAP],
            head: 0,
            count: 0,
            live_state: WaterState::Ok,
        }
    }

    /// The classification implied by the most recent update.
    pub fn live_state(&self) -> WaterState {
        self.live_state
    }

    /// Number of surviving events (`0..=10`).
    pub fn count(&self) -> usize {
        self.count
    }

    /// Feed one classified sample into the log.
    ///
    /// Idempotent while the classification is unchanged. A return to Ok
    /// closes the newest event if it is still open; a move into Low or
    /// High always opens a fresh event.
    pub fn update(
        &mut self,
        level: u8,
        low: u8,
        high: u8,
        now_time: TimeOfDay,
        now_date: CalendarDate,
    ) {
        let new_state = classify(level, low, high);
        if new_state == self.live_state {
            return;
        }

        if new_state == WaterState::Ok {
            self.end_current_event(now_time, now_date);
            self.live_state = WaterState::Ok;
            return;
        }

        self.live_state = new_state;
        self.push_event(new_state, level, now_time, now_date);
    }

    /// Read oldest-first: view index 0 is the oldest surviving event,
    /// `count() - 1` the newest. Out-of-range reads return `None`.
    pub fn get_by_view_index(&self, view_index: usize) -> Option<&WaterEvent> {
        if view_index >= self.count {
            return None;
        }
        let oldest = (self.head + WATERLOG_CAP - self.count) % WATERLOG_CAP;
        self.events[(oldest + view_index) % WATERLOG_CAP].as_ref()
    }

    // ── Internal ──────────────────────────────────────────────

    fn push_event(&mut self, state: WaterState, level: u8, t: TimeOfDay, d: CalendarDate) {
        info!(
            "waterlog: {:?} episode opened at {}% ({:02}:{:02}:{:02})",
            state, level, t.hours, t.minutes, t.seconds
        );
        self.events[self.head] = Some(WaterEvent {
            state,
            level_percent: level,
            start_time: t,
            start_date: d,
            end_time: TimeOfDay::default(),
            end_date: CalendarDate::default(),
            ended: false,
        });
        self.head = (self.head + 1) % WATERLOG_CAP;
        if self.count < WATERLOG_CAP {
            self.count += 1;
        }
    }

    fn end_current_event(&mut self, t: TimeOfDay, d: CalendarDate) {
        if self.count == 0 {
            return;
        }
        let last = (self.head + WATERLOG_CAP - 1) % WATERLOG_CAP;
        if let Some(ev) = self.events[last].as_mut() {
            if ev.ended {
                return;
            }
            ev.end_time = t;
            ev.end_date = d;
            ev.ended = true;
            info!(
                "waterlog: episode closed ({:02}:{:02}:{:02})",
                t.hours, t.minutes, t.seconds
            );
        }
    }
}

impl Default for WaterLog {
    fn default() -> Self {
        Self::new()
    }
}
