//! Deferred-action scheduler.
//!
//! Replaces every blocking wait in the original control flow with deadline
//! checks against the monotonic millisecond tick. Two primitives:
//!
//! - [`OneShot`] — an optional absolute deadline. `poll(now)` returns
//!   `true` exactly once, on the first poll at or past the deadline, then
//!   auto-clears. A late poll fires late; it never skips.
//! - [`Periodic`] — a "last-fired" timestamp compared against a fixed
//!   period. Firing stores `last_fired = now` (not `+= period`), so missed
//!   periods never accumulate: at most one fire per poll, drift-tolerant.
//!
//! [`DeferredTimers`] bundles the fixed auto-off set the mode controller
//! uses (buzzer, feedback LEDs, message overlay).

/// Monotonic millisecond tick from the external clock source.
pub type Tick = u64;

// ---------------------------------------------------------------------------
// One-shot deadline
// ---------------------------------------------------------------------------

/// A single optional deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneShot {
    deadline: Option<Tick>,
}

impl OneShot {
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arm (or re-arm) the deadline at an absolute tick.
    pub fn schedule(&mut self, at: Tick) {
        self.deadline = Some(at);
    }

    /// Disarm without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// True while a deadline is armed.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Fire-once check: `true` on the first poll with `now >= deadline`,
    /// then the deadline clears itself.
    pub fn poll(&mut self, now: Tick) -> bool {
        match self.deadline {
            Some(at) if now >= at => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Periodic refresh
// ---------------------------------------------------------------------------

/// Fixed-interval background task timing.
#[derive(Debug, Clone, Copy)]
pub struct Periodic {
    period: Tick,
    last_fired: Tick,
}

impl Periodic {
    pub const fn new(period: Tick) -> Self {
        Self {
            period,
            last_fired: 0,
        }
    }

    /// True when a full period has elapsed since the last fire.
    pub fn poll(&mut self, now: Tick) -> bool {
        if now.wrapping_sub(self.last_fired) >= self.period {
            self.last_fired = now;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// The controller's fixed auto-off timer set
// ---------------------------------------------------------------------------

/// Independent auto-off deadlines owned by the control context.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeferredTimers {
    /// Silence the buzzer.
    pub buzzer_off: OneShot,
    /// Extinguish the red/green feedback LEDs.
    pub led_off: OneShot,
    /// Dismiss the transient message overlay.
    pub message_clear: OneShot,
    /// Whether dismissing the overlay also wipes the display.
    pub auto_return: bool,
}

impl DeferredTimers {
    pub const fn new() -> Self {
        Self {
            buzzer_off: OneShot::new(),
            led_off: OneShot::new(),
            message_clear: OneShot::new(),
            auto_return: false,
        }
    }
}
