//! Password gate with failure counting and timed lockout.
//!
//! Runs every tick before the password screen renders, in the same spirit
//! as a safety supervisor: the gate owns the latched lock state and the
//! mode controller only reads the verdict.
//!
//! ## Lock lifecycle
//!
//! 1. A wrong submission increments `fail_count`.
//! 2. At `max_failures` the gate latches `locked` and records the start tick.
//! 3. While locked, [`AuthGate::check_locked`] reports the remaining wait.
//! 4. Unlocking is a pure function of time — the first check at or past
//!    `lock_started_at + lock_duration` clears the latch and the counter,
//!    and reports [`LockStatus::JustReleased`] exactly once so the UI can
//!    show its release message.

use log::{info, warn};

use crate::scheduler::Tick;

/// Stored password: 4 ASCII digits.
pub type Password = heapless::String<8>;

/// Verdict of a password submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Match — counter reset, operator logged in.
    Accepted,
    /// Mismatch below the lockout limit; carries the new failure count.
    Rejected { fail_count: u8 },
    /// This mismatch latched the lockout.
    Locked,
}

/// Lock state as seen by the password screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// Gate is open for attempts.
    Unlocked,
    /// The lock expired on this very check.
    JustReleased,
    /// Still locked; whole seconds left to wait.
    Locked { remaining_secs: u32 },
}

/// The password gate.
pub struct AuthGate {
    target: Password,
    max_failures: u8,
    lock_duration_ms: u32,
    fail_count: u8,
    locked: bool,
    lock_started_at: Tick,
}

impl AuthGate {
    pub fn new(target: Password, max_failures: u8, lock_duration_ms: u32) -> Self {
        Self {
            target,
            max_failures,
            lock_duration_ms,
            fail_count: 0,
            locked: false,
            lock_started_at: 0,
        }
    }

    /// Compare an attempt against the stored password.
    ///
    /// Callers must not submit while [`check_locked`](Self::check_locked)
    /// reports a live lock; a submission during a lock is answered with
    /// [`SubmitOutcome::Locked`] without touching the counter.
    pub fn submit(&mut self, attempt: &str, now: Tick) -> SubmitOutcome {
        if self.locked {
            return SubmitOutcome::Locked;
        }

        if attempt == self.target.as_str() {
            self.fail_count = 0;
            info!("auth: password accepted");
            return SubmitOutcome::Accepted;
        }

        self.fail_count = self.fail_count.saturating_add(1);
        if self.fail_count >= self.max_failures {
            self.locked = true;
            self.lock_started_at = now;
            warn!("auth: {} consecutive failures, console locked", self.fail_count);
            SubmitOutcome::Locked
        } else {
            warn!(
                "auth: wrong password ({}/{})",
                self.fail_count, self.max_failures
            );
            SubmitOutcome::Rejected {
                fail_count: self.fail_count,
            }
        }
    }

    /// Evaluate the lock purely against the current tick, auto-unlocking
    /// once the duration has elapsed.
    pub fn check_locked(&mut self, now: Tick) -> LockStatus {
        if !self.locked {
            return LockStatus::Unlocked;
        }

        let elapsed = now.wrapping_sub(self.lock_started_at);
        if elapsed >= Tick::from(self.lock_duration_ms) {
            self.locked = false;
            self.fail_count = 0;
            info!("auth: lockout expired, console released");
            LockStatus::JustReleased
        } else {
            let remaining_ms = Tick::from(self.lock_duration_ms) - elapsed;
            LockStatus::Locked {
                remaining_secs: (remaining_ms / 1000) as u32,
            }
        }
    }

    /// Convenience predicate over [`check_locked`](Self::check_locked).
    pub fn is_locked(&mut self, now: Tick) -> bool {
        matches!(self.check_locked(now), LockStatus::Locked { .. })
    }

    /// Replace the stored password unconditionally. The caller is
    /// responsible for logging the operator out and returning to the
    /// password screen.
    pub fn change_password(&mut self, new: &str) {
        self.target.clear();
        // 4-digit entries always fit the 8-byte backing store.
        let _ = self.target.push_str(new);
        info!("auth: password replaced, re-authentication required");
    }

    /// Latched lock flag without the time check — for observers that must
    /// not consume the one-time [`LockStatus::JustReleased`] report.
    pub fn is_latched(&self) -> bool {
        self.locked
    }

    pub fn fail_count(&self) -> u8 {
        self.fail_count
    }

    pub fn max_failures(&self) -> u8 {
        self.max_failures
    }
}
