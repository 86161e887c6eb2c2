//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port by diffing observable state
//! across each tick. Adapters on the other side decide what to do with
//! them — log to serial, forward to a supervisory link, record in a test.

use crate::control::WaterState;
use crate::fsm::ModeKind;

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(ModeKind),

    /// The console moved between modes.
    ModeChanged { from: ModeKind, to: ModeKind },

    /// Operator authenticated.
    LoginSucceeded,

    /// Wrong password; carries the consecutive-failure count.
    LoginFailed { fail_count: u8 },

    /// The failure limit latched the lockout.
    LockedOut,

    /// The lockout expired.
    LockReleased,

    /// The stored password was replaced (operator logged out).
    PasswordChanged,

    /// A threshold commit succeeded; carries the new pair.
    ThresholdChanged { low: u8, high: u8 },

    /// Automatic gate control was toggled.
    AutoModeChanged(bool),

    /// The classified water state moved out of band — a log episode
    /// opened. Carries the level that triggered it.
    WaterEventOpened { state: WaterState, level: u8 },

    /// The water state returned to the Ok band.
    WaterEventClosed,
}
