//! The console mode controller.
//!
//! One tagged state value, one transition function. Every screen of the
//! operator console is a [`Mode`] variant carrying its own sub-state
//! (digit buffer, navigation cursor), so entering a mode always starts
//! from a well-defined blank slate and leaving one implicitly cancels any
//! in-progress entry.
//!
//! ```text
//!                      ┌──────────────── MenuSelect ───────────────┐
//!                      │        │        │       │       │         │
//!  PasswordInput ──▶ Menu   WaterStatus  │  Environment  Clock   Log
//!        ▲                        DamControl ──▶ DamManual/DamAuto
//!        │                        ThresholdSet ──▶ ThresholdInput
//!        └────────── PasswordChange (forces re-login)
//! ```
//!
//! Each tick the engine calls the handler for the **current** mode with
//! the shared [`ControlContext`](context::ControlContext) and the tick's
//! input sample; the handler returns the next mode (usually itself, with
//! mutated sub-state).

pub mod context;
pub mod modes;

use log::info;

use crate::control::ThresholdField;
use crate::input::{DigitBuffer, DirectionLatch, JoyDirection, Key};
use crate::nav::{ListNav, LogNav};
use context::ControlContext;

// ---------------------------------------------------------------------------
// Input sample
// ---------------------------------------------------------------------------

/// One tick's worth of operator input, already classified by the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSample {
    /// At most one keypad press per tick.
    pub key: Option<Key>,
    /// Raw joystick classification (not yet edge-latched).
    pub direction: JoyDirection,
    /// Debounced joystick button press edge.
    pub clicked: bool,
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// Length of the operator password, in digits.
pub const PASSWORD_DIGITS: usize = 4;
/// Maximum digits accepted for a threshold value.
pub const THRESHOLD_DIGITS: usize = 2;

/// The twelve console modes. Exactly one is active; each carries its own
/// sub-state as payload.
#[derive(Debug, Clone)]
pub enum Mode {
    PasswordInput { entry: DigitBuffer<PASSWORD_DIGITS> },
    MenuSelect { selected: usize, latch: DirectionLatch },
    WaterStatus,
    DamControl { nav: ListNav },
    DamManual { nav: ListNav },
    DamAuto { nav: ListNav },
    ThresholdSet { nav: ListNav },
    ThresholdInput {
        field: ThresholdField,
        entry: DigitBuffer<THRESHOLD_DIGITS>,
    },
    Environment,
    Clock,
    PasswordChange { entry: DigitBuffer<PASSWORD_DIGITS> },
    Log { nav: LogNav },
}

impl Default for Mode {
    fn default() -> Self {
        Self::password()
    }
}

impl Mode {
    /// Fresh password screen.
    pub fn password() -> Self {
        Self::PasswordInput {
            entry: DigitBuffer::new(),
        }
    }

    /// Fresh menu with the cursor on `selected`.
    pub fn menu_at(selected: usize) -> Self {
        Self::MenuSelect {
            selected,
            latch: DirectionLatch::new(),
        }
    }

    /// Payload-free discriminant, for events and assertions.
    pub fn kind(&self) -> ModeKind {
        match self {
            Self::PasswordInput { .. } => ModeKind::PasswordInput,
            Self::MenuSelect { .. } => ModeKind::MenuSelect,
            Self::WaterStatus => ModeKind::WaterStatus,
            Self::DamControl { .. } => ModeKind::DamControl,
            Self::DamManual { .. } => ModeKind::DamManual,
            Self::DamAuto { .. } => ModeKind::DamAuto,
            Self::ThresholdSet { .. } => ModeKind::ThresholdSet,
            Self::ThresholdInput { .. } => ModeKind::ThresholdInput,
            Self::Environment => ModeKind::Environment,
            Self::Clock => ModeKind::Clock,
            Self::PasswordChange { .. } => ModeKind::PasswordChange,
            Self::Log { .. } => ModeKind::Log,
        }
    }
}

/// Mode identity without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    PasswordInput,
    MenuSelect,
    WaterStatus,
    DamControl,
    DamManual,
    DamAuto,
    ThresholdSet,
    ThresholdInput,
    Environment,
    Clock,
    PasswordChange,
    Log,
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owns the current mode and dispatches each tick to its handler.
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    /// Initial mode is always the password screen.
    pub fn new() -> Self {
        Self {
            mode: Mode::password(),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    /// Advance the controller by one tick. Handlers render their screen
    /// into `ctx.commands`, consume the input sample, and return the next
    /// mode. Runs forever; there is no terminal mode.
    pub fn step(&mut self, ctx: &mut ControlContext, input: &InputSample) {
        let before = self.mode.kind();
        let mode = core::mem::take(&mut self.mode);
        self.mode = match mode {
            Mode::PasswordInput { entry } => modes::password_input(ctx, entry, input),
            Mode::MenuSelect { selected, latch } => modes::menu_select(ctx, selected, latch, input),
            Mode::WaterStatus => modes::water_status(ctx, input),
            Mode::DamControl { nav } => modes::dam_control(ctx, nav, input),
            Mode::DamManual { nav } => modes::dam_manual(ctx, nav, input),
            Mode::DamAuto { nav } => modes::dam_auto(ctx, nav, input),
            Mode::ThresholdSet { nav } => modes::threshold_set(ctx, nav, input),
            Mode::ThresholdInput { field, entry } => {
                modes::threshold_input(ctx, field, entry, input)
            }
            Mode::Environment => modes::environment(ctx, input),
            Mode::Clock => modes::clock(ctx, input),
            Mode::PasswordChange { entry } => modes::password_change(ctx, entry, input),
            Mode::Log { nav } => modes::log_screen(ctx, nav, input),
        };
        let after = self.mode.kind();
        if before != after {
            info!("mode: {before:?} -> {after:?}");
        }
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}
