//=========================================================================
// Input Signatures
//=========================================================================
//
// A signature is one named input channel's state machine.
//
// Architecture:
//   raw source (closure) ──update(ctx)──> signature state ──query──> reader
//
// Kinds:
//   ButtonSignature    ButtonState per phase + down/release timestamps
//   AxisSignature      dead-zoned f64
//   DualAxisSignature  dead-zoned Vec2
//   CursorSignature    Point + per-poll delta
//
// State only changes inside `update`; every query is a pure read.
//
//=========================================================================

//=== Submodules ==========================================================

mod axis;
mod button;
mod cursor;

//=== External Dependencies ===============================================

use kurbo::{Point, Vec2};

//=== Internal Dependencies ===============================================

use super::button::{ButtonPress, ButtonState};
use crate::core::frame::{FrameContext, FramePhase};

//=== Public API ==========================================================

pub use axis::{AxisSettings, DelegatedAxisSignature, DelegatedDualAxisSignature, DualAxisSettings};
pub use button::{AxisButtonSignature, ButtonTracker, DelegatedButtonSignature};
pub use cursor::DelegatedCursorSignature;

//=== InputSignature ======================================================

/// Polling contract shared by every signature kind.
///
/// Kind-specific reads go through the `as_*` accessors, which return
/// `None` unless the signature is of that kind.
pub trait InputSignature {
    /// Identifier, unique within a device.
    fn id(&self) -> &str;

    /// Ordering key when several signatures could claim the same raw input.
    /// Lower values poll first.
    fn precedence(&self) -> f32 {
        0.0
    }

    /// Polls the raw source for the given phase.
    fn update(&mut self, ctx: &FrameContext);

    /// Returns the signature to its neutral state.
    fn reset(&mut self);

    fn as_button(&self) -> Option<&dyn ButtonSignature> {
        None
    }

    fn as_button_mut(&mut self) -> Option<&mut dyn ButtonSignature> {
        None
    }

    fn as_axis(&self) -> Option<&dyn AxisSignature> {
        None
    }

    fn as_dual_axis(&self) -> Option<&dyn DualAxisSignature> {
        None
    }

    fn as_cursor(&self) -> Option<&dyn CursorSignature> {
        None
    }
}

//=== Kind Traits =========================================================

/// A button-like signature.
pub trait ButtonSignature: InputSignature {
    /// Current state for `phase`.
    fn state(&self, phase: FramePhase) -> ButtonState;

    /// Consumes the current edge for `phase` (see [`ButtonState::consume`]).
    fn consume(&mut self, phase: FramePhase);

    /// Time the button last went down during `phase`.
    fn last_down_time(&self, phase: FramePhase) -> Option<f64>;

    /// Time the button was last released during `phase`.
    fn last_release_time(&self, phase: FramePhase) -> Option<f64>;

    /// Press phase at `ctx.time` using `duration` as the tap/hold boundary.
    fn press_state(&self, duration: f64, ctx: &FrameContext) -> ButtonPress {
        ButtonPress::resolve(
            self.state(ctx.phase),
            self.last_down_time(ctx.phase),
            duration,
            ctx.time,
        )
    }
}

/// A single analog axis.
pub trait AxisSignature: InputSignature {
    fn value(&self) -> f64;
}

/// A two-dimensional analog input (stick, d-pad pair).
pub trait DualAxisSignature: InputSignature {
    fn value(&self) -> Vec2;
}

/// A pointer position.
pub trait CursorSignature: InputSignature {
    /// Position in screen space.
    fn position(&self) -> Point;

    /// Movement since the previous poll.
    fn delta(&self) -> Vec2;
}
