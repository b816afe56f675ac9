//=========================================================================
// Frame Model
//=========================================================================
//
// Explicit frame phase and timestamp passed into every poll.
//
// Architecture:
//   FrameClock ──begin_update()──────> FrameContext { frame, 0, Update, t }
//              ──begin_fixed_update()─> FrameContext { frame, tick, FixedUpdate, t }
//                                          ↓
//                         devices / signatures / cursor logic
//
// Time is unscaled seconds since the clock started. Nothing in the crate
// reads ambient time: whoever drives the loop owns the clock.
//
// A slow frame may run several fixed ticks. Each tick gets its own
// number, so (frame, tick, phase) identifies one poll.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Instant;

//=== FramePhase ==========================================================

/// The two ordered polling phases of a logical frame.
///
/// Signatures keep separate button state per phase because a variable-rate
/// update and a fixed-rate update can disagree within the same real-time
/// window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FramePhase {
    /// Variable-rate update (once per rendered frame).
    #[default]
    Update,

    /// Fixed-rate update (simulation tick).
    FixedUpdate,
}

//=== FrameContext ========================================================

/// Snapshot of "which frame, which phase, what time" for one poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// Monotonic frame counter. Fixed updates reuse the number of the frame
    /// they run in.
    pub frame: u64,

    /// Fixed-rate tick counter, monotonic across frames. Always 0 during
    /// `Update`.
    pub tick: u64,

    /// Phase currently executing.
    pub phase: FramePhase,

    /// Unscaled seconds since start.
    pub time: f64,
}

impl FrameContext {
    /// Context for the variable-rate phase.
    pub const fn update(frame: u64, time: f64) -> Self {
        Self { frame, tick: 0, phase: FramePhase::Update, time }
    }

    /// Context for the fixed-rate phase.
    pub const fn fixed(frame: u64, time: f64) -> Self {
        Self { frame, tick: 0, phase: FramePhase::FixedUpdate, time }
    }

    /// Same context with an explicit fixed tick number.
    pub const fn with_tick(mut self, tick: u64) -> Self {
        self.tick = tick;
        self
    }

    /// Identity of this poll: repeating it must not advance any state.
    pub fn poll_key(&self) -> (FramePhase, u64, u64) {
        (self.phase, self.frame, self.tick)
    }

    /// Returns `true` during the fixed-rate phase.
    pub fn is_fixed(&self) -> bool {
        self.phase == FramePhase::FixedUpdate
    }
}

//=== FrameClock ==========================================================

/// Produces [`FrameContext`]s for a host loop.
///
/// ```
/// use aetheric_input::core::frame::{FrameClock, FramePhase};
///
/// let mut clock = FrameClock::new();
/// let ctx = clock.begin_update();
/// assert_eq!(ctx.frame, 1);
/// assert_eq!(clock.begin_fixed_update().phase, FramePhase::FixedUpdate);
/// ```
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    frame: u64,
    fixed_ticks: u64,
}

impl FrameClock {
    /// Starts the clock at frame 0, time 0.
    pub fn new() -> Self {
        Self { start: Instant::now(), frame: 0, fixed_ticks: 0 }
    }

    /// Advances to the next frame and returns its update context.
    pub fn begin_update(&mut self) -> FrameContext {
        self.frame += 1;
        FrameContext::update(self.frame, self.elapsed())
    }

    /// Starts the next fixed tick within the current frame.
    pub fn begin_fixed_update(&mut self) -> FrameContext {
        self.fixed_ticks += 1;
        FrameContext::fixed(self.frame, self.elapsed()).with_tick(self.fixed_ticks)
    }

    /// Current frame number.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Unscaled seconds since the clock was created.
    pub fn elapsed(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_advances_frame_fixed_does_not() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);

        let a = clock.begin_update();
        let fixed = clock.begin_fixed_update();
        let b = clock.begin_update();

        assert_eq!(a.frame, 1);
        assert_eq!(fixed.frame, 1);
        assert!(fixed.is_fixed());
        assert_eq!(b.frame, 2);
        assert!(!b.is_fixed());
    }

    #[test]
    fn fixed_ticks_are_distinct_within_a_frame() {
        let mut clock = FrameClock::new();
        clock.begin_update();
        let first = clock.begin_fixed_update();
        let second = clock.begin_fixed_update();

        assert_eq!(first.frame, second.frame);
        assert_ne!(first.poll_key(), second.poll_key());
        assert_eq!(clock.begin_update().tick, 0);
    }

    #[test]
    fn time_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.begin_update();
        let b = clock.begin_update();
        assert!(b.time >= a.time);
    }

    #[test]
    fn constructors_set_phase() {
        assert_eq!(FrameContext::update(3, 1.5).phase, FramePhase::Update);
        assert_eq!(FrameContext::fixed(3, 1.5).phase, FramePhase::FixedUpdate);
        assert_eq!(FramePhase::default(), FramePhase::Update);
    }
}
