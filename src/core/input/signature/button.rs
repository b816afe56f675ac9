//=========================================================================
// Button Signatures
//=========================================================================
//
// Button-like signatures built on a shared per-phase tracker.
//
// Architecture:
//   source() -> bool ──ButtonTracker::poll(ctx)──> ButtonState (per phase)
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use log::trace;

//=== Internal Dependencies ===============================================

use super::{ButtonSignature, InputSignature};
use crate::core::frame::{FrameContext, FramePhase};
use crate::core::input::button::ButtonState;
use crate::core::input::deadzone::AxisConsideration;

//=== ButtonTracker =======================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PhaseState {
    state: ButtonState,
    last_down: Option<f64>,
    last_release: Option<f64>,
}

impl PhaseState {
    fn poll(&mut self, active: bool, time: f64) {
        self.state = self.state.next(active);
        match self.state {
            ButtonState::Down => self.last_down = Some(time),
            ButtonState::Released => self.last_release = Some(time),
            _ => {}
        }
    }
}

/// Button automaton with independent Update and FixedUpdate tracks.
///
/// Reusable by any signature that reduces its raw input to "active or not".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ButtonTracker {
    update: PhaseState,
    fixed: PhaseState,
}

impl ButtonTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the track for `ctx.phase` with the raw sample.
    pub fn poll(&mut self, active: bool, ctx: &FrameContext) {
        self.track_mut(ctx.phase).poll(active, ctx.time);
    }

    pub fn state(&self, phase: FramePhase) -> ButtonState {
        self.track(phase).state
    }

    pub fn consume(&mut self, phase: FramePhase) {
        let track = self.track_mut(phase);
        track.state = track.state.consume();
    }

    pub fn last_down_time(&self, phase: FramePhase) -> Option<f64> {
        self.track(phase).last_down
    }

    pub fn last_release_time(&self, phase: FramePhase) -> Option<f64> {
        self.track(phase).last_release
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn track(&self, phase: FramePhase) -> &PhaseState {
        match phase {
            FramePhase::Update => &self.update,
            FramePhase::FixedUpdate => &self.fixed,
        }
    }

    fn track_mut(&mut self, phase: FramePhase) -> &mut PhaseState {
        match phase {
            FramePhase::Update => &mut self.update,
            FramePhase::FixedUpdate => &mut self.fixed,
        }
    }
}

//=== DelegatedButtonSignature ============================================

/// Button driven by a boolean source (key, mouse button, gamepad button).
pub struct DelegatedButtonSignature {
    id: String,
    precedence: f32,
    source: Box<dyn Fn() -> bool>,
    tracker: ButtonTracker,
}

impl DelegatedButtonSignature {
    pub fn new(id: impl Into<String>, source: impl Fn() -> bool + 'static) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            source: Box::new(source),
            tracker: ButtonTracker::new(),
        }
    }

    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }
}

impl InputSignature for DelegatedButtonSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn update(&mut self, ctx: &FrameContext) {
        let active = (self.source)();
        self.tracker.poll(active, ctx);
        trace!(target: "input", "{} -> {:?}", self.id, self.tracker.state(ctx.phase));
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }

    fn as_button(&self) -> Option<&dyn ButtonSignature> {
        Some(self)
    }

    fn as_button_mut(&mut self) -> Option<&mut dyn ButtonSignature> {
        Some(self)
    }
}

impl ButtonSignature for DelegatedButtonSignature {
    fn state(&self, phase: FramePhase) -> ButtonState {
        self.tracker.state(phase)
    }

    fn consume(&mut self, phase: FramePhase) {
        self.tracker.consume(phase);
    }

    fn last_down_time(&self, phase: FramePhase) -> Option<f64> {
        self.tracker.last_down_time(phase)
    }

    fn last_release_time(&self, phase: FramePhase) -> Option<f64> {
        self.tracker.last_release_time(phase)
    }
}

impl fmt::Debug for DelegatedButtonSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedButtonSignature")
            .field("id", &self.id)
            .field("precedence", &self.precedence)
            .field("tracker", &self.tracker)
            .finish()
    }
}

//=== AxisButtonSignature =================================================

/// Button driven by an analog axis crossing a threshold.
///
/// Useful for triggers and for treating stick directions as buttons.
pub struct AxisButtonSignature {
    id: String,
    precedence: f32,
    source: Box<dyn Fn() -> f64>,
    consideration: AxisConsideration,
    threshold: f64,
    tracker: ButtonTracker,
}

impl AxisButtonSignature {
    /// Default activation threshold.
    pub const DEFAULT_THRESHOLD: f64 = 0.5;

    pub fn new(id: impl Into<String>, source: impl Fn() -> f64 + 'static) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            source: Box::new(source),
            consideration: AxisConsideration::Positive,
            threshold: Self::DEFAULT_THRESHOLD,
            tracker: ButtonTracker::new(),
        }
    }

    pub fn with_consideration(mut self, consideration: AxisConsideration) -> Self {
        self.consideration = consideration;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }
}

impl InputSignature for AxisButtonSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn update(&mut self, ctx: &FrameContext) {
        let active = self.consideration.test((self.source)(), self.threshold);
        self.tracker.poll(active, ctx);
    }

    fn reset(&mut self) {
        self.tracker.reset();
    }

    fn as_button(&self) -> Option<&dyn ButtonSignature> {
        Some(self)
    }

    fn as_button_mut(&mut self) -> Option<&mut dyn ButtonSignature> {
        Some(self)
    }
}

impl ButtonSignature for AxisButtonSignature {
    fn state(&self, phase: FramePhase) -> ButtonState {
        self.tracker.state(phase)
    }

    fn consume(&mut self, phase: FramePhase) {
        self.tracker.consume(phase);
    }

    fn last_down_time(&self, phase: FramePhase) -> Option<f64> {
        self.tracker.last_down_time(phase)
    }

    fn last_release_time(&self, phase: FramePhase) -> Option<f64> {
        self.tracker.last_release_time(phase)
    }
}

impl fmt::Debug for AxisButtonSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxisButtonSignature")
            .field("id", &self.id)
            .field("consideration", &self.consideration)
            .field("threshold", &self.threshold)
            .field("tracker", &self.tracker)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
