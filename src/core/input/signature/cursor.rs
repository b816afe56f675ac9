//=========================================================================
// Cursor Signature
//=========================================================================
//
// Pointer position with per-poll movement delta, tracked per phase.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use kurbo::{Point, Vec2};

//=== Internal Dependencies ===============================================

use super::{CursorSignature, InputSignature};
use crate::core::frame::{FrameContext, FramePhase};

//=== DelegatedCursorSignature ============================================

/// Cursor driven by a position source.
///
/// The first poll reports a zero delta rather than a jump from the origin.
pub struct DelegatedCursorSignature {
    id: String,
    precedence: f32,
    source: Box<dyn Fn() -> Point>,
    position: Point,
    delta: Vec2,
    last_update: Option<Point>,
    last_fixed: Option<Point>,
}

impl DelegatedCursorSignature {
    pub fn new(id: impl Into<String>, source: impl Fn() -> Point + 'static) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            source: Box::new(source),
            position: Point::ORIGIN,
            delta: Vec2::ZERO,
            last_update: None,
            last_fixed: None,
        }
    }

    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }
}

impl InputSignature for DelegatedCursorSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn update(&mut self, ctx: &FrameContext) {
        let position = (self.source)();
        let last = match ctx.phase {
            FramePhase::Update => &mut self.last_update,
            FramePhase::FixedUpdate => &mut self.last_fixed,
        };

        self.delta = last.map_or(Vec2::ZERO, |prev| position - prev);
        *last = Some(position);
        self.position = position;
    }

    fn reset(&mut self) {
        self.delta = Vec2::ZERO;
        self.last_update = None;
        self.last_fixed = None;
    }

    fn as_cursor(&self) -> Option<&dyn CursorSignature> {
        Some(self)
    }
}

impl CursorSignature for DelegatedCursorSignature {
    fn position(&self) -> Point {
        self.position
    }

    fn delta(&self) -> Vec2 {
        self.delta
    }
}

impl fmt::Debug for DelegatedCursorSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedCursorSignature")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("delta", &self.delta)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
