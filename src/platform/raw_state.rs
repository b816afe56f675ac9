//=========================================================================
// Raw Input State
//=========================================================================
//
// Persistent held/position state built from InputEvents, plus source
// closures that let delegated signatures read it.
//
// Architecture:
//   InputEvent → apply() → held keys / buttons / cursor → source closures
//
// Edge detection is not done here. Signatures derive Down/Held/Released
// from the level each source reports when they are polled.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use log::trace;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== RawInputState =======================================================

/// What is held right now, as reported by the windowing layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputState {
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
    cursor: Point,
    modifiers: Modifiers,
}

/// State shared between the event pump and signature sources.
pub type SharedInputState = Rc<RefCell<RawInputState>>;

impl RawInputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a fresh state for sharing with sources.
    pub fn shared() -> SharedInputState {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Folds one event into the state.
    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::KeyDown { key } => {
                self.keys_down.insert(key);
            }
            InputEvent::KeyUp { key } => {
                self.keys_down.remove(&key);
            }
            InputEvent::MouseButtonDown { button } => {
                self.buttons_down.insert(button);
            }
            InputEvent::MouseButtonUp { button } => {
                self.buttons_down.remove(&button);
            }
            InputEvent::MouseMoved { x, y } => self.cursor = Point::new(x, y),
            InputEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers,
            InputEvent::FocusLost => {
                trace!(target: "input", "focus lost, releasing {} keys", self.keys_down.len());
                self.release_all();
            }
        }
    }

    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a InputEvent>) {
        for event in events {
            self.apply(event);
        }
    }

    /// Releases every key and button. The cursor stays where it was.
    pub fn release_all(&mut self) {
        self.keys_down.clear();
        self.buttons_down.clear();
        self.modifiers = Modifiers::NONE;
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn cursor_position(&self) -> Point {
        self.cursor
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn keys_down(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_down.iter()
    }
}

//=== Signature Sources ===================================================

/// Level of `key`, for a delegated button signature.
pub fn key_source(state: &SharedInputState, key: KeyCode) -> impl Fn() -> bool + 'static {
    let state = Rc::clone(state);
    move || state.try_borrow().is_ok_and(|s| s.is_key_down(key))
}

/// Level of a mouse button, for a delegated button signature.
pub fn mouse_button_source(state: &SharedInputState, button: MouseButton) -> impl Fn() -> bool + 'static {
    let state = Rc::clone(state);
    move || state.try_borrow().is_ok_and(|s| s.is_button_down(button))
}

/// Cursor position, for a delegated cursor signature.
pub fn cursor_source(state: &SharedInputState) -> impl Fn() -> Point + 'static {
    let state = Rc::clone(state);
    move || state.try_borrow().map_or(Point::ORIGIN, |s| s.cursor_position())
}

/// Virtual axis from two keys: -1, 0 or +1. Both held cancel out.
pub fn key_axis_source(
    state: &SharedInputState,
    negative: KeyCode,
    positive: KeyCode,
) -> impl Fn() -> f64 + 'static {
    let state = Rc::clone(state);
    move || {
        state.try_borrow().map_or(0.0, |s| {
            let neg = if s.is_key_down(negative) { 1.0 } else { 0.0 };
            let pos = if s.is_key_down(positive) { 1.0 } else { 0.0 };
            pos - neg
        })
    }
}

/// Virtual stick from four keys. Y grows upward.
///
/// Diagonals come out with length √2; the dual-axis unit clamp folds them
/// back onto the circle.
pub fn key_dual_axis_source(
    state: &SharedInputState,
    left: KeyCode,
    right: KeyCode,
    down: KeyCode,
    up: KeyCode,
) -> impl Fn() -> Vec2 + 'static {
    let x = key_axis_source(state, left, right);
    let y = key_axis_source(state, down, up);
    move || Vec2::new(x(), y())
}

//=========================================================================
// Unit Tests
//=========================================================================
