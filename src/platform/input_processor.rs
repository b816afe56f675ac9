//=========================================================================
// Input Processor
//=========================================================================
//
// Converts winit window events into portable InputEvents.
//
// Architecture:
//   winit WindowEvent → InputProcessor → InputEvent → RawInputState
//
// Unmapped keys (F-keys, numpad, media keys) and key repeats are
// filtered out.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;
use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, WindowEvent},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

/// Converts winit events to InputEvents and remembers the modifier state.
#[derive(Debug, Default)]
pub struct InputProcessor {
    current_modifiers: Modifiers,
}

impl InputProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_modifiers(&self) -> Modifiers {
        self.current_modifiers
    }

    /// Converts one window event. Events unrelated to input yield `None`.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::ModifiersChanged(state) => Some(self.update_modifiers(state.state())),
            WindowEvent::CursorMoved { position, .. } => {
                Some(self.process_mouse_move(position.x, position.y))
            }
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                let converted = self.process_key_event(key_event);
                if converted.is_none() {
                    trace!(target: "input", "unmapped key ignored: {:?}", key_event.physical_key);
                }
                converted
            }
            WindowEvent::MouseInput { state, button, .. } => {
                Some(self.process_mouse_button(*button, *state))
            }
            WindowEvent::Focused(false) => Some(InputEvent::FocusLost),
            _ => None,
        }
    }

    //--- Event Processing -------------------------------------------------

    /// Caches the modifier state and reports it as an event.
    pub fn update_modifiers(&mut self, state: ModifiersState) -> InputEvent {
        self.current_modifiers = Modifiers::from(state);
        InputEvent::ModifiersChanged(self.current_modifiers)
    }

    /// Converts a key event, dropping repeats and unmapped keys.
    pub fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        if key_event.repeat {
            return None;
        }
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return None;
        };
        let key = KeyCode::try_from(code).ok()?;
        Some(self.process_key(key, key_event.state))
    }

    pub fn process_key(&self, key: KeyCode, state: ElementState) -> InputEvent {
        match state {
            ElementState::Pressed => InputEvent::KeyDown { key },
            ElementState::Released => InputEvent::KeyUp { key },
        }
    }

    pub fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = MouseButton::from(button);
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button },
            ElementState::Released => InputEvent::MouseButtonUp { button },
        }
    }

    pub fn process_mouse_move(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

/// Winit normalizes platform keys (macOS Cmd → Ctrl, Option → Alt).
impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Keys without a portable counterpart are rejected with the original code.
impl TryFrom<WinitKeyCode> for KeyCode {
    type Error = WinitKeyCode;

    fn try_from(code: WinitKeyCode) -> Result<Self, Self::Error> {
        use WinitKeyCode as W;
        let key = match code {
            //--- Digits -------------------------------------------------------
            W::Digit0 => KeyCode::Digit0,
            W::Digit1 => KeyCode::Digit1,
            W::Digit2 => KeyCode::Digit2,
            W::Digit3 => KeyCode::Digit3,
            W::Digit4 => KeyCode::Digit4,
            W::Digit5 => KeyCode::Digit5,
            W::Digit6 => KeyCode::Digit6,
            W::Digit7 => KeyCode::Digit7,
            W::Digit8 => KeyCode::Digit8,
            W::Digit9 => KeyCode::Digit9,

            //--- Letters ------------------------------------------------------
            W::KeyA => KeyCode::KeyA,
            W::KeyB => KeyCode::KeyB,
            W::KeyC => KeyCode::KeyC,
            W::KeyD => KeyCode::KeyD,
            W::KeyE => KeyCode::KeyE,
            W::KeyF => KeyCode::KeyF,
            W::KeyG => KeyCode::KeyG,
            W::KeyH => KeyCode::KeyH,
            W::KeyI => KeyCode::KeyI,
            W::KeyJ => KeyCode::KeyJ,
            W::KeyK => KeyCode::KeyK,
            W::KeyL => KeyCode::KeyL,
            W::KeyM => KeyCode::KeyM,
            W::KeyN => KeyCode::KeyN,
            W::KeyO => KeyCode::KeyO,
            W::KeyP => KeyCode::KeyP,
            W::KeyQ => KeyCode::KeyQ,
            W::KeyR => KeyCode::KeyR,
            W::KeyS => KeyCode::KeyS,
            W::KeyT => KeyCode::KeyT,
            W::KeyU => KeyCode::KeyU,
            W::KeyV => KeyCode::KeyV,
            W::KeyW => KeyCode::KeyW,
            W::KeyX => KeyCode::KeyX,
            W::KeyY => KeyCode::KeyY,
            W::KeyZ => KeyCode::KeyZ,

            //--- Arrows -------------------------------------------------------
            W::ArrowUp => KeyCode::ArrowUp,
            W::ArrowDown => KeyCode::ArrowDown,
            W::ArrowLeft => KeyCode::ArrowLeft,
            W::ArrowRight => KeyCode::ArrowRight,

            //--- Modifiers ----------------------------------------------------
            W::ShiftLeft => KeyCode::ShiftLeft,
            W::ShiftRight => KeyCode::ShiftRight,
            W::ControlLeft => KeyCode::ControlLeft,
            W::ControlRight => KeyCode::ControlRight,
            W::AltLeft => KeyCode::AltLeft,
            W::AltRight => KeyCode::AltRight,

            //--- Special ------------------------------------------------------
            W::Space => KeyCode::Space,
            W::Enter => KeyCode::Enter,
            W::Escape => KeyCode::Escape,
            W::Tab => KeyCode::Tab,
            W::Backspace => KeyCode::Backspace,
            W::Delete => KeyCode::Delete,

            other => return Err(other),
        };
        Ok(key)
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Back,
            WinitMouseButton::Forward => MouseButton::Forward,
            WinitMouseButton::Other(index) => MouseButton::Other(index),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
