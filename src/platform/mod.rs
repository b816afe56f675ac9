//=========================================================================
// Platform Subsystem
//
// Bridges winit window events into the raw state that signature sources
// read.
//
// Architecture:
// ```text
//  winit event loop (host)
//     ↓ WindowEvent
//  InputPump
//   ├─ InputProcessor   converts winit types, tracks modifiers
//   └─ RawInputState    held keys / buttons, cursor position
//     ↓ key_source / cursor_source / ... closures
//  signatures → devices → CursorInputLogic
// ```
//
// Notes:
// The host owns the event loop and window. The pump runs on the same
// thread as the frame loop, so state is shared through `Rc<RefCell<_>>`.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod event;
pub mod input_processor;
pub mod raw_state;

//=== External Crates =====================================================

use log::trace;
use winit::event::WindowEvent;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use input_processor::InputProcessor;
pub use raw_state::{
    cursor_source, key_axis_source, key_dual_axis_source, key_source, mouse_button_source,
    RawInputState, SharedInputState,
};

//=== InputPump ===========================================================

/// Feeds window events into a shared [`RawInputState`].
#[derive(Debug)]
pub struct InputPump {
    processor: InputProcessor,
    state: SharedInputState,
}

impl InputPump {
    pub fn new() -> Self {
        Self::with_state(RawInputState::shared())
    }

    pub fn with_state(state: SharedInputState) -> Self {
        Self { processor: InputProcessor::new(), state }
    }

    /// Handle for building signature sources.
    pub fn state(&self) -> &SharedInputState {
        &self.state
    }

    /// Converts and applies one window event. Returns the portable event
    /// when the window event was input-related.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        let converted = self.processor.handle_window_event(event)?;
        self.apply(&converted);
        Some(converted)
    }

    /// Applies an already-converted event (replays, synthetic input).
    pub fn apply(&mut self, event: &InputEvent) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.apply(event),
            Err(_) => trace!(target: "input", "raw state busy, dropped {:?}", event),
        }
    }
}

impl Default for InputPump {
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
    use winit::keyboard::ModifiersState;

    #[test]
    fn window_events_reach_shared_state() {
        let mut pump = InputPump::new();
        let event = WindowEvent::ModifiersChanged(ModifiersState::ALT.into());

        assert_eq!(
            pump.handle_window_event(&event),
            Some(InputEvent::ModifiersChanged(Modifiers::ALT))
        );
        assert_eq!(pump.state().borrow().modifiers(), Modifiers::ALT);
    }

    #[test]
    fn unrelated_window_events_are_ignored() {
        let mut pump = InputPump::new();
        assert_eq!(pump.handle_window_event(&WindowEvent::CloseRequested), None);
    }

    #[test]
    fn focus_loss_releases_keys_for_sources() {
        let mut pump = InputPump::new();
        let jump = key_source(pump.state(), KeyCode::Space);

        pump.apply(&InputEvent::KeyDown { key: KeyCode::Space });
        assert!(jump());

        pump.handle_window_event(&WindowEvent::Focused(false));
        assert!(!jump());
    }
}
