//=========================================================================
// Aetheric Input — Library Root
//
// Frame-polled input for the Aetheric Engine.
//
// Responsibilities:
// - Turn raw key/button/axis/pointer samples into per-frame states
// - Group channels into devices and arbitrate between devices
// - Derive hover, click, double-click and drag events for cursors
//
// Typical usage:
// ```
// use aetheric_input::prelude::*;
//
// let raw = RawInputState::shared();
// let keyboard = device_handle(
//     GenericInputDevice::new("keyboard")
//         .with_signature(DelegatedButtonSignature::new("Jump", key_source(&raw, KeyCode::Space)))
//         .unwrap(),
// );
//
// let mut registry = DeviceRegistry::new();
// registry.register(&keyboard).unwrap();
//
// let mut clock = FrameClock::new();
// raw.borrow_mut().apply(&InputEvent::KeyDown { key: KeyCode::Space });
// registry.update_all(&clock.begin_update());
//
// let state = keyboard.borrow().button_state("Jump", FramePhase::Update);
// assert_eq!(state, ButtonState::Down);
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent logic: frame model, signatures,
// devices and cursor interaction.
//
// `platform` converts winit events and exposes raw-state sources for
// delegated signatures.
//
pub mod core;
pub mod error;
pub mod platform;
pub mod prelude;

//--- Public Exports ------------------------------------------------------

pub use error::{InputError, Result};
