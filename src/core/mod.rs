//=========================================================================
// Core
//
// Platform-independent input logic.
//
// Modules:
// - frame   frame counter, phase and timestamp handed to every poll
// - input   signatures, devices, registry and arbitration
// - cursor  pointer interaction state machine and event dispatch
//
// Notes:
// Everything in `core` is single-threaded and driven by the host's frame
// loop. Windowing concerns live in `crate::platform`.
//
//=========================================================================

pub mod cursor;
pub mod frame;
pub mod input;
