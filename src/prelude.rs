//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use aetheric_input::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Frame model
pub use crate::core::frame::{FrameClock, FrameContext, FramePhase};

// Signatures and devices
pub use crate::core::input::{
    device_handle, AxisButtonSignature, AxisConsideration, AxisSettings, ButtonPress, ButtonState,
    DeadZoneCutoff, DelegatedAxisSignature, DelegatedButtonSignature, DelegatedCursorSignature,
    DelegatedDualAxisSignature, DeviceHandle, DeviceRegistry, DualAxisSettings, GenericInputDevice,
    InputDevice, InputSignature, MultiInputDevice,
};

// Cursor interaction
pub use crate::core::cursor::{
    ChannelDispatcher, CursorEventKind, CursorHandler, CursorInputLogic, CursorInputResolver,
    CursorInputSettings, CursorLogicPool, CursorMessage, DeviceCursorResolver, DispatchMode,
    DispatchOptions, DispatchTargetKind, HierarchyDispatcher, ManualCursorResolver,
    MessageDispatcher, RaycastHit, Target,
};

// Platform
pub use crate::platform::{
    cursor_source, key_axis_source, key_dual_axis_source, key_source, mouse_button_source,
    InputEvent, InputPump, KeyCode, Modifiers, MouseButton, RawInputState,
};

// Errors
pub use crate::error::InputError;
