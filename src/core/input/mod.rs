//=========================================================================
// Input System
//
// Signature-based input: raw sources are wrapped in signatures, grouped
// into devices, and read back by id with neutral defaults.
//
// Responsibilities:
// - Button edge tracking (Down/Held/Released) per frame phase
// - Tap/hold classification against a configurable duration
// - Dead-zone shaping for single and dual axes
// - Device lookup and arbitration across several devices
//
// Notes:
// Nothing here polls on its own. The host loop calls `update` on a
// `DeviceRegistry` (or on devices directly) once per frame phase.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod arbitrator;
pub mod button;
pub mod deadzone;
pub mod device;
pub mod registry;
pub mod signature;

//=== Public API ==========================================================

pub use arbitrator::{any_input_predicate, DevicePredicate, MultiInputDevice};
pub use button::{ButtonPress, ButtonState};
pub use deadzone::{cutoff_axis, cutoff_dual_axis, cutoff_radial, AxisConsideration, DeadZoneCutoff};
pub use device::{device_handle, DeviceHandle, GenericInputDevice, InputDevice};
pub use registry::DeviceRegistry;
pub use signature::{
    AxisButtonSignature, AxisSettings, AxisSignature, ButtonSignature, ButtonTracker,
    CursorSignature, DelegatedAxisSignature, DelegatedButtonSignature, DelegatedCursorSignature,
    DelegatedDualAxisSignature, DualAxisSettings, DualAxisSignature, InputSignature,
};
