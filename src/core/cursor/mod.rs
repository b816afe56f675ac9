//=========================================================================
// Cursor Interaction
//
// Turns pointer position, hover and click samples into interaction
// events delivered to scene objects.
//
// Responsibilities:
// - Hover enter/exit with entity-level continuity
// - Button down/up, click and double-click timing
// - Drag begin/end with a pixel threshold
// - Resolving and delivering events to targets
//
// Notes:
// The scene (raycasts, hierarchy, listeners) stays on the host side and
// is reached only through `CursorInputResolver`, `Raycaster`, `Hierarchy`
// and `MessageDispatcher`.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod dispatcher;
pub mod logic;
pub mod message;
pub mod pool;
pub mod resolver;
pub mod target;

//=== Public API ==========================================================

pub use dispatcher::{
    ChannelDispatcher, DispatchedMessage, FlatHierarchy, Hierarchy, HierarchyDispatcher,
    MessageDispatcher, ParentMap,
};
pub use logic::{CursorInputLogic, CursorInputLogicBuilder, CursorInputSettings, CursorSession};
pub use message::{CursorEventKind, CursorHandler, CursorMessage};
pub use pool::{CursorLogicHandle, CursorLogicPool};
pub use resolver::{CursorInputResolver, DeviceCursorResolver, ManualCursorResolver, Raycaster};
pub use target::{
    resolve_dispatch_target, DispatchMode, DispatchOptions, DispatchTargetKind, RaycastHit, Target,
};
