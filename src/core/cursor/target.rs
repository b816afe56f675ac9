//=========================================================================
// Cursor Targets
//=========================================================================
//
// Host object handles and the rules for picking who receives an event.
//
// A raycast hit names the collider-level target plus optional coarser
// owners. Dispatch options choose one of them and a fan-out mode.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

//=== Target Trait ========================================================

/// Marker trait for host object handles (entity ids, node keys, indices).
///
/// The cursor logic never interprets a target; it only compares, hashes
/// and forwards it. Any small `Copy` handle qualifies automatically.
///
/// ```
/// use aetheric_input::core::cursor::Target;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// struct NodeId(u32);
///
/// fn takes_target<T: Target>(_: T) {}
/// takes_target(NodeId(7));
/// takes_target(42u64);
/// ```
pub trait Target: 'static + Copy + Eq + Hash + Debug {}

impl<T: 'static + Copy + Eq + Hash + Debug> Target for T {}

//=== RaycastHit ==========================================================

/// Result of a successful raycast under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RaycastHit<T> {
    /// The collider-level object that was hit.
    pub target: T,
    /// Physics body owning the collider, if any.
    pub rigidbody: Option<T>,
    /// Coarse owner used for hover continuity across sub-colliders.
    pub entity: Option<T>,
}

impl<T: Target> RaycastHit<T> {
    pub fn new(target: T) -> Self {
        Self { target, rigidbody: None, entity: None }
    }

    pub fn with_rigidbody(mut self, rigidbody: T) -> Self {
        self.rigidbody = Some(rigidbody);
        self
    }

    pub fn with_entity(mut self, entity: T) -> Self {
        self.entity = Some(entity);
        self
    }

    /// `true` when both hits belong to the same known entity.
    pub fn same_entity(&self, other: &Self) -> bool {
        self.entity.is_some() && self.entity == other.entity
    }
}

//=== Dispatch Options ====================================================

/// Which object in a hit receives the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchTargetKind {
    #[default]
    Direct,
    Rigidbody,
    Entity,
}

/// How far an event fans out from the receiving object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DispatchMode {
    /// The receiving object only.
    #[default]
    Signal,
    /// The receiving object and all of its descendants.
    Broadcast,
    /// The receiving object, then each ancestor up to the root.
    SignalUpwards,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchOptions {
    pub kind: DispatchTargetKind,
    pub mode: DispatchMode,
}

impl DispatchOptions {
    pub const fn new(kind: DispatchTargetKind, mode: DispatchMode) -> Self {
        Self { kind, mode }
    }
}

/// Picks the receiving object for `kind`, falling back to the direct
/// target when the hit has no such owner.
pub fn resolve_dispatch_target<T: Target>(hit: &RaycastHit<T>, kind: DispatchTargetKind) -> T {
    match kind {
        DispatchTargetKind::Direct => hit.target,
        DispatchTargetKind::Rigidbody => hit.rigidbody.unwrap_or(hit.target),
        DispatchTargetKind::Entity => hit.entity.unwrap_or(hit.target),
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
