//=========================================================================
// Input Device
//=========================================================================
//
// A named collection of signatures polled once per frame phase.
//
// Architecture:
//   host loop ──update(ctx)──> InputDevice ──poll──> signatures (by precedence)
//                                   ↑
//   readers ──button_state(id)──────┘   (neutral default when missing)
//
// Polling is idempotent per (frame, tick, phase): a device reachable from
// both the registry and an arbitrator only advances once per poll, while
// every fixed tick of a slow frame still advances it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use kurbo::{Point, Vec2};
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::button::{ButtonPress, ButtonState};
use super::signature::InputSignature;
use crate::core::frame::{FrameContext, FramePhase};
use crate::error::{InputError, Result};

//=== DeviceHandle ========================================================

/// Shared handle to a device. The creating component owns the strong
/// reference; registries and arbitrators keep weak ones.
pub type DeviceHandle = Rc<RefCell<dyn InputDevice>>;

/// Wraps a concrete device into a [`DeviceHandle`].
pub fn device_handle<D: InputDevice + 'static>(device: D) -> DeviceHandle {
    Rc::new(RefCell::new(device))
}

//=== InputDevice =========================================================

/// A source of named input channels.
///
/// Every read accessor returns a neutral value (`ButtonState::None`, `0.0`,
/// zero vector) when the device is inactive or the id is unknown.
pub trait InputDevice {
    /// Device name used for registry lookup.
    fn id(&self) -> &str;

    fn is_active(&self) -> bool;

    /// Inactive devices keep polling but report neutral values.
    fn set_active(&mut self, active: bool);

    /// Polls every signature for `ctx.phase`.
    fn update(&mut self, ctx: &FrameContext);

    /// Looks up a signature by id.
    fn signature(&self, id: &str) -> Option<&dyn InputSignature>;

    fn signature_mut(&mut self, id: &str) -> Option<&mut dyn InputSignature>;

    /// Returns `true` when any button is pressed or any analog input is
    /// off-center this phase.
    fn any_input_activated(&self, phase: FramePhase) -> bool;

    //--- Read Accessors ---------------------------------------------------

    fn button_state(&self, id: &str, phase: FramePhase) -> ButtonState {
        if !self.is_active() {
            return ButtonState::None;
        }
        self.signature(id)
            .and_then(|s| s.as_button())
            .map_or(ButtonState::None, |b| b.state(phase))
    }

    /// Returns the current state, then consumes its edge.
    fn consume_button_state(&mut self, id: &str, phase: FramePhase) -> ButtonState {
        if !self.is_active() {
            return ButtonState::None;
        }
        match self.signature_mut(id).and_then(|s| s.as_button_mut()) {
            Some(button) => {
                let state = button.state(phase);
                button.consume(phase);
                state
            }
            None => ButtonState::None,
        }
    }

    fn button_press(&self, id: &str, duration: f64, ctx: &FrameContext) -> ButtonPress {
        if !self.is_active() {
            return ButtonPress::None;
        }
        self.signature(id)
            .and_then(|s| s.as_button())
            .map_or(ButtonPress::None, |b| b.press_state(duration, ctx))
    }

    fn axis_state(&self, id: &str) -> f64 {
        if !self.is_active() {
            return 0.0;
        }
        self.signature(id)
            .and_then(|s| s.as_axis())
            .map_or(0.0, |a| a.value())
    }

    fn dual_axis_state(&self, id: &str) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        self.signature(id)
            .and_then(|s| s.as_dual_axis())
            .map_or(Vec2::ZERO, |a| a.value())
    }

    fn cursor_state(&self, id: &str) -> Point {
        if !self.is_active() {
            return Point::ORIGIN;
        }
        self.signature(id)
            .and_then(|s| s.as_cursor())
            .map_or(Point::ORIGIN, |c| c.position())
    }

    fn cursor_delta(&self, id: &str) -> Vec2 {
        if !self.is_active() {
            return Vec2::ZERO;
        }
        self.signature(id)
            .and_then(|s| s.as_cursor())
            .map_or(Vec2::ZERO, |c| c.delta())
    }
}

//=== GenericInputDevice ==================================================

/// Device assembled from arbitrary signatures.
///
/// ```
/// use aetheric_input::core::frame::{FrameContext, FramePhase};
/// use aetheric_input::core::input::{ButtonState, DelegatedButtonSignature, GenericInputDevice, InputDevice};
///
/// let mut pad = GenericInputDevice::new("pad");
/// pad.add_signature(DelegatedButtonSignature::new("Jump", || true)).unwrap();
///
/// pad.update(&FrameContext::update(1, 0.0));
/// assert_eq!(pad.button_state("Jump", FramePhase::Update), ButtonState::Down);
/// assert_eq!(pad.button_state("Missing", FramePhase::Update), ButtonState::None);
/// ```
pub struct GenericInputDevice {
    id: String,
    active: bool,
    signatures: Vec<Box<dyn InputSignature>>,
    index: HashMap<String, usize>,
    last_poll: Option<(FramePhase, u64, u64)>,
    last_fixed_poll: Option<(FramePhase, u64, u64)>,
}

impl GenericInputDevice {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            signatures: Vec::new(),
            index: HashMap::new(),
            last_poll: None,
            last_fixed_poll: None,
        }
    }

    //--- Configuration ----------------------------------------------------

    /// Adds a signature. Fails if the id is already taken.
    pub fn add_signature<S: InputSignature + 'static>(&mut self, signature: S) -> Result<()> {
        self.add_boxed(Box::new(signature))
    }

    /// Chaining form of [`add_signature`](Self::add_signature).
    pub fn with_signature<S: InputSignature + 'static>(mut self, signature: S) -> Result<Self> {
        self.add_signature(signature)?;
        Ok(self)
    }

    pub fn add_boxed(&mut self, signature: Box<dyn InputSignature>) -> Result<()> {
        if self.index.contains_key(signature.id()) {
            return Err(InputError::DuplicateSignature {
                device: self.id.clone(),
                id: signature.id().to_owned(),
            });
        }

        debug!(target: "input", "{}: added signature '{}'", self.id, signature.id());
        self.signatures.push(signature);
        // Stable sort keeps insertion order among equal precedence.
        self.signatures
            .sort_by(|a, b| a.precedence().total_cmp(&b.precedence()));
        self.rebuild_index();
        Ok(())
    }

    /// Removes and returns a signature.
    pub fn remove_signature(&mut self, id: &str) -> Option<Box<dyn InputSignature>> {
        let position = self.index.get(id).copied()?;
        let removed = self.signatures.remove(position);
        self.rebuild_index();
        Some(removed)
    }

    /// Signatures in polling order.
    pub fn signatures(&self) -> impl Iterator<Item = &dyn InputSignature> {
        self.signatures.iter().map(|s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// Resets every signature to neutral.
    pub fn reset(&mut self) {
        for signature in &mut self.signatures {
            signature.reset();
        }
    }

    //--- Internal Helpers -------------------------------------------------

    fn rebuild_index(&mut self) {
        self.index = self
            .signatures
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id().to_owned(), i))
            .collect();
    }

    fn already_polled(&mut self, ctx: &FrameContext) -> bool {
        let last = match ctx.phase {
            FramePhase::Update => &mut self.last_poll,
            FramePhase::FixedUpdate => &mut self.last_fixed_poll,
        };
        let key = ctx.poll_key();
        if *last == Some(key) {
            return true;
        }
        *last = Some(key);
        false
    }
}

impl InputDevice for GenericInputDevice {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    fn update(&mut self, ctx: &FrameContext) {
        if self.already_polled(ctx) {
            trace!(target: "input", "{}: {:?} already polled", self.id, ctx.poll_key());
            return;
        }
        for signature in &mut self.signatures {
            signature.update(ctx);
        }
    }

    fn signature(&self, id: &str) -> Option<&dyn InputSignature> {
        self.index.get(id).map(|&i| self.signatures[i].as_ref())
    }

    fn signature_mut(&mut self, id: &str) -> Option<&mut dyn InputSignature> {
        let i = *self.index.get(id)?;
        Some(self.signatures[i].as_mut())
    }

    fn any_input_activated(&self, phase: FramePhase) -> bool {
        if !self.active {
            return false;
        }
        self.signatures.iter().any(|s| {
            if let Some(button) = s.as_button() {
                button.state(phase) != ButtonState::None
            } else if let Some(axis) = s.as_axis() {
                axis.value() != 0.0
            } else if let Some(dual) = s.as_dual_axis() {
                dual.value() != Vec2::ZERO
            } else {
                false
            }
        })
    }
}

impl fmt::Debug for GenericInputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<_> = self.signatures.iter().map(|s| s.id()).collect();
        f.debug_struct("GenericInputDevice")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("signatures", &ids)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
