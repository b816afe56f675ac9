//=========================================================================
// Multi-Device Arbitration
//=========================================================================
//
// One logical device in front of several physical ones.
//
// Architecture:
//   update(ctx)
//     1. poll every live device (registration order)
//     2. test predicate per device, in order; first match becomes current
//   reads ──delegate──> current device (defaults to the first device)
//
// The current device is sticky: if nothing matches this frame, the
// previous choice stays.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use kurbo::{Point, Vec2};
use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::button::{ButtonPress, ButtonState};
use super::device::{DeviceHandle, InputDevice};
use super::registry::DeviceRegistry;
use super::signature::InputSignature;
use crate::core::frame::{FrameContext, FramePhase};
use crate::error::Result;

//=== Predicate ===========================================================

/// Decides whether a device should become the current one this frame.
pub type DevicePredicate = Box<dyn Fn(&dyn InputDevice, &FrameContext) -> bool>;

/// Default predicate: the device saw any input this phase.
pub fn any_input_predicate(device: &dyn InputDevice, ctx: &FrameContext) -> bool {
    device.any_input_activated(ctx.phase)
}

//=== MultiInputDevice ====================================================

/// Arbitrates between devices; reads go to whichever matched last.
///
/// Holds weak references only. Devices that have been dropped are skipped
/// and read as neutral if they were current.
pub struct MultiInputDevice {
    id: String,
    active: bool,
    devices: Vec<Weak<RefCell<dyn InputDevice>>>,
    current: Option<usize>,
    predicate: DevicePredicate,
}

impl MultiInputDevice {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            active: true,
            devices: Vec::new(),
            current: None,
            predicate: Box::new(any_input_predicate),
        }
    }

    /// Builds an arbitrator over devices looked up by name.
    pub fn from_registry(id: impl Into<String>, registry: &DeviceRegistry, names: &[&str]) -> Result<Self> {
        let mut multi = Self::new(id);
        for name in names {
            let handle = registry.require(name)?;
            multi.add_device(&handle);
        }
        Ok(multi)
    }

    pub fn with_predicate(
        mut self,
        predicate: impl Fn(&dyn InputDevice, &FrameContext) -> bool + 'static,
    ) -> Self {
        self.predicate = Box::new(predicate);
        self
    }

    pub fn with_device(mut self, device: &DeviceHandle) -> Self {
        self.add_device(device);
        self
    }

    pub fn add_device(&mut self, device: &DeviceHandle) {
        self.devices.push(Rc::downgrade(device));
    }

    /// Removes a device by id. Returns `true` if one was removed.
    pub fn remove_device(&mut self, id: &str) -> bool {
        let before = self.devices.len();
        let current = self.current_device();
        self.devices.retain(|weak| match weak.upgrade() {
            Some(device) => device.try_borrow().map_or(true, |d| d.id() != id),
            None => true,
        });

        // Re-anchor the current index on the same device if it survived.
        self.current = current.and_then(|cur| {
            self.devices
                .iter()
                .position(|weak| weak.upgrade().is_some_and(|d| Rc::ptr_eq(&d, &cur)))
        });
        self.devices.len() != before
    }

    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// The device reads currently delegate to.
    ///
    /// Falls back to the first device until a predicate has matched.
    pub fn current_device(&self) -> Option<DeviceHandle> {
        self.devices.get(self.current.unwrap_or(0))?.upgrade()
    }

    /// Id of the current device.
    pub fn current_device_id(&self) -> Option<String> {
        let device = self.current_device()?;
        let id = device.try_borrow().ok()?.id().to_owned();
        Some(id)
    }

    //--- Internal Helpers -------------------------------------------------

    fn read<R>(&self, neutral: R, f: impl FnOnce(&dyn InputDevice) -> R) -> R {
        if !self.active {
            return neutral;
        }
        let Some(device) = self.current_device() else {
            return neutral;
        };
        let result = match device.try_borrow() {
            Ok(device) => f(&*device),
            Err(_) => neutral,
        };
        result
    }
}

impl InputDevice for MultiInputDevice {
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
        // Every device polls before any predicate runs.
        for weak in &self.devices {
            let Some(device) = weak.upgrade() else { continue };
            match device.try_borrow_mut() {
                Ok(mut device) => device.update(ctx),
                Err(_) => warn!(target: "input", "{}: child device busy, skipped poll", self.id),
            };
        }

        for (i, weak) in self.devices.iter().enumerate() {
            let Some(device) = weak.upgrade() else { continue };
            let Ok(device) = device.try_borrow() else { continue };
            if (self.predicate)(&*device, ctx) {
                if self.current != Some(i) {
                    debug!(target: "input", "{}: current device -> {}", self.id, device.id());
                }
                self.current = Some(i);
                break;
            }
        }
    }

    /// Signatures live behind a `RefCell` in the child device and cannot be
    /// borrowed out; use the read accessors instead.
    fn signature(&self, _id: &str) -> Option<&dyn InputSignature> {
        None
    }

    fn signature_mut(&mut self, _id: &str) -> Option<&mut dyn InputSignature> {
        None
    }

    fn any_input_activated(&self, phase: FramePhase) -> bool {
        self.read(false, |d| d.any_input_activated(phase))
    }

    fn button_state(&self, id: &str, phase: FramePhase) -> ButtonState {
        self.read(ButtonState::None, |d| d.button_state(id, phase))
    }

    fn consume_button_state(&mut self, id: &str, phase: FramePhase) -> ButtonState {
        if !self.active {
            return ButtonState::None;
        }
        let Some(device) = self.current_device() else {
            return ButtonState::None;
        };
        let state = match device.try_borrow_mut() {
            Ok(mut device) => device.consume_button_state(id, phase),
            Err(_) => ButtonState::None,
        };
        state
    }

    fn button_press(&self, id: &str, duration: f64, ctx: &FrameContext) -> ButtonPress {
        self.read(ButtonPress::None, |d| d.button_press(id, duration, ctx))
    }

    fn axis_state(&self, id: &str) -> f64 {
        self.read(0.0, |d| d.axis_state(id))
    }

    fn dual_axis_state(&self, id: &str) -> Vec2 {
        self.read(Vec2::ZERO, |d| d.dual_axis_state(id))
    }

    fn cursor_state(&self, id: &str) -> Point {
        self.read(Point::ORIGIN, |d| d.cursor_state(id))
    }

    fn cursor_delta(&self, id: &str) -> Vec2 {
        self.read(Vec2::ZERO, |d| d.cursor_delta(id))
    }
}

impl fmt::Debug for MultiInputDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiInputDevice")
            .field("id", &self.id)
            .field("active", &self.active)
            .field("devices", &self.devices.len())
            .field("current", &self.current)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
