//=========================================================================
// Device Registry
//=========================================================================
//
// Name -> device lookup plus a single place to poll every device.
//
// Entries are weak: dropping the owning handle unregisters the device
// on the next prune.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::device::{DeviceHandle, InputDevice};
use crate::core::frame::FrameContext;
use crate::error::{InputError, Result};

//=== DeviceRegistry ======================================================

#[derive(Default)]
pub struct DeviceRegistry {
    devices: HashMap<String, Weak<RefCell<dyn InputDevice>>>,
    order: Vec<String>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device under its id.
    ///
    /// A name held by a dropped device is reclaimed; a live one is an error.
    pub fn register(&mut self, device: &DeviceHandle) -> Result<()> {
        let name = device
            .try_borrow()
            .map(|d| d.id().to_owned())
            .map_err(|_| InputError::DeviceBusy)?;

        if self.devices.get(&name).is_some_and(|weak| weak.strong_count() > 0) {
            return Err(InputError::DuplicateDevice { name });
        }

        debug!(target: "input", "registered device '{}'", name);
        if !self.order.contains(&name) {
            self.order.push(name.clone());
        }
        self.devices.insert(name, Rc::downgrade(device));
        Ok(())
    }

    /// Removes a device by name. Returns `true` if it was present.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.order.retain(|n| n != name);
        self.devices.remove(name).is_some()
    }

    /// Looks up a live device.
    pub fn get(&self, name: &str) -> Option<DeviceHandle> {
        self.devices.get(name)?.upgrade()
    }

    /// Like [`get`](Self::get) but reports a missing device as an error.
    pub fn require(&self, name: &str) -> Result<DeviceHandle> {
        self.get(name)
            .ok_or_else(|| InputError::UnknownDevice { name: name.to_owned() })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names of live devices in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order
            .iter()
            .filter(|name| self.contains(name))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Polls every live device in registration order, then drops entries
    /// whose device is gone.
    pub fn update_all(&mut self, ctx: &FrameContext) {
        for name in &self.order {
            let Some(device) = self.devices.get(name).and_then(Weak::upgrade) else {
                continue;
            };
            match device.try_borrow_mut() {
                Ok(mut device) => device.update(ctx),
                Err(_) => warn!(target: "input", "device '{}' busy, skipped poll", name),
            };
        }
        self.prune();
    }

    /// Removes entries whose device has been dropped.
    pub fn prune(&mut self) {
        let devices = &mut self.devices;
        devices.retain(|name, weak| {
            let alive = weak.strong_count() > 0;
            if !alive {
                debug!(target: "input", "device '{}' dropped, unregistering", name);
            }
            alive
        });
        self.order.retain(|name| devices.contains_key(name));
    }
}

impl fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("devices", &self.order)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
