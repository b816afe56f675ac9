//=========================================================================
// Cursor Resolvers
//=========================================================================
//
// Strategies that tell the cursor logic where the pointer is, what it is
// over, and whether the click button is down.
//
// Architecture:
//   CursorInputLogic ──per poll──> CursorInputResolver
//                                    ├─ DeviceCursorResolver  (reads an InputDevice)
//                                    └─ ManualCursorResolver  (host pushes samples)
//
// Resolvers are chosen once at configuration time.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use kurbo::Point;
use log::warn;

//=== Internal Dependencies ===============================================

use super::target::{resolve_dispatch_target, DispatchMode, DispatchOptions, RaycastHit, Target};
use crate::core::frame::{FrameContext, FramePhase};
use crate::core::input::button::ButtonState;
use crate::core::input::device::{DeviceHandle, InputDevice};

//=== Raycaster ===========================================================

/// Scene query answering "what is under this screen point".
pub trait Raycaster<T> {
    fn raycast(&self, position: Point) -> Option<RaycastHit<T>>;
}

impl<T: Target, F: Fn(Point) -> Option<RaycastHit<T>>> Raycaster<T> for F {
    fn raycast(&self, position: Point) -> Option<RaycastHit<T>> {
        self(position)
    }
}

//=== CursorInputResolver =================================================

pub trait CursorInputResolver<T: Target> {
    fn cursor_position(&self) -> Point;

    /// `true` when something (usually UI) sits between cursor and scene.
    fn cursor_is_blocked(&self) -> bool {
        false
    }

    /// Hit under the cursor. Blocked cursors hit nothing unless
    /// `ignore_blocked` is set.
    fn raycast(&self, ignore_blocked: bool) -> Option<RaycastHit<T>>;

    /// Raw click button level this poll.
    fn is_click_pressed(&self) -> bool;

    /// Next click button state given the state from the previous poll.
    fn click_button_state(&self, previous: ButtonState, _ctx: &FrameContext) -> ButtonState {
        previous.next(self.is_click_pressed())
    }

    /// Receiver and fan-out mode for an event about `hit`.
    fn dispatch_target(&self, hit: &RaycastHit<T>, options: DispatchOptions) -> (T, DispatchMode) {
        (resolve_dispatch_target(hit, options.kind), options.mode)
    }

    /// `true` once the cursor has moved strictly more than `threshold`
    /// pixels from `origin`.
    fn test_begin_drag(&self, origin: Point, threshold: f64) -> bool {
        self.cursor_position().distance(origin) > threshold
    }
}

/// Shared resolvers: the host keeps a handle to push samples while the
/// cursor logic polls a clone. A resolver borrowed elsewhere reads neutral.
impl<T: Target, R: CursorInputResolver<T> + ?Sized> CursorInputResolver<T> for Rc<RefCell<R>> {
    fn cursor_position(&self) -> Point {
        self.try_borrow().map_or(Point::ORIGIN, |r| r.cursor_position())
    }

    fn cursor_is_blocked(&self) -> bool {
        self.try_borrow().map_or(false, |r| r.cursor_is_blocked())
    }

    fn raycast(&self, ignore_blocked: bool) -> Option<RaycastHit<T>> {
        self.try_borrow().ok()?.raycast(ignore_blocked)
    }

    fn is_click_pressed(&self) -> bool {
        self.try_borrow().map_or(false, |r| r.is_click_pressed())
    }

    fn click_button_state(&self, previous: ButtonState, ctx: &FrameContext) -> ButtonState {
        match self.try_borrow() {
            Ok(r) => r.click_button_state(previous, ctx),
            Err(_) => previous.next(false),
        }
    }

    fn dispatch_target(&self, hit: &RaycastHit<T>, options: DispatchOptions) -> (T, DispatchMode) {
        match self.try_borrow() {
            Ok(r) => r.dispatch_target(hit, options),
            Err(_) => (resolve_dispatch_target(hit, options.kind), options.mode),
        }
    }

    fn test_begin_drag(&self, origin: Point, threshold: f64) -> bool {
        self.try_borrow().map_or(false, |r| r.test_begin_drag(origin, threshold))
    }
}

//=== ManualCursorResolver ================================================

/// Resolver fed by the host each frame.
///
/// Handy for tests, replays and UI layers that already know what is under
/// the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualCursorResolver<T> {
    position: Point,
    pressed: bool,
    blocked: bool,
    hit: Option<RaycastHit<T>>,
}

impl<T: Target> ManualCursorResolver<T> {
    pub fn new() -> Self {
        Self { position: Point::ORIGIN, pressed: false, blocked: false, hit: None }
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn set_pressed(&mut self, pressed: bool) {
        self.pressed = pressed;
    }

    pub fn set_blocked(&mut self, blocked: bool) {
        self.blocked = blocked;
    }

    pub fn set_hit(&mut self, hit: Option<RaycastHit<T>>) {
        self.hit = hit;
    }
}

impl<T: Target> Default for ManualCursorResolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target> CursorInputResolver<T> for ManualCursorResolver<T> {
    fn cursor_position(&self) -> Point {
        self.position
    }

    fn cursor_is_blocked(&self) -> bool {
        self.blocked
    }

    fn raycast(&self, ignore_blocked: bool) -> Option<RaycastHit<T>> {
        if self.blocked && !ignore_blocked {
            return None;
        }
        self.hit
    }

    fn is_click_pressed(&self) -> bool {
        self.pressed
    }
}

//=== DeviceCursorResolver ================================================

/// Resolver that reads the cursor and click button from an input device.
///
/// The click state comes straight from the device's button signature, so
/// it follows the device's own edge tracking rather than re-deriving it.
pub struct DeviceCursorResolver<T> {
    device: Weak<RefCell<dyn InputDevice>>,
    cursor_id: String,
    button_id: String,
    raycaster: Box<dyn Raycaster<T>>,
    blocker: Option<Box<dyn Fn() -> bool>>,
}

impl<T: Target> DeviceCursorResolver<T> {
    pub fn new(
        device: &DeviceHandle,
        cursor_id: impl Into<String>,
        button_id: impl Into<String>,
        raycaster: impl Raycaster<T> + 'static,
    ) -> Self {
        Self {
            device: Rc::downgrade(device),
            cursor_id: cursor_id.into(),
            button_id: button_id.into(),
            raycaster: Box::new(raycaster),
            blocker: None,
        }
    }

    /// Source reporting whether the cursor is over blocking UI.
    pub fn with_blocker(mut self, blocker: impl Fn() -> bool + 'static) -> Self {
        self.blocker = Some(Box::new(blocker));
        self
    }

    fn read<R>(&self, neutral: R, f: impl FnOnce(&dyn InputDevice) -> R) -> R {
        let Some(device) = self.device.upgrade() else {
            return neutral;
        };
        let result = match device.try_borrow() {
            Ok(device) => f(&*device),
            Err(_) => {
                warn!(target: "cursor", "cursor device busy, reading neutral");
                neutral
            }
        };
        result
    }
}

impl<T: Target> CursorInputResolver<T> for DeviceCursorResolver<T> {
    fn cursor_position(&self) -> Point {
        self.read(Point::ORIGIN, |d| d.cursor_state(&self.cursor_id))
    }

    fn cursor_is_blocked(&self) -> bool {
        self.blocker.as_ref().is_some_and(|blocked| blocked())
    }

    fn raycast(&self, ignore_blocked: bool) -> Option<RaycastHit<T>> {
        if self.cursor_is_blocked() && !ignore_blocked {
            return None;
        }
        self.raycaster.raycast(self.cursor_position())
    }

    /// Pressed in either phase, so logics polled only from fixed ticks
    /// still see the button.
    fn is_click_pressed(&self) -> bool {
        self.read(false, |d| {
            [FramePhase::Update, FramePhase::FixedUpdate]
                .into_iter()
                .any(|phase| d.button_state(&self.button_id, phase).is_pressed())
        })
    }

    fn click_button_state(&self, _previous: ButtonState, ctx: &FrameContext) -> ButtonState {
        self.read(ButtonState::None, |d| d.button_state(&self.button_id, ctx.phase))
    }
}

impl<T> fmt::Debug for DeviceCursorResolver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCursorResolver")
            .field("cursor_id", &self.cursor_id)
            .field("button_id", &self.button_id)
            .field("device_alive", &(self.device.strong_count() > 0))
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cursor::target::DispatchTargetKind;
    use crate::core::input::device::{device_handle, GenericInputDevice};
    use crate::core::input::signature::{DelegatedButtonSignature, DelegatedCursorSignature};
    use std::cell::Cell;

    //=====================================================================
    // Provided Methods
    //=====================================================================

    #[test]
    fn drag_test_is_strictly_greater_than_threshold() {
        let mut resolver = ManualCursorResolver::<u32>::new();
        resolver.set_position(Point::new(10.0, 0.0));
        assert!(!resolver.test_begin_drag(Point::ORIGIN, 10.0));

        resolver.set_position(Point::new(9.0, 6.0));
        assert!(resolver.test_begin_drag(Point::ORIGIN, 10.0));
    }

    #[test]
    fn click_state_runs_button_automaton() {
        let mut resolver = ManualCursorResolver::<u32>::new();
        let ctx = FrameContext::update(1, 0.0);
        resolver.set_pressed(true);
        let state = resolver.click_button_state(ButtonState::None, &ctx);
        assert_eq!(state, ButtonState::Down);
        assert_eq!(resolver.click_button_state(state, &ctx), ButtonState::Held);
    }

    #[test]
    fn dispatch_target_uses_options() {
        let resolver = ManualCursorResolver::<u32>::new();
        let hit = RaycastHit::new(1).with_entity(5);
        let options = DispatchOptions::new(DispatchTargetKind::Entity, DispatchMode::Broadcast);
        assert_eq!(resolver.dispatch_target(&hit, options), (5, DispatchMode::Broadcast));
    }

    #[test]
    fn blocked_cursor_hits_nothing_unless_ignored() {
        let mut resolver = ManualCursorResolver::new();
        resolver.set_hit(Some(RaycastHit::new(3u32)));
        resolver.set_blocked(true);
        assert!(resolver.raycast(false).is_none());
        assert_eq!(resolver.raycast(true), Some(RaycastHit::new(3)));
    }

    //=====================================================================
    // Device Resolver
    //=====================================================================

    #[test]
    fn device_resolver_reads_signatures() {
        let pressed = Rc::new(Cell::new(true));
        let src = pressed.clone();
        let device = device_handle(
            GenericInputDevice::new("mouse")
                .with_signature(DelegatedCursorSignature::new("Pointer", || Point::new(20.0, 30.0)))
                .unwrap()
                .with_signature(DelegatedButtonSignature::new("Click", move || src.get()))
                .unwrap(),
        );
        let resolver = DeviceCursorResolver::new(&device, "Pointer", "Click", |p: Point| {
            (p.x > 10.0).then(|| RaycastHit::new(1u32))
        });

        let ctx = FrameContext::update(1, 0.0);
        device.borrow_mut().update(&ctx);

        assert_eq!(resolver.cursor_position(), Point::new(20.0, 30.0));
        assert_eq!(resolver.raycast(false), Some(RaycastHit::new(1)));
        assert!(resolver.is_click_pressed());
        assert_eq!(resolver.click_button_state(ButtonState::None, &ctx), ButtonState::Down);
    }

    #[test]
    fn device_resolver_click_level_follows_fixed_polls() {
        let device = device_handle(
            GenericInputDevice::new("mouse")
                .with_signature(DelegatedButtonSignature::new("Click", || true))
                .unwrap(),
        );
        let resolver = DeviceCursorResolver::new(&device, "Pointer", "Click", |_: Point| None::<RaycastHit<u32>>);
        assert!(!resolver.is_click_pressed());

        let ctx = FrameContext::fixed(1, 0.02);
        device.borrow_mut().update(&ctx);
        assert!(resolver.is_click_pressed());
        assert_eq!(resolver.click_button_state(ButtonState::None, &ctx), ButtonState::Down);
        assert_eq!(
            device.borrow().button_state("Click", FramePhase::Update),
            ButtonState::None
        );
    }

    #[test]
    fn device_resolver_blocker_and_dropped_device() {
        let device = device_handle(GenericInputDevice::new("mouse"));
        let resolver = DeviceCursorResolver::new(&device, "Pointer", "Click", |_: Point| {
            Some(RaycastHit::new(1u32))
        })
        .with_blocker(|| true);

        assert!(resolver.raycast(false).is_none());
        assert!(resolver.raycast(true).is_some());

        drop(device);
        let ctx = FrameContext::update(2, 0.1);
        assert_eq!(resolver.cursor_position(), Point::ORIGIN);
        assert_eq!(resolver.click_button_state(ButtonState::Held, &ctx), ButtonState::None);
    }

    #[test]
    fn shared_resolver_reflects_host_updates() {
        let shared = Rc::new(RefCell::new(ManualCursorResolver::<u32>::new()));
        let polled = shared.clone();
        shared.borrow_mut().set_position(Point::new(1.0, 2.0));
        assert_eq!(polled.cursor_position(), Point::new(1.0, 2.0));
    }
}
