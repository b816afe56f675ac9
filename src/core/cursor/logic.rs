//=========================================================================
// Cursor Input Logic
//=========================================================================
//
// Per-cursor interaction state machine: turns raw hover and click
// samples into enter/exit, button, click, double-click and drag events.
//
// Architecture:
//   update(ctx)
//     1. hover:  resolver.raycast ──changed?──> Exit(prev) / Enter(new)
//     2. button: resolver.click_button_state ──ButtonPress::resolve──> branch
//          Tapped    ButtonUp, Click | DoubleClick, EndDrag?
//          Released  ButtonUp, EndDrag?
//          None      stale click reset, defensive EndDrag
//          Down      record origin, ButtonDown
//          Holding / Held  BeginDrag once past the pixel threshold
//   disable()
//     Exit(hovered), EndDrag?, session reset
//
// Notes:
// Hover changes between sub-colliders of one entity are not reported.
// A drag always ends on the target it began on.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use kurbo::Point;
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use super::dispatcher::MessageDispatcher;
use super::message::{CursorEventKind, CursorMessage};
use super::resolver::CursorInputResolver;
use super::target::{resolve_dispatch_target, DispatchMode, DispatchOptions, RaycastHit, Target};
use crate::core::frame::FrameContext;
use crate::core::input::button::{ButtonPress, ButtonState};
use crate::error::{InputError, Result};

//=== CursorInputSettings =================================================

/// Timing and dispatch configuration for one cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CursorInputSettings {
    /// Maximum gap in seconds between two taps of a double click.
    pub double_click_timeout: f64,
    /// Longest press in seconds that still counts as a tap.
    pub click_timeout: f64,
    /// Cursor travel in pixels that turns a hold into a drag.
    pub pixel_drag_threshold: f64,
    pub dispatch: DispatchOptions,
    /// Also send `Click` alongside `DoubleClick`.
    pub dispatch_click_event_always: bool,
    /// Raycast through blocking UI.
    pub ignore_blocked: bool,
}

impl CursorInputSettings {
    /// Rejects negative or non-finite durations and thresholds.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("double_click_timeout", self.double_click_timeout),
            ("click_timeout", self.click_timeout),
            ("pixel_drag_threshold", self.pixel_drag_threshold),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::InvalidSetting { name, value });
            }
        }
        Ok(())
    }
}

impl Default for CursorInputSettings {
    fn default() -> Self {
        Self {
            double_click_timeout: 0.3,
            click_timeout: 0.5,
            pixel_drag_threshold: 10.0,
            dispatch: DispatchOptions::default(),
            dispatch_click_event_always: false,
            ignore_blocked: false,
        }
    }
}

//=== CursorSession =======================================================

/// Mutable interaction state between polls.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSession<T> {
    pub hovered: Option<RaycastHit<T>>,
    pub position: Point,
    pub button_state: ButtonState,
    pub last_down_time: Option<f64>,
    pub last_up_time: Option<f64>,
    pub click_count: u32,
    /// `BeginDrag` was delivered to a target for the current press.
    pub drag_initiated: bool,
    pub last_down_position: Point,
    pub last_down_hit: Option<RaycastHit<T>>,
    drag_target: Option<(T, DispatchMode)>,
    dragging: bool,
    last_time: f64,
}

impl<T: Target> CursorSession<T> {
    /// Object currently under the cursor.
    pub fn hovered_target(&self) -> Option<T> {
        self.hovered.map(|hit| hit.target)
    }

    /// Entity owning the hovered object, if known.
    pub fn hovered_entity(&self) -> Option<T> {
        self.hovered.and_then(|hit| hit.entity)
    }

    /// `true` while the press has passed the drag threshold, whether or
    /// not anything was under the cursor to receive `BeginDrag`.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Receiver of the pending `EndDrag`, if a drag is in progress.
    pub fn drag_target(&self) -> Option<T> {
        self.drag_target.map(|(target, _)| target)
    }

    /// `true` when the last tap is older than `timeout` at `now`.
    fn click_is_stale(&self, now: f64, timeout: f64) -> bool {
        self.last_up_time.map_or(true, |up| now - up > timeout)
    }
}

impl<T> Default for CursorSession<T> {
    fn default() -> Self {
        Self {
            hovered: None,
            position: Point::ORIGIN,
            button_state: ButtonState::None,
            last_down_time: None,
            last_up_time: None,
            click_count: 0,
            drag_initiated: false,
            last_down_position: Point::ORIGIN,
            last_down_hit: None,
            drag_target: None,
            dragging: false,
            last_time: 0.0,
        }
    }
}

//=== CursorInputLogic ====================================================

/// Hover, click and drag tracking for a single cursor.
///
/// Build with [`CursorInputLogic::builder`]. Without a resolver the logic
/// stays neutral and `update` does nothing.
pub struct CursorInputLogic<T: Target> {
    id: String,
    enabled: bool,
    settings: CursorInputSettings,
    resolver: Option<Box<dyn CursorInputResolver<T>>>,
    dispatcher: Option<Box<dyn MessageDispatcher<T>>>,
    session: CursorSession<T>,
}

impl<T: Target> CursorInputLogic<T> {
    pub fn builder(id: impl Into<String>) -> CursorInputLogicBuilder<T> {
        CursorInputLogicBuilder {
            id: id.into(),
            settings: CursorInputSettings::default(),
            resolver: None,
            dispatcher: None,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn settings(&self) -> &CursorInputSettings {
        &self.settings
    }

    pub fn session(&self) -> &CursorSession<T> {
        &self.session
    }

    pub fn hovered_target(&self) -> Option<T> {
        self.session.hovered_target()
    }

    pub fn click_count(&self) -> u32 {
        self.session.click_count
    }

    pub fn is_dragging(&self) -> bool {
        self.session.dragging
    }

    pub fn has_resolver(&self) -> bool {
        self.resolver.is_some()
    }

    //--- Configuration ----------------------------------------------------

    pub fn set_settings(&mut self, settings: CursorInputSettings) -> Result<()> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Swaps the resolver strategy. Any in-flight interaction is closed
    /// first so listeners never see a dangling hover or drag.
    pub fn set_resolver(&mut self, resolver: Option<Box<dyn CursorInputResolver<T>>>) {
        self.end_session();
        self.resolver = resolver;
    }

    pub fn set_dispatcher(&mut self, dispatcher: Option<Box<dyn MessageDispatcher<T>>>) {
        self.dispatcher = dispatcher;
    }

    //--- Lifecycle --------------------------------------------------------

    pub fn enable(&mut self) {
        if !self.enabled {
            debug!(target: "cursor", "{}: enabled", self.id);
            self.enabled = true;
        }
    }

    /// Closes any hover and drag with synthetic `Exit` then `EndDrag`, and
    /// resets the session to neutral.
    pub fn disable(&mut self) {
        if !self.enabled {
            return;
        }
        self.end_session();
        self.enabled = false;
        debug!(target: "cursor", "{}: disabled", self.id);
    }

    //--- Polling ----------------------------------------------------------

    /// Samples the resolver once and runs the hover and button phases.
    pub fn update(&mut self, ctx: &FrameContext) {
        if !self.enabled {
            return;
        }
        let Some(resolver) = self.resolver.take() else {
            return;
        };
        self.session.last_time = ctx.time;
        self.session.position = resolver.cursor_position();

        let hit = resolver.raycast(self.settings.ignore_blocked);
        self.update_hover(resolver.as_ref(), hit, ctx.time);
        self.update_button(resolver.as_ref(), ctx);

        self.resolver = Some(resolver);
    }

    //--- Hover Phase ------------------------------------------------------

    fn update_hover(&mut self, resolver: &dyn CursorInputResolver<T>, hit: Option<RaycastHit<T>>, now: f64) {
        let previous = self.session.hovered;
        let same_target = previous.map(|h| h.target) == hit.map(|h| h.target);
        let same_entity = matches!((&previous, &hit), (Some(p), Some(n)) if p.same_entity(n));

        if same_target || same_entity {
            // Keep the finer-grained hit current without reporting it.
            self.session.hovered = hit;
            return;
        }

        if let Some(prev) = previous {
            let (target, mode) = resolver.dispatch_target(&prev, self.settings.dispatch);
            self.send(target, mode, CursorEventKind::Exit, now);
        }

        self.session.hovered = hit;
        self.session.click_count = 0;
        trace!(target: "cursor", "{}: hover {:?} -> {:?}", self.id, previous.map(|h| h.target), hit.map(|h| h.target));

        if let Some(next) = hit {
            let (target, mode) = resolver.dispatch_target(&next, self.settings.dispatch);
            self.send(target, mode, CursorEventKind::Enter, now);
        }
    }

    //--- Button Phase -----------------------------------------------------

    fn update_button(&mut self, resolver: &dyn CursorInputResolver<T>, ctx: &FrameContext) {
        let now = ctx.time;
        let state = resolver.click_button_state(self.session.button_state, ctx);
        self.session.button_state = state;

        let press = ButtonPress::resolve(state, self.session.last_down_time, self.settings.click_timeout, now);
        let double_click_timeout = self.settings.double_click_timeout;

        match press {
            ButtonPress::Tapped => {
                let gap = self.session.last_up_time.map(|up| now - up);
                self.session.last_up_time = Some(now);
                self.session.click_count += 1;
                self.send_to_hovered(resolver, CursorEventKind::ButtonUp, now);

                let double = gap.is_some_and(|gap| gap < double_click_timeout)
                    && self.session.click_count % 2 == 0;
                if double {
                    self.send_to_hovered(resolver, CursorEventKind::DoubleClick, now);
                    if self.settings.dispatch_click_event_always {
                        self.send_to_hovered(resolver, CursorEventKind::Click, now);
                    }
                } else {
                    self.send_to_hovered(resolver, CursorEventKind::Click, now);
                }
                self.end_drag(now);
            }
            ButtonPress::Released => {
                self.session.click_count = 0;
                self.send_to_hovered(resolver, CursorEventKind::ButtonUp, now);
                self.end_drag(now);
            }
            ButtonPress::None => {
                if self.session.click_count > 0 && self.session.click_is_stale(now, double_click_timeout) {
                    self.session.click_count = 0;
                }
                if self.session.dragging {
                    warn!(target: "cursor", "{}: button idle while dragging, forcing end drag", self.id);
                    self.end_drag(now);
                }
            }
            ButtonPress::Down => {
                if self.session.click_is_stale(now, double_click_timeout) {
                    self.session.click_count = 0;
                }
                self.session.last_down_time = Some(now);
                self.session.last_down_position = self.session.position;
                self.session.last_down_hit = self.session.hovered;
                self.send_to_hovered(resolver, CursorEventKind::ButtonDown, now);
            }
            ButtonPress::Holding | ButtonPress::Held => {
                if press == ButtonPress::Held {
                    self.session.click_count = 0;
                }
                if !self.session.dragging
                    && resolver.test_begin_drag(self.session.last_down_position, self.settings.pixel_drag_threshold)
                {
                    self.begin_drag(resolver, now);
                }
            }
        }
    }

    //--- Drag -------------------------------------------------------------

    fn begin_drag(&mut self, resolver: &dyn CursorInputResolver<T>, now: f64) {
        self.session.dragging = true;
        // The pressed object owns the drag, even if the cursor already left it.
        let origin = self.session.last_down_hit.or(self.session.hovered);
        self.session.drag_target = origin.map(|hit| resolver.dispatch_target(&hit, self.settings.dispatch));

        match self.session.drag_target {
            Some((target, mode)) => {
                self.session.drag_initiated = true;
                self.send(target, mode, CursorEventKind::BeginDrag, now);
            }
            None => trace!(target: "cursor", "{}: drag started over nothing", self.id),
        }
    }

    fn end_drag(&mut self, now: f64) {
        if !self.session.dragging {
            return;
        }
        self.session.dragging = false;
        self.session.drag_initiated = false;
        if let Some((target, mode)) = self.session.drag_target.take() {
            self.send(target, mode, CursorEventKind::EndDrag, now);
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends the terminal `Exit` and `EndDrag`, then clears the session.
    fn end_session(&mut self) {
        let now = self.session.last_time;
        if let Some(hit) = self.session.hovered {
            let (target, mode) = match &self.resolver {
                Some(resolver) => resolver.dispatch_target(&hit, self.settings.dispatch),
                None => (resolve_dispatch_target(&hit, self.settings.dispatch.kind), self.settings.dispatch.mode),
            };
            self.send(target, mode, CursorEventKind::Exit, now);
        }
        self.end_drag(now);
        self.session = CursorSession { last_time: now, ..CursorSession::default() };
    }

    fn send_to_hovered(&mut self, resolver: &dyn CursorInputResolver<T>, kind: CursorEventKind, now: f64) {
        let Some(hit) = self.session.hovered else {
            trace!(target: "cursor", "{}: {:?} over nothing", self.id, kind);
            return;
        };
        let (target, mode) = resolver.dispatch_target(&hit, self.settings.dispatch);
        self.send(target, mode, kind, now);
    }

    fn send(&mut self, target: T, mode: DispatchMode, kind: CursorEventKind, now: f64) {
        debug!(target: "cursor", "{}: {:?} -> {:?}", self.id, kind, target);
        let Some(dispatcher) = self.dispatcher.as_mut() else {
            return;
        };
        let message = CursorMessage {
            cursor_id: self.id.clone(),
            kind,
            position: self.session.position,
            hovered: self.session.hovered_target(),
            click_count: self.session.click_count,
            time: now,
        };
        dispatcher.send(target, mode, &message);
    }
}

impl<T: Target> Drop for CursorInputLogic<T> {
    fn drop(&mut self) {
        self.disable();
    }
}

impl<T: Target> fmt::Debug for CursorInputLogic<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorInputLogic")
            .field("id", &self.id)
            .field("enabled", &self.enabled)
            .field("settings", &self.settings)
            .field("has_resolver", &self.resolver.is_some())
            .field("has_dispatcher", &self.dispatcher.is_some())
            .field("session", &self.session)
            .finish()
    }
}

//=== CursorInputLogicBuilder =============================================

pub struct CursorInputLogicBuilder<T: Target> {
    id: String,
    settings: CursorInputSettings,
    resolver: Option<Box<dyn CursorInputResolver<T>>>,
    dispatcher: Option<Box<dyn MessageDispatcher<T>>>,
}

impl<T: Target> CursorInputLogicBuilder<T> {
    pub fn with_settings(mut self, settings: CursorInputSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_resolver(mut self, resolver: impl CursorInputResolver<T> + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: impl MessageDispatcher<T> + 'static) -> Self {
        self.dispatcher = Some(Box::new(dispatcher));
        self
    }

    /// Validates settings and returns an enabled logic.
    pub fn build(self) -> Result<CursorInputLogic<T>> {
        self.settings.validate()?;
        if self.resolver.is_none() {
            warn!(target: "cursor", "{}: built without a resolver, input stays neutral", self.id);
        }
        Ok(CursorInputLogic {
            id: self.id,
            enabled: true,
            settings: self.settings,
            resolver: self.resolver,
            dispatcher: self.dispatcher,
            session: CursorSession::default(),
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cursor::dispatcher::{ChannelDispatcher, DispatchedMessage};
    use crate::core::cursor::resolver::ManualCursorResolver;
    use crate::core::cursor::target::DispatchTargetKind;
    use crossbeam_channel::Receiver;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    //--- Test Harness -----------------------------------------------------

    type Resolver = Rc<RefCell<ManualCursorResolver<u32>>>;

    struct Harness {
        logic: CursorInputLogic<u32>,
        resolver: Resolver,
        rx: Receiver<DispatchedMessage<u32>>,
        frame: u64,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_settings(CursorInputSettings::default())
        }

        fn with_settings(settings: CursorInputSettings) -> Self {
            let resolver: Resolver = Rc::default();
            let (dispatcher, rx) = ChannelDispatcher::unbounded();
            let logic = CursorInputLogic::builder("mouse")
                .with_settings(settings)
                .with_resolver(resolver.clone())
                .with_dispatcher(dispatcher)
                .build()
                .unwrap();
            Self { logic, resolver, rx, frame: 0 }
        }

        fn hover(&mut self, hit: Option<RaycastHit<u32>>) -> &mut Self {
            self.resolver.borrow_mut().set_hit(hit);
            self
        }

        fn press(&mut self, pressed: bool) -> &mut Self {
            self.resolver.borrow_mut().set_pressed(pressed);
            self
        }

        fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
            self.resolver.borrow_mut().set_position(Point::new(x, y));
            self
        }

        fn poll(&mut self, time: f64) -> &mut Self {
            self.frame += 1;
            self.logic.update(&FrameContext::update(self.frame, time));
            self
        }

        fn drain(&self) -> Vec<(u32, CursorEventKind)> {
            self.rx.try_iter().map(|d| (d.target, d.message.kind)).collect()
        }

        fn kinds(&self) -> Vec<CursorEventKind> {
            self.drain().into_iter().map(|(_, kind)| kind).collect()
        }
    }

    /// Replays a fixed sequence of click states; position and hits come
    /// from a shared manual resolver.
    struct ScriptedButton {
        inner: Resolver,
        script: RefCell<VecDeque<ButtonState>>,
    }

    impl CursorInputResolver<u32> for ScriptedButton {
        fn cursor_position(&self) -> Point {
            self.inner.borrow().cursor_position()
        }

        fn raycast(&self, ignore_blocked: bool) -> Option<RaycastHit<u32>> {
            self.inner.borrow().raycast(ignore_blocked)
        }

        fn is_click_pressed(&self) -> bool {
            false
        }

        fn click_button_state(&self, _previous: ButtonState, _ctx: &FrameContext) -> ButtonState {
            self.script.borrow_mut().pop_front().unwrap_or_default()
        }
    }

    use crate::core::cursor::message::CursorEventKind::*;

    //=====================================================================
    // Configuration
    //=====================================================================

    #[test]
    fn default_settings() {
        let settings = CursorInputSettings::default();
        assert_eq!(settings.double_click_timeout, 0.3);
        assert_eq!(settings.click_timeout, 0.5);
        assert_eq!(settings.pixel_drag_threshold, 10.0);
        assert!(!settings.dispatch_click_event_always);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn build_rejects_negative_timeout() {
        let settings = CursorInputSettings { click_timeout: -0.1, ..Default::default() };
        let err = CursorInputLogic::<u32>::builder("mouse")
            .with_settings(settings)
            .build()
            .unwrap_err();
        assert_eq!(err, InputError::InvalidSetting { name: "click_timeout", value: -0.1 });
    }

    #[test]
    fn missing_resolver_is_neutral() {
        let mut logic = CursorInputLogic::<u32>::builder("mouse").build().unwrap();
        logic.update(&FrameContext::update(1, 0.0));
        assert!(!logic.has_resolver());
        assert_eq!(logic.hovered_target(), None);
        assert_eq!(logic.session().button_state, ButtonState::None);
    }

    //=====================================================================
    // Hover
    //=====================================================================

    #[test]
    fn hover_swap_sends_exit_then_enter() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1))).poll(0.0);
        assert_eq!(h.drain(), vec![(1, Enter)]);

        h.hover(Some(RaycastHit::new(2))).poll(0.1);
        assert_eq!(h.drain(), vec![(1, Exit), (2, Enter)]);

        h.hover(None).poll(0.2);
        assert_eq!(h.drain(), vec![(2, Exit)]);
        assert_eq!(h.logic.hovered_target(), None);
    }

    #[test]
    fn same_entity_suppresses_hover_churn() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1).with_entity(10))).poll(0.0);
        h.drain();

        h.hover(Some(RaycastHit::new(2).with_entity(10))).poll(0.1);
        assert!(h.drain().is_empty());
        assert_eq!(h.logic.hovered_target(), Some(2));
        assert_eq!(h.logic.session().hovered_entity(), Some(10));
    }

    #[test]
    fn dispatch_options_pick_receiver() {
        let settings = CursorInputSettings {
            dispatch: DispatchOptions::new(DispatchTargetKind::Entity, DispatchMode::Broadcast),
            ..Default::default()
        };
        let mut h = Harness::with_settings(settings);
        h.hover(Some(RaycastHit::new(1).with_entity(10))).poll(0.0);

        let sent = h.rx.try_recv().unwrap();
        assert_eq!(sent.target, 10);
        assert_eq!(sent.mode, DispatchMode::Broadcast);
        assert_eq!(sent.message.hovered, Some(1));
    }

    #[test]
    fn blocked_cursor_exits_target() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1))).poll(0.0);
        h.drain();

        h.resolver.borrow_mut().set_blocked(true);
        h.poll(0.1);
        assert_eq!(h.kinds(), vec![Exit]);
    }

    //=====================================================================
    // Clicks
    //=====================================================================

    #[test]
    fn two_quick_taps_make_a_double_click() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1))).poll(0.0);
        h.drain();

        h.press(true).poll(0.00);
        h.press(false).poll(0.05);
        assert_eq!(h.kinds(), vec![ButtonDown, ButtonUp, Click]);
        assert_eq!(h.logic.click_count(), 1);

        h.press(true).poll(0.10);
        h.press(false).poll(0.15);
        assert_eq!(h.kinds(), vec![ButtonDown, ButtonUp, DoubleClick]);
        assert_eq!(h.logic.click_count(), 2);
    }

    #[test]
    fn double_click_can_also_send_click() {
        let settings = CursorInputSettings { dispatch_click_event_always: true, ..Default::default() };
        let mut h = Harness::with_settings(settings);
        h.hover(Some(RaycastHit::new(1)));

        h.press(true).poll(0.00);
        h.press(false).poll(0.05);
        h.press(true).poll(0.10);
        h.press(false).poll(0.15);

        let kinds = h.kinds();
        assert_eq!(&kinds[kinds.len() - 2..], &[DoubleClick, Click]);
    }

    #[test]
    fn slow_taps_stay_single_clicks() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1)));

        h.press(true).poll(0.0);
        h.press(false).poll(0.05);
        h.poll(0.5);
        assert_eq!(h.logic.click_count(), 0);

        h.press(true).poll(1.0);
        h.press(false).poll(1.05);
        let kinds = h.kinds();
        assert_eq!(kinds.iter().filter(|k| **k == Click).count(), 2);
        assert!(!kinds.contains(&DoubleClick));
    }

    #[test]
    fn long_press_is_not_a_click() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1)));

        h.press(true).poll(0.0);
        h.poll(0.6);
        h.press(false).poll(0.7);
        assert_eq!(h.kinds(), vec![Enter, ButtonDown, ButtonUp]);
        assert_eq!(h.logic.click_count(), 0);
    }

    #[test]
    fn hover_change_resets_click_count() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1)));
        h.press(true).poll(0.0);
        h.press(false).poll(0.05);
        assert_eq!(h.logic.click_count(), 1);

        h.hover(Some(RaycastHit::new(2))).poll(0.1);
        assert_eq!(h.logic.click_count(), 0);
    }

    //=====================================================================
    // Drag
    //=====================================================================

    #[test]
    fn hold_and_move_drags_once() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1))).move_to(100.0, 100.0).poll(0.0);
        h.drain();

        h.press(true).poll(0.1);
        h.move_to(115.0, 100.0).poll(0.2);
        assert_eq!(h.kinds(), vec![ButtonDown, BeginDrag]);
        assert!(h.logic.is_dragging());

        let mut t = 0.3;
        while t < 2.1 {
            h.move_to(100.0 + t * 50.0, 100.0).poll(t);
            t += 0.1;
        }
        assert!(h.kinds().is_empty());

        h.press(false).poll(2.2);
        assert_eq!(h.kinds(), vec![ButtonUp, EndDrag]);
        assert!(!h.logic.is_dragging());
    }

    #[test]
    fn small_movement_does_not_drag() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1))).move_to(0.0, 0.0);
        h.press(true).poll(0.0);
        h.move_to(6.0, 8.0).poll(0.1);
        h.poll(0.2);
        assert!(!h.logic.is_dragging());
    }

    #[test]
    fn drag_ends_on_its_origin_target() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1))).move_to(0.0, 0.0);
        h.press(true).poll(0.0);
        h.move_to(50.0, 0.0).poll(0.1);
        h.hover(Some(RaycastHit::new(2))).poll(0.2);
        h.press(false).poll(0.8);

        let sent = h.drain();
        assert!(sent.contains(&(1, BeginDrag)));
        assert!(sent.contains(&(1, EndDrag)));
        assert_eq!(sent.last(), Some(&(1, EndDrag)));
    }

    #[test]
    fn drag_over_nothing_tracks_state_without_delivery() {
        let mut h = Harness::new();
        h.move_to(0.0, 0.0);
        h.press(true).poll(0.0);
        h.move_to(40.0, 0.0).poll(0.1);
        assert!(h.logic.is_dragging());
        assert!(!h.logic.session().drag_initiated);
        assert_eq!(h.logic.session().drag_target(), None);

        h.press(false).poll(0.2);
        assert!(!h.logic.is_dragging());
        assert!(h.drain().is_empty());
    }

    #[test]
    fn idle_button_mid_drag_forces_single_end_drag() {
        let shared: Resolver = Rc::default();
        shared.borrow_mut().set_hit(Some(RaycastHit::new(4)));
        let script = [ButtonState::Down, ButtonState::Held, ButtonState::None, ButtonState::None];
        let resolver = ScriptedButton { inner: shared.clone(), script: RefCell::new(script.into()) };
        let (dispatcher, rx) = ChannelDispatcher::unbounded();
        let mut logic = CursorInputLogic::builder("mouse")
            .with_resolver(resolver)
            .with_dispatcher(dispatcher)
            .build()
            .unwrap();

        logic.update(&FrameContext::update(1, 0.0));
        shared.borrow_mut().set_position(Point::new(40.0, 0.0));
        logic.update(&FrameContext::update(2, 0.1));
        assert!(logic.is_dragging());
        assert!(logic.session().drag_initiated);

        logic.update(&FrameContext::update(3, 0.2));
        logic.update(&FrameContext::update(4, 0.3));
        let sent: Vec<_> = rx.try_iter().map(|d| (d.target, d.message.kind)).collect();
        assert_eq!(sent, vec![(4, Enter), (4, ButtonDown), (4, BeginDrag), (4, EndDrag)]);
        assert!(!logic.is_dragging());
        assert_eq!(logic.session().drag_target(), None);
    }

    #[test]
    fn tap_that_dragged_still_ends_drag() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(1))).move_to(0.0, 0.0);
        h.press(true).poll(0.0);
        h.move_to(30.0, 0.0).poll(0.05);
        h.press(false).poll(0.1);
        assert_eq!(h.kinds(), vec![Enter, ButtonDown, BeginDrag, ButtonUp, Click, EndDrag]);
    }

    //=====================================================================
    // Disable
    //=====================================================================

    #[test]
    fn disable_mid_drag_sends_exit_then_end_drag() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(7))).move_to(0.0, 0.0);
        h.press(true).poll(0.0);
        h.move_to(20.0, 0.0).poll(0.1);
        h.drain();

        h.logic.disable();
        assert_eq!(h.drain(), vec![(7, Exit), (7, EndDrag)]);
        assert!(!h.logic.is_dragging());
        assert_eq!(h.logic.hovered_target(), None);
        assert_eq!(h.logic.session().button_state, ButtonState::None);

        // Second disable and polling while disabled are silent.
        h.logic.disable();
        h.poll(0.2);
        assert!(h.drain().is_empty());
    }

    #[test]
    fn dropping_mid_drag_sends_exit_then_end_drag() {
        let resolver: Resolver = Rc::default();
        let (dispatcher, rx) = ChannelDispatcher::unbounded();
        let mut logic = CursorInputLogic::builder("mouse")
            .with_resolver(resolver.clone())
            .with_dispatcher(dispatcher)
            .build()
            .unwrap();

        resolver.borrow_mut().set_hit(Some(RaycastHit::new(7)));
        resolver.borrow_mut().set_pressed(true);
        logic.update(&FrameContext::update(1, 0.0));
        resolver.borrow_mut().set_position(Point::new(40.0, 0.0));
        logic.update(&FrameContext::update(2, 0.1));
        assert!(logic.is_dragging());
        rx.try_iter().for_each(drop);

        drop(logic);
        let sent: Vec<_> = rx.try_iter().map(|d| (d.target, d.message.kind)).collect();
        assert_eq!(sent, vec![(7, Exit), (7, EndDrag)]);
    }

    #[test]
    fn dropping_disabled_logic_is_silent() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(7))).poll(0.0);
        h.logic.disable();
        h.drain();

        let Harness { logic, rx, .. } = h;
        drop(logic);
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn reenable_starts_from_neutral() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(7)));
        h.press(true).poll(0.0);
        h.logic.disable();
        h.drain();

        h.logic.enable();
        h.poll(0.1);
        // Still pressed: a fresh Down, and the target is entered again.
        assert_eq!(h.kinds(), vec![Enter, ButtonDown]);
    }

    #[test]
    fn swapping_resolver_closes_session() {
        let mut h = Harness::new();
        h.hover(Some(RaycastHit::new(3))).poll(0.0);
        h.drain();

        h.logic.set_resolver(None);
        assert_eq!(h.drain(), vec![(3, Exit)]);
        h.poll(0.1);
        assert!(h.drain().is_empty());
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;
    use crate::core::cursor::target::DispatchTargetKind;

    #[test]
    fn settings_fill_missing_fields_from_defaults() {
        let text = r#"
            click_timeout = 0.25
            dispatch_click_event_always = true

            [dispatch]
            kind = "Rigidbody"
            mode = "SignalUpwards"
        "#;
        let settings: CursorInputSettings = toml::from_str(text).unwrap();

        assert_eq!(settings.click_timeout, 0.25);
        assert_eq!(settings.double_click_timeout, 0.3);
        assert_eq!(settings.pixel_drag_threshold, 10.0);
        assert!(settings.dispatch_click_event_always);
        assert_eq!(
            settings.dispatch,
            DispatchOptions::new(DispatchTargetKind::Rigidbody, DispatchMode::SignalUpwards)
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn negative_threshold_parses_but_fails_validation() {
        let settings: CursorInputSettings = toml::from_str("pixel_drag_threshold = -1.0").unwrap();
        assert!(matches!(
            settings.validate(),
            Err(InputError::InvalidSetting { name: "pixel_drag_threshold", .. })
        ));
    }
}
