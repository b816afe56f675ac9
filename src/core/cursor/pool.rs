//=========================================================================
// Cursor Logic Pool
//=========================================================================
//
// Discovery of live cursor logics without owning them.
//
// Membership follows the enable/disable lifecycle: enabling through the
// pool adds the logic, disabling removes it. Entries are weak, so a
// dropped logic simply disappears on the next prune.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::logic::CursorInputLogic;
use super::target::Target;
use crate::core::frame::FrameContext;

//=== CursorLogicPool =====================================================

/// Shared handle to a cursor logic, owned by whoever created it.
pub type CursorLogicHandle<T> = Rc<RefCell<CursorInputLogic<T>>>;

pub struct CursorLogicPool<T: Target> {
    entries: Vec<Weak<RefCell<CursorInputLogic<T>>>>,
}

impl<T: Target> CursorLogicPool<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Enables the logic and makes it discoverable.
    pub fn enable(&mut self, handle: &CursorLogicHandle<T>) {
        match handle.try_borrow_mut() {
            Ok(mut logic) => {
                logic.enable();
                debug!(target: "cursor", "pool: added '{}'", logic.id());
            }
            Err(_) => {
                warn!(target: "cursor", "pool: cursor logic busy, not enabled");
                return;
            }
        }
        if !self.contains(handle) {
            self.entries.push(Rc::downgrade(handle));
        }
    }

    /// Disables the logic (sending its terminal events) and removes it.
    pub fn disable(&mut self, handle: &CursorLogicHandle<T>) {
        match handle.try_borrow_mut() {
            Ok(mut logic) => logic.disable(),
            Err(_) => warn!(target: "cursor", "pool: cursor logic busy, removed without disable"),
        }
        self.entries
            .retain(|weak| weak.upgrade().is_some_and(|rc| !Rc::ptr_eq(&rc, handle)));
    }

    pub fn contains(&self, handle: &CursorLogicHandle<T>) -> bool {
        self.entries
            .iter()
            .any(|weak| weak.upgrade().is_some_and(|rc| Rc::ptr_eq(&rc, handle)))
    }

    /// Live members in the order they were enabled.
    pub fn iter(&self) -> impl Iterator<Item = CursorLogicHandle<T>> + '_ {
        self.entries.iter().filter_map(Weak::upgrade)
    }

    /// First live member with the given id.
    pub fn find(&self, id: &str) -> Option<CursorLogicHandle<T>> {
        self.iter()
            .find(|handle| handle.try_borrow().is_ok_and(|logic| logic.id() == id))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Polls every live member.
    pub fn update_all(&mut self, ctx: &FrameContext) {
        for handle in self.iter() {
            match handle.try_borrow_mut() {
                Ok(mut logic) => logic.update(ctx),
                Err(_) => warn!(target: "cursor", "pool: cursor logic busy, skipped poll"),
            };
        }
        self.prune();
    }

    /// Drops entries whose logic no longer exists.
    pub fn prune(&mut self) {
        self.entries.retain(|weak| weak.strong_count() > 0);
    }
}

impl<T: Target> Default for CursorLogicPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Target> fmt::Debug for CursorLogicPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorLogicPool")
            .field("live", &self.len())
            .field("entries", &self.entries.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cursor::dispatcher::ChannelDispatcher;
    use crate::core::cursor::message::CursorEventKind;
    use crate::core::cursor::resolver::ManualCursorResolver;
    use crate::core::cursor::target::RaycastHit;

    fn logic(id: &str) -> CursorLogicHandle<u32> {
        Rc::new(RefCell::new(CursorInputLogic::builder(id).build().unwrap()))
    }

    #[test]
    fn enable_adds_once_and_find_by_id() {
        let mut pool = CursorLogicPool::new();
        let (a, b) = (logic("mouse"), logic("touch"));
        pool.enable(&a);
        pool.enable(&a);
        pool.enable(&b);

        assert_eq!(pool.len(), 2);
        assert!(pool.find("touch").is_some_and(|h| Rc::ptr_eq(&h, &b)));
        assert!(pool.find("pen").is_none());
    }

    #[test]
    fn disable_removes_and_disables() {
        let mut pool = CursorLogicPool::new();
        let a = logic("mouse");
        pool.enable(&a);
        pool.disable(&a);

        assert!(pool.is_empty());
        assert!(!a.borrow().is_enabled());
    }

    #[test]
    fn pool_never_keeps_logic_alive() {
        let mut pool = CursorLogicPool::new();
        let a = logic("mouse");
        pool.enable(&a);
        drop(a);

        assert_eq!(pool.len(), 0);
        pool.prune();
        assert_eq!(format!("{:?}", pool), "CursorLogicPool { live: 0, entries: 0 }");
    }

    #[test]
    fn disable_through_pool_sends_terminal_exit() {
        let resolver = Rc::new(RefCell::new(ManualCursorResolver::new()));
        resolver.borrow_mut().set_hit(Some(RaycastHit::new(4u32)));
        let (dispatcher, rx) = ChannelDispatcher::unbounded();
        let handle = Rc::new(RefCell::new(
            CursorInputLogic::builder("mouse")
                .with_resolver(resolver.clone())
                .with_dispatcher(dispatcher)
                .build()
                .unwrap(),
        ));

        let mut pool = CursorLogicPool::new();
        pool.enable(&handle);
        pool.update_all(&FrameContext::update(1, 0.0));
        pool.disable(&handle);

        let kinds: Vec<_> = rx.try_iter().map(|d| d.message.kind).collect();
        assert_eq!(kinds, vec![CursorEventKind::Enter, CursorEventKind::Exit]);
    }
}
