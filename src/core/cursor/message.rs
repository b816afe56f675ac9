//=========================================================================
// Cursor Messages
//=========================================================================
//
// Events produced by the cursor logic and the handler interface that
// receives them.
//
// Architecture:
//   CursorInputLogic ──CursorMessage──> MessageDispatcher ──invoke──> CursorHandler
//
//=========================================================================

//=== External Dependencies ===============================================

use kurbo::Point;

//=== Internal Dependencies ===============================================

use super::target::Target;

//=== CursorEventKind =====================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorEventKind {
    Enter,
    Exit,
    ButtonDown,
    ButtonUp,
    Click,
    DoubleClick,
    BeginDrag,
    EndDrag,
}

//=== CursorMessage =======================================================

/// Snapshot of the cursor session at the moment an event fired.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorMessage<T> {
    /// Id of the cursor logic that produced the event.
    pub cursor_id: String,
    pub kind: CursorEventKind,
    /// Cursor position when the event fired.
    pub position: Point,
    /// Hovered target at dispatch time.
    pub hovered: Option<T>,
    pub click_count: u32,
    /// Unscaled seconds since start.
    pub time: f64,
}

impl<T: Target> CursorMessage<T> {
    /// Calls the handler method matching `kind`.
    pub fn invoke(&self, handler: &mut dyn CursorHandler<T>) -> anyhow::Result<()> {
        match self.kind {
            CursorEventKind::Enter => handler.on_cursor_enter(self),
            CursorEventKind::Exit => handler.on_cursor_exit(self),
            CursorEventKind::ButtonDown => handler.on_button_down(self),
            CursorEventKind::ButtonUp => handler.on_button_up(self),
            CursorEventKind::Click => handler.on_click(self),
            CursorEventKind::DoubleClick => handler.on_double_click(self),
            CursorEventKind::BeginDrag => handler.on_begin_drag(self),
            CursorEventKind::EndDrag => handler.on_end_drag(self),
        }
    }
}

//=== CursorHandler =======================================================

/// Receiver of cursor events. Every callback defaults to a no-op.
///
/// Errors are reported to the dispatcher, which logs them and keeps
/// delivering to the remaining listeners.
pub trait CursorHandler<T: Target> {
    fn on_cursor_enter(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_cursor_exit(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_button_down(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_button_up(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_click(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_double_click(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_begin_drag(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_end_drag(&mut self, _message: &CursorMessage<T>) -> anyhow::Result<()> {
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl CursorHandler<u32> for Recorder {
        fn on_click(&mut self, _message: &CursorMessage<u32>) -> anyhow::Result<()> {
            self.calls.push("click");
            Ok(())
        }

        fn on_end_drag(&mut self, _message: &CursorMessage<u32>) -> anyhow::Result<()> {
            self.calls.push("end_drag");
            anyhow::bail!("drop rejected")
        }
    }

    fn message(kind: CursorEventKind) -> CursorMessage<u32> {
        CursorMessage {
            cursor_id: "mouse".into(),
            kind,
            position: Point::ORIGIN,
            hovered: Some(1),
            click_count: 0,
            time: 0.0,
        }
    }

    #[test]
    fn invoke_routes_by_kind() {
        let mut recorder = Recorder::default();
        message(CursorEventKind::Click).invoke(&mut recorder).unwrap();
        message(CursorEventKind::Enter).invoke(&mut recorder).unwrap();
        assert_eq!(recorder.calls, vec!["click"]);
    }

    #[test]
    fn invoke_surfaces_handler_error() {
        let mut recorder = Recorder::default();
        let err = message(CursorEventKind::EndDrag).invoke(&mut recorder).unwrap_err();
        assert_eq!(err.to_string(), "drop rejected");
        assert_eq!(recorder.calls, vec!["end_drag"]);
    }
}
