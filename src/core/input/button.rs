//=========================================================================
// Button State Automaton
//=========================================================================
//
// Four-state per-frame button automaton plus a derived press phase.
//
// Transition table (active = raw input held this frame):
//
//   current    active=true    active=false
//   ───────    ───────────    ────────────
//   None       Down           None
//   Down       Held           Released
//   Held       Held           Released
//   Released   Down           None
//
// Sampling is frame-granular: a press and release inside one frame is
// invisible, and no state is ever skipped.
//
//=========================================================================

//=== ButtonState =========================================================

/// Per-frame state of a button-like input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonState {
    /// Not pressed.
    #[default]
    None,

    /// Pressed this frame.
    Down,

    /// Pressed for more than one frame.
    Held,

    /// Released this frame.
    Released,
}

impl ButtonState {
    /// Advances the automaton by one frame.
    pub fn next(self, active: bool) -> Self {
        match (self, active) {
            (Self::None | Self::Released, true) => Self::Down,
            (Self::None | Self::Released, false) => Self::None,
            (Self::Down | Self::Held, true) => Self::Held,
            (Self::Down | Self::Held, false) => Self::Released,
        }
    }

    /// Marks an edge as handled: `Down → Held`, `Released → None`.
    ///
    /// Idempotent: consuming twice equals consuming once.
    pub fn consume(self) -> Self {
        match self {
            Self::Down => Self::Held,
            Self::Released => Self::None,
            other => other,
        }
    }

    /// Returns `true` for `Down` and `Held`.
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Down | Self::Held)
    }

    /// Returns `true` for `Down` and `Released` (an edge happened this frame).
    pub fn is_edge(self) -> bool {
        matches!(self, Self::Down | Self::Released)
    }
}

//=== ButtonPress =========================================================

/// Press phase derived from a [`ButtonState`] and the time since it went down.
///
/// Holds no state of its own; see [`ButtonPress::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ButtonPress {
    /// Not pressed.
    #[default]
    None,

    /// Pressed this frame.
    Down,

    /// Held for no longer than the duration threshold.
    Holding,

    /// Held past the duration threshold.
    Held,

    /// Released within the duration threshold (a tap).
    Tapped,

    /// Released after the duration threshold.
    Released,
}

impl ButtonPress {
    /// Classifies `state` given when the button last went down.
    ///
    /// `last_down_time` of `None` means the button never went down; any
    /// held/released state is then classified as past the threshold.
    pub fn resolve(state: ButtonState, last_down_time: Option<f64>, duration: f64, now: f64) -> Self {
        let within = last_down_time.is_some_and(|t| now - t <= duration);

        match state {
            ButtonState::None => Self::None,
            ButtonState::Down => Self::Down,
            ButtonState::Held if within => Self::Holding,
            ButtonState::Held => Self::Held,
            ButtonState::Released if within => Self::Tapped,
            ButtonState::Released => Self::Released,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [ButtonState; 4] = [
        ButtonState::None,
        ButtonState::Down,
        ButtonState::Held,
        ButtonState::Released,
    ];

    fn run(inputs: &[bool]) -> Vec<ButtonState> {
        let mut state = ButtonState::None;
        inputs
            .iter()
            .map(|&active| {
                state = state.next(active);
                state
            })
            .collect()
    }

    fn legal(prev: ButtonState, next: ButtonState) -> bool {
        use ButtonState::*;
        match next {
            Down | None => matches!(prev, None | Released),
            Held | Released => matches!(prev, Down | Held),
        }
    }

    //=====================================================================
    // Automaton
    //=====================================================================

    #[test]
    fn tap_then_idle() {
        use ButtonState::*;
        assert_eq!(run(&[true, false, false]), vec![Down, Released, None]);
    }

    #[test]
    fn hold_three_frames() {
        use ButtonState::*;
        assert_eq!(run(&[true, true, true]), vec![Down, Held, Held]);
    }

    #[test]
    fn repress_from_released_goes_down() {
        use ButtonState::*;
        assert_eq!(run(&[true, false, true]), vec![Down, Released, Down]);
    }

    #[test]
    fn consume_is_idempotent() {
        for s in ALL {
            assert_eq!(s.consume().consume(), s.consume());
        }
    }

    #[test]
    fn consume_moves_edges_forward() {
        assert_eq!(ButtonState::Down.consume(), ButtonState::Held);
        assert_eq!(ButtonState::Released.consume(), ButtonState::None);
        assert_eq!(ButtonState::Held.consume(), ButtonState::Held);
        assert_eq!(ButtonState::None.consume(), ButtonState::None);
    }

    #[test]
    fn pressed_and_edge_helpers() {
        assert!(ButtonState::Down.is_pressed());
        assert!(ButtonState::Held.is_pressed());
        assert!(!ButtonState::Released.is_pressed());
        assert!(ButtonState::Released.is_edge());
        assert!(!ButtonState::Held.is_edge());
    }

    //=====================================================================
    // Press Classification
    //=====================================================================

    #[test]
    fn released_within_threshold_is_tap() {
        let p = ButtonPress::resolve(ButtonState::Released, Some(1.0), 0.5, 1.3);
        assert_eq!(p, ButtonPress::Tapped);
    }

    #[test]
    fn released_after_threshold_is_release() {
        let p = ButtonPress::resolve(ButtonState::Released, Some(1.0), 0.5, 2.0);
        assert_eq!(p, ButtonPress::Released);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let p = ButtonPress::resolve(ButtonState::Held, Some(1.0), 0.5, 1.5);
        assert_eq!(p, ButtonPress::Holding);
    }

    #[test]
    fn held_past_threshold() {
        let p = ButtonPress::resolve(ButtonState::Held, Some(0.0), 0.5, 2.0);
        assert_eq!(p, ButtonPress::Held);
    }

    #[test]
    fn down_and_none_pass_through() {
        assert_eq!(ButtonPress::resolve(ButtonState::Down, Some(0.0), 0.5, 9.0), ButtonPress::Down);
        assert_eq!(ButtonPress::resolve(ButtonState::None, Some(0.0), 0.5, 0.1), ButtonPress::None);
    }

    #[test]
    fn missing_down_time_counts_as_expired() {
        assert_eq!(ButtonPress::resolve(ButtonState::Held, None, 0.5, 0.0), ButtonPress::Held);
        assert_eq!(ButtonPress::resolve(ButtonState::Released, None, 0.5, 0.0), ButtonPress::Released);
    }

    #[test]
    fn resolve_is_repeatable() {
        let a = ButtonPress::resolve(ButtonState::Held, Some(0.2), 0.5, 0.4);
        let b = ButtonPress::resolve(ButtonState::Held, Some(0.2), 0.5, 0.4);
        assert_eq!(a, b);
    }

    //=====================================================================
    // Properties
    //=====================================================================

    proptest! {
        #[test]
        fn random_sequences_respect_transition_table(
            inputs in proptest::collection::vec(any::<bool>(), 1..200)
        ) {
            let mut prev = ButtonState::None;
            for active in inputs {
                let next = prev.next(active);
                prop_assert!(legal(prev, next), "{:?} -> {:?}", prev, next);
                prop_assert_eq!(next.is_pressed(), active);
                prev = next;
            }
        }
    }
}
