//! Session finite-state machine (FSM) types.
//!
//! Transitions are driven by [`crate::session::Session`]; this module only
//! says which of them are legal.
//!
//! ```text
//!  DISCONNECTED ──open──▶ CONNECTED ──first read──▶ EXCHANGING ─┐
//!        │                    │                         ▲       │ line sent,
//!        │                    │                         └───────┘ chunk printed
//!        │                    │                         │
//!        └────────────────────┴──────────▶ CLOSED ◀─────┘
//!                  sentinel, input exhausted, peer closed, fatal error
//! ```

/// All possible states of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No connection yet; initial state.
    #[default]
    Disconnected,
    /// Connection open, no line read yet.
    Connected,
    /// Request/response loop running.
    Exchanging,
    /// Connection released; terminal.
    Closed,
}

impl SessionState {
    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;
        matches!(
            (self, next),
            (Disconnected, Connected)
                | (Disconnected, Closed)
                | (Connected, Exchanging)
                | (Connected, Closed)
                | (Exchanging, Closed)
        )
    }

    pub fn is_terminal(self) -> bool {
        self == SessionState::Closed
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Disconnected => "DISCONNECTED",
            SessionState::Connected => "CONNECTED",
            SessionState::Exchanging => "EXCHANGING",
            SessionState::Closed => "CLOSED",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState::{self, *};

    const ALL: [SessionState; 4] = [Disconnected, Connected, Exchanging, Closed];

    #[test]
    fn default_is_disconnected() {
        assert_eq!(SessionState::default(), Disconnected);
    }

    #[test]
    fn closed_is_terminal() {
        assert!(Closed.is_terminal());
        for next in ALL {
            assert!(!Closed.can_transition_to(next), "CLOSED -> {next}");
        }
    }

    #[test]
    fn every_live_state_can_close() {
        for s in [Disconnected, Connected, Exchanging] {
            assert!(s.can_transition_to(Closed), "{s} -> CLOSED");
        }
    }

    #[test]
    fn no_going_back() {
        assert!(!Exchanging.can_transition_to(Connected));
        assert!(!Connected.can_transition_to(Disconnected));
        assert!(!Disconnected.can_transition_to(Exchanging));
        assert!(!Exchanging.can_transition_to(Exchanging));
    }
}
