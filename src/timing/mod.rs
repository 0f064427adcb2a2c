//! Timing windows.
//!
//! Every card effect is attached to a [`Phase`]. The resolver opens the
//! windows of an action in a fixed order and the interpreter runs the
//! effects registered for each window; status modifier hooks for a window
//! fire before card effects in the same window.
//!
//! Window order for an uncontested action:
//! On Play, Before Use, On Use (with On Hit nested per connecting damage
//! hit), After Use, then Always. A clash inserts Before Clash and After
//! Clash around the Use windows. Always fires even when the action was
//! cancelled in an earlier window. Turn End is not tied to any action; the
//! round driver runs status maintenance there, and the rulebook rejects
//! card effects authored against it at load time.

use serde::{Deserialize, Serialize};

/// A timing window effects can be registered against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    OnPlay,
    BeforeClash,
    AfterClash,
    BeforeUse,
    OnUse,
    /// Nested inside On Use, once per damage hit that connects.
    OnHit,
    AfterUse,
    /// Fires whether or not the action was cancelled.
    Always,
    /// End-of-round maintenance, per character.
    TurnEnd,
}

impl Phase {
    pub const ALL: [Phase; 9] = [
        Phase::OnPlay,
        Phase::BeforeClash,
        Phase::AfterClash,
        Phase::BeforeUse,
        Phase::OnUse,
        Phase::OnHit,
        Phase::AfterUse,
        Phase::Always,
        Phase::TurnEnd,
    ];

    /// The Use-side windows that a cancelled action skips.
    pub const USE_WINDOWS: [Phase; 3] = [Phase::BeforeUse, Phase::OnUse, Phase::AfterUse];

    /// Whether this window still opens after the action is cancelled.
    #[must_use]
    pub const fn fires_when_cancelled(self) -> bool {
        matches!(self, Phase::Always)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_always_survives_cancellation() {
        for phase in Phase::ALL {
            assert_eq!(phase.fires_when_cancelled(), phase == Phase::Always);
        }
    }

    #[test]
    fn test_use_windows_are_use_side() {
        for phase in Phase::USE_WINDOWS {
            assert!(!phase.fires_when_cancelled());
        }
    }
}
