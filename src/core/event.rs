//! Structured resolution events.
//!
//! Every state change during resolution emits a [`ResolutionEvent`] into the
//! match's [`EventLog`]. Events form a tree: an action's root event is the
//! parent of everything its resolution caused, which keeps causality legible
//! in transcripts. The log is the unit of the determinism contract; a replay
//! must reproduce it event for event.

use serde::{Deserialize, Serialize};

use crate::choice::ChoiceKind;
use crate::core::ids::{CardId, CharacterId, EventId, InstanceId, TeamId};
use crate::data::status::{Dimension, StatusKind};
use crate::zones::ZoneKind;

/// What a single event records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    // Action lifecycle. The root `ActionDeclared` marks the play; an
    // action that completes its Use windows registers as used.
    ActionDeclared { actor: CharacterId, card: CardId },
    ClashDeclared { first: CharacterId, second: CharacterId },
    ActionUsed { actor: CharacterId },
    ActionCancelled { actor: CharacterId },

    // Resources.
    EnergySpent { team: TeamId, amount: i32 },
    UltimateSpent { team: TeamId, amount: i32 },
    EnergyGained { team: TeamId, amount: i32 },
    UltimateCharged { team: TeamId, amount: i32 },

    // Card flow.
    CardMoved { instance: InstanceId, from: ZoneKind, to: ZoneKind },
    CardDrawn { team: TeamId, instance: InstanceId },
    DeckReshuffled { team: TeamId, count: u32 },
    CardCreated { team: TeamId, instance: InstanceId, card: CardId },
    Transformed { instance: InstanceId, into: CardId },

    // Damage pipeline.
    DamageApplied { source: CharacterId, target: CharacterId, amount: i32 },
    DamageNegated { target: CharacterId },
    ShieldAbsorb { target: CharacterId, amount: i32 },
    ThornsReflected { source: CharacterId, target: CharacterId, amount: i32 },

    // Healing.
    Healed { target: CharacterId, amount: i32, reduced_by: i32 },

    // Statuses.
    StatusApplied { target: CharacterId, kind: StatusKind, dim: Dimension, amount: i32 },
    StatusSet { target: CharacterId, kind: StatusKind, dim: Dimension, amount: i32 },
    StatusReduced { target: CharacterId, kind: StatusKind, dim: Dimension, amount: i32 },
    StatusRemoved { target: CharacterId, kind: StatusKind },
    StatusExpired { target: CharacterId, kind: StatusKind },

    // Targeting and position.
    CoverRedirected { from: CharacterId, to: CharacterId },
    Pushed { target: CharacterId, from_slot: u8, to_slot: u8 },
    Swapped { a: CharacterId, b: CharacterId },
    MovementBlocked { target: CharacterId },

    // Choices.
    ChoiceResolved { kind: ChoiceKind, auto: bool },

    // Round and match flow.
    RoundLocked,
    RoundStarted { round: u32 },
    RoundEnded { round: u32 },
    CharacterDefeated { target: CharacterId },
    BattleEnded { winner: Option<TeamId> },

    // Authored behavior outside the effect language.
    UnmodeledSkipped { card: CardId },
}

/// One event in the resolution log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionEvent {
    pub id: EventId,
    /// The event whose resolution caused this one; `None` for roots.
    pub parent: Option<EventId>,
    pub kind: EventKind,
}

/// Append-only event history of a match.
///
/// Backed by an immutable vector, so snapshots of the log are cheap.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: im::Vector<ResolutionEvent>,
    next: u32,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, returning its id.
    pub fn push(&mut self, parent: Option<EventId>, kind: EventKind) -> EventId {
        let id = EventId::new(self.next);
        self.next += 1;
        self.events.push_back(ResolutionEvent { id, parent, kind });
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolutionEvent> {
        self.events.iter()
    }

    /// Direct children of an event, in log order.
    #[must_use]
    pub fn children(&self, parent: EventId) -> Vec<&ResolutionEvent> {
        self.events
            .iter()
            .filter(|e| e.parent == Some(parent))
            .collect()
    }

    /// Events from a given index onward (what one resolution appended).
    #[must_use]
    pub fn since(&self, index: usize) -> Vec<&ResolutionEvent> {
        self.events.iter().skip(index).collect()
    }

    /// The full log as an owned vec (transcript serialization).
    #[must_use]
    pub fn to_vec(&self) -> Vec<ResolutionEvent> {
        self.events.iter().cloned().collect()
    }
}
