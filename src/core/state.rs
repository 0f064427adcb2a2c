//! Match state.
//!
//! [`MatchState`] is the complete mutable state of a running match: two
//! teams, the single RNG stream, the round counter, and round-level locks.
//! It is `Clone` so the clash resolver can snapshot it; the event log lives
//! outside the state so snapshot runs still write to the shared log.
//!
//! Shared resources (deck, hand, energy, ultimate pool, character HP and
//! statuses) are mutated exclusively by the resolver/interpreter inside one
//! action's atomic resolution window.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ids::{CharacterId, InstanceId, TeamId, TEAM_SIZE};
use crate::core::rng::MatchRng;
use crate::data::card::CardInstance;
use crate::status::instance::StatusInstance;
use crate::zones::ZoneLedger;

/// One fielded character.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub max_hp: i32,
    pub hp: i32,
    /// Slot in the team's line, 0 = front.
    pub slot: u8,
    /// Set when HP reaches 0. The character stays in the data model for
    /// targeting exclusion and log completeness, but cannot act.
    pub defeated: bool,
    /// Active statuses, in application order.
    pub statuses: Vec<StatusInstance>,
}

impl Character {
    #[must_use]
    pub fn new(id: CharacterId, name: impl Into<String>, max_hp: i32, slot: u8) -> Self {
        Self {
            id,
            name: name.into(),
            max_hp,
            hp: max_hp,
            slot,
            defeated: false,
            statuses: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(&self, kind: crate::data::status::StatusKind) -> Option<&StatusInstance> {
        self.statuses.iter().find(|s| s.kind == kind)
    }

    pub fn status_mut(
        &mut self,
        kind: crate::data::status::StatusKind,
    ) -> Option<&mut StatusInstance> {
        self.statuses.iter_mut().find(|s| s.kind == kind)
    }

    #[must_use]
    pub fn has_status(&self, kind: crate::data::status::StatusKind) -> bool {
        self.status(kind).is_some()
    }

    /// Read one dimension of a status, 0 when the status is absent.
    #[must_use]
    pub fn status_dim(
        &self,
        kind: crate::data::status::StatusKind,
        dim: crate::data::status::Dimension,
    ) -> i32 {
        self.status(kind).map_or(0, |s| s.get(dim))
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.defeated
    }
}

/// One side of the match.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeamState {
    pub id: TeamId,
    /// Characters in id order (index = `CharacterId::index`).
    pub characters: Vec<Character>,
    pub zones: ZoneLedger,
    /// Card instances owned by this team.
    pub instances: FxHashMap<InstanceId, CardInstance>,
    /// Shared energy pool (floor 0).
    pub energy: i32,
    /// Shared ultimate meter (floor 0).
    pub ultimate: i32,
}

impl TeamState {
    #[must_use]
    pub fn new(id: TeamId) -> Self {
        Self {
            id,
            characters: Vec::with_capacity(TEAM_SIZE),
            zones: ZoneLedger::new(),
            instances: FxHashMap::default(),
            energy: 0,
            ultimate: 0,
        }
    }

    /// Whether every character is defeated.
    #[must_use]
    pub fn is_wiped(&self) -> bool {
        self.characters.iter().all(|c| c.defeated)
    }

    /// Living characters in slot order.
    #[must_use]
    pub fn living(&self) -> Vec<CharacterId> {
        let mut alive: Vec<&Character> = self.characters.iter().filter(|c| c.is_alive()).collect();
        alive.sort_by_key(|c| c.slot);
        alive.iter().map(|c| c.id).collect()
    }

    /// The living character at a slot, if any.
    #[must_use]
    pub fn at_slot(&self, slot: u8) -> Option<CharacterId> {
        self.characters
            .iter()
            .find(|c| c.slot == slot && c.is_alive())
            .map(|c| c.id)
    }
}

/// Complete mutable match state.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub teams: [TeamState; 2],
    pub rng: MatchRng,
    /// Round number, starting at 1.
    pub round: u32,
    /// Round lock: declarations are rejected outright while set.
    pub block_play: bool,
    /// Per-team flag: movement must be submitted before combat actions.
    pub movement_pending: [bool; 2],
    next_instance: u32,
}

impl MatchState {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            teams: [TeamState::new(TeamId::new(0)), TeamState::new(TeamId::new(1))],
            rng: MatchRng::new(seed),
            round: 1,
            block_play: false,
            movement_pending: [false; 2],
            next_instance: 0,
        }
    }

    #[must_use]
    pub fn team(&self, id: TeamId) -> &TeamState {
        &self.teams[id.index()]
    }

    pub fn team_mut(&mut self, id: TeamId) -> &mut TeamState {
        &mut self.teams[id.index()]
    }

    #[must_use]
    pub fn character(&self, id: CharacterId) -> &Character {
        &self.team(id.team()).characters[id.index()]
    }

    pub fn character_mut(&mut self, id: CharacterId) -> &mut Character {
        let team = id.team();
        &mut self.team_mut(team).characters[id.index()]
    }

    /// Allocate a fresh instance id.
    pub fn alloc_instance(&mut self) -> InstanceId {
        let id = InstanceId::new(self.next_instance);
        self.next_instance += 1;
        id
    }

    /// Ensure the allocator never re-issues ids at or below `id`.
    /// Used when replaying journaled instance creation onto live state.
    pub fn bump_instance_floor(&mut self, id: InstanceId) {
        self.next_instance = self.next_instance.max(id.raw() + 1);
    }

    /// Look up a card instance and its owning team.
    #[must_use]
    pub fn find_instance(&self, id: InstanceId) -> Option<(TeamId, &CardInstance)> {
        for team in TeamId::both() {
            if let Some(inst) = self.team(team).instances.get(&id) {
                return Some((team, inst));
            }
        }
        None
    }
}
