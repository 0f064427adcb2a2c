//! Identifier newtypes.
//!
//! Every object in a match has a small copyable id:
//! - [`TeamId`]: one of the two sides (0 or 1)
//! - [`CharacterId`]: one of the six fielded characters, three per team
//! - [`CardId`]: an authored card definition (shared, immutable)
//! - [`InstanceId`]: a concrete runtime copy of a card
//! - [`EventId`]: an entry in the resolution event log
//!
//! Character ids are laid out team-major: ids `0..3` are team 0's slots at
//! deck build, `3..6` team 1's. The id never changes; the character's *slot*
//! (position in the line) can.

use serde::{Deserialize, Serialize};

/// Number of characters fielded per team (also the width of the slot line).
pub const TEAM_SIZE: usize = 3;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u8);

impl TeamId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        debug_assert!(id < 2);
        Self(id)
    }

    /// The opposing team.
    #[must_use]
    pub const fn rival(self) -> Self {
        Self(1 - self.0)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Both teams, in fixed order.
    #[must_use]
    pub const fn both() -> [Self; 2] {
        [Self(0), Self(1)]
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Team({})", self.0)
    }
}

/// A fielded character. Six per match, three per team, team-major layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u8);

impl CharacterId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        debug_assert!(id < (TEAM_SIZE as u8) * 2);
        Self(id)
    }

    /// Build an id from a team and a within-team index (0..3).
    #[must_use]
    pub const fn of(team: TeamId, index: usize) -> Self {
        Self(team.0 * TEAM_SIZE as u8 + index as u8)
    }

    /// The team this character fights for.
    #[must_use]
    pub const fn team(self) -> TeamId {
        TeamId(self.0 / TEAM_SIZE as u8)
    }

    /// Index within the team (0..3). Not the line slot.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 % TEAM_SIZE as u8) as usize
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Character({})", self.0)
    }
}

/// An authored card definition id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// A runtime card copy, distinct from every other copy of the same card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Instance({})", self.0)
    }
}

/// An entry in the resolution event log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u32);

impl EventId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event({})", self.0)
    }
}
