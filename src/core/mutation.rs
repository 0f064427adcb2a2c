//! Mutation journal primitives.
//!
//! During a clash, each action's Use-phase effects run against a private
//! snapshot while recording every state write as a [`Mutation`]. After both
//! snapshot runs finish, the journals are applied to the live state in
//! declaration order. Application re-clamps: HP to `[0, max]`, resource
//! pools to a zero floor, status dimensions to their caps. Two actions that
//! each spend from the same pool on their own snapshot can therefore both
//! succeed, with the pool floored at zero after the merge.
//!
//! The same primitives back ordinary (uncontested) resolution, where the
//! interpreter applies each mutation immediately instead of journaling it.

use serde::{Deserialize, Serialize};

use crate::core::ids::{CardId, CharacterId, InstanceId, TeamId};
use crate::core::state::MatchState;
use crate::data::card::CardInstance;
use crate::data::status::{Dimension, StatusCatalog, StatusKind};
use crate::error::DataIntegrityError;
use crate::status::instance::StatusInstance;
use crate::zones::ZoneKind;

/// One replayable state write.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mutation {
    /// Change a character's HP by a delta (negative = damage).
    Hp { target: CharacterId, delta: i32 },
    /// Add a delta to one dimension of a status, creating the instance
    /// if absent.
    StatusApply {
        target: CharacterId,
        kind: StatusKind,
        dim: Dimension,
        delta: i32,
    },
    /// Set one dimension of a status outright.
    StatusSet {
        target: CharacterId,
        kind: StatusKind,
        dim: Dimension,
        value: i32,
    },
    /// Remove a status instance entirely.
    StatusRemove { target: CharacterId, kind: StatusKind },
    /// Change a team's energy pool.
    Energy { team: TeamId, delta: i32 },
    /// Change a team's ultimate meter.
    Ultimate { team: TeamId, delta: i32 },
    /// Move a card instance between zones.
    CardMove {
        team: TeamId,
        instance: InstanceId,
        to: ZoneKind,
    },
    /// Replace the deck with a reshuffled discard pile.
    DeckReshuffle { team: TeamId, order: Vec<InstanceId> },
    /// Send a deck card to the bottom of the deck.
    DeckBottom { team: TeamId, instance: InstanceId },
    /// Move deck cards to the top, first listed on top.
    DeckPlaceTop { team: TeamId, order: Vec<InstanceId> },
    /// Mint a new card instance into a zone.
    CardCreate {
        team: TeamId,
        instance: InstanceId,
        card: CardId,
        owner: CharacterId,
        zone: ZoneKind,
    },
    /// Swap a card instance's current face.
    TransformInto {
        team: TeamId,
        instance: InstanceId,
        into: CardId,
    },
    /// Move a character to a slot.
    SetSlot { target: CharacterId, slot: u8 },
    /// Lock further declarations for the round.
    LockRound,
}

impl Mutation {
    /// Apply this mutation to live state, re-clamping every bound.
    pub fn apply(
        &self,
        state: &mut MatchState,
        catalog: &StatusCatalog,
    ) -> Result<(), DataIntegrityError> {
        match self {
            Mutation::Hp { target, delta } => {
                let character = state.character_mut(*target);
                character.hp = (character.hp + delta).clamp(0, character.max_hp);
                if character.hp == 0 {
                    character.defeated = true;
                }
            }
            Mutation::StatusApply {
                target,
                kind,
                dim,
                delta,
            } => {
                let caps = catalog.require(*kind)?.caps;
                let character = state.character_mut(*target);
                if character.status(*kind).is_none() {
                    character.statuses.push(StatusInstance::new(*kind));
                }
                if let Some(status) = character.status_mut(*kind) {
                    status.add_clamped(*dim, *delta, &caps);
                }
            }
            Mutation::StatusSet {
                target,
                kind,
                dim,
                value,
            } => {
                let caps = catalog.require(*kind)?.caps;
                let character = state.character_mut(*target);
                if character.status(*kind).is_none() {
                    character.statuses.push(StatusInstance::new(*kind));
                }
                if let Some(status) = character.status_mut(*kind) {
                    status.set_clamped(*dim, *value, &caps);
                }
            }
            Mutation::StatusRemove { target, kind } => {
                state
                    .character_mut(*target)
                    .statuses
                    .retain(|s| s.kind != *kind);
            }
            Mutation::Energy { team, delta } => {
                let team = state.team_mut(*team);
                team.energy = (team.energy + delta).max(0);
            }
            Mutation::Ultimate { team, delta } => {
                let team = state.team_mut(*team);
                team.ultimate = (team.ultimate + delta).max(0);
            }
            Mutation::CardMove { team, instance, to } => {
                state.team_mut(*team).zones.move_to(*instance, *to);
            }
            Mutation::DeckReshuffle { team, order } => {
                state.team_mut(*team).zones.apply_reshuffle(order);
            }
            Mutation::DeckBottom { team, instance } => {
                state.team_mut(*team).zones.bottom_deck(*instance);
            }
            Mutation::DeckPlaceTop { team, order } => {
                state.team_mut(*team).zones.place_top(order);
            }
            Mutation::CardCreate {
                team,
                instance,
                card,
                owner,
                zone,
            } => {
                let side = state.team_mut(*team);
                side.instances
                    .insert(*instance, CardInstance::new(*instance, *card, *owner));
                side.zones.add(*instance, *zone);
                state.bump_instance_floor(*instance);
            }
            Mutation::TransformInto { team, instance, into } => {
                if let Some(inst) = state.team_mut(*team).instances.get_mut(instance) {
                    inst.current = *into;
                }
            }
            Mutation::SetSlot { target, slot } => {
                state.character_mut(*target).slot = *slot;
            }
            Mutation::LockRound => {
                state.block_play = true;
            }
        }
        Ok(())
    }
}

/// Apply a journal in order.
pub fn apply_journal(
    state: &mut MatchState,
    catalog: &StatusCatalog,
    journal: &[Mutation],
) -> Result<(), DataIntegrityError> {
    for mutation in journal {
        mutation.apply(state, catalog)?;
    }
    Ok(())
}
