//! Positional model.
//!
//! Each team is a line of slots, 0 at the front. Position matters three
//! ways: splash patterns hit the slot-adjacent neighbors of the struck
//! target, push effects force a character one slot along its line (the
//! controller picks the direction, back of the line by default), and
//! voluntary swaps reorder a line before combat actions. Root pins a
//! character: it can neither be pushed nor take part in a swap.

use serde::{Deserialize, Serialize};

use crate::core::ids::{CharacterId, TEAM_SIZE};
use crate::core::state::MatchState;
use crate::data::status::StatusKind;

/// Whether two slots in the same line are adjacent.
#[must_use]
pub fn adjacent(a: u8, b: u8) -> bool {
    a.abs_diff(b) == 1
}

/// The struck target plus its living slot-adjacent neighbors, front first.
#[must_use]
pub fn splash_targets(state: &MatchState, center: CharacterId) -> Vec<CharacterId> {
    let team = state.team(center.team());
    let center_slot = state.character(center).slot;
    let mut hit: Vec<(u8, CharacterId)> = vec![(center_slot, center)];
    for c in &team.characters {
        if c.is_alive() && adjacent(c.slot, center_slot) {
            hit.push((c.slot, c.id));
        }
    }
    hit.sort_by_key(|&(slot, _)| slot);
    hit.into_iter().map(|(_, id)| id).collect()
}

/// Which way a push moves its target along the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushDirection {
    TowardFront,
    TowardBack,
}

/// A resolved push: the target's slot change, plus the displaced occupant's
/// counter-move when the destination slot was taken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PushPlan {
    pub target: CharacterId,
    pub from_slot: u8,
    pub to_slot: u8,
    pub displaced: Option<(CharacterId, u8, u8)>,
}

/// Plan a one-slot push, or `None` when the push is blocked: target
/// already at that end of the line, or Rooted.
#[must_use]
pub fn plan_push(
    state: &MatchState,
    target: CharacterId,
    direction: PushDirection,
) -> Option<PushPlan> {
    let character = state.character(target);
    if character.has_status(StatusKind::Root) {
        return None;
    }
    let from_slot = character.slot;
    let to_slot = match direction {
        PushDirection::TowardFront => from_slot.checked_sub(1)?,
        PushDirection::TowardBack => {
            if usize::from(from_slot) + 1 >= TEAM_SIZE {
                return None;
            }
            from_slot + 1
        }
    };
    let displaced = state
        .team(target.team())
        .characters
        .iter()
        .find(|c| c.slot == to_slot && c.id != target)
        .map(|c| (c.id, to_slot, from_slot));
    Some(PushPlan {
        target,
        from_slot,
        to_slot,
        displaced,
    })
}

/// Whether two same-team characters may voluntarily swap slots.
#[must_use]
pub fn can_swap(state: &MatchState, a: CharacterId, b: CharacterId) -> bool {
    if a == b || a.team() != b.team() {
        return false;
    }
    let ca = state.character(a);
    let cb = state.character(b);
    ca.is_alive()
        && cb.is_alive()
        && !ca.has_status(StatusKind::Root)
        && !cb.has_status(StatusKind::Root)
}
