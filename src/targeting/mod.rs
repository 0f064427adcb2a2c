//! Targeting - legality, Taunt enforcement, Cover redirection.
//!
//! Declared targets are validated atomically at declaration time: arity,
//! liveness, side, and Taunt. Cover works later, at damage time: a living
//! ally holding Cover charges pulls a single-target enemy hit onto itself,
//! one charge per redirect. Random, sweep, splash, and bounce patterns
//! resolve independently of both keywords.

use crate::core::ids::CharacterId;
use crate::core::state::MatchState;
use crate::data::card::TargetPattern;
use crate::data::status::{Dimension, StatusKind};
use crate::error::IllegalAction;

/// Living enemies of the actor, front slot first.
#[must_use]
pub fn living_enemies(state: &MatchState, actor: CharacterId) -> Vec<CharacterId> {
    state.team(actor.team().rival()).living()
}

/// Living allies of the actor (the actor included), front slot first.
#[must_use]
pub fn living_allies(state: &MatchState, actor: CharacterId) -> Vec<CharacterId> {
    state.team(actor.team()).living()
}

/// Taunting living enemies of the actor, if any.
fn taunting_enemies(state: &MatchState, actor: CharacterId) -> Vec<CharacterId> {
    living_enemies(state, actor)
        .into_iter()
        .filter(|&id| state.character(id).status_dim(StatusKind::Taunt, Dimension::Stack) > 0)
        .collect()
}

/// The set a declaration may pick its explicit target from.
///
/// Empty for patterns with no declared target. While any enemy taunts,
/// single-target enemy declarations are restricted to the taunting
/// enemies; splash and bounce declarations pick freely.
#[must_use]
pub fn legal_targets(
    state: &MatchState,
    actor: CharacterId,
    pattern: TargetPattern,
) -> Vec<CharacterId> {
    if pattern.declared_arity() == 0 {
        return Vec::new();
    }
    if pattern.targets_enemies() {
        if pattern == TargetPattern::SingleEnemy {
            let taunting = taunting_enemies(state, actor);
            if !taunting.is_empty() {
                return taunting;
            }
        }
        living_enemies(state, actor)
    } else {
        living_allies(state, actor)
    }
}

/// Validate a declaration's explicit targets against the pattern.
pub fn validate_targets(
    state: &MatchState,
    actor: CharacterId,
    pattern: TargetPattern,
    targets: &[CharacterId],
) -> Result<(), IllegalAction> {
    let expected = pattern.declared_arity();
    if targets.len() != expected {
        return Err(IllegalAction::TargetArity {
            expected,
            got: targets.len(),
        });
    }
    if expected == 0 {
        return Ok(());
    }

    let target = targets[0];
    if pattern.targets_enemies() {
        if !living_enemies(state, actor).contains(&target) {
            return Err(IllegalAction::IllegalTarget(target));
        }
        // Taunt only forces plain single-target attacks. Splash and
        // bounce declarations are exempt.
        if pattern == TargetPattern::SingleEnemy {
            let taunting = taunting_enemies(state, actor);
            if !taunting.is_empty() && !taunting.contains(&target) {
                return Err(IllegalAction::TauntEnforced);
            }
        }
    } else if !living_allies(state, actor).contains(&target) {
        return Err(IllegalAction::IllegalTarget(target));
    }
    Ok(())
}

/// Where a single-target enemy hit on `target` actually lands.
///
/// A living ally with Cover charges pulls the hit onto itself; with
/// several candidates the frontmost wins. The caller consumes the charge
/// and gates multi-target hits out before asking.
#[must_use]
pub fn cover_redirect(state: &MatchState, target: CharacterId) -> Option<CharacterId> {
    state
        .team(target.team())
        .living()
        .into_iter()
        .find(|&id| {
            id != target
                && state.character(id).status_dim(StatusKind::Cover, Dimension::Count) > 0
        })
}
