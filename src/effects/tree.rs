//! Effect trees - the structured effect language cards are authored in.
//!
//! An [`Effect`] is a small recursive tree: leaf operations (damage, heal,
//! status application, card flow) composed by `Multihit`, `Cond` and
//! `Spend`. The interpreter walks the tree at resolution; nothing here
//! mutates state.
//!
//! Faces whose printed behavior falls outside this language carry
//! [`Effect::Unmodeled`] with the rules text kept verbatim, so the data
//! pipeline never silently drops a card.

use serde::{Deserialize, Serialize};

use crate::core::ids::{CardId, CharacterId};
use crate::core::state::MatchState;
use crate::data::status::{Dimension, StatusKind};
use crate::zones::ZoneKind;

pub use crate::timing::Phase;

/// A declarative predicate over live match state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Always,
    SelfHasStatus(StatusKind),
    TargetHasStatus(StatusKind),
    /// Actor HP at or below this percentage of max.
    SelfHpAtMostPercent(i32),
    TargetHpAtMostPercent(i32),
    /// Actor's team energy pool at least this much.
    EnergyAtLeast(i32),
    RoundAtLeast(u32),
    Not(Box<Condition>),
    All(Vec<Condition>),
    Any(Vec<Condition>),
}

impl Condition {
    /// Evaluate against live state. Target-relative predicates are false
    /// when no target is in scope.
    #[must_use]
    pub fn eval(
        &self,
        state: &MatchState,
        actor: CharacterId,
        target: Option<CharacterId>,
    ) -> bool {
        match self {
            Condition::Always => true,
            Condition::SelfHasStatus(kind) => state.character(actor).has_status(*kind),
            Condition::TargetHasStatus(kind) => {
                target.is_some_and(|t| state.character(t).has_status(*kind))
            }
            Condition::SelfHpAtMostPercent(pct) => {
                let c = state.character(actor);
                c.hp * 100 <= c.max_hp * pct
            }
            Condition::TargetHpAtMostPercent(pct) => target.is_some_and(|t| {
                let c = state.character(t);
                c.hp * 100 <= c.max_hp * pct
            }),
            Condition::EnergyAtLeast(amount) => state.team(actor.team()).energy >= *amount,
            Condition::RoundAtLeast(round) => state.round >= *round,
            Condition::Not(inner) => !inner.eval(state, actor, target),
            Condition::All(parts) => parts.iter().all(|c| c.eval(state, actor, target)),
            Condition::Any(parts) => parts.iter().any(|c| c.eval(state, actor, target)),
        }
    }
}

/// An additional price paid inside an effect tree, beyond the card's cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpendResource {
    Energy(i32),
    Ultimate(i32),
    /// Discard a card from hand, chosen by the controller.
    CardFromHand,
}

/// One node of the effect language.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Deal damage to the targets in scope.
    Damage { amount: i32 },
    /// Repeat an effect as separate hits against the same targets.
    Multihit { hits: u8, effect: Box<Effect> },
    /// Heal the targets in scope (subject to healing reduction).
    Heal { amount: i32 },
    /// Grant Barrier value to the targets in scope.
    Shield { amount: i32 },
    /// Add to one dimension of a status on the targets.
    Apply {
        kind: StatusKind,
        dim: Dimension,
        amount: i32,
    },
    /// Set one dimension of a status on the targets.
    Set {
        kind: StatusKind,
        dim: Dimension,
        amount: i32,
    },
    /// Subtract from one dimension of a status on the targets.
    Reduce {
        kind: StatusKind,
        dim: Dimension,
        amount: i32,
    },
    /// Remove a status from the targets entirely.
    Remove { kind: StatusKind },
    /// Draw cards for the actor's team.
    Draw { count: u8 },
    GainEnergy { amount: i32 },
    ChargeUltimate { amount: i32 },
    /// Mint a new copy of a card into one of the actor's team's zones.
    Create { card: CardId, zone: ZoneKind },
    /// Look at the top cards of the deck and reorder or bottom them.
    Scry { count: u8 },
    /// Take a chosen card from the deck into hand (then shuffle).
    Seek,
    /// Take a chosen card from the discard pile into hand.
    Search,
    /// Retarget the action's remaining effects onto a chosen legal target.
    Redirect,
    /// Push the targets one slot along their line. The controller picks
    /// the direction; unanswered pushes go toward the back.
    Push,
    /// No further declarations this round.
    LockRound,
    /// Cancel the opposing action (meaningful only in a clash window).
    Cancel,
    /// Pay an extra price, then run the inner effect. If the price cannot
    /// be paid the inner effect is skipped.
    Spend {
        cost: SpendResource,
        then: Box<Effect>,
    },
    /// Run the inner effect only while the condition holds.
    Cond {
        when: Condition,
        then: Box<Effect>,
    },
    /// Behavior outside the effect language; logged and skipped.
    Unmodeled { text: String },
}

/// An effect bound to the timing window it fires in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhasedEffect {
    pub phase: Phase,
    pub effect: Effect,
}

impl PhasedEffect {
    #[must_use]
    pub fn new(phase: Phase, effect: Effect) -> Self {
        Self { phase, effect }
    }

    #[must_use]
    pub fn on_play(effect: Effect) -> Self {
        Self::new(Phase::OnPlay, effect)
    }

    #[must_use]
    pub fn before_clash(effect: Effect) -> Self {
        Self::new(Phase::BeforeClash, effect)
    }

    #[must_use]
    pub fn after_clash(effect: Effect) -> Self {
        Self::new(Phase::AfterClash, effect)
    }

    #[must_use]
    pub fn before_use(effect: Effect) -> Self {
        Self::new(Phase::BeforeUse, effect)
    }

    #[must_use]
    pub fn on_use(effect: Effect) -> Self {
        Self::new(Phase::OnUse, effect)
    }

    #[must_use]
    pub fn on_hit(effect: Effect) -> Self {
        Self::new(Phase::OnHit, effect)
    }

    #[must_use]
    pub fn after_use(effect: Effect) -> Self {
        Self::new(Phase::AfterUse, effect)
    }

    #[must_use]
    pub fn always(effect: Effect) -> Self {
        Self::new(Phase::Always, effect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{TeamId, TEAM_SIZE};
    use crate::core::state::Character;
    use crate::status::instance::StatusInstance;

    fn state() -> MatchState {
        let mut state = MatchState::new(1);
        for team in TeamId::both() {
            for i in 0..TEAM_SIZE {
                let id = CharacterId::of(team, i);
                state
                    .team_mut(team)
                    .characters
                    .push(Character::new(id, "c", 20, i as u8));
            }
        }
        state
    }

    #[test]
    fn test_hp_percent() {
        let mut state = state();
        let actor = CharacterId::new(0);
        state.character_mut(actor).hp = 10;

        assert!(Condition::SelfHpAtMostPercent(50).eval(&state, actor, None));
        assert!(!Condition::SelfHpAtMostPercent(49).eval(&state, actor, None));
    }

    #[test]
    fn test_target_predicates_without_target() {
        let state = state();
        let actor = CharacterId::new(0);

        assert!(!Condition::TargetHasStatus(StatusKind::Wound).eval(&state, actor, None));
        assert!(!Condition::TargetHpAtMostPercent(100).eval(&state, actor, None));
    }

    #[test]
    fn test_status_predicates() {
        let mut state = state();
        let actor = CharacterId::new(0);
        let target = CharacterId::new(3);

        let mut wound = StatusInstance::new(StatusKind::Wound);
        wound.stack = 1;
        state.character_mut(target).statuses.push(wound);

        assert!(Condition::TargetHasStatus(StatusKind::Wound).eval(&state, actor, Some(target)));
        assert!(!Condition::SelfHasStatus(StatusKind::Wound).eval(&state, actor, Some(target)));
    }

    #[test]
    fn test_combinators() {
        let mut state = state();
        let actor = CharacterId::new(0);
        state.team_mut(TeamId::new(0)).energy = 3;

        let cond = Condition::All(vec![
            Condition::EnergyAtLeast(3),
            Condition::Not(Box::new(Condition::RoundAtLeast(2))),
        ]);
        assert!(cond.eval(&state, actor, None));

        state.round = 2;
        assert!(!cond.eval(&state, actor, None));

        let any = Condition::Any(vec![
            Condition::RoundAtLeast(5),
            Condition::EnergyAtLeast(1),
        ]);
        assert!(any.eval(&state, actor, None));
    }
}
