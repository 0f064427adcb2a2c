//! Status pipelines - pure calculations over a character's statuses.
//!
//! Nothing here mutates state. These helpers compute what a damage packet,
//! a heal, an action declaration, or a Turn End would do; the interpreter
//! and round driver turn the answers into mutations and events.

use crate::data::card::{CardCategory, SpeedZone};
use crate::data::status::{
    Dimension, ModifierHook, StatusCatalog, StatusKind, TurnEndBehavior,
};
use crate::core::state::Character;
use crate::error::DataIntegrityError;

/// Net effect of the defender's statuses on one incoming damage hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Invulnerable zeroed the hit. Nothing else applies, thorns included.
    pub negated: bool,
    /// Barrier value consumed.
    pub absorbed: i32,
    /// Damage that reaches HP.
    pub to_hp: i32,
    /// Thorns potency reflected back at the attacker for this hit.
    pub thorns: i32,
}

/// Work out what the defender's statuses do to one incoming hit.
///
/// Invulnerable negates outright. Otherwise Barrier absorbs up to its
/// value and the remainder reaches HP. Thorns reflects its potency per
/// connecting hit; a negated hit never connects.
#[must_use]
pub fn mitigate(defender: &Character, amount: i32) -> DamageOutcome {
    let amount = amount.max(0);
    if defender.status_dim(StatusKind::Invulnerable, Dimension::Count) > 0 {
        return DamageOutcome {
            negated: true,
            ..DamageOutcome::default()
        };
    }
    let barrier = defender.status_dim(StatusKind::Barrier, Dimension::Value);
    let absorbed = amount.min(barrier);
    let thorns = if defender.status_dim(StatusKind::Thorns, Dimension::Stack) > 0 {
        defender.status_dim(StatusKind::Thorns, Dimension::Potency)
    } else {
        0
    };
    DamageOutcome {
        negated: false,
        absorbed,
        to_hp: amount - absorbed,
        thorns,
    }
}

/// Healing reduction. Every heal that reaches a character flows through
/// this one formula: effective = max(0, amount - Wound value - Wither
/// value). Returns `(effective, reduced_by)`.
#[must_use]
pub fn reduced_heal(target: &Character, amount: i32) -> (i32, i32) {
    let amount = amount.max(0);
    let reduction = target.status_dim(StatusKind::Wound, Dimension::Value)
        + target.status_dim(StatusKind::Wither, Dimension::Value);
    let reduced_by = reduction.min(amount);
    (amount - reduced_by, reduced_by)
}

/// Net effect of the actor's statuses on a declaration.
///
/// Numeric contributions combine additively across statuses; a blocking
/// hook wins outright.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionModifiers {
    /// Added to the card's energy cost (floored at zero by the caller).
    pub cost_delta: i32,
    /// Added to every damage amount the action deals.
    pub damage_delta: i32,
    /// Speed zones the action slips (each step saturates at Slow).
    pub slower_zones: u8,
    /// The status blocking this card's category, if any.
    pub blocked_by: Option<StatusKind>,
    /// A Defense-category action is cancelled at Before Use.
    pub cancel_defensive: bool,
}

/// Fold the actor's active statuses into one modifier set for a card of
/// the given category.
pub fn action_modifiers(
    actor: &Character,
    catalog: &StatusCatalog,
    category: CardCategory,
) -> Result<ActionModifiers, DataIntegrityError> {
    let mut out = ActionModifiers::default();
    for status in &actor.statuses {
        let def = catalog.require(status.kind)?;
        if status.expired(def) {
            continue;
        }
        for hook in &def.hooks {
            match hook {
                ModifierHook::DamagePlusPotency => out.damage_delta += status.potency,
                ModifierHook::CostPlusPotency => out.cost_delta += status.potency,
                ModifierHook::SlowerByOneZone => out.slower_zones += 1,
                ModifierHook::BlockCategory(blocked) => {
                    if *blocked == category && out.blocked_by.is_none() {
                        out.blocked_by = Some(status.kind);
                    }
                }
                ModifierHook::CancelDefensive => {
                    if category == CardCategory::Defense {
                        out.cancel_defensive = true;
                    }
                }
            }
        }
    }
    Ok(out)
}

impl ActionModifiers {
    /// The speed zone the action actually resolves in.
    #[must_use]
    pub fn effective_speed(&self, base: SpeedZone) -> SpeedZone {
        let mut speed = base;
        for _ in 0..self.slower_zones {
            speed = speed.slower();
        }
        speed
    }
}

/// What one character's Turn End will do, computed before any mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnEndPlan {
    /// Raw Regen tick (potency), before healing reduction.
    pub regen_heal: i32,
    /// Renewal burst heal when its countdown expires this Turn End.
    pub renewal_heal: Option<i32>,
    /// Dimensions that lose one at decay, in status application order.
    pub decays: Vec<(StatusKind, Dimension)>,
    /// Statuses that will have expired once decay is applied.
    pub expires: Vec<StatusKind>,
}

/// Plan a character's Turn End: Regen tick, Renewal expiry heal, then the
/// per-status decay step, then expiry removal.
pub fn plan_turn_end(
    character: &Character,
    catalog: &StatusCatalog,
) -> Result<TurnEndPlan, DataIntegrityError> {
    let mut plan = TurnEndPlan::default();
    for status in &character.statuses {
        let def = catalog.require(status.kind)?;
        if status.expired(def) {
            plan.expires.push(status.kind);
            continue;
        }
        match status.kind {
            StatusKind::Regen if status.count > 0 => plan.regen_heal += status.potency,
            StatusKind::Renewal if status.count == 1 => plan.renewal_heal = Some(status.value),
            _ => {}
        }
        let decay_dim = match def.turn_end {
            TurnEndBehavior::LoseOneStack => Some(Dimension::Stack),
            TurnEndBehavior::CountDown => Some(Dimension::Count),
            TurnEndBehavior::None => None,
        };
        if let Some(dim) = decay_dim {
            plan.decays.push((status.kind, dim));
            if status.get(def.governing) - i32::from(dim == def.governing) <= 0 {
                plan.expires.push(status.kind);
            }
        }
    }
    Ok(plan)
}
