//! Priority and clash resolution.
//!
//! Declarations are validated atomically against live state, ordered by
//! speed zone (declaration order within a zone), then resolved one at a
//! time. Two same-zone actions from opposite sides clash when they target
//! each other's actors, or when one targets the actor of a Defense-category
//! action; a clash resolves both actions against private snapshots of the
//! pre-clash state and merges their mutation journals back in declaration
//! order, re-clamping every bound.

use crate::choice::ChoiceBroker;
use crate::core::action::Action;
use crate::core::event::{EventKind, EventLog};
use crate::core::ids::CardId;
use crate::core::mutation::{apply_journal, Mutation};
use crate::core::state::MatchState;
use crate::data::card::{CardCategory, SpeedZone, TargetPattern};
use crate::data::rulebook::Rulebook;
use crate::effects::interpreter::{resolve_target_set, run_phase, ActionCtx, EffectRun};
use crate::effects::tree::Phase;
use crate::error::{EngineError, IllegalAction};
use crate::status::engine::action_modifiers;
use crate::targeting;
use crate::zones::ZoneKind;

/// A declaration that passed atomic validation, with its resolved costs
/// and timing.
#[derive(Clone, Debug)]
pub struct PendingAction {
    pub action: Action,
    /// Face at declaration time (transforms may still swap it at play).
    pub card: CardId,
    pub category: CardCategory,
    pub speed: SpeedZone,
    pub energy_cost: i32,
    pub ultimate_cost: i32,
}

/// Validate a declaration against live state. Nothing is mutated; a
/// rejection leaves the match untouched and emits zero events.
pub fn validate(
    state: &MatchState,
    rulebook: &Rulebook,
    action: &Action,
) -> Result<PendingAction, EngineError> {
    if state.block_play {
        return Err(IllegalAction::RoundLocked.into());
    }
    let team = action.actor.team();
    if state.movement_pending[team.index()] {
        return Err(IllegalAction::MovementPending.into());
    }
    let actor = state.character(action.actor);
    if actor.defeated {
        return Err(IllegalAction::ActorDefeated(action.actor).into());
    }

    let side = state.team(team);
    if !side.zones.is_in(action.card, ZoneKind::Hand) {
        return Err(IllegalAction::CardNotInHand(action.card).into());
    }
    let instance = side
        .instances
        .get(&action.card)
        .ok_or(IllegalAction::CardNotInHand(action.card))?;
    if instance.owner != action.actor {
        return Err(IllegalAction::NotCardOwner {
            card: action.card,
            owner: instance.owner,
        }
        .into());
    }

    let def = rulebook.require(instance.current)?;
    let mods = action_modifiers(actor, rulebook.statuses(), def.category)?;
    if let Some(blocker) = mods.blocked_by {
        return Err(IllegalAction::CategoryBlocked(blocker).into());
    }

    let speed = mods.effective_speed(def.speed);
    if let Some(declared) = action.declared_speed {
        if declared != speed {
            return Err(IllegalAction::SpeedMismatch.into());
        }
    }

    let mut energy_cost = (def.cost.energy + mods.cost_delta).max(0);
    if def.cost.variable {
        energy_cost += action.spend.max(0);
    }
    if side.energy < energy_cost {
        return Err(IllegalAction::InsufficientEnergy {
            need: energy_cost,
            have: side.energy,
        }
        .into());
    }
    // The full printed ultimate cost must be charged; modifiers never
    // discount it.
    if side.ultimate < def.cost.ultimate {
        return Err(IllegalAction::UltimateNotCharged {
            need: def.cost.ultimate,
            have: side.ultimate,
        }
        .into());
    }

    targeting::validate_targets(state, action.actor, def.pattern, &action.targets)?;

    for restriction in &def.restrictions {
        if !restriction
            .require
            .eval(state, action.actor, action.targets.first().copied())
        {
            return Err(IllegalAction::RestrictionFailed.into());
        }
    }

    Ok(PendingAction {
        action: action.clone(),
        card: instance.current,
        category: def.category,
        speed,
        energy_cost,
        ultimate_cost: def.cost.ultimate,
    })
}

/// Stable speed-zone order: all Fast before all Normal before all Slow,
/// declaration order within a zone.
pub fn order_actions(mut pending: Vec<PendingAction>) -> Vec<PendingAction> {
    pending.sort_by_key(|p| p.speed);
    pending
}

/// Whether two ordered actions clash.
#[must_use]
pub fn clashes(a: &PendingAction, b: &PendingAction) -> bool {
    if a.speed != b.speed || a.action.actor.team() == b.action.actor.team() {
        return false;
    }
    let a_targets_b = a.action.targets.contains(&b.action.actor);
    let b_targets_a = b.action.targets.contains(&a.action.actor);
    (a_targets_b && b_targets_a)
        || (a_targets_b && b.category == CardCategory::Defense)
        || (b_targets_a && a.category == CardCategory::Defense)
}

/// Resolve a full set of declared actions against live state.
pub fn resolve_all(
    state: &mut MatchState,
    rulebook: &Rulebook,
    log: &mut EventLog,
    pending: Vec<PendingAction>,
) -> Result<(), EngineError> {
    let ordered = order_actions(pending);
    let mut consumed = vec![false; ordered.len()];

    for i in 0..ordered.len() {
        if consumed[i] {
            continue;
        }
        consumed[i] = true;
        let partner = (i + 1..ordered.len())
            .find(|&j| !consumed[j] && clashes(&ordered[i], &ordered[j]));
        match partner {
            Some(j) => {
                consumed[j] = true;
                resolve_clash(state, rulebook, log, &ordered[i], &ordered[j])?;
            }
            None => resolve_single(state, rulebook, log, &ordered[i])?,
        }
    }
    Ok(())
}

/// Begin one action on live state: root event, cost payment, transforms,
/// the card's zone move, and target resolution. Returns the context plus
/// whether a cancel-defensive hook is armed.
fn begin(
    state: &mut MatchState,
    rulebook: &Rulebook,
    log: &mut EventLog,
    pending: &PendingAction,
) -> Result<(ActionCtx, bool), EngineError> {
    let action = &pending.action;
    let team = action.actor.team();
    let root = log.push(
        None,
        EventKind::ActionDeclared {
            actor: action.actor,
            card: pending.card,
        },
    );

    let mut ctx = ActionCtx::new(
        action.actor,
        action.card,
        pending.card,
        pending.category,
        root,
        ChoiceBroker::new(action.answers.clone()),
    );

    // The round may have invalidated the declaration since it was made.
    let still_legal = state.character(action.actor).is_alive()
        && state.team(team).zones.is_in(action.card, ZoneKind::Hand)
        && state.team(team).energy >= pending.energy_cost
        && state.team(team).ultimate >= pending.ultimate_cost;
    if !still_legal {
        ctx.cancelled = true;
        log.push(Some(root), EventKind::ActionCancelled { actor: action.actor });
        return Ok((ctx, false));
    }

    let mut run = EffectRun::new(state, rulebook, log);
    if pending.energy_cost > 0 {
        run.push(
            root,
            Mutation::Energy {
                team,
                delta: -pending.energy_cost,
            },
            EventKind::EnergySpent {
                team,
                amount: pending.energy_cost,
            },
        )?;
    }
    if pending.ultimate_cost > 0 {
        run.push(
            root,
            Mutation::Ultimate {
                team,
                delta: -pending.ultimate_cost,
            },
            EventKind::UltimateSpent {
                team,
                amount: pending.ultimate_cost,
            },
        )?;
    }

    // Transforms chain along validated acyclic candidates. Within one
    // face the last matching candidate wins.
    let mut face = pending.card;
    loop {
        let def = run.rulebook.require(face)?;
        let swap = def
            .transforms
            .iter()
            .rev()
            .find(|c| {
                c.condition
                    .eval(run.state, action.actor, action.targets.first().copied())
            })
            .map(|c| c.into);
        match swap {
            Some(into) => {
                run.push(
                    root,
                    Mutation::TransformInto {
                        team,
                        instance: action.card,
                        into,
                    },
                    EventKind::Transformed {
                        instance: action.card,
                        into,
                    },
                )?;
                face = into;
            }
            None => break,
        }
    }
    ctx.card = face;
    let def = rulebook.require(face)?;
    ctx.category = def.category;

    // The played card leaves hand before any effect runs.
    let destination = if def.exhausts {
        ZoneKind::Exhaust
    } else {
        ZoneKind::Discard
    };
    run.push(
        root,
        Mutation::CardMove {
            team,
            instance: action.card,
            to: destination,
        },
        EventKind::CardMoved {
            instance: action.card,
            from: ZoneKind::Hand,
            to: destination,
        },
    )?;

    ctx.targets = resolve_target_set(run.state, action.actor, def.pattern, &action.targets);
    ctx.single_target = def.pattern == TargetPattern::SingleEnemy;

    let mods = action_modifiers(
        run.state.character(action.actor),
        rulebook.statuses(),
        def.category,
    )?;
    ctx.damage_bonus = mods.damage_delta;
    Ok((ctx, mods.cancel_defensive))
}

/// Open an action's Use-side windows, applying the cancel-defensive hook
/// before any card effect. An action that completes its windows registers
/// as used; a cancelled one never does.
fn use_windows(
    run: &mut EffectRun<'_>,
    ctx: &mut ActionCtx,
    cancel_defensive: bool,
) -> Result<(), EngineError> {
    if cancel_defensive && !ctx.cancelled {
        ctx.cancelled = true;
        run.note(ctx.root, EventKind::ActionCancelled { actor: ctx.actor });
    }
    run_phase(run, ctx, Phase::BeforeUse)?;
    run_phase(run, ctx, Phase::OnUse)?;
    run_phase(run, ctx, Phase::AfterUse)?;
    if !ctx.cancelled {
        run.note(ctx.root, EventKind::ActionUsed { actor: ctx.actor });
    }
    Ok(())
}

fn resolve_single(
    state: &mut MatchState,
    rulebook: &Rulebook,
    log: &mut EventLog,
    pending: &PendingAction,
) -> Result<(), EngineError> {
    let (mut ctx, cancel_defensive) = begin(state, rulebook, log, pending)?;
    let mut run = EffectRun::new(state, rulebook, log);
    run_phase(&mut run, &mut ctx, Phase::OnPlay)?;
    use_windows(&mut run, &mut ctx, cancel_defensive)?;
    run_phase(&mut run, &mut ctx, Phase::Always)
}

/// Resolve a clashing pair. `first` was declared earlier.
fn resolve_clash(
    state: &mut MatchState,
    rulebook: &Rulebook,
    log: &mut EventLog,
    first: &PendingAction,
    second: &PendingAction,
) -> Result<(), EngineError> {
    let (mut ctx_a, cancel_a) = begin(state, rulebook, log, first)?;
    let (mut ctx_b, cancel_b) = begin(state, rulebook, log, second)?;

    log.push(
        None,
        EventKind::ClashDeclared {
            first: first.action.actor,
            second: second.action.actor,
        },
    );

    // Before Clash runs on live state; Cancel effects land here.
    {
        let mut run = EffectRun::new(state, rulebook, log);
        run_phase(&mut run, &mut ctx_a, Phase::OnPlay)?;
        run_phase(&mut run, &mut ctx_b, Phase::OnPlay)?;
        run_phase(&mut run, &mut ctx_a, Phase::BeforeClash)?;
        run_phase(&mut run, &mut ctx_b, Phase::BeforeClash)?;
    }
    if ctx_a.cancel_opponent && !ctx_b.cancelled {
        ctx_b.cancelled = true;
        log.push(Some(ctx_b.root), EventKind::ActionCancelled { actor: ctx_b.actor });
    }
    if ctx_b.cancel_opponent && !ctx_a.cancelled {
        ctx_a.cancelled = true;
        log.push(Some(ctx_a.root), EventKind::ActionCancelled { actor: ctx_a.actor });
    }

    // Each side's Use windows run against a private snapshot of the
    // pre-clash state, journaling every write. The RNG stream threads
    // through the first run into the second.
    let mut snapshot_a = state.clone();
    let mut journal_a = Vec::new();
    {
        let mut run = EffectRun::journaled(&mut snapshot_a, rulebook, log, &mut journal_a);
        use_windows(&mut run, &mut ctx_a, cancel_a)?;
    }

    let mut snapshot_b = state.clone();
    snapshot_b.rng = snapshot_a.rng.clone();
    let mut journal_b = Vec::new();
    {
        let mut run = EffectRun::journaled(&mut snapshot_b, rulebook, log, &mut journal_b);
        use_windows(&mut run, &mut ctx_b, cancel_b)?;
    }

    // Merge in declaration order, re-clamping every bound.
    state.rng = snapshot_b.rng.clone();
    apply_journal(state, rulebook.statuses(), &journal_a)?;
    apply_journal(state, rulebook.statuses(), &journal_b)?;

    let mut run = EffectRun::new(state, rulebook, log);
    run_phase(&mut run, &mut ctx_a, Phase::AfterClash)?;
    run_phase(&mut run, &mut ctx_b, Phase::AfterClash)?;
    run_phase(&mut run, &mut ctx_a, Phase::Always)?;
    run_phase(&mut run, &mut ctx_b, Phase::Always)
}
