//! Effect interpreter.
//!
//! Walks a card's effect trees for one timing window and turns them into
//! mutations and events. The same interpreter serves both resolution modes:
//! against live state directly, or against a clash snapshot with every
//! mutation journaled for the later merge. State writes all flow through
//! [`EffectRun::push`] / [`EffectRun::apply`], so journaling is a property
//! of the run, not of individual effects.

use crate::choice::{ChoiceBroker, ChoiceKind};
use crate::core::event::{EventKind, EventLog};
use crate::core::ids::{CardId, CharacterId, EventId, InstanceId};
use crate::core::mutation::Mutation;
use crate::core::state::MatchState;
use crate::data::card::{CardCategory, TargetPattern};
use crate::data::rulebook::Rulebook;
use crate::data::status::{Dimension, StatusKind};
use crate::effects::tree::{Effect, Phase, SpendResource};
use crate::error::EngineError;
use crate::position::{self, PushDirection};
use crate::status::engine as status_engine;
use crate::targeting;
use crate::zones::ZoneKind;

/// The mutable surfaces one resolution writes to.
pub struct EffectRun<'a> {
    pub state: &'a mut MatchState,
    pub rulebook: &'a Rulebook,
    pub log: &'a mut EventLog,
    /// When present, every applied mutation is also journaled (clash
    /// snapshot mode).
    pub journal: Option<&'a mut Vec<Mutation>>,
}

impl<'a> EffectRun<'a> {
    pub fn new(
        state: &'a mut MatchState,
        rulebook: &'a Rulebook,
        log: &'a mut EventLog,
    ) -> Self {
        Self {
            state,
            rulebook,
            log,
            journal: None,
        }
    }

    pub fn journaled(
        state: &'a mut MatchState,
        rulebook: &'a Rulebook,
        log: &'a mut EventLog,
        journal: &'a mut Vec<Mutation>,
    ) -> Self {
        Self {
            state,
            rulebook,
            log,
            journal: Some(journal),
        }
    }

    /// Apply a mutation (journaling it if the run journals) without an
    /// event of its own.
    pub fn apply(&mut self, mutation: Mutation) -> Result<(), EngineError> {
        mutation.apply(self.state, self.rulebook.statuses())?;
        if let Some(journal) = self.journal.as_deref_mut() {
            journal.push(mutation);
        }
        Ok(())
    }

    /// Apply a mutation and log the event it caused.
    pub fn push(
        &mut self,
        parent: EventId,
        mutation: Mutation,
        kind: EventKind,
    ) -> Result<(), EngineError> {
        self.apply(mutation)?;
        self.log.push(Some(parent), kind);
        Ok(())
    }

    /// Log an event that has no state write of its own.
    pub fn note(&mut self, parent: EventId, kind: EventKind) {
        self.log.push(Some(parent), kind);
    }
}

/// Per-action resolution context, threaded through every window.
pub struct ActionCtx {
    pub actor: CharacterId,
    pub instance: InstanceId,
    /// The face being resolved.
    pub card: CardId,
    pub category: CardCategory,
    /// Resolved target set. Redirect replaces it mid-resolution.
    pub targets: Vec<CharacterId>,
    /// Whether the action declared a plain single enemy target. Only such
    /// hits qualify for Cover redirection.
    pub single_target: bool,
    /// Root event every emission of this action parents to.
    pub root: EventId,
    /// Set when the action was cancelled; only Always still fires.
    pub cancelled: bool,
    /// Set by a Cancel effect during a clash window; the resolver applies
    /// it to the opposing action.
    pub cancel_opponent: bool,
    /// Flat bonus added to every Damage leaf (Empower and kin).
    pub damage_bonus: i32,
    pub answers: ChoiceBroker,
    in_on_hit: bool,
}

impl ActionCtx {
    #[must_use]
    pub fn new(
        actor: CharacterId,
        instance: InstanceId,
        card: CardId,
        category: CardCategory,
        root: EventId,
        answers: ChoiceBroker,
    ) -> Self {
        Self {
            actor,
            instance,
            card,
            category,
            targets: Vec::new(),
            single_target: true,
            root,
            cancelled: false,
            cancel_opponent: false,
            damage_bonus: 0,
            answers,
            in_on_hit: false,
        }
    }
}

/// Expand a card's pattern into the concrete target set at resolution time.
/// Random picks consume the match RNG.
pub fn resolve_target_set(
    state: &mut MatchState,
    actor: CharacterId,
    pattern: TargetPattern,
    declared: &[CharacterId],
) -> Vec<CharacterId> {
    match pattern {
        TargetPattern::SelfOnly => vec![actor],
        TargetPattern::SingleAlly | TargetPattern::SingleEnemy => declared.to_vec(),
        TargetPattern::AllAllies => targeting::living_allies(state, actor),
        TargetPattern::AllEnemies => targeting::living_enemies(state, actor),
        TargetPattern::RandomEnemy => {
            let pool = targeting::living_enemies(state, actor);
            match state.rng.choose(&pool).copied() {
                Some(t) => vec![t],
                None => Vec::new(),
            }
        }
        TargetPattern::Splash => match declared.first() {
            Some(&center) => position::splash_targets(state, center),
            None => Vec::new(),
        },
        TargetPattern::Bounce { hits } => {
            let mut targets = declared.to_vec();
            let pool = targeting::living_enemies(state, actor);
            for _ in 1..hits {
                if let Some(t) = state.rng.choose(&pool).copied() {
                    targets.push(t);
                }
            }
            targets
        }
    }
}

/// Run every effect the card registered for one timing window. Status
/// modifier hooks for the window have already been folded into the context
/// by the resolver; card effects run here.
pub fn run_phase(
    run: &mut EffectRun<'_>,
    ctx: &mut ActionCtx,
    phase: Phase,
) -> Result<(), EngineError> {
    if ctx.cancelled && !phase.fires_when_cancelled() {
        return Ok(());
    }
    let rulebook = run.rulebook;
    let def = rulebook.require(ctx.card)?;
    for phased in &def.effects {
        if phased.phase == phase {
            let targets = ctx.targets.clone();
            run_effect(run, ctx, &phased.effect, &targets)?;
        }
    }
    Ok(())
}

fn run_effect(
    run: &mut EffectRun<'_>,
    ctx: &mut ActionCtx,
    effect: &Effect,
    targets: &[CharacterId],
) -> Result<(), EngineError> {
    match effect {
        Effect::Damage { amount } => {
            let amount = amount + ctx.damage_bonus;
            for &target in targets {
                deal_hit(run, ctx, target, amount, false)?;
            }
        }
        Effect::Multihit { hits, effect } => {
            for _ in 0..*hits {
                run_effect(run, ctx, effect, targets)?;
            }
        }
        Effect::Heal { amount } => {
            for &target in targets {
                heal(run, ctx.root, target, *amount)?;
            }
        }
        Effect::Shield { amount } => {
            for &target in targets {
                if !run.state.character(target).is_alive() {
                    continue;
                }
                run.push(
                    ctx.root,
                    Mutation::StatusApply {
                        target,
                        kind: StatusKind::Barrier,
                        dim: Dimension::Value,
                        delta: *amount,
                    },
                    EventKind::StatusApplied {
                        target,
                        kind: StatusKind::Barrier,
                        dim: Dimension::Value,
                        amount: *amount,
                    },
                )?;
            }
        }
        Effect::Apply { kind, dim, amount } => {
            for &target in targets {
                if !run.state.character(target).is_alive() {
                    continue;
                }
                run.push(
                    ctx.root,
                    Mutation::StatusApply {
                        target,
                        kind: *kind,
                        dim: *dim,
                        delta: *amount,
                    },
                    EventKind::StatusApplied {
                        target,
                        kind: *kind,
                        dim: *dim,
                        amount: *amount,
                    },
                )?;
            }
        }
        Effect::Set { kind, dim, amount } => {
            for &target in targets {
                if !run.state.character(target).is_alive() {
                    continue;
                }
                run.push(
                    ctx.root,
                    Mutation::StatusSet {
                        target,
                        kind: *kind,
                        dim: *dim,
                        value: *amount,
                    },
                    EventKind::StatusSet {
                        target,
                        kind: *kind,
                        dim: *dim,
                        amount: *amount,
                    },
                )?;
            }
        }
        Effect::Reduce { kind, dim, amount } => {
            for &target in targets {
                run.push(
                    ctx.root,
                    Mutation::StatusApply {
                        target,
                        kind: *kind,
                        dim: *dim,
                        delta: -amount,
                    },
                    EventKind::StatusReduced {
                        target,
                        kind: *kind,
                        dim: *dim,
                        amount: *amount,
                    },
                )?;
                expire_if_spent(run, ctx.root, target, *kind)?;
            }
        }
        Effect::Remove { kind } => {
            for &target in targets {
                if run.state.character(target).has_status(*kind) {
                    run.push(
                        ctx.root,
                        Mutation::StatusRemove { target, kind: *kind },
                        EventKind::StatusRemoved { target, kind: *kind },
                    )?;
                }
            }
        }
        Effect::Draw { count } => {
            for _ in 0..*count {
                draw_one(run, ctx.root, ctx.actor.team())?;
            }
        }
        Effect::GainEnergy { amount } => {
            let team = ctx.actor.team();
            run.push(
                ctx.root,
                Mutation::Energy { team, delta: *amount },
                EventKind::EnergyGained { team, amount: *amount },
            )?;
        }
        Effect::ChargeUltimate { amount } => {
            let team = ctx.actor.team();
            run.push(
                ctx.root,
                Mutation::Ultimate { team, delta: *amount },
                EventKind::UltimateCharged { team, amount: *amount },
            )?;
        }
        Effect::Create { card, zone } => {
            let team = ctx.actor.team();
            let instance = run.state.alloc_instance();
            run.push(
                ctx.root,
                Mutation::CardCreate {
                    team,
                    instance,
                    card: *card,
                    owner: ctx.actor,
                    zone: *zone,
                },
                EventKind::CardCreated {
                    team,
                    instance,
                    card: *card,
                },
            )?;
        }
        Effect::Scry { count } => scry(run, ctx, *count)?,
        Effect::Seek => seek(run, ctx)?,
        Effect::Search => search(run, ctx)?,
        Effect::Redirect => redirect(run, ctx)?,
        Effect::Push => {
            let answered = ctx.answers.push_direction();
            let auto = answered.is_none();
            // Fallback: toward the back of the line.
            let direction = answered.unwrap_or(PushDirection::TowardBack);
            for &target in targets {
                push_target(run, ctx.root, target, direction)?;
            }
            run.note(
                ctx.root,
                EventKind::ChoiceResolved {
                    kind: ChoiceKind::PushDirection,
                    auto,
                },
            );
        }
        Effect::LockRound => {
            run.push(ctx.root, Mutation::LockRound, EventKind::RoundLocked)?;
        }
        Effect::Cancel => {
            ctx.cancel_opponent = true;
        }
        Effect::Spend { cost, then } => spend_then(run, ctx, cost, then, targets)?,
        Effect::Cond { when, then } => {
            if when.eval(run.state, ctx.actor, targets.first().copied()) {
                run_effect(run, ctx, then, targets)?;
            }
        }
        Effect::Unmodeled { .. } => {
            run.note(ctx.root, EventKind::UnmodeledSkipped { card: ctx.card });
        }
    }
    Ok(())
}

/// One damage hit against one character: Cover redirect (single-target
/// enemy hits only), Invulnerable, Barrier, HP, Thorns, then the card's
/// On Hit window if the hit connected.
fn deal_hit(
    run: &mut EffectRun<'_>,
    ctx: &mut ActionCtx,
    target: CharacterId,
    amount: i32,
    reflected: bool,
) -> Result<(), EngineError> {
    let mut victim = target;
    if !run.state.character(victim).is_alive() {
        return Ok(());
    }

    // Cover only intercepts single-target, enemy-sourced, unreflected
    // hits; sweep, splash, and bounce resolution ignores it.
    if !reflected && ctx.single_target && ctx.actor.team() != victim.team() {
        if let Some(holder) = targeting::cover_redirect(run.state, victim) {
            run.push(
                ctx.root,
                Mutation::StatusApply {
                    target: holder,
                    kind: StatusKind::Cover,
                    dim: Dimension::Count,
                    delta: -1,
                },
                EventKind::CoverRedirected {
                    from: victim,
                    to: holder,
                },
            )?;
            expire_if_spent(run, ctx.root, holder, StatusKind::Cover)?;
            victim = holder;
        }
    }

    let outcome = status_engine::mitigate(run.state.character(victim), amount);
    if outcome.negated {
        run.note(ctx.root, EventKind::DamageNegated { target: victim });
        return Ok(());
    }

    if outcome.absorbed > 0 {
        run.push(
            ctx.root,
            Mutation::StatusApply {
                target: victim,
                kind: StatusKind::Barrier,
                dim: Dimension::Value,
                delta: -outcome.absorbed,
            },
            EventKind::ShieldAbsorb {
                target: victim,
                amount: outcome.absorbed,
            },
        )?;
        expire_if_spent(run, ctx.root, victim, StatusKind::Barrier)?;
    }

    if outcome.to_hp > 0 {
        run.push(
            ctx.root,
            Mutation::Hp {
                target: victim,
                delta: -outcome.to_hp,
            },
            EventKind::DamageApplied {
                source: ctx.actor,
                target: victim,
                amount: outcome.to_hp,
            },
        )?;
        if run.state.character(victim).defeated {
            run.note(ctx.root, EventKind::CharacterDefeated { target: victim });
        }
    }

    // The hit connected. Thorns first, then the On Hit window.
    if outcome.thorns > 0 && !reflected {
        run.note(
            ctx.root,
            EventKind::ThornsReflected {
                source: victim,
                target: ctx.actor,
                amount: outcome.thorns,
            },
        );
        deal_hit(run, ctx, ctx.actor, outcome.thorns, true)?;
    }

    if !reflected && !ctx.in_on_hit {
        ctx.in_on_hit = true;
        let prior = std::mem::replace(&mut ctx.targets, vec![victim]);
        let result = run_phase(run, ctx, Phase::OnHit);
        ctx.targets = prior;
        ctx.in_on_hit = false;
        result?;
    }
    Ok(())
}

/// One heal through the single reduction path.
fn heal(
    run: &mut EffectRun<'_>,
    parent: EventId,
    target: CharacterId,
    amount: i32,
) -> Result<(), EngineError> {
    if !run.state.character(target).is_alive() {
        return Ok(());
    }
    let (effective, reduced_by) = status_engine::reduced_heal(run.state.character(target), amount);
    if effective > 0 {
        run.apply(Mutation::Hp {
            target,
            delta: effective,
        })?;
    }
    run.note(
        parent,
        EventKind::Healed {
            target,
            amount: effective,
            reduced_by,
        },
    );
    Ok(())
}

/// Draw one card for a team, reshuffling the discard pile into the deck
/// first when the deck is empty. Also the round-start draw primitive.
pub(crate) fn draw_one(
    run: &mut EffectRun<'_>,
    parent: EventId,
    team: crate::core::ids::TeamId,
) -> Result<(), EngineError> {
    if let Some(plan) = {
        let side = run.state.team(team);
        let mut rng = run.state.rng.clone();
        let plan = side.zones.plan_reshuffle(&mut rng);
        if plan.is_some() {
            run.state.rng = rng;
        }
        plan
    } {
        let count = plan.order.len() as u32;
        run.push(
            parent,
            Mutation::DeckReshuffle {
                team,
                order: plan.order,
            },
            EventKind::DeckReshuffled { team, count },
        )?;
    }
    if let Some(instance) = run.state.team(team).zones.deck_top() {
        run.push(
            parent,
            Mutation::CardMove {
                team,
                instance,
                to: ZoneKind::Hand,
            },
            EventKind::CardDrawn { team, instance },
        )?;
    }
    Ok(())
}

fn scry(run: &mut EffectRun<'_>, ctx: &mut ActionCtx, count: u8) -> Result<(), EngineError> {
    let team = ctx.actor.team();
    let deck = run.state.team(team).zones.zone(ZoneKind::Deck);
    let peeked: Vec<InstanceId> = deck.iter().rev().take(usize::from(count)).copied().collect();
    if peeked.is_empty() {
        return Ok(());
    }

    match ctx.answers.scry_order() {
        Some(order) => {
            let kept: Vec<InstanceId> = order
                .into_iter()
                .filter(|i| peeked.contains(i))
                .collect();
            // Omitted peeked cards are bottomed in their top-first order.
            for &instance in peeked.iter().filter(|i| !kept.contains(i)) {
                run.apply(Mutation::DeckBottom { team, instance })?;
            }
            if !kept.is_empty() {
                run.apply(Mutation::DeckPlaceTop { team, order: kept })?;
            }
            run.note(
                ctx.root,
                EventKind::ChoiceResolved {
                    kind: ChoiceKind::ScryOrder,
                    auto: false,
                },
            );
        }
        // Fallback: keep the peeked cards exactly where they are.
        None => run.note(
            ctx.root,
            EventKind::ChoiceResolved {
                kind: ChoiceKind::ScryOrder,
                auto: true,
            },
        ),
    }
    Ok(())
}

fn seek(run: &mut EffectRun<'_>, ctx: &mut ActionCtx) -> Result<(), EngineError> {
    let team = ctx.actor.team();
    if run.state.team(team).zones.zone_size(ZoneKind::Deck) == 0 {
        return Ok(());
    }

    let answered = ctx
        .answers
        .seek_card()
        .filter(|&i| run.state.team(team).zones.is_in(i, ZoneKind::Deck));
    let auto = answered.is_none();
    let chosen = match answered {
        Some(i) => i,
        // Fallback: a uniform pick from the deck.
        None => {
            let deck = run.state.team(team).zones.zone(ZoneKind::Deck).to_vec();
            let mut rng = run.state.rng.clone();
            let pick = rng.choose(&deck).copied();
            run.state.rng = rng;
            match pick {
                Some(i) => i,
                None => return Ok(()),
            }
        }
    };

    run.push(
        ctx.root,
        Mutation::CardMove {
            team,
            instance: chosen,
            to: ZoneKind::Hand,
        },
        EventKind::CardMoved {
            instance: chosen,
            from: ZoneKind::Deck,
            to: ZoneKind::Hand,
        },
    )?;
    run.note(
        ctx.root,
        EventKind::ChoiceResolved {
            kind: ChoiceKind::SeekCard,
            auto,
        },
    );

    // Searching the deck reveals nothing about its order afterwards.
    let mut order = run.state.team(team).zones.zone(ZoneKind::Deck).to_vec();
    let mut rng = run.state.rng.clone();
    rng.shuffle(&mut order);
    run.state.rng = rng;
    run.apply(Mutation::DeckPlaceTop { team, order })?;
    Ok(())
}

fn search(run: &mut EffectRun<'_>, ctx: &mut ActionCtx) -> Result<(), EngineError> {
    let team = ctx.actor.team();
    let discard = run.state.team(team).zones.zone(ZoneKind::Discard);
    if discard.is_empty() {
        return Ok(());
    }

    let answered = ctx
        .answers
        .search_card()
        .filter(|&i| run.state.team(team).zones.is_in(i, ZoneKind::Discard));
    let auto = answered.is_none();
    // Fallback: the oldest card in the discard pile.
    let chosen = match answered {
        Some(i) => i,
        None => run.state.team(team).zones.zone(ZoneKind::Discard)[0],
    };

    run.push(
        ctx.root,
        Mutation::CardMove {
            team,
            instance: chosen,
            to: ZoneKind::Hand,
        },
        EventKind::CardMoved {
            instance: chosen,
            from: ZoneKind::Discard,
            to: ZoneKind::Hand,
        },
    )?;
    run.note(
        ctx.root,
        EventKind::ChoiceResolved {
            kind: ChoiceKind::SearchCard,
            auto,
        },
    );
    Ok(())
}

fn redirect(run: &mut EffectRun<'_>, ctx: &mut ActionCtx) -> Result<(), EngineError> {
    let def = run.rulebook.require(ctx.card)?;
    let legal = if def.pattern.targets_enemies() {
        targeting::living_enemies(run.state, ctx.actor)
    } else {
        targeting::living_allies(run.state, ctx.actor)
    };
    if legal.is_empty() {
        return Ok(());
    }

    let answered = ctx.answers.redirect_target().filter(|t| legal.contains(t));
    let auto = answered.is_none();
    // Fallback: the frontmost living legal target.
    let chosen = match answered {
        Some(t) => t,
        None => legal[0],
    };

    ctx.targets = vec![chosen];
    run.note(
        ctx.root,
        EventKind::ChoiceResolved {
            kind: ChoiceKind::RedirectTarget,
            auto,
        },
    );
    Ok(())
}

fn push_target(
    run: &mut EffectRun<'_>,
    parent: EventId,
    target: CharacterId,
    direction: PushDirection,
) -> Result<(), EngineError> {
    match position::plan_push(run.state, target, direction) {
        Some(plan) => {
            run.push(
                parent,
                Mutation::SetSlot {
                    target: plan.target,
                    slot: plan.to_slot,
                },
                EventKind::Pushed {
                    target: plan.target,
                    from_slot: plan.from_slot,
                    to_slot: plan.to_slot,
                },
            )?;
            if let Some((displaced, from, to)) = plan.displaced {
                run.push(
                    parent,
                    Mutation::SetSlot {
                        target: displaced,
                        slot: to,
                    },
                    EventKind::Pushed {
                        target: displaced,
                        from_slot: from,
                        to_slot: to,
                    },
                )?;
            }
        }
        None => run.note(parent, EventKind::MovementBlocked { target }),
    }
    Ok(())
}

fn spend_then(
    run: &mut EffectRun<'_>,
    ctx: &mut ActionCtx,
    cost: &SpendResource,
    then: &Effect,
    targets: &[CharacterId],
) -> Result<(), EngineError> {
    let team = ctx.actor.team();
    let paid = match cost {
        SpendResource::Energy(amount) => {
            if run.state.team(team).energy >= *amount {
                run.push(
                    ctx.root,
                    Mutation::Energy {
                        team,
                        delta: -amount,
                    },
                    EventKind::EnergySpent {
                        team,
                        amount: *amount,
                    },
                )?;
                true
            } else {
                false
            }
        }
        SpendResource::Ultimate(amount) => {
            if run.state.team(team).ultimate >= *amount {
                run.push(
                    ctx.root,
                    Mutation::Ultimate {
                        team,
                        delta: -amount,
                    },
                    EventKind::UltimateSpent {
                        team,
                        amount: *amount,
                    },
                )?;
                true
            } else {
                false
            }
        }
        SpendResource::CardFromHand => {
            let answered = ctx
                .answers
                .discard_from_hand()
                .filter(|&i| run.state.team(team).zones.is_in(i, ZoneKind::Hand));
            let auto = answered.is_none();
            // Fallback: the most recently drawn hand card.
            let chosen = match answered {
                Some(i) => Some(i),
                None => run.state.team(team).zones.zone(ZoneKind::Hand).last().copied(),
            };
            match chosen {
                Some(instance) => {
                    run.push(
                        ctx.root,
                        Mutation::CardMove {
                            team,
                            instance,
                            to: ZoneKind::Discard,
                        },
                        EventKind::CardMoved {
                            instance,
                            from: ZoneKind::Hand,
                            to: ZoneKind::Discard,
                        },
                    )?;
                    run.note(
                        ctx.root,
                        EventKind::ChoiceResolved {
                            kind: ChoiceKind::DiscardFromHand,
                            auto,
                        },
                    );
                    true
                }
                None => false,
            }
        }
    };
    if paid {
        run_effect(run, ctx, then, targets)?;
    }
    Ok(())
}

/// Remove a consumable status once its governing dimension hits zero.
fn expire_if_spent(
    run: &mut EffectRun<'_>,
    parent: EventId,
    target: CharacterId,
    kind: StatusKind,
) -> Result<(), EngineError> {
    let def = run.rulebook.statuses().require(kind)?;
    let spent = run
        .state
        .character(target)
        .status(kind)
        .is_some_and(|s| s.expired(def));
    if spent {
        run.push(
            parent,
            Mutation::StatusRemove { target, kind },
            EventKind::StatusExpired { target, kind },
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{TeamId, TEAM_SIZE};
    use crate::core::state::Character;
    use crate::data::card::CardDefinition;
    use crate::status::instance::StatusInstance;

    fn setup() -> (MatchState, Rulebook, EventLog) {
        let mut state = MatchState::new(42);
        for team in TeamId::both() {
            for i in 0..TEAM_SIZE {
                let id = CharacterId::of(team, i);
                state
                    .team_mut(team)
                    .characters
                    .push(Character::new(id, "c", 30, i as u8));
            }
        }
        let rulebook = Rulebook::new().with_card(CardDefinition::new(
            CardId::new(1),
            "strike",
            CardCategory::Attack,
        ));
        (state, rulebook, EventLog::new())
    }

    fn ctx(root: EventId) -> ActionCtx {
        let mut ctx = ActionCtx::new(
            CharacterId::new(0),
            InstanceId::new(0),
            CardId::new(1),
            CardCategory::Attack,
            root,
            ChoiceBroker::default(),
        );
        ctx.targets = vec![CharacterId::new(3)];
        ctx
    }

    fn give(state: &mut MatchState, id: CharacterId, kind: StatusKind, dim: Dimension, v: i32) {
        let c = state.character_mut(id);
        if c.status(kind).is_none() {
            c.statuses.push(StatusInstance::new(kind));
        }
        if let Some(s) = c.status_mut(kind) {
            match dim {
                Dimension::Potency => s.potency = v,
                Dimension::Count => s.count = v,
                Dimension::Stack => s.stack = v,
                Dimension::Value => s.value = v,
            }
        }
    }

    #[test]
    fn test_barrier_absorbs_then_damage() {
        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(3);
        give(&mut state, target, StatusKind::Barrier, Dimension::Value, 6);

        let root = log.push(None, EventKind::ActionDeclared {
            actor: CharacterId::new(0),
            card: CardId::new(1),
        });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut ctx = ctx(root);
        run_effect(&mut run, &mut ctx, &Effect::Damage { amount: 10 }, &[target]).unwrap();

        assert_eq!(state.character(target).hp, 26);
        assert!(!state.character(target).has_status(StatusKind::Barrier));

        let kinds: Vec<_> = log.iter().map(|e| &e.kind).collect();
        assert!(kinds.iter().any(|k| matches!(
            k,
            EventKind::ShieldAbsorb { amount: 6, .. }
        )));
        assert!(kinds.iter().any(|k| matches!(
            k,
            EventKind::DamageApplied { amount: 4, .. }
        )));
    }

    #[test]
    fn test_invulnerable_negates() {
        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(3);
        give(&mut state, target, StatusKind::Invulnerable, Dimension::Count, 1);

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut ctx = ctx(root);
        run_effect(&mut run, &mut ctx, &Effect::Damage { amount: 10 }, &[target]).unwrap();

        assert_eq!(state.character(target).hp, 30);
        assert!(log
            .iter()
            .any(|e| matches!(e.kind, EventKind::DamageNegated { .. })));
    }

    #[test]
    fn test_multihit_thorns_reflect_each_hit() {
        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(3);
        give(&mut state, target, StatusKind::Thorns, Dimension::Stack, 2);
        give(&mut state, target, StatusKind::Thorns, Dimension::Potency, 1);

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut ctx = ctx(root);
        let effect = Effect::Multihit {
            hits: 3,
            effect: Box::new(Effect::Damage { amount: 2 }),
        };
        run_effect(&mut run, &mut ctx, &effect, &[target]).unwrap();

        assert_eq!(state.character(target).hp, 24);
        assert_eq!(state.character(CharacterId::new(0)).hp, 27);
        let reflections = log
            .iter()
            .filter(|e| matches!(e.kind, EventKind::ThornsReflected { .. }))
            .count();
        assert_eq!(reflections, 3);
        // Thorns stacks only decay at Turn End, never per reflection.
        assert_eq!(
            state.character(target).status_dim(StatusKind::Thorns, Dimension::Stack),
            2
        );
    }

    #[test]
    fn test_heal_reduction_applies() {
        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(3);
        state.character_mut(target).hp = 10;
        give(&mut state, target, StatusKind::Wound, Dimension::Value, 5);

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut ctx = ctx(root);
        run_effect(&mut run, &mut ctx, &Effect::Heal { amount: 6 }, &[target]).unwrap();

        assert_eq!(state.character(target).hp, 11);
        assert!(log.iter().any(|e| matches!(
            e.kind,
            EventKind::Healed { amount: 1, reduced_by: 5, .. }
        )));
    }

    #[test]
    fn test_cover_redirects_and_spends_charge() {
        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(3);
        let holder = CharacterId::new(4);
        give(&mut state, holder, StatusKind::Cover, Dimension::Count, 1);

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut ctx = ctx(root);
        run_effect(&mut run, &mut ctx, &Effect::Damage { amount: 4 }, &[target]).unwrap();

        assert_eq!(state.character(target).hp, 30);
        assert_eq!(state.character(holder).hp, 26);
        // The single charge is spent and the status expires.
        assert!(!state.character(holder).has_status(StatusKind::Cover));
    }

    #[test]
    fn test_cover_ignores_multi_target_hits() {
        let (mut state, rulebook, mut log) = setup();
        let holder = CharacterId::new(4);
        give(&mut state, holder, StatusKind::Cover, Dimension::Count, 3);

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut ctx = ctx(root);
        let swept: Vec<_> = (3u8..6).map(CharacterId::new).collect();
        ctx.targets = swept.clone();
        ctx.single_target = false;
        run_effect(&mut run, &mut ctx, &Effect::Damage { amount: 2 }, &swept).unwrap();

        // Every swept enemy took its own hit; no charge was consumed.
        for id in swept {
            assert_eq!(state.character(id).hp, 28);
        }
        assert_eq!(
            state.character(holder).status_dim(StatusKind::Cover, Dimension::Count),
            3
        );
        assert!(!log
            .iter()
            .any(|e| matches!(e.kind, EventKind::CoverRedirected { .. })));
    }

    #[test]
    fn test_push_direction_choice_with_fallback() {
        use crate::choice::ChoiceAnswer;

        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(4);

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        {
            let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
            let mut c = ctx(root);
            run_effect(&mut run, &mut c, &Effect::Push, &[target]).unwrap();
        }
        // Unanswered pushes go toward the back.
        assert_eq!(state.character(target).slot, 2);
        assert_eq!(state.character(CharacterId::new(5)).slot, 1);
        assert!(log.iter().any(|e| matches!(
            e.kind,
            EventKind::ChoiceResolved { kind: ChoiceKind::PushDirection, auto: true }
        )));

        {
            let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
            let mut c = ActionCtx::new(
                CharacterId::new(0),
                InstanceId::new(0),
                CardId::new(1),
                CardCategory::Attack,
                root,
                ChoiceBroker::new(vec![ChoiceAnswer::PushDirection(
                    PushDirection::TowardFront,
                )]),
            );
            run_effect(&mut run, &mut c, &Effect::Push, &[target]).unwrap();
        }
        // The answered push moves the target forward again.
        assert_eq!(state.character(target).slot, 1);
        assert!(log.iter().any(|e| matches!(
            e.kind,
            EventKind::ChoiceResolved { kind: ChoiceKind::PushDirection, auto: false }
        )));
    }

    #[test]
    fn test_journaled_run_replays_identically() {
        let (state, rulebook, _) = setup();
        let target = CharacterId::new(3);

        // Run against a snapshot with a journal.
        let mut snapshot = state.clone();
        let mut log = EventLog::new();
        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut journal = Vec::new();
        {
            let mut run =
                EffectRun::journaled(&mut snapshot, &rulebook, &mut log, &mut journal);
            let mut ctx = ctx(root);
            run_effect(&mut run, &mut ctx, &Effect::Damage { amount: 7 }, &[target]).unwrap();
        }

        // Applying the journal to the original state converges.
        let mut live = state;
        crate::core::mutation::apply_journal(&mut live, rulebook.statuses(), &journal).unwrap();
        assert_eq!(live.character(target).hp, snapshot.character(target).hp);
    }

    #[test]
    fn test_draw_reshuffles_discard() {
        let (mut state, rulebook, mut log) = setup();
        let team = TeamId::new(0);
        for i in 0..3 {
            let id = InstanceId::new(i);
            state
                .team_mut(team)
                .instances
                .insert(id, crate::data::card::CardInstance::new(id, CardId::new(1), CharacterId::new(0)));
            state.team_mut(team).zones.add(id, ZoneKind::Discard);
        }

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut ctx = ctx(root);
        run_effect(&mut run, &mut ctx, &Effect::Draw { count: 1 }, &[]).unwrap();

        assert_eq!(state.team(team).zones.zone_size(ZoneKind::Hand), 1);
        assert_eq!(state.team(team).zones.zone_size(ZoneKind::Deck), 2);
        assert!(log
            .iter()
            .any(|e| matches!(e.kind, EventKind::DeckReshuffled { count: 3, .. })));
    }

    #[test]
    fn test_spend_energy_gates_inner_effect() {
        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(3);
        state.team_mut(TeamId::new(0)).energy = 1;

        let effect = Effect::Spend {
            cost: SpendResource::Energy(2),
            then: Box::new(Effect::Damage { amount: 5 }),
        };

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        {
            let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
            let mut c = ctx(root);
            run_effect(&mut run, &mut c, &effect, &[target]).unwrap();
        }
        // Unpayable price: inner effect skipped.
        assert_eq!(state.character(target).hp, 30);

        state.team_mut(TeamId::new(0)).energy = 3;
        {
            let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
            let mut c = ctx(root);
            run_effect(&mut run, &mut c, &effect, &[target]).unwrap();
        }
        assert_eq!(state.character(target).hp, 25);
        assert_eq!(state.team(TeamId::new(0)).energy, 1);
    }

    #[test]
    fn test_cond_gates_on_state() {
        let (mut state, rulebook, mut log) = setup();
        let target = CharacterId::new(3);
        let effect = Effect::Cond {
            when: crate::effects::tree::Condition::TargetHasStatus(StatusKind::Wound),
            then: Box::new(Effect::Damage { amount: 5 }),
        };

        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        {
            let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
            let mut c = ctx(root);
            run_effect(&mut run, &mut c, &effect, &[target]).unwrap();
        }
        assert_eq!(state.character(target).hp, 30);

        give(&mut state, target, StatusKind::Wound, Dimension::Stack, 1);
        {
            let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
            let mut c = ctx(root);
            run_effect(&mut run, &mut c, &effect, &[target]).unwrap();
        }
        assert_eq!(state.character(target).hp, 25);
    }

    #[test]
    fn test_unmodeled_logs_and_skips() {
        let (mut state, rulebook, mut log) = setup();
        let root = log.push(None, EventKind::RoundStarted { round: 1 });
        let mut run = EffectRun::new(&mut state, &rulebook, &mut log);
        let mut c = ctx(root);
        run_effect(
            &mut run,
            &mut c,
            &Effect::Unmodeled { text: "untranslatable".into() },
            &[],
        )
        .unwrap();

        assert!(log
            .iter()
            .any(|e| matches!(e.kind, EventKind::UnmodeledSkipped { .. })));
    }
}
