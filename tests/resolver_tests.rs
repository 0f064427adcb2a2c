//! Priority order, clash snapshots, and targeting flow.

mod common;

use clashline::resolver::{clashes, resolve_all, validate};
use clashline::{
    Action, CardCategory, CardDefinition, CardId, CharacterId, Condition, Dimension, Effect,
    EventKind, EventLog, PhasedEffect, SpeedZone, StatusKind, TargetPattern, TeamId, ZoneKind,
};
use common::{give_status, hand_card, rulebook, skirmish, DART, GUARD, SACRIFICE, STRIKE};

/// Fast actions resolve before Normal regardless of declaration order.
#[test]
fn test_fast_zone_preempts() {
    let book = rulebook();
    let mut state = skirmish(2);
    let mut log = EventLog::new();

    let a0 = CharacterId::new(0);
    let b0 = CharacterId::new(3);
    let strike = Action::new(a0, hand_card(&state, a0, STRIKE)).target(b0);
    let dart = Action::new(b0, hand_card(&state, b0, DART)).target(CharacterId::new(1));

    let pending = vec![
        validate(&state, &book, &strike).unwrap(),
        validate(&state, &book, &dart).unwrap(),
    ];
    resolve_all(&mut state, &book, &mut log, pending).unwrap();

    let order: Vec<_> = log
        .iter()
        .filter_map(|e| match e.kind {
            EventKind::ActionDeclared { actor, .. } => Some(actor),
            _ => None,
        })
        .collect();
    assert_eq!(order, vec![b0, a0]);
}

/// Lethargy shifts the effective speed zone, and a stale declared speed
/// is rejected instead of silently re-timed.
#[test]
fn test_lethargy_shifts_zone() {
    let book = rulebook();
    let mut state = skirmish(2);
    let actor = CharacterId::new(0);
    give_status(&mut state, actor, StatusKind::Lethargy, Dimension::Stack, 1);

    let card = hand_card(&state, actor, DART);
    let stale = Action::new(actor, card)
        .target(CharacterId::new(3))
        .at_speed(SpeedZone::Fast);
    assert!(validate(&state, &book, &stale).is_err());

    let current = Action::new(actor, card)
        .target(CharacterId::new(3))
        .at_speed(SpeedZone::Normal);
    assert_eq!(validate(&state, &book, &current).unwrap().speed, SpeedZone::Normal);
}

/// Mutual same-zone attacks clash and both resolve from the pre-clash
/// snapshot: two characters at 5 HP trade 10-damage strikes and both fall.
#[test]
fn test_mutual_clash_trades_simultaneously() {
    let book = rulebook();
    let mut state = skirmish(13);
    let mut log = EventLog::new();

    let a0 = CharacterId::new(0);
    let b0 = CharacterId::new(3);
    state.character_mut(a0).hp = 5;
    state.character_mut(b0).hp = 5;

    let pending = vec![
        validate(&state, &book, &Action::new(a0, hand_card(&state, a0, STRIKE)).target(b0))
            .unwrap(),
        validate(&state, &book, &Action::new(b0, hand_card(&state, b0, STRIKE)).target(a0))
            .unwrap(),
    ];
    assert!(clashes(&pending[0], &pending[1]));
    resolve_all(&mut state, &book, &mut log, pending).unwrap();

    // Neither death pre-empted the other's strike, and both actions
    // register as used.
    assert!(state.character(a0).defeated);
    assert!(state.character(b0).defeated);
    assert!(log.iter().any(|e| matches!(e.kind, EventKind::ClashDeclared { .. })));
    for actor in [a0, b0] {
        assert!(log
            .iter()
            .any(|e| matches!(e.kind, EventKind::ActionUsed { actor: a } if a == actor)));
    }
}

/// Attack into a defender: the defense's shield lands through the merge
/// but never mitigates the clashing attack.
#[test]
fn test_attack_versus_defense_clash() {
    let book = rulebook();
    let mut state = skirmish(17);
    let mut log = EventLog::new();

    let a0 = CharacterId::new(0);
    let b0 = CharacterId::new(3);
    let pending = vec![
        validate(&state, &book, &Action::new(a0, hand_card(&state, a0, STRIKE)).target(b0))
            .unwrap(),
        validate(&state, &book, &Action::new(b0, hand_card(&state, b0, GUARD))).unwrap(),
    ];
    assert!(clashes(&pending[0], &pending[1]));
    resolve_all(&mut state, &book, &mut log, pending).unwrap();

    assert_eq!(state.character(b0).hp, 20);
    assert_eq!(
        state.character(b0).status_dim(StatusKind::Barrier, Dimension::Value),
        6
    );
    // The documented tie: both sides register as used.
    for actor in [a0, b0] {
        assert!(log
            .iter()
            .any(|e| matches!(e.kind, EventKind::ActionUsed { actor: a } if a == actor)));
    }
}

/// Taunt funnels enemy declarations; Cover redirects at damage time and
/// burns one charge per hit.
#[test]
fn test_taunt_and_cover() {
    let book = rulebook();
    let mut state = skirmish(23);
    let mut log = EventLog::new();

    let attacker = CharacterId::new(0);
    let taunter = CharacterId::new(4);
    let cover_holder = CharacterId::new(5);
    give_status(&mut state, taunter, StatusKind::Taunt, Dimension::Stack, 1);
    give_status(&mut state, cover_holder, StatusKind::Cover, Dimension::Count, 1);

    // Taunt forbids hitting anyone else.
    let off_target =
        Action::new(attacker, hand_card(&state, attacker, STRIKE)).target(CharacterId::new(3));
    assert!(validate(&state, &book, &off_target).is_err());

    let on_taunter =
        Action::new(attacker, hand_card(&state, attacker, STRIKE)).target(taunter);
    let pending = vec![validate(&state, &book, &on_taunter).unwrap()];
    resolve_all(&mut state, &book, &mut log, pending).unwrap();

    // Cover pulled the hit off the taunter.
    assert_eq!(state.character(taunter).hp, 30);
    assert_eq!(state.character(cover_holder).hp, 20);
    assert!(!state.character(cover_holder).has_status(StatusKind::Cover));
    assert!(log.iter().any(|e| matches!(
        e.kind,
        EventKind::CoverRedirected { to, .. } if to == cover_holder
    )));
}

/// A missing discard answer falls back to the most recently drawn card.
#[test]
fn test_discard_price_fallback() {
    let book = rulebook();
    let mut state = skirmish(29);
    let mut log = EventLog::new();

    let actor = CharacterId::new(0);
    let team = TeamId::new(0);
    let last_in_hand = *state.team(team).zones.zone(ZoneKind::Hand).last().unwrap();

    let action = Action::new(actor, hand_card(&state, actor, SACRIFICE))
        .target(CharacterId::new(3));
    let pending = vec![validate(&state, &book, &action).unwrap()];
    resolve_all(&mut state, &book, &mut log, pending).unwrap();

    assert!(state.team(team).zones.is_in(last_in_hand, ZoneKind::Discard));
    assert_eq!(state.character(CharacterId::new(3)).hp, 23);
    assert!(log.iter().any(|e| matches!(
        e.kind,
        EventKind::ChoiceResolved { auto: true, .. }
    )));
}

/// Transform candidates swap the face at play time; the instance keeps
/// its base identity.
#[test]
fn test_transform_at_play() {
    let ember = CardId(40);
    let blaze = CardId(41);
    let mut book = rulebook();
    book.add(
        CardDefinition::new(ember, "ember", CardCategory::Attack)
            .pattern(TargetPattern::SingleEnemy)
            .effect(PhasedEffect::on_use(Effect::Damage { amount: 2 }))
            .transform(Condition::SelfHasStatus(StatusKind::Empower), blaze),
    );
    book.add(
        CardDefinition::new(blaze, "blaze", CardCategory::Attack)
            .pattern(TargetPattern::SingleEnemy)
            .effect(PhasedEffect::on_use(Effect::Damage { amount: 6 }))
            .transform_only(),
    );
    assert!(book.validate().is_ok());

    let mut state = skirmish(31);
    let mut log = EventLog::new();
    let actor = CharacterId::new(0);
    let target = CharacterId::new(3);
    give_status(&mut state, actor, StatusKind::Empower, Dimension::Stack, 1);

    // Put an ember in the actor's hand.
    let instance = state.alloc_instance();
    state.team_mut(TeamId::new(0)).instances.insert(
        instance,
        clashline::CardInstance::new(instance, ember, actor),
    );
    state.team_mut(TeamId::new(0)).zones.add(instance, ZoneKind::Hand);

    let action = Action::new(actor, instance).target(target);
    let pending = vec![validate(&state, &book, &action).unwrap()];
    resolve_all(&mut state, &book, &mut log, pending).unwrap();

    assert!(log.iter().any(|e| matches!(
        e.kind,
        EventKind::Transformed { into, .. } if into == blaze
    )));
    assert_eq!(state.character(target).hp, 24);
    let inst = &state.team(TeamId::new(0)).instances[&instance];
    assert_eq!(inst.base, ember);
    assert_eq!(inst.current, blaze);
}

/// Overlapping transform candidates resolve to the last matching entry
/// in authored order.
#[test]
fn test_transform_last_matching_candidate_wins() {
    let ember = CardId(50);
    let blaze = CardId(51);
    let inferno = CardId(52);
    let mut book = rulebook();
    book.add(
        CardDefinition::new(ember, "ember", CardCategory::Attack)
            .pattern(TargetPattern::SingleEnemy)
            .effect(PhasedEffect::on_use(Effect::Damage { amount: 2 }))
            .transform(Condition::Always, blaze)
            .transform(Condition::Always, inferno),
    );
    book.add(
        CardDefinition::new(blaze, "blaze", CardCategory::Attack)
            .pattern(TargetPattern::SingleEnemy)
            .effect(PhasedEffect::on_use(Effect::Damage { amount: 4 }))
            .transform_only(),
    );
    book.add(
        CardDefinition::new(inferno, "inferno", CardCategory::Attack)
            .pattern(TargetPattern::SingleEnemy)
            .effect(PhasedEffect::on_use(Effect::Damage { amount: 6 }))
            .transform_only(),
    );
    assert!(book.validate().is_ok());

    let mut state = skirmish(37);
    let mut log = EventLog::new();
    let actor = CharacterId::new(0);
    let target = CharacterId::new(3);

    let instance = state.alloc_instance();
    state.team_mut(TeamId::new(0)).instances.insert(
        instance,
        clashline::CardInstance::new(instance, ember, actor),
    );
    state.team_mut(TeamId::new(0)).zones.add(instance, ZoneKind::Hand);

    let action = Action::new(actor, instance).target(target);
    let pending = vec![validate(&state, &book, &action).unwrap()];
    resolve_all(&mut state, &book, &mut log, pending).unwrap();

    assert!(log.iter().any(|e| matches!(
        e.kind,
        EventKind::Transformed { into, .. } if into == inferno
    )));
    assert!(!log.iter().any(|e| matches!(
        e.kind,
        EventKind::Transformed { into, .. } if into == blaze
    )));
    assert_eq!(state.character(target).hp, 24);
}
