//! Determinism and replay contract tests.

mod common;

use clashline::{
    Action, Battle, BattleConfig, CardId, CharacterId, EngineError, EventKind, InstanceId,
    Roster, Rulebook, Transcript, ZoneKind, TEAM_SIZE,
};
use common::{rulebook, STRIKE};

fn fixture_roster() -> Roster {
    let mut roster = Roster::new()
        .character("vanguard", 30)
        .character("adept", 26)
        .character("warden", 34);
    for owner in 0..TEAM_SIZE {
        for card in [common::STRIKE, common::GUARD, common::FLURRY, common::MEND, common::DART] {
            roster = roster.card(owner, card);
        }
    }
    roster
}

/// Drive one short scripted battle and return its transcript.
fn scripted_battle(book: &Rulebook, seed: u64) -> Transcript {
    let mut battle = Battle::new(
        book,
        BattleConfig::default().seed(seed),
        [fixture_roster(), fixture_roster()],
    )
    .unwrap();

    for _ in 0..3 {
        // Each front character plays its first playable strike, if any.
        for actor in [CharacterId::new(0), CharacterId::new(3)] {
            if let Some(card) = playable(&battle, actor, STRIKE) {
                let target = CharacterId::of(actor.team().rival(), 0);
                let _ = battle.declare(Action::new(actor, card).target(target));
            }
        }
        if battle.result().is_some() {
            break;
        }
        battle.resolve_round().unwrap();
        if battle.result().is_some() {
            break;
        }
    }
    battle.transcript()
}

fn playable(battle: &Battle<'_>, actor: CharacterId, card: CardId) -> Option<InstanceId> {
    let side = battle.state().team(actor.team());
    side.zones
        .zone(ZoneKind::Hand)
        .iter()
        .copied()
        .find(|i| {
            let inst = &side.instances[i];
            inst.owner == actor && inst.current == card
        })
}

/// The same seed and script produce byte-identical transcripts.
#[test]
fn test_same_seed_same_transcript() {
    let book = rulebook();
    let a = scripted_battle(&book, 42);
    let b = scripted_battle(&book, 42);

    assert_eq!(a, b);
    assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
}

/// Different seeds shuffle differently.
#[test]
fn test_different_seeds_diverge() {
    let book = rulebook();
    let a = scripted_battle(&book, 1);
    let b = scripted_battle(&book, 2);
    assert_ne!(a.events, b.events);
}

/// Replaying a recorded transcript verifies clean.
#[test]
fn test_replay_verifies() {
    let book = rulebook();
    let transcript = scripted_battle(&book, 42);
    assert!(!transcript.events.is_empty());

    clashline::replay::verify(
        &book,
        BattleConfig::default(),
        [fixture_roster(), fixture_roster()],
        &transcript,
    )
    .unwrap();
}

/// A tampered event log fails with the index of the first divergence.
#[test]
fn test_tampered_transcript_detected() {
    let book = rulebook();
    let mut transcript = scripted_battle(&book, 42);

    // No card in the fixture locks the round, so this kind never occurs.
    let index = transcript.events.len() / 2;
    transcript.events[index].kind = EventKind::RoundLocked;

    let err = clashline::replay::verify(
        &book,
        BattleConfig::default(),
        [fixture_roster(), fixture_roster()],
        &transcript,
    );
    assert!(matches!(
        err,
        Err(EngineError::NonDeterminism { first_divergence }) if first_divergence == index
    ));
}

/// A tampered seed also fails: the decks shuffle differently.
#[test]
fn test_wrong_seed_detected() {
    let book = rulebook();
    let mut transcript = scripted_battle(&book, 42);
    transcript.seed = 43;

    let err = clashline::replay::verify(
        &book,
        BattleConfig::default(),
        [fixture_roster(), fixture_roster()],
        &transcript,
    );
    assert!(matches!(err, Err(EngineError::NonDeterminism { .. })));
}

/// Transcripts round-trip through the binary encoding.
#[test]
fn test_transcript_encoding_roundtrip() {
    let book = rulebook();
    let transcript = scripted_battle(&book, 42);

    let bytes = transcript.to_bytes().unwrap();
    let back = Transcript::from_bytes(&bytes).unwrap();
    assert_eq!(transcript, back);
}

/// The event log alone reconstructs per-team causality: every event with
/// a parent follows its parent in the log.
#[test]
fn test_event_tree_is_causal() {
    let book = rulebook();
    let transcript = scripted_battle(&book, 42);

    for (i, event) in transcript.events.iter().enumerate() {
        if let Some(parent) = event.parent {
            let at = transcript
                .events
                .iter()
                .position(|e| e.id == parent)
                .unwrap();
            assert!(at < i, "event {i} precedes its parent");
        }
    }
}
