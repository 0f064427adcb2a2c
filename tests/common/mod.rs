//! Shared fixtures: a small rulebook and ready-made match states.

use clashline::core::state::Character;
use clashline::{
    CardCategory, CardDefinition, CardId, CardInstance, CharacterId, Condition, Dimension, Effect,
    InstanceId, MatchState, PhasedEffect, Rulebook, SpeedZone, SpendResource, StatusKind,
    TargetPattern, TeamId, ZoneKind, TEAM_SIZE,
};

pub const STRIKE: CardId = CardId(1);
pub const GUARD: CardId = CardId(2);
pub const FLURRY: CardId = CardId(3);
pub const MEND: CardId = CardId(4);
pub const SEAL_GATE: CardId = CardId(5);
pub const DART: CardId = CardId(6);
pub const SACRIFICE: CardId = CardId(7);

pub fn rulebook() -> Rulebook {
    let book = Rulebook::new()
        .with_card(
            CardDefinition::new(STRIKE, "strike", CardCategory::Attack)
                .cost(1)
                .pattern(TargetPattern::SingleEnemy)
                .effect(PhasedEffect::on_use(Effect::Damage { amount: 10 })),
        )
        .with_card(
            CardDefinition::new(GUARD, "guard", CardCategory::Defense)
                .pattern(TargetPattern::SelfOnly)
                .effect(PhasedEffect::on_use(Effect::Shield { amount: 6 })),
        )
        .with_card(
            CardDefinition::new(FLURRY, "flurry", CardCategory::Attack)
                .cost(1)
                .pattern(TargetPattern::SingleEnemy)
                .effect(PhasedEffect::on_use(Effect::Multihit {
                    hits: 3,
                    effect: Box::new(Effect::Damage { amount: 2 }),
                })),
        )
        .with_card(
            CardDefinition::new(MEND, "mend", CardCategory::Skill)
                .cost(1)
                .pattern(TargetPattern::SingleAlly)
                .effect(PhasedEffect::on_use(Effect::Heal { amount: 6 })),
        )
        .with_card(
            CardDefinition::new(SEAL_GATE, "seal the round", CardCategory::Skill)
                .pattern(TargetPattern::SelfOnly)
                .effect(PhasedEffect::on_use(Effect::LockRound)),
        )
        .with_card(
            CardDefinition::new(DART, "dart", CardCategory::Attack)
                .speed(SpeedZone::Fast)
                .pattern(TargetPattern::SingleEnemy)
                .effect(PhasedEffect::on_use(Effect::Damage { amount: 2 })),
        )
        .with_card(
            CardDefinition::new(SACRIFICE, "sacrifice", CardCategory::Skill)
                .pattern(TargetPattern::SingleEnemy)
                .restriction(Condition::EnergyAtLeast(1), "requires stored energy")
                .effect(PhasedEffect::on_use(Effect::Spend {
                    cost: SpendResource::CardFromHand,
                    then: Box::new(Effect::Damage { amount: 7 }),
                })),
        );
    assert!(book.validate().is_ok());
    book
}

/// Two full teams, 30 HP each, 5 energy per side, and every character
/// holding one copy of each fixture card in hand.
pub fn skirmish(seed: u64) -> MatchState {
    let mut state = MatchState::new(seed);
    for team in TeamId::both() {
        for i in 0..TEAM_SIZE {
            let id = CharacterId::of(team, i);
            state
                .team_mut(team)
                .characters
                .push(Character::new(id, format!("c{}", id.raw()), 30, i as u8));
        }
        state.team_mut(team).energy = 5;
    }
    for team in TeamId::both() {
        for i in 0..TEAM_SIZE {
            let owner = CharacterId::of(team, i);
            for card in [STRIKE, GUARD, FLURRY, MEND, SEAL_GATE, DART, SACRIFICE] {
                let instance = state.alloc_instance();
                state
                    .team_mut(team)
                    .instances
                    .insert(instance, CardInstance::new(instance, card, owner));
                state.team_mut(team).zones.add(instance, ZoneKind::Hand);
            }
        }
    }
    state
}

pub fn hand_card(state: &MatchState, owner: CharacterId, card: CardId) -> InstanceId {
    let side = state.team(owner.team());
    side.zones
        .zone(ZoneKind::Hand)
        .iter()
        .copied()
        .find(|i| {
            let inst = &side.instances[i];
            inst.owner == owner && inst.current == card
        })
        .expect("fixture card missing from hand")
}

pub fn give_status(
    state: &mut MatchState,
    id: CharacterId,
    kind: StatusKind,
    dim: Dimension,
    value: i32,
) {
    use clashline::StatusInstance;
    let c = state.character_mut(id);
    if c.status(kind).is_none() {
        c.statuses.push(StatusInstance::new(kind));
    }
    let s = c.status_mut(kind).expect("status just inserted");
    match dim {
        Dimension::Potency => s.potency = value,
        Dimension::Count => s.count = value,
        Dimension::Stack => s.stack = value,
        Dimension::Value => s.value = value,
    }
}
