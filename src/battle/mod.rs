//! Battle driver - rounds, declarations, and match lifecycle.
//!
//! [`Battle`] owns the match state and event log and drives the round
//! loop: optional movement, action declarations, resolution, Turn End
//! maintenance, and terminal detection. Every accepted input is recorded
//! as a transcript step, so a finished battle can be replayed bit for bit
//! from its seed and step list.

use crate::core::event::{EventKind, EventLog, ResolutionEvent};
use crate::core::ids::{CardId, CharacterId, InstanceId, TeamId, TEAM_SIZE};
use crate::core::mutation::Mutation;
use crate::core::state::{Character, MatchState};
use crate::data::card::CardInstance;
use crate::data::rulebook::Rulebook;
use crate::effects::interpreter::{draw_one, EffectRun};
use crate::error::{DataIntegrityError, EngineError, IllegalAction, Result};
use crate::position;
use crate::replay::{Transcript, TranscriptStep};
use crate::resolver::{self, PendingAction};
use crate::status::engine::{plan_turn_end, reduced_heal};
use crate::targeting;
use crate::zones::ZoneKind;

/// One fielded character, as authored.
#[derive(Clone, Debug)]
pub struct CharacterSpec {
    pub name: String,
    pub max_hp: i32,
}

impl CharacterSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            max_hp,
        }
    }
}

/// One side's setup: three characters and a combined deck list, each card
/// tagged with the index of the character contributing it.
#[derive(Clone, Debug, Default)]
pub struct Roster {
    pub characters: Vec<CharacterSpec>,
    pub deck: Vec<(usize, CardId)>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn character(mut self, name: impl Into<String>, max_hp: i32) -> Self {
        self.characters.push(CharacterSpec::new(name, max_hp));
        self
    }

    #[must_use]
    pub fn card(mut self, owner: usize, card: CardId) -> Self {
        self.deck.push((owner, card));
        self
    }
}

/// Match parameters.
#[derive(Clone, Debug)]
pub struct BattleConfig {
    pub seed: u64,
    pub starting_hand: usize,
    pub draws_per_round: usize,
    pub start_energy: i32,
    pub energy_per_round: i32,
    pub ultimate_per_round: i32,
    pub movement_enabled: bool,
    pub max_rounds: u32,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            starting_hand: 4,
            draws_per_round: 1,
            start_energy: 3,
            energy_per_round: 3,
            ultimate_per_round: 1,
            movement_enabled: false,
            max_rounds: 30,
        }
    }
}

impl BattleConfig {
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn starting_hand(mut self, cards: usize) -> Self {
        self.starting_hand = cards;
        self
    }

    #[must_use]
    pub fn energy(mut self, start: i32, per_round: i32) -> Self {
        self.start_energy = start;
        self.energy_per_round = per_round;
        self
    }

    #[must_use]
    pub fn movement(mut self, enabled: bool) -> Self {
        self.movement_enabled = enabled;
        self
    }

    #[must_use]
    pub fn max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }
}

/// How a finished battle ended. `winner: None` is a draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BattleResult {
    pub winner: Option<TeamId>,
}

/// A running match.
pub struct Battle<'a> {
    rulebook: &'a Rulebook,
    config: BattleConfig,
    state: MatchState,
    log: EventLog,
    pending: Vec<PendingAction>,
    steps: Vec<TranscriptStep>,
    result: Option<BattleResult>,
}

impl<'a> Battle<'a> {
    /// Set up a match: validate the rulebook and rosters, build decks,
    /// shuffle, and open round one.
    pub fn new(
        rulebook: &'a Rulebook,
        config: BattleConfig,
        rosters: [Roster; 2],
    ) -> Result<Self> {
        rulebook.validate()?;
        let mut state = MatchState::new(config.seed);

        for (t, roster) in rosters.iter().enumerate() {
            let team = TeamId::new(t as u8);
            if roster.characters.len() != TEAM_SIZE {
                return Err(DataIntegrityError::BadRosterSize {
                    expected: TEAM_SIZE,
                    got: roster.characters.len(),
                }
                .into());
            }
            for (i, spec) in roster.characters.iter().enumerate() {
                let id = CharacterId::of(team, i);
                state
                    .team_mut(team)
                    .characters
                    .push(Character::new(id, spec.name.clone(), spec.max_hp, i as u8));
            }
            for &(owner_index, card) in &roster.deck {
                if owner_index >= TEAM_SIZE {
                    return Err(DataIntegrityError::BadRosterSize {
                        expected: TEAM_SIZE,
                        got: owner_index,
                    }
                    .into());
                }
                let def = rulebook
                    .card(card)
                    .ok_or(DataIntegrityError::UnknownDeckCard(card))?;
                if def.transform_only {
                    return Err(DataIntegrityError::UnknownDeckCard(card).into());
                }
                let owner = CharacterId::of(team, owner_index);
                let instance = state.alloc_instance();
                state
                    .team_mut(team)
                    .instances
                    .insert(instance, CardInstance::new(instance, card, owner));
                state.team_mut(team).zones.add(instance, ZoneKind::Deck);
            }
            let mut rng = state.rng.clone();
            state.team_mut(team).zones.shuffle_deck(&mut rng);
            state.rng = rng;
        }

        let mut battle = Self {
            rulebook,
            config,
            state,
            log: EventLog::new(),
            pending: Vec::new(),
            steps: Vec::new(),
            result: None,
        };
        let start_energy = battle.config.start_energy;
        let starting_hand = battle.config.starting_hand;
        battle.open_round(start_energy, starting_hand)?;
        Ok(battle)
    }

    /// Round opening: the round event, resource grants, draws, and the
    /// movement gate.
    fn open_round(&mut self, energy: i32, draws: usize) -> Result<()> {
        let root = self.log.push(
            None,
            EventKind::RoundStarted {
                round: self.state.round,
            },
        );
        let mut run = EffectRun::new(&mut self.state, self.rulebook, &mut self.log);
        for team in TeamId::both() {
            if energy > 0 {
                run.push(
                    root,
                    Mutation::Energy { team, delta: energy },
                    EventKind::EnergyGained { team, amount: energy },
                )?;
            }
            if self.config.ultimate_per_round > 0 {
                run.push(
                    root,
                    Mutation::Ultimate {
                        team,
                        delta: self.config.ultimate_per_round,
                    },
                    EventKind::UltimateCharged {
                        team,
                        amount: self.config.ultimate_per_round,
                    },
                )?;
            }
            for _ in 0..draws {
                draw_one(&mut run, root, team)?;
            }
        }
        self.state.movement_pending = [self.config.movement_enabled; 2];
        Ok(())
    }

    /// Declare one action. A rejection is a pure no-op: the match state is
    /// unchanged, zero events are emitted, and nothing is recorded.
    pub fn declare(&mut self, action: crate::core::action::Action) -> Result<()> {
        if self.result.is_some() {
            return Err(IllegalAction::BattleOver.into());
        }
        let pending = resolver::validate(&self.state, self.rulebook, &action)?;
        self.steps.push(TranscriptStep::Declare(action));
        self.pending.push(pending);
        Ok(())
    }

    /// Submit a team's movement for the round. An empty swap list passes.
    pub fn declare_movement(
        &mut self,
        team: TeamId,
        swaps: Vec<(CharacterId, CharacterId)>,
    ) -> Result<()> {
        if self.result.is_some() {
            return Err(IllegalAction::BattleOver.into());
        }
        if !self.config.movement_enabled || !self.state.movement_pending[team.index()] {
            return Err(IllegalAction::MovementUnavailable.into());
        }
        for &(a, b) in &swaps {
            if a.team() != team || b.team() != team {
                return Err(IllegalAction::IllegalTarget(if a.team() != team { a } else { b }).into());
            }
            if !position::can_swap(&self.state, a, b) {
                return Err(IllegalAction::IllegalTarget(b).into());
            }
        }
        let catalog = self.rulebook.statuses();
        for &(a, b) in &swaps {
            let slot_a = self.state.character(a).slot;
            let slot_b = self.state.character(b).slot;
            Mutation::SetSlot { target: a, slot: slot_b }.apply(&mut self.state, catalog)?;
            Mutation::SetSlot { target: b, slot: slot_a }.apply(&mut self.state, catalog)?;
            self.log.push(None, EventKind::Swapped { a, b });
        }
        self.state.movement_pending[team.index()] = false;
        self.steps.push(TranscriptStep::Movement { team, swaps });
        Ok(())
    }

    /// Resolve the round: every pending action in priority order, then
    /// Turn End maintenance, then terminal detection. Returns the events
    /// this call appended, in log order.
    pub fn resolve_round(&mut self) -> Result<Vec<ResolutionEvent>> {
        if self.result.is_some() {
            return Err(IllegalAction::BattleOver.into());
        }
        // A team that never moved implicitly passed.
        self.state.movement_pending = [false; 2];
        let mark = self.log.len();

        let pending = std::mem::take(&mut self.pending);
        resolver::resolve_all(&mut self.state, self.rulebook, &mut self.log, pending)?;
        self.turn_end()?;
        self.steps.push(TranscriptStep::Resolve);

        if !self.check_terminal() {
            self.state.round += 1;
            self.state.block_play = false;
            let energy = self.config.energy_per_round;
            let draws = self.config.draws_per_round;
            self.open_round(energy, draws)?;
        }
        Ok(self.log.since(mark).into_iter().cloned().collect())
    }

    /// Turn End: for each character (front team first, slot order), the
    /// Regen tick, any Renewal expiry heal, then status decay and expiry.
    fn turn_end(&mut self) -> Result<()> {
        let root = self.log.push(
            None,
            EventKind::RoundEnded {
                round: self.state.round,
            },
        );
        let catalog = self.rulebook.statuses();
        for team in TeamId::both() {
            for id in self.state.team(team).living() {
                let plan = plan_turn_end(self.state.character(id), catalog)?;
                let mut run = EffectRun::new(&mut self.state, self.rulebook, &mut self.log);

                for raw in [Some(plan.regen_heal).filter(|&h| h > 0), plan.renewal_heal] {
                    let Some(raw) = raw else { continue };
                    let (effective, reduced_by) = reduced_heal(run.state.character(id), raw);
                    if effective > 0 {
                        run.apply(Mutation::Hp {
                            target: id,
                            delta: effective,
                        })?;
                    }
                    run.note(
                        root,
                        EventKind::Healed {
                            target: id,
                            amount: effective,
                            reduced_by,
                        },
                    );
                }
                for (kind, dim) in plan.decays {
                    run.push(
                        root,
                        Mutation::StatusApply {
                            target: id,
                            kind,
                            dim,
                            delta: -1,
                        },
                        EventKind::StatusReduced {
                            target: id,
                            kind,
                            dim,
                            amount: 1,
                        },
                    )?;
                }
                for kind in plan.expires {
                    run.push(
                        root,
                        Mutation::StatusRemove { target: id, kind },
                        EventKind::StatusExpired { target: id, kind },
                    )?;
                }
            }
        }
        Ok(())
    }

    fn check_terminal(&mut self) -> bool {
        let wiped = [
            self.state.team(TeamId::new(0)).is_wiped(),
            self.state.team(TeamId::new(1)).is_wiped(),
        ];
        let winner = match wiped {
            [true, true] => Some(None),
            [true, false] => Some(Some(TeamId::new(1))),
            [false, true] => Some(Some(TeamId::new(0))),
            [false, false] if self.state.round >= self.config.max_rounds => Some(None),
            _ => None,
        };
        match winner {
            Some(winner) => {
                self.log.push(None, EventKind::BattleEnded { winner });
                self.result = Some(BattleResult { winner });
                true
            }
            None => false,
        }
    }

    /// The declaration targets a card could legally pick right now.
    pub fn legal_targets(
        &self,
        actor: CharacterId,
        card: InstanceId,
    ) -> Result<Vec<CharacterId>> {
        let side = self.state.team(actor.team());
        let instance = side
            .instances
            .get(&card)
            .ok_or(IllegalAction::CardNotInHand(card))?;
        let def = self.rulebook.require(instance.current)?;
        Ok(targeting::legal_targets(&self.state, actor, def.pattern))
    }

    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub fn log(&self) -> &EventLog {
        &self.log
    }

    #[must_use]
    pub fn result(&self) -> Option<BattleResult> {
        self.result
    }

    /// The full transcript so far: seed, accepted steps, and every event.
    #[must_use]
    pub fn transcript(&self) -> Transcript {
        Transcript {
            seed: self.config.seed,
            steps: self.steps.clone(),
            events: self.log.to_vec(),
        }
    }
}
