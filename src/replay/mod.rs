//! Transcripts and replay verification.
//!
//! A [`Transcript`] is the complete record of a battle: the seed, every
//! accepted input step, and the full event log. Replaying the steps on a
//! fresh battle with the same seed must reproduce the log exactly; any
//! divergence is reported as [`EngineError::NonDeterminism`], never
//! reconciled silently.

use serde::{Deserialize, Serialize};

use crate::battle::{Battle, BattleConfig, Roster};
use crate::core::action::Action;
use crate::core::event::ResolutionEvent;
use crate::core::ids::{CharacterId, TeamId};
use crate::data::rulebook::Rulebook;
use crate::error::{EngineError, Result};

/// One accepted input, in order. Rejected declarations are never recorded;
/// they had no effect to reproduce.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptStep {
    Movement {
        team: TeamId,
        swaps: Vec<(CharacterId, CharacterId)>,
    },
    Declare(Action),
    Resolve,
}

/// The full record of a battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub seed: u64,
    pub steps: Vec<TranscriptStep>,
    pub events: Vec<ResolutionEvent>,
}

impl Transcript {
    /// Compact binary encoding.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// Replay a transcript against the same rulebook and rosters and verify
/// the event log reproduces exactly.
pub fn verify(
    rulebook: &Rulebook,
    config: BattleConfig,
    rosters: [Roster; 2],
    transcript: &Transcript,
) -> Result<()> {
    let config = BattleConfig {
        seed: transcript.seed,
        ..config
    };
    let mut battle = Battle::new(rulebook, config, rosters)?;

    for step in &transcript.steps {
        let outcome = match step {
            TranscriptStep::Movement { team, swaps } => {
                battle.declare_movement(*team, swaps.clone())
            }
            TranscriptStep::Declare(action) => battle.declare(action.clone()),
            TranscriptStep::Resolve => battle.resolve_round().map(|_| ()),
        };
        match outcome {
            Ok(()) => {}
            // A step that was accepted at record time but rejects now is
            // itself a divergence.
            Err(EngineError::Illegal(_)) => {
                return Err(EngineError::NonDeterminism {
                    first_divergence: battle.log().len(),
                });
            }
            Err(other) => return Err(other),
        }
    }

    compare(&battle.transcript().events, &transcript.events)
}

/// Compare a replayed log against the recorded one.
fn compare(replayed: &[ResolutionEvent], recorded: &[ResolutionEvent]) -> Result<()> {
    for (index, (a, b)) in replayed.iter().zip(recorded.iter()).enumerate() {
        if a != b {
            return Err(EngineError::NonDeterminism {
                first_divergence: index,
            });
        }
    }
    if replayed.len() != recorded.len() {
        return Err(EngineError::NonDeterminism {
            first_divergence: replayed.len().min(recorded.len()),
        });
    }
    Ok(())
}
