//! # clashline
//!
//! A deterministic combat-resolution core for a turn-based, card-driven
//! team battle game: two teams of three characters declare card plays,
//! the engine orders them by speed zone, resolves clashes against
//! snapshots, and records everything as a replayable transcript.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: One seeded RNG stream per match. The same seed
//!    and the same inputs always produce the same event log; replays that
//!    diverge fail loudly.
//!
//! 2. **Atomic declarations**: A declaration either passes every check
//!    and is queued, or it is rejected with a reason code and the match
//!    is untouched. Zero events either way until resolution.
//!
//! 3. **Data-driven content**: Cards are effect trees and statuses are
//!    catalog definitions; the engine interprets, it never special-cases
//!    individual cards.
//!
//! ## Modules
//!
//! - `core`: Ids, match state, actions, events, mutations, RNG
//! - `data`: Card definitions, status catalog, the validated rulebook
//! - `zones`: Per-team deck/hand/discard/exhaust ledger
//! - `status`: Status instances and the pure status pipelines
//! - `effects`: The effect language and its interpreter
//! - `targeting`: Target legality, Taunt, Cover
//! - `position`: Slots, adjacency, pushes and swaps
//! - `timing`: Timing windows
//! - `choice`: Player choices and deterministic fallbacks
//! - `resolver`: Speed-zone priority and clash resolution
//! - `battle`: The round loop and match lifecycle
//! - `replay`: Transcripts and replay verification

pub mod battle;
pub mod choice;
pub mod core;
pub mod data;
pub mod effects;
pub mod error;
pub mod position;
pub mod replay;
pub mod resolver;
pub mod status;
pub mod targeting;
pub mod timing;
pub mod zones;

// Re-export the common surface.
pub use crate::battle::{Battle, BattleConfig, BattleResult, CharacterSpec, Roster};
pub use crate::choice::{ChoiceAnswer, ChoiceBroker, ChoiceKind};
pub use crate::core::{
    Action, CardId, Character, CharacterId, EventId, EventKind, EventLog, InstanceId, MatchRng,
    MatchRngState, MatchState, Mutation, ResolutionEvent, TeamId, TeamState, TEAM_SIZE,
};
pub use crate::data::{
    CardCategory, CardCost, CardDefinition, CardInstance, Dimension, DimensionCaps, Rulebook,
    SpeedZone, StatusCatalog, StatusDefinition, StatusKind, TargetPattern,
};
pub use crate::effects::{Condition, Effect, Phase, PhasedEffect, SpendResource};
pub use crate::error::{DataIntegrityError, EngineError, IllegalAction, Result};
pub use crate::position::{PushDirection, PushPlan};
pub use crate::replay::{Transcript, TranscriptStep};
pub use crate::status::StatusInstance;
pub use crate::zones::{ZoneKind, ZoneLedger};
