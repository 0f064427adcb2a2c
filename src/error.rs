//! Error taxonomy for the resolution core.
//!
//! Three families, per the engine contract:
//! - [`IllegalAction`]: a declaration fails a restriction, targeting, or cost
//!   precondition. Rejected before any mutation; the match is unchanged and
//!   zero events are emitted.
//! - [`DataIntegrityError`]: authored data is structurally broken. Fatal at
//!   rulebook/match construction, never at resolution time.
//! - [`EngineError::NonDeterminism`]: a replay diverged from its transcript.
//!   Never reconciled silently.

use thiserror::Error;

use crate::core::ids::{CardId, CharacterId, InstanceId};
use crate::data::status::StatusKind;

/// A declaration that the engine refuses as a no-op, with a reason code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IllegalAction {
    #[error("card plays are locked for this round")]
    RoundLocked,

    #[error("the battle has already ended")]
    BattleOver,

    #[error("movement must be submitted before combat actions this round")]
    MovementPending,

    #[error("movement is not available right now")]
    MovementUnavailable,

    #[error("actor {0} is defeated and cannot act")]
    ActorDefeated(CharacterId),

    #[error("card {0} is not in the actor's hand")]
    CardNotInHand(InstanceId),

    #[error("card {card} belongs to {owner}, not the declared actor")]
    NotCardOwner { card: InstanceId, owner: CharacterId },

    #[error("{0:?} blocks playing this card category")]
    CategoryBlocked(StatusKind),

    #[error("declared speed zone does not match the card's effective speed")]
    SpeedMismatch,

    #[error("insufficient energy: need {need}, have {have}")]
    InsufficientEnergy { need: i32, have: i32 },

    #[error("ultimate meter below the full base cost: need {need}, have {have}")]
    UltimateNotCharged { need: i32, have: i32 },

    #[error("card requires exactly {expected} declared target(s), got {got}")]
    TargetArity { expected: usize, got: usize },

    #[error("target {0} is not a legal target for this card")]
    IllegalTarget(CharacterId),

    #[error("a taunting enemy must be targeted")]
    TauntEnforced,

    #[error("a structured restriction on the card is not met")]
    RestrictionFailed,
}

/// Malformed or inconsistent authored data. Aborts match setup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("transform candidates of {0} form a cycle")]
    TransformCycle(CardId),

    #[error("card {card} references missing card {missing}")]
    MissingCard { card: CardId, missing: CardId },

    #[error("card {0} has a multihit with zero hits")]
    ZeroHitMultihit(CardId),

    #[error("card {0} declares a negative base cost")]
    NegativeCost(CardId),

    #[error("card {0} registers an effect in the Turn End window, which no action opens")]
    TurnEndEffect(CardId),

    #[error("status {0:?} is used but absent from the catalog")]
    MissingStatus(StatusKind),

    #[error("roster must field exactly {expected} characters, got {got}")]
    BadRosterSize { expected: usize, got: usize },

    #[error("roster deck references unknown card {0}")]
    UnknownDeckCard(CardId),
}

/// Top-level engine error.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("illegal action: {0}")]
    Illegal(#[from] IllegalAction),

    #[error("data integrity: {0}")]
    Data(#[from] DataIntegrityError),

    /// A replayed event log diverged from the recorded transcript.
    /// `first_divergence` is the index of the first mismatching event,
    /// or the shorter log's length when one log is a prefix of the other.
    #[error("replay diverged from transcript at event {first_divergence}")]
    NonDeterminism { first_divergence: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;
