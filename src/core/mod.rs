//! Core match primitives: ids, state, actions, events, mutations, RNG.

pub mod action;
pub mod event;
pub mod ids;
pub mod mutation;
pub mod rng;
pub mod state;

pub use action::Action;
pub use event::{EventKind, EventLog, ResolutionEvent};
pub use ids::{CardId, CharacterId, EventId, InstanceId, TeamId, TEAM_SIZE};
pub use mutation::Mutation;
pub use rng::{MatchRng, MatchRngState};
pub use state::{Character, MatchState, TeamState};
