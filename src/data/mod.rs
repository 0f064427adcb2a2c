//! Authored content: card definitions, status definitions, the rulebook.

pub mod card;
pub mod rulebook;
pub mod status;

pub use card::{
    CardCategory, CardCost, CardDefinition, CardInstance, Restriction, SpeedZone, TargetPattern,
    TransformCandidate,
};
pub use rulebook::Rulebook;
pub use status::{
    Dimension, DimensionCaps, ModifierHook, StatusCatalog, StatusDefinition, StatusKind,
    StatusMode, TurnEndBehavior,
};
