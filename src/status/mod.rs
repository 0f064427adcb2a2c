//! Status runtime: instances on characters and the pure status pipelines.

pub mod engine;
pub mod instance;

pub use engine::{
    action_modifiers, mitigate, plan_turn_end, reduced_heal, ActionModifiers, DamageOutcome,
    TurnEndPlan,
};
pub use instance::StatusInstance;
