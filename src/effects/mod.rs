//! The effect language and its interpreter.

pub mod interpreter;
pub mod tree;

pub use interpreter::{resolve_target_set, run_phase, ActionCtx, EffectRun};
pub use tree::{Condition, Effect, Phase, PhasedEffect, SpendResource};
