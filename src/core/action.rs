//! Action declarations.
//!
//! An [`Action`] is everything a controller commits to up front: actor, card
//! instance, declared targets, extra spend for variable-cost cards, and the
//! answers to any choices the card's effects will ask for. Declarations are
//! validated atomically; a rejected declaration leaves the match untouched.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::choice::ChoiceAnswer;
use crate::core::ids::{CharacterId, InstanceId};
use crate::data::card::SpeedZone;

/// One declared card play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub actor: CharacterId,
    /// The card instance played, which must be in the actor's team's hand
    /// and owned by the actor.
    pub card: InstanceId,
    /// Explicitly declared targets, per the card's pattern arity.
    pub targets: SmallVec<[CharacterId; 3]>,
    /// Extra energy committed on top of the base cost (X-cost cards).
    pub spend: i32,
    /// The speed zone the controller expects the action to resolve in.
    /// When present it must match the card's effective speed after status
    /// modifiers; a stale declaration is rejected rather than re-timed.
    pub declared_speed: Option<SpeedZone>,
    /// Answers to the choices this card's effects ask for, in effect order.
    pub answers: Vec<ChoiceAnswer>,
}

impl Action {
    #[must_use]
    pub fn new(actor: CharacterId, card: InstanceId) -> Self {
        Self {
            actor,
            card,
            targets: SmallVec::new(),
            spend: 0,
            declared_speed: None,
            answers: Vec::new(),
        }
    }

    #[must_use]
    pub fn target(mut self, target: CharacterId) -> Self {
        self.targets.push(target);
        self
    }

    #[must_use]
    pub fn spend(mut self, amount: i32) -> Self {
        self.spend = amount;
        self
    }

    #[must_use]
    pub fn at_speed(mut self, speed: SpeedZone) -> Self {
        self.declared_speed = Some(speed);
        self
    }

    #[must_use]
    pub fn answer(mut self, answer: ChoiceAnswer) -> Self {
        self.answers.push(answer);
        self
    }
}
