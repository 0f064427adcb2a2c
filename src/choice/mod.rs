//! Player choices and deterministic fallbacks.
//!
//! Some effects want a decision from the controller (which card to seek,
//! where to redirect, what to discard). Declarations carry their answers up
//! front as a [`ChoiceAnswer`] list; the [`ChoiceBroker`] hands them out in
//! order during resolution. When an answer is missing or does not fit, the
//! interpreter falls back to a fixed deterministic rule and marks the
//! resolved choice as automatic, so a transcript never depends on anything
//! outside the declaration and the seed.

use serde::{Deserialize, Serialize};

use crate::core::ids::{CharacterId, InstanceId};
use crate::position::PushDirection;

/// The kinds of decision an effect can ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceKind {
    /// Reorder the peeked top of the deck; omitted cards go to the bottom.
    ScryOrder,
    /// Pick a deck card to take into hand.
    SeekCard,
    /// Pick a discard-pile card to take into hand.
    SearchCard,
    /// Pick the new target for the action's remaining effects.
    RedirectTarget,
    /// Pick which way a push moves its targets.
    PushDirection,
    /// Pick a hand card to pay a discard price.
    DiscardFromHand,
}

/// A pre-supplied answer to one choice, in declaration order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceAnswer {
    /// New top-down order for the peeked cards. Peeked cards not listed
    /// are bottomed in their original relative order.
    ScryOrder(Vec<InstanceId>),
    SeekCard(InstanceId),
    SearchCard(InstanceId),
    RedirectTarget(CharacterId),
    PushDirection(PushDirection),
    DiscardFromHand(InstanceId),
}

impl ChoiceAnswer {
    #[must_use]
    pub fn kind(&self) -> ChoiceKind {
        match self {
            ChoiceAnswer::ScryOrder(_) => ChoiceKind::ScryOrder,
            ChoiceAnswer::SeekCard(_) => ChoiceKind::SeekCard,
            ChoiceAnswer::SearchCard(_) => ChoiceKind::SearchCard,
            ChoiceAnswer::RedirectTarget(_) => ChoiceKind::RedirectTarget,
            ChoiceAnswer::PushDirection(_) => ChoiceKind::PushDirection,
            ChoiceAnswer::DiscardFromHand(_) => ChoiceKind::DiscardFromHand,
        }
    }
}

/// Hands out a declaration's answers during one action's resolution.
///
/// Answers are consumed front to back. An answer is only taken when its
/// kind matches the request; a mismatched front answer stays put and the
/// request falls back, which keeps a malformed declaration from shifting
/// later answers onto the wrong choices.
#[derive(Clone, Debug, Default)]
pub struct ChoiceBroker {
    answers: Vec<ChoiceAnswer>,
    cursor: usize,
}

impl ChoiceBroker {
    #[must_use]
    pub fn new(answers: Vec<ChoiceAnswer>) -> Self {
        Self { answers, cursor: 0 }
    }

    fn take(&mut self, kind: ChoiceKind) -> Option<ChoiceAnswer> {
        let next = self.answers.get(self.cursor)?;
        if next.kind() != kind {
            return None;
        }
        let answer = next.clone();
        self.cursor += 1;
        Some(answer)
    }

    pub fn scry_order(&mut self) -> Option<Vec<InstanceId>> {
        match self.take(ChoiceKind::ScryOrder) {
            Some(ChoiceAnswer::ScryOrder(order)) => Some(order),
            _ => None,
        }
    }

    pub fn seek_card(&mut self) -> Option<InstanceId> {
        match self.take(ChoiceKind::SeekCard) {
            Some(ChoiceAnswer::SeekCard(id)) => Some(id),
            _ => None,
        }
    }

    pub fn search_card(&mut self) -> Option<InstanceId> {
        match self.take(ChoiceKind::SearchCard) {
            Some(ChoiceAnswer::SearchCard(id)) => Some(id),
            _ => None,
        }
    }

    pub fn redirect_target(&mut self) -> Option<CharacterId> {
        match self.take(ChoiceKind::RedirectTarget) {
            Some(ChoiceAnswer::RedirectTarget(id)) => Some(id),
            _ => None,
        }
    }

    pub fn push_direction(&mut self) -> Option<PushDirection> {
        match self.take(ChoiceKind::PushDirection) {
            Some(ChoiceAnswer::PushDirection(direction)) => Some(direction),
            _ => None,
        }
    }

    pub fn discard_from_hand(&mut self) -> Option<InstanceId> {
        match self.take(ChoiceKind::DiscardFromHand) {
            Some(ChoiceAnswer::DiscardFromHand(id)) => Some(id),
            _ => None,
        }
    }
}
