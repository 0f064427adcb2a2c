//! The rulebook - validated authored content for one match.
//!
//! A [`Rulebook`] bundles every card definition and the status catalog. It
//! is validated once at construction: structural problems in authored data
//! (dangling card references, transform cycles, zero-hit multihits, negative
//! costs, statuses missing from the catalog, card effects authored in the
//! status-only Turn End window) abort setup with a [`DataIntegrityError`]
//! instead of surfacing mid-match.

use rustc_hash::FxHashMap;

use crate::core::ids::CardId;
use crate::data::card::CardDefinition;
use crate::data::status::{StatusCatalog, StatusKind};
use crate::effects::tree::{Condition, Effect, Phase};
use crate::error::DataIntegrityError;

/// Immutable authored content for a match.
#[derive(Clone, Debug, Default)]
pub struct Rulebook {
    cards: FxHashMap<CardId, CardDefinition>,
    statuses: StatusCatalog,
}

impl Rulebook {
    /// An empty rulebook with the standard status catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cards: FxHashMap::default(),
            statuses: StatusCatalog::standard(),
        }
    }

    /// Add a card definition. Later adds with the same id replace.
    pub fn add(&mut self, def: CardDefinition) {
        self.cards.insert(def.id, def);
    }

    #[must_use]
    pub fn with_card(mut self, def: CardDefinition) -> Self {
        self.add(def);
        self
    }

    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&CardDefinition> {
        self.cards.get(&id)
    }

    /// Look up a card the match state already references. The validation
    /// pass guarantees presence for validated rulebooks.
    pub fn require(&self, id: CardId) -> Result<&CardDefinition, DataIntegrityError> {
        self.cards
            .get(&id)
            .ok_or(DataIntegrityError::UnknownDeckCard(id))
    }

    #[must_use]
    pub fn statuses(&self) -> &StatusCatalog {
        &self.statuses
    }

    pub fn statuses_mut(&mut self) -> &mut StatusCatalog {
        &mut self.statuses
    }

    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Run the full structural validation pass.
    pub fn validate(&self) -> Result<(), DataIntegrityError> {
        for def in self.cards.values() {
            if def.cost.energy < 0 || def.cost.ultimate < 0 {
                return Err(DataIntegrityError::NegativeCost(def.id));
            }

            for phased in &def.effects {
                // Turn End belongs to status maintenance; no action ever
                // opens it, so an effect authored there would never fire.
                if phased.phase == Phase::TurnEnd {
                    return Err(DataIntegrityError::TurnEndEffect(def.id));
                }
                self.validate_effect(def.id, &phased.effect)?;
            }
            for restriction in &def.restrictions {
                self.validate_condition(&restriction.require)?;
            }
            for candidate in &def.transforms {
                self.validate_condition(&candidate.condition)?;
                if !self.cards.contains_key(&candidate.into) {
                    return Err(DataIntegrityError::MissingCard {
                        card: def.id,
                        missing: candidate.into,
                    });
                }
            }
        }

        self.check_transform_cycles()
    }

    fn validate_effect(&self, card: CardId, effect: &Effect) -> Result<(), DataIntegrityError> {
        match effect {
            Effect::Multihit { hits, effect } => {
                if *hits == 0 {
                    return Err(DataIntegrityError::ZeroHitMultihit(card));
                }
                self.validate_effect(card, effect)
            }
            Effect::Apply { kind, .. }
            | Effect::Set { kind, .. }
            | Effect::Reduce { kind, .. }
            | Effect::Remove { kind } => self.require_status(*kind),
            Effect::Create { card: created, .. } => {
                if self.cards.contains_key(created) {
                    Ok(())
                } else {
                    Err(DataIntegrityError::MissingCard {
                        card,
                        missing: *created,
                    })
                }
            }
            Effect::Spend { then, .. } => self.validate_effect(card, then),
            Effect::Cond { when, then } => {
                self.validate_condition(when)?;
                self.validate_effect(card, then)
            }
            _ => Ok(()),
        }
    }

    fn validate_condition(&self, condition: &Condition) -> Result<(), DataIntegrityError> {
        match condition {
            Condition::SelfHasStatus(kind) | Condition::TargetHasStatus(kind) => {
                self.require_status(*kind)
            }
            Condition::Not(inner) => self.validate_condition(inner),
            Condition::All(parts) | Condition::Any(parts) => {
                parts.iter().try_for_each(|c| self.validate_condition(c))
            }
            _ => Ok(()),
        }
    }

    fn require_status(&self, kind: StatusKind) -> Result<(), DataIntegrityError> {
        self.statuses.require(kind).map(|_| ())
    }

    /// Reject transform graphs that contain a cycle; a card that can reach
    /// itself through face swaps would loop at resolution.
    fn check_transform_cycles(&self) -> Result<(), DataIntegrityError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }

        fn visit(
            id: CardId,
            cards: &FxHashMap<CardId, CardDefinition>,
            marks: &mut FxHashMap<CardId, Mark>,
        ) -> Result<(), DataIntegrityError> {
            match marks.get(&id) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => return Err(DataIntegrityError::TransformCycle(id)),
                None => {}
            }
            marks.insert(id, Mark::InProgress);
            if let Some(def) = cards.get(&id) {
                for candidate in &def.transforms {
                    visit(candidate.into, cards, marks)?;
                }
            }
            marks.insert(id, Mark::Done);
            Ok(())
        }

        let mut marks = FxHashMap::default();
        for &id in self.cards.keys() {
            visit(id, &self.cards, &mut marks)?;
        }
        Ok(())
    }
}
