//! Card definitions - authored card data.
//!
//! A [`CardDefinition`] is immutable authored content: category, cost, speed
//! zone, targeting pattern, phased effect list, play restrictions, and
//! transform candidates. Runtime identity lives in [`CardInstance`], which
//! points at its base definition and at its current face (transforms swap
//! the face, never the base).
//!
//! Definitions are built with the chained builder style and collected into a
//! `Rulebook` at match setup.

use serde::{Deserialize, Serialize};

use crate::core::ids::{CardId, CharacterId, InstanceId};
use crate::effects::tree::{Condition, PhasedEffect};

/// Card category. Several statuses block or cancel whole categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Attack,
    Skill,
    Defense,
    Ultimate,
}

/// Speed zone a card resolves in. All Fast actions resolve before all
/// Normal, all Normal before all Slow; within a zone, declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpeedZone {
    Fast,
    Normal,
    Slow,
}

impl SpeedZone {
    /// The next slower zone (Slow stays Slow).
    #[must_use]
    pub const fn slower(self) -> Self {
        match self {
            SpeedZone::Fast => SpeedZone::Normal,
            SpeedZone::Normal | SpeedZone::Slow => SpeedZone::Slow,
        }
    }
}

/// What playing a card costs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardCost {
    /// Energy drawn from the team pool.
    pub energy: i32,
    /// Ultimate charge required and consumed.
    pub ultimate: i32,
    /// When set, the declaration carries an extra spend amount on top of
    /// `energy` (X-cost cards).
    pub variable: bool,
}

/// How a card picks its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetPattern {
    /// Implicitly targets the actor.
    SelfOnly,
    /// One living ally (the actor counts as its own ally).
    SingleAlly,
    /// Every living ally.
    AllAllies,
    /// One living enemy, chosen at declaration.
    SingleEnemy,
    /// One living enemy, picked by the engine RNG at resolution.
    RandomEnemy,
    /// Every living enemy.
    AllEnemies,
    /// A declared enemy plus the living enemies adjacent to it.
    Splash,
    /// A declared enemy, then `hits - 1` further RNG picks among living
    /// enemies (repeats allowed).
    Bounce { hits: u8 },
}

impl TargetPattern {
    /// How many targets the declaration must carry explicitly.
    #[must_use]
    pub const fn declared_arity(self) -> usize {
        match self {
            TargetPattern::SelfOnly
            | TargetPattern::AllAllies
            | TargetPattern::RandomEnemy
            | TargetPattern::AllEnemies => 0,
            TargetPattern::SingleAlly
            | TargetPattern::SingleEnemy
            | TargetPattern::Splash
            | TargetPattern::Bounce { .. } => 1,
        }
    }

    /// Whether declared targets must be enemies of the actor.
    #[must_use]
    pub const fn targets_enemies(self) -> bool {
        matches!(
            self,
            TargetPattern::SingleEnemy
                | TargetPattern::RandomEnemy
                | TargetPattern::AllEnemies
                | TargetPattern::Splash
                | TargetPattern::Bounce { .. }
        )
    }
}

/// A declarative play restriction. The card may only be declared while the
/// condition holds, evaluated against the live state at declaration time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    pub require: Condition,
    /// Authored explanation surfaced in rejection errors.
    pub text: Option<String>,
}

/// One candidate face swap. When several candidates match at resolution,
/// the last in authored order wins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformCandidate {
    pub condition: Condition,
    pub into: CardId,
}

/// Immutable authored definition of one card face.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardDefinition {
    pub id: CardId,
    pub name: String,
    pub category: CardCategory,
    pub cost: CardCost,
    pub speed: SpeedZone,
    pub pattern: TargetPattern,
    /// Effects grouped by the timing phase they fire in.
    pub effects: Vec<PhasedEffect>,
    pub restrictions: Vec<Restriction>,
    /// Transform candidates. Later entries override earlier ones when
    /// their conditions overlap.
    pub transforms: Vec<TransformCandidate>,
    /// A face that only exists as a transform result; it cannot appear in
    /// deck lists.
    pub transform_only: bool,
    /// Goes to exhaust instead of discard after resolution.
    pub exhausts: bool,
    /// Rules text kept verbatim for faces with unmodeled behavior.
    pub rules_text: Option<String>,
}

impl CardDefinition {
    #[must_use]
    pub fn new(id: CardId, name: impl Into<String>, category: CardCategory) -> Self {
        Self {
            id,
            name: name.into(),
            category,
            cost: CardCost::default(),
            speed: SpeedZone::Normal,
            pattern: TargetPattern::SelfOnly,
            effects: Vec::new(),
            restrictions: Vec::new(),
            transforms: Vec::new(),
            transform_only: false,
            exhausts: false,
            rules_text: None,
        }
    }

    #[must_use]
    pub fn cost(mut self, energy: i32) -> Self {
        self.cost.energy = energy;
        self
    }

    #[must_use]
    pub fn ultimate_cost(mut self, ultimate: i32) -> Self {
        self.cost.ultimate = ultimate;
        self
    }

    #[must_use]
    pub fn variable_cost(mut self) -> Self {
        self.cost.variable = true;
        self
    }

    #[must_use]
    pub fn speed(mut self, speed: SpeedZone) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn pattern(mut self, pattern: TargetPattern) -> Self {
        self.pattern = pattern;
        self
    }

    #[must_use]
    pub fn effect(mut self, phased: PhasedEffect) -> Self {
        self.effects.push(phased);
        self
    }

    #[must_use]
    pub fn restriction(mut self, require: Condition, text: impl Into<String>) -> Self {
        self.restrictions.push(Restriction {
            require,
            text: Some(text.into()),
        });
        self
    }

    #[must_use]
    pub fn transform(mut self, condition: Condition, into: CardId) -> Self {
        self.transforms.push(TransformCandidate { condition, into });
        self
    }

    #[must_use]
    pub fn transform_only(mut self) -> Self {
        self.transform_only = true;
        self
    }

    #[must_use]
    pub fn exhausts(mut self) -> Self {
        self.exhausts = true;
        self
    }

    #[must_use]
    pub fn rules_text(mut self, text: impl Into<String>) -> Self {
        self.rules_text = Some(text.into());
        self
    }
}

/// One physical copy of a card in a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInstance {
    pub id: InstanceId,
    /// The definition this copy was built from. Never changes.
    pub base: CardId,
    /// The face currently showing. Transforms update this.
    pub current: CardId,
    /// The character whose deck contributed this copy.
    pub owner: CharacterId,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: InstanceId, card: CardId, owner: CharacterId) -> Self {
        Self {
            id,
            base: card,
            current: card,
            owner,
        }
    }
}
