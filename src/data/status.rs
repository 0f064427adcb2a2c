//! Status definitions - authored status data.
//!
//! A [`StatusDefinition`] describes one status kind: its decay mode, which of
//! the four numeric dimensions governs its lifetime, the per-dimension caps,
//! and the modifier hooks it contributes to in-flight actions. Definitions
//! are immutable; runtime state lives in `status::StatusInstance`.
//!
//! Decay is data-driven. The decrement family (Disarm, Root, Seal, Silence,
//! Stagger, Taunt, Wound, Wither, Thorns, Empower, Overload, Lethargy) loses
//! one stack at Turn End. The absorb/negation family decays per its own mode:
//! duration countdown (Invulnerable, Regen, Renewal) or consumption-based
//! expiry (Barrier, Cover).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::data::card::CardCategory;
use crate::error::DataIntegrityError;

/// The closed set of status kinds the engine models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    // Decrement family: lose one stack at Turn End, expire at zero.
    Disarm,
    Root,
    Seal,
    Silence,
    Stagger,
    Taunt,
    Wound,
    Wither,
    Thorns,
    Empower,
    Overload,
    Lethargy,
    // Absorb/negation family: decays per its own mode.
    Barrier,
    Invulnerable,
    Regen,
    Renewal,
    // Charge-based redirection.
    Cover,
}

impl StatusKind {
    /// Every kind, in a fixed order (catalog construction, tests).
    pub const ALL: [StatusKind; 17] = [
        StatusKind::Disarm,
        StatusKind::Root,
        StatusKind::Seal,
        StatusKind::Silence,
        StatusKind::Stagger,
        StatusKind::Taunt,
        StatusKind::Wound,
        StatusKind::Wither,
        StatusKind::Thorns,
        StatusKind::Empower,
        StatusKind::Overload,
        StatusKind::Lethargy,
        StatusKind::Barrier,
        StatusKind::Invulnerable,
        StatusKind::Regen,
        StatusKind::Renewal,
        StatusKind::Cover,
    ];
}

/// One of the four independent numeric dimensions a status tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Potency,
    Count,
    Stack,
    Value,
}

/// Per-dimension upper bounds. Applying past a cap clamps, never errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionCaps {
    pub potency: i32,
    pub count: i32,
    pub stack: i32,
    pub value: i32,
}

impl DimensionCaps {
    /// Uniform caps across all four dimensions.
    #[must_use]
    pub const fn uniform(cap: i32) -> Self {
        Self {
            potency: cap,
            count: cap,
            stack: cap,
            value: cap,
        }
    }

    #[must_use]
    pub const fn get(&self, dim: Dimension) -> i32 {
        match dim {
            Dimension::Potency => self.potency,
            Dimension::Count => self.count,
            Dimension::Stack => self.stack,
            Dimension::Value => self.value,
        }
    }
}

impl Default for DimensionCaps {
    fn default() -> Self {
        Self::uniform(99)
    }
}

/// How a status's lifetime works.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMode {
    /// Stacks decrement at Turn End; expires at zero stacks.
    Decrement,
    /// Counts down at Turn End; expires at zero count.
    Duration,
    /// Consumed by use (absorption, charges); expires when spent.
    Consumable,
}

/// What happens to the status at Turn End.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEndBehavior {
    /// Lose one stack.
    LoseOneStack,
    /// Count down by one.
    CountDown,
    /// Nothing; expiry is consumption-driven.
    None,
}

/// A hook a status contributes to an in-flight action.
///
/// Numeric hooks combine additively across statuses; blocking hooks
/// override (the action is refused or cancelled outright).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModifierHook {
    /// Outgoing damage increases by this status's potency.
    DamagePlusPotency,
    /// Energy cost increases by this status's potency.
    CostPlusPotency,
    /// The action resolves one speed zone slower.
    SlowerByOneZone,
    /// Playing cards of this category is blocked entirely.
    BlockCategory(CardCategory),
    /// A Defense-category action is cancelled at Before Use.
    CancelDefensive,
}

/// Immutable authored definition of one status kind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatusDefinition {
    pub kind: StatusKind,
    pub mode: StatusMode,
    /// The dimension whose reaching zero removes the instance.
    pub governing: Dimension,
    pub caps: DimensionCaps,
    pub turn_end: TurnEndBehavior,
    pub hooks: Vec<ModifierHook>,
}

impl StatusDefinition {
    fn decrement(kind: StatusKind) -> Self {
        Self {
            kind,
            mode: StatusMode::Decrement,
            governing: Dimension::Stack,
            caps: DimensionCaps::default(),
            turn_end: TurnEndBehavior::LoseOneStack,
            hooks: Vec::new(),
        }
    }

    fn duration(kind: StatusKind) -> Self {
        Self {
            kind,
            mode: StatusMode::Duration,
            governing: Dimension::Count,
            caps: DimensionCaps::default(),
            turn_end: TurnEndBehavior::CountDown,
            hooks: Vec::new(),
        }
    }

    fn consumable(kind: StatusKind, governing: Dimension) -> Self {
        Self {
            kind,
            mode: StatusMode::Consumable,
            governing,
            caps: DimensionCaps::default(),
            turn_end: TurnEndBehavior::None,
            hooks: Vec::new(),
        }
    }

    #[must_use]
    fn with_hook(mut self, hook: ModifierHook) -> Self {
        self.hooks.push(hook);
        self
    }

    #[must_use]
    fn with_caps(mut self, caps: DimensionCaps) -> Self {
        self.caps = caps;
        self
    }
}

/// The immutable set of status definitions a match runs with.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StatusCatalog {
    defs: FxHashMap<StatusKind, StatusDefinition>,
}

impl StatusCatalog {
    /// The standard catalog covering every [`StatusKind`].
    #[must_use]
    pub fn standard() -> Self {
        let mut defs = FxHashMap::default();
        let mut add = |def: StatusDefinition| {
            defs.insert(def.kind, def);
        };

        add(StatusDefinition::decrement(StatusKind::Disarm)
            .with_hook(ModifierHook::BlockCategory(CardCategory::Attack)));
        add(StatusDefinition::decrement(StatusKind::Silence)
            .with_hook(ModifierHook::BlockCategory(CardCategory::Skill)));
        add(StatusDefinition::decrement(StatusKind::Seal)
            .with_hook(ModifierHook::BlockCategory(CardCategory::Ultimate)));
        add(StatusDefinition::decrement(StatusKind::Stagger)
            .with_hook(ModifierHook::CancelDefensive));
        add(StatusDefinition::decrement(StatusKind::Root));
        add(StatusDefinition::decrement(StatusKind::Taunt)
            .with_caps(DimensionCaps { stack: 3, ..DimensionCaps::default() }));
        add(StatusDefinition::decrement(StatusKind::Wound));
        add(StatusDefinition::decrement(StatusKind::Wither));
        add(StatusDefinition::decrement(StatusKind::Thorns));
        add(StatusDefinition::decrement(StatusKind::Empower)
            .with_hook(ModifierHook::DamagePlusPotency));
        add(StatusDefinition::decrement(StatusKind::Overload)
            .with_hook(ModifierHook::CostPlusPotency));
        add(StatusDefinition::decrement(StatusKind::Lethargy)
            .with_hook(ModifierHook::SlowerByOneZone));

        add(StatusDefinition::consumable(StatusKind::Barrier, Dimension::Value)
            .with_caps(DimensionCaps { value: 999, ..DimensionCaps::default() }));
        add(StatusDefinition::duration(StatusKind::Invulnerable)
            .with_caps(DimensionCaps { count: 3, ..DimensionCaps::default() }));
        add(StatusDefinition::duration(StatusKind::Regen));
        add(StatusDefinition::duration(StatusKind::Renewal)
            .with_caps(DimensionCaps { value: 999, ..DimensionCaps::default() }));
        add(StatusDefinition::consumable(StatusKind::Cover, Dimension::Count)
            .with_caps(DimensionCaps { count: 5, ..DimensionCaps::default() }));

        Self { defs }
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, kind: StatusKind) -> Option<&StatusDefinition> {
        self.defs.get(&kind)
    }

    /// Look up a definition, failing fast on a missing entry.
    pub fn require(&self, kind: StatusKind) -> Result<&StatusDefinition, DataIntegrityError> {
        self.defs
            .get(&kind)
            .ok_or(DataIntegrityError::MissingStatus(kind))
    }

    /// Replace or add a definition (authoring overrides).
    pub fn insert(&mut self, def: StatusDefinition) {
        self.defs.insert(def.kind, def);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
