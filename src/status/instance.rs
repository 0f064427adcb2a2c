//! Status instances - runtime status state on a character.
//!
//! An instance tracks the four numeric dimensions. All mutation goes through
//! clamped setters so a dimension can never leave `[0, cap]`, no matter how
//! often a status is over-applied.

use serde::{Deserialize, Serialize};

use crate::data::status::{Dimension, DimensionCaps, StatusDefinition, StatusKind};

/// One active status on a character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInstance {
    pub kind: StatusKind,
    pub potency: i32,
    pub count: i32,
    pub stack: i32,
    pub value: i32,
}

impl StatusInstance {
    /// A fresh instance with all dimensions at zero.
    #[must_use]
    pub fn new(kind: StatusKind) -> Self {
        Self {
            kind,
            potency: 0,
            count: 0,
            stack: 0,
            value: 0,
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

    fn slot(&mut self, dim: Dimension) -> &mut i32 {
        match dim {
            Dimension::Potency => &mut self.potency,
            Dimension::Count => &mut self.count,
            Dimension::Stack => &mut self.stack,
            Dimension::Value => &mut self.value,
        }
    }

    /// Set a dimension, clamped to `[0, cap]`. Returns the stored value.
    pub fn set_clamped(&mut self, dim: Dimension, value: i32, caps: &DimensionCaps) -> i32 {
        let clamped = value.clamp(0, caps.get(dim));
        *self.slot(dim) = clamped;
        clamped
    }

    /// Add a delta to a dimension, clamped to `[0, cap]`.
    /// Returns the delta actually applied.
    pub fn add_clamped(&mut self, dim: Dimension, delta: i32, caps: &DimensionCaps) -> i32 {
        let before = self.get(dim);
        let after = self.set_clamped(dim, before.saturating_add(delta), caps);
        after - before
    }

    /// Whether the governing dimension of `def` has reached zero.
    #[must_use]
    pub fn expired(&self, def: &StatusDefinition) -> bool {
        self.get(def.governing) <= 0
    }
}
