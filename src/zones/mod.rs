//! Card zone ledger.
//!
//! Each team owns four zones: deck, hand, discard, exhaust. The ledger keeps
//! an ordered vec per zone plus a location map, and maintains the partition
//! invariant: every instance the team owns is in exactly one zone at all
//! times, with no overlap and no loss.
//!
//! Deck order convention: index 0 is the bottom, the last index is the top.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ids::InstanceId;
use crate::core::rng::MatchRng;

/// One of the four card zones a team owns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Deck,
    Hand,
    Discard,
    Exhaust,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 4] = [
        ZoneKind::Deck,
        ZoneKind::Hand,
        ZoneKind::Discard,
        ZoneKind::Exhaust,
    ];
}

/// Outcome of a reshuffle check before a draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reshuffle {
    /// The new deck order, bottom to top.
    pub order: Vec<InstanceId>,
}

/// Tracks card locations for one team.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZoneLedger {
    locations: FxHashMap<InstanceId, ZoneKind>,
    deck: Vec<InstanceId>,
    hand: Vec<InstanceId>,
    discard: Vec<InstanceId>,
    exhaust: Vec<InstanceId>,
}

impl ZoneLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn zone_vec(&self, zone: ZoneKind) -> &Vec<InstanceId> {
        match zone {
            ZoneKind::Deck => &self.deck,
            ZoneKind::Hand => &self.hand,
            ZoneKind::Discard => &self.discard,
            ZoneKind::Exhaust => &self.exhaust,
        }
    }

    fn zone_vec_mut(&mut self, zone: ZoneKind) -> &mut Vec<InstanceId> {
        match zone {
            ZoneKind::Deck => &mut self.deck,
            ZoneKind::Hand => &mut self.hand,
            ZoneKind::Discard => &mut self.discard,
            ZoneKind::Exhaust => &mut self.exhaust,
        }
    }

    /// Register a new instance in a zone (deck build, Create effects).
    ///
    /// Panics if the instance is already tracked; instance ids are unique.
    pub fn add(&mut self, instance: InstanceId, zone: ZoneKind) {
        let prior = self.locations.insert(instance, zone);
        assert!(prior.is_none(), "{instance} already tracked");
        self.zone_vec_mut(zone).push(instance);
    }

    /// Move an instance to another zone (appended on top).
    ///
    /// Returns the old zone, or `None` if the instance is unknown.
    pub fn move_to(&mut self, instance: InstanceId, zone: ZoneKind) -> Option<ZoneKind> {
        let old = *self.locations.get(&instance)?;
        if old == zone {
            return Some(old);
        }
        self.zone_vec_mut(old).retain(|&i| i != instance);
        self.locations.insert(instance, zone);
        self.zone_vec_mut(zone).push(instance);
        Some(old)
    }

    /// Where an instance currently is.
    #[must_use]
    pub fn zone_of(&self, instance: InstanceId) -> Option<ZoneKind> {
        self.locations.get(&instance).copied()
    }

    #[must_use]
    pub fn is_in(&self, instance: InstanceId, zone: ZoneKind) -> bool {
        self.zone_of(instance) == Some(zone)
    }

    /// Cards in a zone, in order (deck: bottom to top).
    #[must_use]
    pub fn zone(&self, zone: ZoneKind) -> &[InstanceId] {
        self.zone_vec(zone)
    }

    #[must_use]
    pub fn zone_size(&self, zone: ZoneKind) -> usize {
        self.zone_vec(zone).len()
    }

    /// Top card of the deck without removing it.
    #[must_use]
    pub fn deck_top(&self) -> Option<InstanceId> {
        self.deck.last().copied()
    }

    /// Remove the top card of the deck and put it in hand (the draw primitive).
    pub fn pop_deck(&mut self) -> Option<InstanceId> {
        let instance = self.deck.pop()?;
        self.locations.insert(instance, ZoneKind::Hand);
        self.hand.push(instance);
        Some(instance)
    }

    /// Compute the reshuffle that drawing from an empty deck would trigger.
    ///
    /// Consumes RNG to produce the new order but does not mutate the ledger;
    /// the caller applies it with [`ZoneLedger::apply_reshuffle`] so the
    /// resulting permutation can be journaled and replayed exactly.
    #[must_use]
    pub fn plan_reshuffle(&self, rng: &mut MatchRng) -> Option<Reshuffle> {
        if !self.deck.is_empty() || self.discard.is_empty() {
            return None;
        }
        let mut order = self.discard.clone();
        rng.shuffle(&mut order);
        Some(Reshuffle { order })
    }

    /// Turn the discard pile into the deck with the given order.
    ///
    /// `order` must be a permutation of the current discard contents.
    pub fn apply_reshuffle(&mut self, order: &[InstanceId]) {
        debug_assert_eq!(order.len(), self.discard.len());
        self.discard.clear();
        self.deck = order.to_vec();
        for &instance in order {
            self.locations.insert(instance, ZoneKind::Deck);
        }
    }

    /// Shuffle the deck in place (match setup).
    pub fn shuffle_deck(&mut self, rng: &mut MatchRng) {
        rng.shuffle(&mut self.deck);
    }

    /// Move the listed deck cards to the top of the deck, first listed on
    /// top. Cards not in the deck are ignored; unlisted deck cards keep
    /// their relative order below. Listing the whole deck is a full
    /// reorder.
    pub fn place_top(&mut self, order: &[InstanceId]) {
        let listed: Vec<InstanceId> = order
            .iter()
            .copied()
            .filter(|&i| self.is_in(i, ZoneKind::Deck))
            .collect();
        self.deck.retain(|i| !listed.contains(i));
        // Deck top is the last index, so append in reverse listed order.
        for &instance in listed.iter().rev() {
            self.deck.push(instance);
        }
    }

    /// Move a deck card to the bottom of the deck (scry).
    pub fn bottom_deck(&mut self, instance: InstanceId) {
        if self.is_in(instance, ZoneKind::Deck) {
            self.deck.retain(|&i| i != instance);
            self.deck.insert(0, instance);
        }
    }

    /// Total instances tracked.
    #[must_use]
    pub fn total(&self) -> usize {
        self.locations.len()
    }

    /// Check the partition invariant: the location map and the four zone
    /// vecs agree exactly, with no duplicates.
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        let listed: usize = ZoneKind::ALL.iter().map(|&z| self.zone_size(z)).sum();
        if listed != self.locations.len() {
            return false;
        }
        for zone in ZoneKind::ALL {
            for &instance in self.zone(zone) {
                if self.locations.get(&instance) != Some(&zone) {
                    return false;
                }
            }
        }
        true
    }
}
