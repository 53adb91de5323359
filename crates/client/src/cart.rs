//! Selection set of names to register.
//!
//! Holds availability snapshots keyed by name. Entries keep the snapshot
//! taken when they were added; the checkout surface re-verifies, so
//! staleness here is accepted. Iteration order is insertion order, which is
//! what the display layer renders.

use nameport_core::NameKey;

use crate::registrar::NameAvailability;

/// One selected name with the snapshot it was added under.
#[derive(Debug, Clone, PartialEq)]
pub struct CartEntry {
    pub availability: NameAvailability,
}

impl CartEntry {
    #[must_use]
    pub fn name(&self) -> &NameKey {
        &self.availability.name
    }
}

/// Insertion-ordered, duplicate-free set of selected names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a snapshot. Idempotent on the name: re-adding a name already in
    /// the cart changes nothing, not even its snapshot. Returns `true` when
    /// the entry was newly added.
    pub fn add(&mut self, availability: NameAvailability) -> bool {
        if self.contains(&availability.name) {
            return false;
        }
        self.entries.push(CartEntry { availability });
        true
    }

    /// Remove by name. Returns the removed entry, if present.
    pub fn remove(&mut self, name: &NameKey) -> Option<CartEntry> {
        let index = self.entries.iter().position(|e| e.name() == name)?;
        Some(self.entries.remove(index))
    }

    #[must_use]
    pub fn contains(&self, name: &NameKey) -> bool {
        self.entries.iter().any(|e| e.name() == name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartEntry;
    type IntoIter = std::slice::Iter<'a, CartEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
