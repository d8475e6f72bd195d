//! Remaining placeable stock per item type

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use super::catalog::FurnitureKind;

/// Stock for one item type. `count` stays within `0..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub count: u32,
    pub max: u32,
}

/// Gates placement on available stock and restores it on removal
#[derive(Debug, Clone)]
pub struct InventoryLedger {
    entries: BTreeMap<FurnitureKind, InventoryEntry>,
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self::with_starting_stock()
    }
}

impl InventoryLedger {
    /// An empty ledger: every reservation fails until stock is set
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn with_starting_stock() -> Self {
        let mut ledger = Self::empty();
        for kind in FurnitureKind::ALL {
            let (count, max) = kind.starting_stock();
            ledger.set_stock(kind, count, max);
        }
        ledger
    }

    /// Set stock for an item type, clamping `count` to `max`
    pub fn set_stock(&mut self, kind: FurnitureKind, count: u32, max: u32) {
        self.entries.insert(
            kind,
            InventoryEntry {
                count: count.min(max),
                max,
            },
        );
    }

    /// Take one unit if any remain. Leaves the ledger untouched on failure.
    pub fn try_reserve(&mut self, kind: FurnitureKind) -> bool {
        match self.entries.get_mut(&kind) {
            Some(entry) if entry.count > 0 => {
                entry.count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Return one unit, never exceeding `max`
    pub fn release(&mut self, kind: FurnitureKind) {
        match self.entries.get_mut(&kind) {
            Some(entry) if entry.count < entry.max => entry.count += 1,
            Some(_) => warn!("Release of {} would exceed its max; clamped", kind),
            None => warn!("Release of {} which has no inventory entry", kind),
        }
    }

    pub fn get(&self, kind: FurnitureKind) -> Option<InventoryEntry> {
        self.entries.get(&kind).copied()
    }

    pub fn count(&self, kind: FurnitureKind) -> u32 {
        self.get(kind).map_or(0, |entry| entry.count)
    }

    /// The `{type: {count, max}}` surface read by views
    pub fn surface(&self) -> BTreeMap<String, InventoryEntry> {
        self.entries
            .iter()
            .map(|(kind, entry)| (kind.as_str().to_string(), *entry))
            .collect()
    }
}
