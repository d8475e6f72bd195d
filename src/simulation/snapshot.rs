//! Published projection of simulation state for remote views

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use serde::Serialize;

use super::catalog::FurnitureCategory;
use super::inventory::InventoryEntry;
use super::types::{CustomerId, FurnitureId, Order};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureSnapshot {
    pub id: FurnitureId,
    #[serde(rename = "type")]
    pub item: &'static str,
    /// Resolved from the item type at placement
    pub category: FurnitureCategory,
    pub grid_x: i32,
    pub grid_y: i32,
    /// Degrees, one of 0, 90, 180, 270
    pub rotation: u16,
    /// Machine stage label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'static str>,
    /// Last reported machine progress
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    /// Fractional grid coordinates, wobble included
    pub grid_x: f32,
    pub grid_y: f32,
    pub state: &'static str,
    pub color: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    pub patience: f32,
    pub seat_index: Option<usize>,
    pub opacity: f32,
}

/// Everything a view needs to draw one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub furniture: Vec<FurnitureSnapshot>,
    pub customers: Vec<CustomerSnapshot>,
    pub inventory: BTreeMap<String, InventoryEntry>,
    pub gold: u32,
    pub xp: u32,
    pub level: u32,
    pub next_level_xp: u32,
    pub held_drink: bool,
}

/// Keeps the latest published snapshot and fans it out to subscribers.
/// Publishing a snapshot equal to the last one is a no-op.
#[derive(Debug, Default)]
pub struct SnapshotPublisher {
    latest: Option<Arc<WorldSnapshot>>,
    version: u64,
    subscribers: Vec<Sender<Arc<WorldSnapshot>>>,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish if changed. Returns whether a publish event happened.
    pub fn publish(&mut self, snapshot: WorldSnapshot) -> bool {
        if self.latest.as_deref() == Some(&snapshot) {
            return false;
        }
        let snapshot = Arc::new(snapshot);
        self.version += 1;
        self.latest = Some(Arc::clone(&snapshot));
        // Dropped receivers are pruned here
        self.subscribers
            .retain(|tx| tx.send(Arc::clone(&snapshot)).is_ok());
        true
    }

    /// Receive every future publish event
    pub fn subscribe(&mut self) -> Receiver<Arc<WorldSnapshot>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn latest(&self) -> Option<Arc<WorldSnapshot>> {
        self.latest.clone()
    }

    /// Number of publish events so far; views re-render when it changes
    pub fn version(&self) -> u64 {
        self.version
    }
}
