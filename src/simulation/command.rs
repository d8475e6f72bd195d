//! Commands submitted from a view and the queue that carries them
//!
//! Views push commands at any time through a [`CommandSender`]. The simulation
//! drains the queue once per tick, taking and clearing it in one step so a
//! command enqueued while the batch is being applied waits for the next tick.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::types::{CustomerId, FurnitureId};

/// A single mutation requested by a view.
///
/// Wire form: `{"kind": "MOVE_FURNITURE", "payload": {"id": 3, "x": 5, "y": 5}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Place a new item of the named type at grid cell (x, y).
    PlaceFurniture {
        #[serde(rename = "type")]
        item: String,
        x: i32,
        y: i32,
        /// Caller-chosen id, so later commands in the same batch can refer to it
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<FurnitureId>,
    },
    MoveFurniture { id: FurnitureId, x: i32, y: i32 },
    RotateFurniture { id: FurnitureId },
    DeleteFurniture { id: FurnitureId },
    /// Advance a coffee machine, or pick up its finished drink
    BrewCoffee { id: FurnitureId },
    ServeCustomer { id: CustomerId },
}

impl Command {
    pub fn kind(&self) -> &'static str {
        match self {
            Command::PlaceFurniture { .. } => "PLACE_FURNITURE",
            Command::MoveFurniture { .. } => "MOVE_FURNITURE",
            Command::RotateFurniture { .. } => "ROTATE_FURNITURE",
            Command::DeleteFurniture { .. } => "DELETE_FURNITURE",
            Command::BrewCoffee { .. } => "BREW_COFFEE",
            Command::ServeCustomer { .. } => "SERVE_CUSTOMER",
        }
    }
}

type Pending = Arc<Mutex<Vec<Command>>>;

// A panic while holding the lock cannot leave a Vec half-written, so the
// data is still usable.
fn lock(pending: &Pending) -> MutexGuard<'_, Vec<Command>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cloneable handle for submitting commands from outside the simulation
#[derive(Debug, Clone, Default)]
pub struct CommandSender {
    pending: Pending,
}

impl CommandSender {
    /// Append a command; it runs on the next drain, after everything already queued
    pub fn send(&self, command: Command) {
        lock(&self.pending).push(command);
    }

    pub fn send_batch(&self, commands: impl IntoIterator<Item = Command>) {
        lock(&self.pending).extend(commands);
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }
}

/// FIFO of commands waiting for the next tick
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: Pending,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A handle that feeds this queue
    pub fn sender(&self) -> CommandSender {
        CommandSender {
            pending: Arc::clone(&self.pending),
        }
    }

    pub fn push(&self, command: Command) {
        lock(&self.pending).push(command);
    }

    /// Take every pending command in submission order, leaving the queue empty
    pub fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut *lock(&self.pending))
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.pending).is_empty()
    }
}

/// A command to submit once the clock reaches `tick`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledCommand {
    pub tick: u64,
    pub command: Command,
}

/// Parse a JSON list of scheduled commands, sorted by tick
pub fn parse_script(text: &str) -> Result<Vec<ScheduledCommand>> {
    let mut script: Vec<ScheduledCommand> =
        serde_json::from_str(text).context("Invalid command script")?;
    // Stable, so same-tick commands keep file order
    script.sort_by_key(|entry| entry.tick);
    Ok(script)
}

pub fn load_script(path: &Path) -> Result<Vec<ScheduledCommand>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&text)
}
