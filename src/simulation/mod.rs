//! Standalone coffee shop simulation module
//!
//! This module contains all the core shop simulation logic that can run
//! independently of the Bevy game engine. It can be tested via console
//! without needing to boot up the full game.

mod bridge;
mod catalog;
mod clock;
mod coffee_machine;
mod command;
mod config;
mod customer;
mod customer_manager;
mod error;
mod furniture;
mod grid;
mod inventory;
mod progression;
mod snapshot;
mod types;
mod world;

// Re-export public types for external use
pub use bridge::{Diagnostic, SyncBridge};
pub use catalog::{FurnitureCategory, FurnitureKind, TABLE_CAPACITY};
pub use clock::SimulationClock;
pub use coffee_machine::{CoffeeMachine, MachineState, ProgressReport};
pub use command::{
    load_script, parse_script, Command, CommandQueue, CommandSender, ScheduledCommand,
};
pub use config::{
    BridgeConfig, CustomerConfig, GridConfig, MachineConfig, SimConfig, SpawnConfig,
};
pub use customer::{CustomerPaths, CustomerState, CustomerUpdateResult, SimCustomer};
pub use customer_manager::{customer_paths, spawn_customer, spawn_point, CustomerSpawner};
pub use error::CommandError;
pub use furniture::{Furniture, FurnitureRegistry, FurnitureState};
pub use grid::{GridSystem, Snapped};
pub use inventory::{InventoryEntry, InventoryLedger};
pub use progression::{Progression, ProgressionSink, LEVEL_XP_GROWTH, STARTING_LEVEL_XP};
pub use snapshot::{CustomerSnapshot, FurnitureSnapshot, SnapshotPublisher, WorldSnapshot};
pub use types::{
    CustomerId, FurnitureId, GridCell, Order, Position, Rotation, CUSTOMER_PALETTE, MAX_PATIENCE,
    MENU,
};
pub use world::{ShopStats, SimWorld};
