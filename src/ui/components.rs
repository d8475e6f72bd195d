//! UI components and resources for linking Bevy entities to simulation state

use bevy::prelude::*;
use std::collections::HashMap;

use crate::simulation::{
    CommandSender, CustomerId, FurnitureId, FurnitureKind, GridCell, SimConfig, SimWorld,
};

/// Resource wrapper for the simulation world
#[derive(Resource)]
pub struct SimWorldResource(pub SimWorld);

impl SimWorldResource {
    pub fn new(config: SimConfig, seed: Option<u64>) -> Self {
        Self(SimWorld::with_config(config, seed))
    }
}

impl Default for SimWorldResource {
    fn default() -> Self {
        Self(SimWorld::new())
    }
}

/// The only way the view changes the simulation
#[derive(Resource, Clone)]
pub struct ViewCommands(pub CommandSender);

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Marker for floor tiles
#[derive(Component)]
pub struct FloorTile;

/// Marker for the tile highlight under the cursor
#[derive(Component)]
pub struct CursorMarker;

/// Marker for entities synced from simulation
#[derive(Component)]
pub struct SimSynced;

/// Links a Bevy entity to a simulation furniture piece
#[derive(Component)]
pub struct FurnitureLink(pub FurnitureId);

/// Links a Bevy entity to a simulation customer
#[derive(Component)]
pub struct CustomerLink(pub CustomerId);

/// Resource to track Bevy entities mapped to simulation entities
#[derive(Resource, Default)]
pub struct EntityMappings {
    pub furniture: HashMap<FurnitureId, Entity>,
    pub customers: HashMap<CustomerId, Entity>,
}

/// Publisher version the scene was last rebuilt from
#[derive(Resource, Default)]
pub struct ViewState {
    pub rendered_version: u64,
}

/// Items selectable with the number keys
pub const BUILD_PALETTE: [FurnitureKind; 4] = [
    FurnitureKind::TableWood,
    FurnitureKind::TableMarble,
    FurnitureKind::PlantSmall,
    FurnitureKind::CoffeeMachine,
];

/// State for build mode and the cursor
#[derive(Resource)]
pub struct BuildState {
    pub enabled: bool,
    pub selected: FurnitureKind,
    /// Piece picked up with M, placed on the next click
    pub moving: Option<FurnitureId>,
    /// In-bounds cell under the mouse
    pub cursor_cell: Option<GridCell>,
}

impl Default for BuildState {
    fn default() -> Self {
        Self {
            enabled: false,
            selected: BUILD_PALETTE[0],
            moving: None,
            cursor_cell: None,
        }
    }
}

/// Marker for HUD text elements
#[derive(Component, Clone, Copy)]
pub enum HudText {
    Gold,
    Level,
    HeldDrink,
    Mode,
    Inventory,
}
