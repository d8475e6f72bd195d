//! UI module that visualizes the simulation state using Bevy
//!
//! This module is purely for visualization - all simulation logic is in the `simulation` module.
//! The UI renders published snapshots and submits player actions as commands.

mod components;
mod hud;
mod input;
mod sync;
mod world;

use bevy::prelude::*;

use crate::simulation::SimConfig;

pub use components::{EntityMappings, SimWorldResource, ViewCommands};

use components::*;
use hud::{setup_hud, update_hud};
use input::{handle_build_click, handle_command_keys, handle_input, update_cursor_cell};
use sync::{sync_view, tick_simulation};
use world::setup_world;

/// Plugin to register all UI systems
#[derive(Default)]
pub struct CoffeeShopUIPlugin {
    pub config: SimConfig,
    pub seed: Option<u64>,
}

impl Plugin for CoffeeShopUIPlugin {
    fn build(&self, app: &mut App) {
        let sim_world = SimWorldResource::new(self.config.clone(), self.seed);
        let sender = ViewCommands(sim_world.0.sender());

        app.insert_resource(sim_world)
            .insert_resource(sender)
            .init_resource::<EntityMappings>()
            .init_resource::<ViewState>()
            .init_resource::<BuildState>()
            .add_systems(Startup, (setup_world, setup_hud))
            .add_systems(FixedUpdate, tick_simulation)
            .add_systems(
                Update,
                (
                    sync_view,
                    update_hud,
                    handle_input,
                    update_cursor_cell,
                    handle_command_keys.after(update_cursor_cell),
                    handle_build_click.after(update_cursor_cell),
                ),
            );
    }
}
