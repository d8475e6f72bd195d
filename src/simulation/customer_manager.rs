//! Customer spawning and management for the coffee shop simulation
//!
//! This module contains functions for spawning and updating customers.
//! It separates customer management logic from the main world coordination.

use std::collections::BTreeMap;

use rand::seq::IndexedRandom;
use rand::Rng;

use super::config::{CustomerConfig, SpawnConfig};
use super::customer::{CustomerPaths, CustomerUpdateResult, SimCustomer};
use super::grid::GridSystem;
use super::types::{CustomerId, Position, CUSTOMER_PALETTE, MENU};

/// Timed, population-capped customer spawner
#[derive(Debug, Clone, Default)]
pub struct CustomerSpawner {
    timer: f32,
    next_id: u64,
}

impl CustomerSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the spawn timer. Returns true when the interval elapsed and
    /// there is room for another customer; a full shop just skips the slot.
    pub fn tick(&mut self, delta_secs: f32, population: usize, config: &SpawnConfig) -> bool {
        self.timer += delta_secs;
        if self.timer < config.interval {
            return false;
        }
        self.timer -= config.interval;
        population < config.max_customers
    }

    pub fn next_id(&mut self) -> CustomerId {
        self.next_id += 1;
        CustomerId(self.next_id)
    }
}

/// Screen position where customers appear on the street
pub fn spawn_point(grid: &GridSystem, config: &SpawnConfig) -> Position {
    grid.to_screen(config.spawn_col, config.spawn_row)
}

/// Doorway, queue spot and scene bounds in screen space
pub fn customer_paths(
    grid: &GridSystem,
    customers: &CustomerConfig,
    spawn: &SpawnConfig,
) -> CustomerPaths {
    CustomerPaths {
        door: grid.to_screen(customers.door_col, customers.door_row),
        queue_spot: grid.to_screen(customers.queue_col, customers.queue_row),
        scene_width: spawn.scene_width,
        scene_height: spawn.scene_height,
    }
}

/// Spawn a customer at the start of the street with a random order, color and pace
///
/// # Arguments
/// * `id` - The pre-generated customer ID
/// * `rng` - Random source for order, color and speed
/// * `grid` - The grid used to place the spawn point
/// * `spawn` - Spawn location and street layout
/// * `customers` - Walk speed range
pub fn spawn_customer<R: Rng + ?Sized>(
    id: CustomerId,
    rng: &mut R,
    grid: &GridSystem,
    spawn: &SpawnConfig,
    customers: &CustomerConfig,
) -> SimCustomer {
    let start = spawn_point(grid, spawn);
    let street_end = Position::new(start.x + spawn.street_dx, start.y + spawn.street_dy);

    let order = MENU.choose(rng).cloned().unwrap_or(MENU[0].clone());
    let color = CUSTOMER_PALETTE
        .choose(rng)
        .copied()
        .unwrap_or(CUSTOMER_PALETTE[0]);
    let speed = if customers.max_speed > customers.min_speed {
        rng.random_range(customers.min_speed..customers.max_speed)
    } else {
        customers.min_speed
    };

    SimCustomer::new(id, start, street_end, speed, order, color)
}

/// Update all customers in the simulation
///
/// Returns a list of (customer_id, result) tuples for customers that need special handling
pub fn update_customers<R: Rng + ?Sized>(
    delta_secs: f32,
    customers: &mut BTreeMap<CustomerId, SimCustomer>,
    rng: &mut R,
    config: &CustomerConfig,
    paths: &CustomerPaths,
) -> Vec<(CustomerId, CustomerUpdateResult)> {
    customers
        .iter_mut()
        .filter_map(|(id, customer)| match customer.update(delta_secs, rng, config, paths) {
            CustomerUpdateResult::Continue => None,
            result => Some((*id, result)),
        })
        .collect()
}
