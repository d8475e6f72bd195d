//! Main simulation world that ties everything together
//!
//! This is the entry point for running the coffee shop simulation
//! without any Bevy dependencies.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::bridge::SyncBridge;
use super::catalog::{FurnitureCategory, FurnitureKind};
use super::clock::SimulationClock;
use super::coffee_machine::MachineState;
use super::command::{Command, CommandSender};
use super::config::SimConfig;
use super::customer::{CustomerPaths, CustomerState, CustomerUpdateResult, SimCustomer};
use super::customer_manager::{self, CustomerSpawner};
use super::error::CommandError;
use super::furniture::{Furniture, FurnitureRegistry, FurnitureState};
use super::grid::GridSystem;
use super::inventory::InventoryLedger;
use super::progression::{Progression, ProgressionSink};
use super::snapshot::{CustomerSnapshot, FurnitureSnapshot, WorldSnapshot};
use super::types::{CustomerId, FurnitureId, GridCell, Position};

/// Running totals for the end-of-run report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopStats {
    pub customers_spawned: usize,
    pub customers_entered: usize,
    pub customers_served: usize,
    /// Left without being served
    pub customers_lost: usize,
    pub drinks_brewed: usize,
}

/// The main simulation world
pub struct SimWorld {
    pub config: SimConfig,
    pub grid: GridSystem,
    pub inventory: InventoryLedger,
    pub furniture: FurnitureRegistry,
    /// All customers, ordered by id
    pub customers: BTreeMap<CustomerId, SimCustomer>,
    pub progression: Progression,
    /// A finished drink picked up from a machine, waiting to be served
    pub held_drink: bool,
    pub stats: ShopStats,
    pub clock: SimulationClock,
    pub bridge: SyncBridge,
    spawner: CustomerSpawner,
    paths: CustomerPaths,
    rng: StdRng,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig, rng: StdRng) -> Self {
        let grid = GridSystem::new(&config.grid);
        let paths = customer_manager::customer_paths(&grid, &config.customers, &config.spawn);
        Self {
            grid,
            inventory: InventoryLedger::with_starting_stock(),
            furniture: FurnitureRegistry::new(config.machine.clone()),
            customers: BTreeMap::new(),
            progression: Progression::new(),
            held_drink: false,
            stats: ShopStats::default(),
            clock: SimulationClock::new(config.bridge.publish_interval),
            bridge: SyncBridge::new(&config.bridge),
            spawner: CustomerSpawner::new(),
            paths,
            rng,
            config,
        }
    }

    pub fn new() -> Self {
        Self::with_config(SimConfig::default(), None)
    }

    /// Create a new SimWorld with a seeded RNG for reproducible simulations
    pub fn new_with_seed(seed: u64) -> Self {
        Self::with_config(SimConfig::default(), Some(seed))
    }

    pub fn with_config(config: SimConfig, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::new_internal(config, rng)
    }

    /// Handle for views and scripts to submit commands
    pub fn sender(&self) -> CommandSender {
        self.bridge.sender()
    }

    /// Queue a command for the next tick
    pub fn enqueue(&self, command: Command) {
        self.bridge.enqueue(command);
    }

    /// Advance the simulation by one tick: customers, then machines, then
    /// queued commands, then a snapshot publish when one is due.
    pub fn tick(&mut self, delta_secs: f32) {
        let tick = self.clock.advance(delta_secs);

        if self
            .spawner
            .tick(delta_secs, self.customers.len(), &self.config.spawn)
        {
            self.spawn_customer();
        }
        self.update_customers(delta_secs);
        self.update_machines(delta_secs);
        self.process_commands(tick);

        if self.clock.should_publish() {
            self.publish();
        }
    }

    /// Spawn a customer at the start of the street right away
    pub fn spawn_customer(&mut self) -> CustomerId {
        let id = self.spawner.next_id();
        let customer = customer_manager::spawn_customer(
            id,
            &mut self.rng,
            &self.grid,
            &self.config.spawn,
            &self.config.customers,
        );
        debug!(
            "Spawned customer {:?} wanting {} at speed {:.1}",
            id, customer.order.name, customer.speed
        );
        self.customers.insert(id, customer);
        self.stats.customers_spawned += 1;
        id
    }

    fn update_customers(&mut self, delta_secs: f32) {
        let results = customer_manager::update_customers(
            delta_secs,
            &mut self.customers,
            &mut self.rng,
            &self.config.customers,
            &self.paths,
        );

        for (id, result) in results {
            match result {
                CustomerUpdateResult::Continue => {}
                CustomerUpdateResult::Despawn => self.despawn_customer(id),
                CustomerUpdateResult::ReachedQueue => {
                    self.stats.customers_entered += 1;
                    debug!("Customer {:?} is queueing", id);
                }
                CustomerUpdateResult::ReadyForTable => self.floor().try_seat_customer(id),
                CustomerUpdateResult::Seated => debug!("Customer {:?} sat down", id),
                CustomerUpdateResult::PatienceExhausted => {
                    self.floor().send_away(id, false);
                }
            }
        }
    }

    fn despawn_customer(&mut self, id: CustomerId) {
        if let Some(customer) = self.customers.remove(&id) {
            if let Some(table) = customer.table {
                self.furniture.vacate(table, id);
            }
        }
    }

    fn update_machines(&mut self, delta_secs: f32) {
        for (id, machine) in self.furniture.machines_mut() {
            let Some(report) = machine.update(delta_secs) else {
                continue;
            };
            debug!("Machine {:?} progress {:.2}", id, report.progress);
            if report.stage_finished == Some(MachineState::Done) {
                self.stats.drinks_brewed += 1;
                info!("Machine {:?} finished a coffee", id);
            }
        }
    }

    /// Borrow the bridge and the shop floor apart, so the bridge can drive
    /// the drain while commands mutate the floor
    fn split(&mut self) -> (&mut SyncBridge, ShopFloor<'_>) {
        (
            &mut self.bridge,
            ShopFloor {
                config: &self.config,
                grid: &self.grid,
                inventory: &mut self.inventory,
                furniture: &mut self.furniture,
                customers: &mut self.customers,
                progression: &mut self.progression,
                held_drink: &mut self.held_drink,
                stats: &mut self.stats,
            },
        )
    }

    fn floor(&mut self) -> ShopFloor<'_> {
        self.split().1
    }

    fn process_commands(&mut self, tick: u64) {
        let (bridge, mut floor) = self.split();
        let applied = bridge.drain_and_process(tick, |command| floor.apply(command));
        if applied > 0 {
            debug!("Tick {}: applied {} commands", tick, applied);
        }
    }

    /// Apply one command to the simulation state
    pub fn apply_command(&mut self, command: &Command) -> Result<(), CommandError> {
        self.floor().apply(command)
    }

    pub fn place_furniture(
        &mut self,
        kind: FurnitureKind,
        cell: GridCell,
        id: Option<FurnitureId>,
    ) -> Result<FurnitureId, CommandError> {
        self.floor().place_furniture(kind, cell, id)
    }

    /// Move a piece; anyone seated at or heading to a moved table follows it
    pub fn move_furniture(&mut self, id: FurnitureId, cell: GridCell) -> Result<(), CommandError> {
        self.floor().move_furniture(id, cell)
    }

    /// Delete a piece, returning its stock and evicting whoever sat at it
    pub fn delete_furniture(&mut self, id: FurnitureId) -> Result<(), CommandError> {
        self.floor().delete_furniture(id)
    }

    /// Advance a machine's pipeline, or take its finished drink
    pub fn brew_coffee(&mut self, id: FurnitureId) -> Result<(), CommandError> {
        self.floor().brew_coffee(id)
    }

    /// Hand the held drink to a seated, waiting customer
    pub fn serve_customer(&mut self, id: CustomerId) -> Result<(), CommandError> {
        self.floor().serve_customer(id)
    }

    /// Remove all furniture and customers. Each piece returns its stock at
    /// most once, so repeated teardowns are harmless.
    pub fn teardown(&mut self) {
        let removed = self.furniture.clear(&mut self.inventory);
        if !removed.is_empty() || !self.customers.is_empty() {
            debug!(
                "Teardown removed {} furniture and {} customers",
                removed.len(),
                self.customers.len()
            );
        }
        self.customers.clear();
        self.held_drink = false;
    }

    /// Project the current state for views
    pub fn snapshot(&self) -> WorldSnapshot {
        let furniture = self
            .furniture
            .iter()
            .map(|f| FurnitureSnapshot {
                id: f.id,
                item: f.kind.as_str(),
                category: f.category(),
                grid_x: f.cell.col,
                grid_y: f.cell.row,
                rotation: f.rotation.degrees(),
                state: f.machine().map(|m| m.state().label()),
                progress: f.machine().map(|m| m.reported_progress()),
            })
            .collect();

        let customer_config = &self.config.customers;
        let customers = self
            .customers
            .values()
            .map(|c| {
                let shown = c.display_position(customer_config);
                let (grid_x, grid_y) = self.grid.to_grid(shown.x, shown.y);
                CustomerSnapshot {
                    id: c.id,
                    grid_x,
                    grid_y,
                    state: c.state.label(),
                    color: c.color,
                    order: c.visible_order().cloned(),
                    patience: c.patience,
                    seat_index: c.seat_index,
                    opacity: c.opacity(customer_config),
                }
            })
            .collect();

        WorldSnapshot {
            furniture,
            customers,
            inventory: self.inventory.surface(),
            gold: self.progression.gold,
            xp: self.progression.xp,
            level: self.progression.level,
            next_level_xp: self.progression.next_level_xp,
            held_drink: self.held_drink,
        }
    }

    /// Publish the current snapshot unless nothing changed
    pub fn publish(&mut self) -> bool {
        let snapshot = self.snapshot();
        self.bridge.publish(snapshot)
    }

    pub fn print_summary(&self) {
        info!("=== Coffee Shop Summary ===");
        info!(
            "Time: {:.2}s (tick {})",
            self.clock.elapsed(),
            self.clock.tick()
        );
        info!("{}", self.progression.summary());
        info!(
            "Furniture: {}, Customers: {}, Holding drink: {}",
            self.furniture.len(),
            self.customers.len(),
            if self.held_drink { "yes" } else { "no" }
        );

        for f in self.furniture.iter() {
            match &f.state {
                FurnitureState::Machine(machine) => info!(
                    "  Machine {:?} at ({}, {}): {} {:.0}%",
                    f.id.0,
                    f.cell.col,
                    f.cell.row,
                    machine.state().label(),
                    machine.progress() * 100.0
                ),
                FurnitureState::Table { .. } => info!(
                    "  Table {:?} ({}) at ({}, {}): {}/{} seated",
                    f.id.0,
                    f.kind,
                    f.cell.col,
                    f.cell.row,
                    f.occupant_count(),
                    f.capacity()
                ),
                FurnitureState::Decor => {}
            }
        }

        for customer in self.customers.values() {
            info!(
                "  Customer {:?}: {} ({}), patience {:.0}",
                customer.id.0,
                customer.state.label(),
                customer.order.name,
                customer.patience
            );
        }
    }

    /// Draw the shop floor as an isometric ASCII map in the terminal
    pub fn draw_map(&self) {
        let size = self.grid.size();
        let width = (size * 4) as usize;
        let height = (size * 2) as usize;
        let mut canvas = vec![vec![' '; width]; height];

        // Cell (0, 0) sits at the top; columns run down-right, rows down-left
        let mut put = |cell: GridCell, ch: char| {
            let x = ((cell.col - cell.row + size - 1) * 2) as usize;
            let y = (cell.col + cell.row) as usize;
            if y < height && x < width {
                canvas[y][x] = ch;
            }
        };

        for cell in self.grid.cells() {
            put(cell, '.');
        }

        for f in self.furniture.iter() {
            let ch = match (&f.state, f.category()) {
                (FurnitureState::Machine(machine), _) => match machine.state() {
                    MachineState::Ready => 'M',
                    MachineState::Roasting => 'r',
                    MachineState::Roasted => 'R',
                    MachineState::Extracting => 'e',
                    MachineState::Done => '!',
                },
                (_, FurnitureCategory::Table) => match f.occupant_count() {
                    0 => 'T',
                    n => char::from_digit(n as u32, 10).unwrap_or('T'),
                },
                _ => 'd',
            };
            put(f.cell, ch);
        }

        for customer in self.customers.values() {
            let (col, row) = self.grid.to_grid(customer.position.x, customer.position.y);
            let cell = GridCell::new(col.round() as i32, row.round() as i32);
            if !self.grid.in_bounds(cell) {
                continue;
            }
            let ch = match customer.state {
                CustomerState::Sitting => '@',
                CustomerState::Leaving => 'x',
                _ => 'c',
            };
            put(cell, ch);
        }

        println!("\n=== Shop Floor ===");
        println!("Legend: T=Table (digit=seated), d=Decor, M/r/R/e/!=Machine stage, c=Customer, @=Seated, x=Leaving");
        println!();
        for row in &canvas {
            let line: String = row.iter().collect();
            println!("{}", line.trim_end());
        }
        println!();
    }
}

/// Everything a command may touch, borrowed out of a [`SimWorld`] without
/// its bridge
struct ShopFloor<'a> {
    config: &'a SimConfig,
    grid: &'a GridSystem,
    inventory: &'a mut InventoryLedger,
    furniture: &'a mut FurnitureRegistry,
    customers: &'a mut BTreeMap<CustomerId, SimCustomer>,
    progression: &'a mut Progression,
    held_drink: &'a mut bool,
    stats: &'a mut ShopStats,
}

impl ShopFloor<'_> {
    fn apply(&mut self, command: &Command) -> Result<(), CommandError> {
        match command {
            Command::PlaceFurniture { item, x, y, id } => {
                let kind: FurnitureKind = item.parse()?;
                self.place_furniture(kind, GridCell::new(*x, *y), *id)
                    .map(|_| ())
            }
            Command::MoveFurniture { id, x, y } => self.move_furniture(*id, GridCell::new(*x, *y)),
            Command::RotateFurniture { id } => self.furniture.rotate(*id).map(|_| ()),
            Command::DeleteFurniture { id } => self.delete_furniture(*id),
            Command::BrewCoffee { id } => self.brew_coffee(*id),
            Command::ServeCustomer { id } => self.serve_customer(*id),
        }
    }

    /// Screen position of a seat, offset sideways from the table center
    fn seat_position(&self, cell: GridCell, seat_index: usize) -> Position {
        let offset = self.config.customers.seat_offset;
        let shift = if seat_index == 0 { -offset } else { offset };
        self.grid
            .to_screen(cell.col as f32 + shift, cell.row as f32)
    }

    /// Claim a free seat for a queued customer, if there is one
    fn try_seat_customer(&mut self, id: CustomerId) {
        let Some(table) = self.furniture.find_available_table() else {
            debug!("No free table for customer {:?}; retrying later", id);
            return;
        };
        let Some(cell) = self.furniture.get(table).map(|f| f.cell) else {
            return;
        };
        let Some(seat_index) = self.furniture.seat(table, id) else {
            return;
        };
        let seat = self.seat_position(cell, seat_index);
        if let Some(customer) = self.customers.get_mut(&id) {
            customer.assign_table(table, seat_index, seat);
        }
    }

    /// Make a customer leave, clearing both sides of its table link.
    /// Returns false if it was unknown or already leaving.
    fn send_away(&mut self, id: CustomerId, satisfied: bool) -> bool {
        let Some(customer) = self.customers.get_mut(&id) else {
            return false;
        };
        let table = customer.table;
        if !customer.leave(satisfied) {
            return false;
        }
        if let Some(table) = table {
            self.furniture.vacate(table, id);
        }
        if satisfied {
            self.stats.customers_served += 1;
        } else {
            self.stats.customers_lost += 1;
            info!("Customer {:?} left without their drink", id);
        }
        true
    }

    fn place_furniture(
        &mut self,
        kind: FurnitureKind,
        cell: GridCell,
        id: Option<FurnitureId>,
    ) -> Result<FurnitureId, CommandError> {
        self.furniture.place(self.inventory, self.grid, kind, cell, id)
    }

    fn move_furniture(&mut self, id: FurnitureId, cell: GridCell) -> Result<(), CommandError> {
        self.furniture.move_to(self.grid, id, cell)?;

        let occupants = self
            .furniture
            .get(id)
            .map(Furniture::occupants)
            .unwrap_or_default();
        for customer_id in occupants {
            let seat_index = self
                .customers
                .get(&customer_id)
                .and_then(|c| c.seat_index);
            if let Some(seat_index) = seat_index {
                let seat = self.seat_position(cell, seat_index);
                if let Some(customer) = self.customers.get_mut(&customer_id) {
                    customer.retarget_seat(seat);
                }
            }
        }
        Ok(())
    }

    fn delete_furniture(&mut self, id: FurnitureId) -> Result<(), CommandError> {
        let removed = self.furniture.delete(self.inventory, id)?;
        for customer_id in removed.occupants() {
            self.send_away(customer_id, false);
        }
        Ok(())
    }

    fn brew_coffee(&mut self, id: FurnitureId) -> Result<(), CommandError> {
        let machine = self
            .furniture
            .get_mut(id)
            .ok_or(CommandError::UnknownFurniture(id))?
            .machine_mut()
            .ok_or(CommandError::NotAMachine(id))?;

        if machine.state() == MachineState::Done {
            if *self.held_drink {
                return Err(CommandError::HandsFull);
            }
            machine.pick_up();
            *self.held_drink = true;
            debug!("Picked up a coffee from machine {:?}", id);
        } else if !machine.interact() {
            debug!("Machine {:?} is busy; ignoring", id);
        }
        Ok(())
    }

    fn serve_customer(&mut self, id: CustomerId) -> Result<(), CommandError> {
        let customer = self
            .customers
            .get(&id)
            .ok_or(CommandError::UnknownCustomer(id))?;
        if !customer.can_be_served() {
            return Err(CommandError::CustomerNotWaiting(id));
        }
        if !*self.held_drink {
            return Err(CommandError::NothingToServe);
        }

        let order = customer.order.clone();
        *self.held_drink = false;
        self.send_away(id, true);
        self.progression.add_gold(order.price);
        self.progression.add_xp(order.xp);
        info!(
            "Served {} to customer {:?} (+{} gold, +{} xp)",
            order.name, id, order.price, order.xp
        );
        Ok(())
    }
}
