//! Placed furniture and the registry that owns it
//!
//! Tables keep a list of occupant ids; customers keep the id of their table.
//! Neither side owns the other, so both links are cleared explicitly.

use std::collections::HashMap;

use log::{debug, warn};

use super::catalog::{FurnitureCategory, FurnitureKind, TABLE_CAPACITY};
use super::coffee_machine::CoffeeMachine;
use super::config::MachineConfig;
use super::error::CommandError;
use super::grid::GridSystem;
use super::inventory::InventoryLedger;
use super::types::{CustomerId, FurnitureId, GridCell, Rotation};

/// Category-specific runtime state
#[derive(Debug, Clone)]
pub enum FurnitureState {
    /// Seat slots; a customer keeps its slot index until it leaves
    Table { seats: [Option<CustomerId>; TABLE_CAPACITY] },
    Decor,
    Machine(CoffeeMachine),
}

/// A piece of furniture on the shop floor
#[derive(Debug, Clone)]
pub struct Furniture {
    pub id: FurnitureId,
    pub kind: FurnitureKind,
    pub cell: GridCell,
    pub rotation: Rotation,
    pub state: FurnitureState,
    released: bool,
}

impl Furniture {
    fn new(id: FurnitureId, kind: FurnitureKind, cell: GridCell, config: &MachineConfig) -> Self {
        let state = match kind.category() {
            FurnitureCategory::Table => FurnitureState::Table {
                seats: [None; TABLE_CAPACITY],
            },
            FurnitureCategory::Decor => FurnitureState::Decor,
            FurnitureCategory::Machine => FurnitureState::Machine(CoffeeMachine::new(config)),
        };
        Self {
            id,
            kind,
            cell,
            rotation: Rotation::default(),
            state,
            released: false,
        }
    }

    pub fn category(&self) -> FurnitureCategory {
        self.kind.category()
    }

    /// Seated or incoming customers, in seat order
    pub fn occupants(&self) -> Vec<CustomerId> {
        match &self.state {
            FurnitureState::Table { seats } => seats.iter().flatten().copied().collect(),
            _ => Vec::new(),
        }
    }

    pub fn occupant_count(&self) -> usize {
        match &self.state {
            FurnitureState::Table { seats } => seats.iter().filter(|s| s.is_some()).count(),
            _ => 0,
        }
    }

    pub fn capacity(&self) -> usize {
        match self.state {
            FurnitureState::Table { .. } => TABLE_CAPACITY,
            _ => 0,
        }
    }

    pub fn has_free_seat(&self) -> bool {
        self.occupant_count() < self.capacity()
    }

    pub fn machine(&self) -> Option<&CoffeeMachine> {
        match &self.state {
            FurnitureState::Machine(machine) => Some(machine),
            _ => None,
        }
    }

    pub fn machine_mut(&mut self) -> Option<&mut CoffeeMachine> {
        match &mut self.state {
            FurnitureState::Machine(machine) => Some(machine),
            _ => None,
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Return this piece's unit to the ledger. Only the first call has any
    /// effect, so overlapping teardown paths cannot over-release.
    pub fn release_into(&mut self, ledger: &mut InventoryLedger) -> bool {
        if self.released {
            return false;
        }
        self.released = true;
        ledger.release(self.kind);
        true
    }
}

/// Owns every placed piece of furniture, in registration order
#[derive(Debug, Clone)]
pub struct FurnitureRegistry {
    items: HashMap<FurnitureId, Furniture>,
    order: Vec<FurnitureId>,
    next_id: u64,
    machine_config: MachineConfig,
}

impl Default for FurnitureRegistry {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

impl FurnitureRegistry {
    pub fn new(machine_config: MachineConfig) -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
            machine_config,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: FurnitureId) -> Option<&Furniture> {
        self.items.get(&id)
    }

    pub fn get_mut(&mut self, id: FurnitureId) -> Option<&mut Furniture> {
        self.items.get_mut(&id)
    }

    pub fn contains(&self, id: FurnitureId) -> bool {
        self.items.contains_key(&id)
    }

    /// All furniture in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Furniture> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Every coffee machine, mutably
    pub fn machines_mut(&mut self) -> impl Iterator<Item = (FurnitureId, &mut CoffeeMachine)> {
        self.items
            .iter_mut()
            .filter_map(|(id, furniture)| furniture.machine_mut().map(|machine| (*id, machine)))
    }

    /// Whether something already on `cell` prevents a `category` item from sharing it
    fn is_blocked(
        &self,
        cell: GridCell,
        category: FurnitureCategory,
        ignore: Option<FurnitureId>,
    ) -> bool {
        self.items
            .values()
            .filter(|f| f.cell == cell && Some(f.id) != ignore)
            .any(|f| category.is_exclusive() || f.category().is_exclusive())
    }

    /// Place a new item, reserving one unit of stock. `requested_id` lets the
    /// caller name the piece up front so later commands can address it.
    pub fn place(
        &mut self,
        ledger: &mut InventoryLedger,
        grid: &GridSystem,
        kind: FurnitureKind,
        cell: GridCell,
        requested_id: Option<FurnitureId>,
    ) -> Result<FurnitureId, CommandError> {
        if !grid.in_bounds(cell) {
            return Err(CommandError::OutOfBounds(cell));
        }
        if let Some(id) = requested_id {
            if self.items.contains_key(&id) {
                return Err(CommandError::DuplicateId(id));
            }
        }
        if self.is_blocked(cell, kind.category(), None) {
            return Err(CommandError::CellOccupied(cell));
        }
        let id = requested_id.unwrap_or(FurnitureId(self.next_id));
        // The id after this one must exist too, or auto ids could collide
        let next_id = id.0.checked_add(1).ok_or(CommandError::IdOutOfRange(id))?;
        if !ledger.try_reserve(kind) {
            return Err(CommandError::InventoryExhausted(kind));
        }

        self.next_id = self.next_id.max(next_id);
        self.items
            .insert(id, Furniture::new(id, kind, cell, &self.machine_config));
        self.order.push(id);
        debug!("Placed {} {:?} at ({}, {})", kind, id, cell.col, cell.row);
        Ok(id)
    }

    /// Move an item to another in-bounds cell that its category may occupy
    pub fn move_to(
        &mut self,
        grid: &GridSystem,
        id: FurnitureId,
        cell: GridCell,
    ) -> Result<(), CommandError> {
        let category = self
            .items
            .get(&id)
            .map(|f| f.category())
            .ok_or(CommandError::UnknownFurniture(id))?;
        if !grid.in_bounds(cell) {
            return Err(CommandError::OutOfBounds(cell));
        }
        if self.is_blocked(cell, category, Some(id)) {
            return Err(CommandError::CellOccupied(cell));
        }
        if let Some(furniture) = self.items.get_mut(&id) {
            furniture.cell = cell;
        }
        Ok(())
    }

    pub fn rotate(&mut self, id: FurnitureId) -> Result<Rotation, CommandError> {
        let furniture = self
            .items
            .get_mut(&id)
            .ok_or(CommandError::UnknownFurniture(id))?;
        furniture.rotation = furniture.rotation.next();
        Ok(furniture.rotation)
    }

    /// Remove an item and return its unit to the ledger. The removed piece is
    /// handed back so the caller can evict its occupants.
    pub fn delete(
        &mut self,
        ledger: &mut InventoryLedger,
        id: FurnitureId,
    ) -> Result<Furniture, CommandError> {
        let mut furniture = self
            .items
            .remove(&id)
            .ok_or(CommandError::UnknownFurniture(id))?;
        self.order.retain(|other| *other != id);
        furniture.release_into(ledger);
        debug!("Deleted {} {:?}", furniture.kind, id);
        Ok(furniture)
    }

    /// Remove everything, releasing each piece once
    pub fn clear(&mut self, ledger: &mut InventoryLedger) -> Vec<Furniture> {
        let ids = std::mem::take(&mut self.order);
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(mut furniture) = self.items.remove(&id) {
                furniture.release_into(ledger);
                removed.push(furniture);
            }
        }
        removed
    }

    /// First table in registration order with a free seat. Ties are not
    /// broken any further.
    pub fn find_available_table(&self) -> Option<FurnitureId> {
        self.iter()
            .find(|f| f.category() == FurnitureCategory::Table && f.has_free_seat())
            .map(|f| f.id)
    }

    /// Claim the lowest free seat at a table, returning its index
    pub fn seat(&mut self, table: FurnitureId, customer: CustomerId) -> Option<usize> {
        match self.items.get_mut(&table).map(|f| &mut f.state) {
            Some(FurnitureState::Table { seats }) => {
                let index = seats.iter().position(Option::is_none)?;
                seats[index] = Some(customer);
                Some(index)
            }
            _ => None,
        }
    }

    /// Free whichever seat a customer holds at a table
    pub fn vacate(&mut self, table: FurnitureId, customer: CustomerId) {
        match self.items.get_mut(&table).map(|f| &mut f.state) {
            Some(FurnitureState::Table { seats }) => {
                for seat in seats.iter_mut() {
                    if *seat == Some(customer) {
                        *seat = None;
                    }
                }
            }
            Some(_) => warn!("Vacate on {:?}, which is not a table", table),
            None => {}
        }
    }
}
