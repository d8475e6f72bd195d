//! Furniture placement, inventory accounting and occupancy

use coffee_shop_sim::simulation::{
    CommandError, CustomerId, CustomerState, FurnitureId, FurnitureKind, FurnitureRegistry,
    GridCell, GridConfig, GridSystem, InventoryLedger, MachineConfig, Rotation, SimConfig,
    SimWorld,
};

fn setup() -> (FurnitureRegistry, InventoryLedger, GridSystem) {
    (
        FurnitureRegistry::new(MachineConfig::default()),
        InventoryLedger::with_starting_stock(),
        GridSystem::new(&GridConfig::default()),
    )
}

#[test]
fn test_place_reserves_stock() {
    let (mut registry, mut ledger, grid) = setup();
    assert_eq!(ledger.count(FurnitureKind::TableWood), 3);

    let id = registry
        .place(&mut ledger, &grid, FurnitureKind::TableWood, GridCell::new(3, 4), None)
        .unwrap();

    assert_eq!(ledger.count(FurnitureKind::TableWood), 2);
    let table = registry.get(id).unwrap();
    assert_eq!(table.cell, GridCell::new(3, 4));
    assert_eq!(table.rotation, Rotation::Deg0);
    assert_eq!(table.capacity(), 2);
}

#[test]
fn test_exclusive_items_block_cell() {
    let (mut registry, mut ledger, grid) = setup();
    let cell = GridCell::new(2, 2);
    registry
        .place(&mut ledger, &grid, FurnitureKind::TableWood, cell, None)
        .unwrap();

    for kind in [
        FurnitureKind::TableMarble,
        FurnitureKind::CoffeeMachine,
        FurnitureKind::PlantSmall,
    ] {
        let before = ledger.count(kind);
        let result = registry.place(&mut ledger, &grid, kind, cell, None);
        assert_eq!(result, Err(CommandError::CellOccupied(cell)));
        assert_eq!(ledger.count(kind), before, "rejection must not touch stock");
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_decor_stacks_but_blocks_tables() {
    let (mut registry, mut ledger, grid) = setup();
    let cell = GridCell::new(6, 1);
    registry
        .place(&mut ledger, &grid, FurnitureKind::RugRed, cell, None)
        .unwrap();
    registry
        .place(&mut ledger, &grid, FurnitureKind::PlantSmall, cell, None)
        .unwrap();

    assert_eq!(
        registry.place(&mut ledger, &grid, FurnitureKind::TableGlass, cell, None),
        Err(CommandError::CellOccupied(cell))
    );
    assert_eq!(
        registry.place(&mut ledger, &grid, FurnitureKind::CoffeeMachine, cell, None),
        Err(CommandError::CellOccupied(cell))
    );
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_place_out_of_bounds_rejected() {
    let (mut registry, mut ledger, grid) = setup();
    let cell = GridCell::new(10, 3);
    assert_eq!(
        registry.place(&mut ledger, &grid, FurnitureKind::Clock, cell, None),
        Err(CommandError::OutOfBounds(cell))
    );
    assert_eq!(ledger.count(FurnitureKind::Clock), 2);
}

#[test]
fn test_inventory_exhaustion_fails_closed() {
    let (mut registry, mut ledger, grid) = setup();
    registry
        .place(&mut ledger, &grid, FurnitureKind::CoffeeMachine, GridCell::new(0, 0), None)
        .unwrap();
    registry
        .place(&mut ledger, &grid, FurnitureKind::CoffeeMachine, GridCell::new(0, 1), None)
        .unwrap();

    assert_eq!(
        registry.place(&mut ledger, &grid, FurnitureKind::CoffeeMachine, GridCell::new(0, 2), None),
        Err(CommandError::InventoryExhausted(FurnitureKind::CoffeeMachine))
    );
    assert_eq!(ledger.count(FurnitureKind::CoffeeMachine), 0);
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_requested_ids() {
    let (mut registry, mut ledger, grid) = setup();
    let id = registry
        .place(&mut ledger, &grid, FurnitureKind::LampFloor, GridCell::new(1, 1), Some(FurnitureId(10)))
        .unwrap();
    assert_eq!(id, FurnitureId(10));

    assert_eq!(
        registry.place(&mut ledger, &grid, FurnitureKind::LampFloor, GridCell::new(1, 2), Some(FurnitureId(10))),
        Err(CommandError::DuplicateId(FurnitureId(10)))
    );

    // Auto ids never collide with requested ones
    let next = registry
        .place(&mut ledger, &grid, FurnitureKind::LampFloor, GridCell::new(1, 3), None)
        .unwrap();
    assert!(next.0 > 10);
}

#[test]
fn test_move_furniture() {
    let (mut registry, mut ledger, grid) = setup();
    let a = registry
        .place(&mut ledger, &grid, FurnitureKind::TableWood, GridCell::new(1, 1), None)
        .unwrap();
    let b = registry
        .place(&mut ledger, &grid, FurnitureKind::TableWood, GridCell::new(2, 2), None)
        .unwrap();

    assert!(registry.move_to(&grid, a, GridCell::new(5, 5)).is_ok());
    assert_eq!(registry.get(a).unwrap().cell, GridCell::new(5, 5));

    // Out of bounds and unknown ids fail without side effects
    assert!(registry.move_to(&grid, a, GridCell::new(-1, 5)).is_err());
    assert_eq!(registry.get(a).unwrap().cell, GridCell::new(5, 5));
    assert_eq!(
        registry.move_to(&grid, FurnitureId(77), GridCell::new(0, 0)),
        Err(CommandError::UnknownFurniture(FurnitureId(77)))
    );

    // Cannot land on another table, but moving onto its own cell is fine
    assert_eq!(
        registry.move_to(&grid, a, GridCell::new(2, 2)),
        Err(CommandError::CellOccupied(GridCell::new(2, 2)))
    );
    assert!(registry.move_to(&grid, b, GridCell::new(2, 2)).is_ok());
}

#[test]
fn test_rotate_wraps() {
    let (mut registry, mut ledger, grid) = setup();
    let id = registry
        .place(&mut ledger, &grid, FurnitureKind::ShelfWood, GridCell::new(4, 4), None)
        .unwrap();

    let degrees: Vec<u16> = (0..4)
        .map(|_| registry.rotate(id).unwrap().degrees())
        .collect();
    assert_eq!(degrees, vec![90, 180, 270, 0]);
}

#[test]
fn test_delete_restores_stock_once() {
    let (mut registry, mut ledger, grid) = setup();
    let id = registry
        .place(&mut ledger, &grid, FurnitureKind::Speaker, GridCell::new(3, 3), None)
        .unwrap();
    assert_eq!(ledger.count(FurnitureKind::Speaker), 1);

    let removed = registry.delete(&mut ledger, id).unwrap();
    assert!(removed.is_released());
    assert_eq!(ledger.count(FurnitureKind::Speaker), 2);

    assert_eq!(
        registry.delete(&mut ledger, id).map(|_| ()),
        Err(CommandError::UnknownFurniture(id))
    );
    assert_eq!(ledger.count(FurnitureKind::Speaker), 2);

    // A removed piece cannot release again through another path
    let mut removed = removed;
    assert!(!removed.release_into(&mut ledger));
    assert_eq!(ledger.count(FurnitureKind::Speaker), 2);
}

#[test]
fn test_release_clamps_to_max() {
    let mut ledger = InventoryLedger::empty();
    ledger.set_stock(FurnitureKind::RugBlue, 5, 5);
    ledger.release(FurnitureKind::RugBlue);
    assert_eq!(ledger.count(FurnitureKind::RugBlue), 5);

    // No entry at all: reservations fail and releases are ignored
    assert!(!ledger.try_reserve(FurnitureKind::Clock));
    ledger.release(FurnitureKind::Clock);
    assert!(ledger.get(FurnitureKind::Clock).is_none());
}

#[test]
fn test_inventory_surface() {
    let ledger = InventoryLedger::with_starting_stock();
    let surface = ledger.surface();
    assert_eq!(surface.len(), 14);
    let machine = surface["coffee_machine"];
    assert_eq!((machine.count, machine.max), (2, 5));
    assert_eq!(surface["dec_plant_small"].max, 20);
}

#[test]
fn test_find_available_table_in_registration_order() {
    let (mut registry, mut ledger, grid) = setup();
    assert_eq!(registry.find_available_table(), None);

    registry
        .place(&mut ledger, &grid, FurnitureKind::PlantLarge, GridCell::new(0, 0), None)
        .unwrap();
    let first = registry
        .place(&mut ledger, &grid, FurnitureKind::TableMarble, GridCell::new(8, 8), None)
        .unwrap();
    let second = registry
        .place(&mut ledger, &grid, FurnitureKind::TableWood, GridCell::new(1, 1), None)
        .unwrap();

    assert_eq!(registry.find_available_table(), Some(first));
    assert_eq!(registry.seat(first, CustomerId(1)), Some(0));
    assert_eq!(registry.find_available_table(), Some(first));
    assert_eq!(registry.seat(first, CustomerId(2)), Some(1));
    assert_eq!(registry.seat(first, CustomerId(3)), None);

    assert_eq!(registry.find_available_table(), Some(second));
    registry.seat(second, CustomerId(3));
    registry.seat(second, CustomerId(4));
    assert_eq!(registry.find_available_table(), None);

    // The freed slot is reused and the other occupant keeps its seat
    registry.vacate(first, CustomerId(1));
    assert_eq!(registry.find_available_table(), Some(first));
    assert_eq!(registry.seat(first, CustomerId(5)), Some(0));
    assert_eq!(
        registry.get(first).unwrap().occupants(),
        vec![CustomerId(5), CustomerId(2)]
    );
}

#[test]
fn test_teardown_is_idempotent() {
    let mut world = SimWorld::new_with_seed(3);
    let a = world
        .place_furniture(FurnitureKind::TableWood, GridCell::new(1, 1), None)
        .unwrap();
    world
        .place_furniture(FurnitureKind::TableWood, GridCell::new(2, 1), None)
        .unwrap();
    world
        .place_furniture(FurnitureKind::CoffeeMachine, GridCell::new(3, 1), None)
        .unwrap();
    world.delete_furniture(a).unwrap();

    world.teardown();
    world.teardown();

    assert!(world.furniture.is_empty());
    assert!(world.customers.is_empty());
    for kind in FurnitureKind::ALL {
        assert_eq!(
            world.inventory.count(kind),
            kind.starting_stock().0,
            "{} over- or under-released",
            kind
        );
    }
}

#[test]
fn test_delete_table_evicts_seated_customers() {
    let mut config = SimConfig::default();
    config.customers.enter_chance = 1.0;
    config.spawn.max_customers = 0;
    let mut world = SimWorld::with_config(config, Some(11));

    let table = world
        .place_furniture(FurnitureKind::TableWood, GridCell::new(4, 4), None)
        .unwrap();
    let customer = world.spawn_customer();
    for _ in 0..400 {
        world.tick(0.1);
        if world.customers[&customer].state == CustomerState::Sitting {
            break;
        }
    }
    assert_eq!(world.customers[&customer].state, CustomerState::Sitting);

    world.delete_furniture(table).unwrap();

    let evicted = &world.customers[&customer];
    assert_eq!(evicted.state, CustomerState::Leaving);
    assert_eq!(evicted.satisfied, Some(false));
    assert!(evicted.table.is_none());
    assert_eq!(world.stats.customers_lost, 1);
    assert_eq!(world.inventory.count(FurnitureKind::TableWood), 3);
}

#[test]
fn test_moving_table_moves_seated_customer() {
    let mut config = SimConfig::default();
    config.customers.enter_chance = 1.0;
    config.spawn.max_customers = 0;
    let mut world = SimWorld::with_config(config, Some(5));

    let table = world
        .place_furniture(FurnitureKind::TableWood, GridCell::new(4, 4), None)
        .unwrap();
    let customer = world.spawn_customer();
    for _ in 0..400 {
        world.tick(0.1);
        if world.customers[&customer].state == CustomerState::Sitting {
            break;
        }
    }

    world.move_furniture(table, GridCell::new(8, 2)).unwrap();

    let seated = &world.customers[&customer];
    let (col, row) = world.grid.to_grid(seated.position.x, seated.position.y);
    assert!((col - 7.6).abs() < 1e-3, "col {}", col);
    assert!((row - 2.0).abs() < 1e-3, "row {}", row);
    assert_eq!(seated.state, CustomerState::Sitting);
}
