use coffee_shop_sim::simulation::{GridCell, GridConfig, GridSystem};

fn default_grid() -> GridSystem {
    GridSystem::new(&GridConfig::default())
}

#[test]
fn test_origin_maps_to_cell_zero() {
    let grid = default_grid();
    let origin = grid.to_screen(0.0, 0.0);
    assert_eq!((origin.x, origin.y), (640.0, 180.0));
}

#[test]
fn test_isometric_projection() {
    let grid = default_grid();
    // One column step goes half a tile right and half a tile down
    let p = grid.to_screen(1.0, 0.0);
    assert_eq!((p.x, p.y), (672.0, 196.0));
    // One row step goes half a tile left and half a tile down
    let p = grid.to_screen(0.0, 1.0);
    assert_eq!((p.x, p.y), (608.0, 196.0));
}

#[test]
fn test_to_grid_inverts_to_screen() {
    let grid = default_grid();
    for (col, row) in [(0.0, 0.0), (3.5, 11.0), (-5.0, 11.0), (9.0, 2.25)] {
        let p = grid.to_screen(col, row);
        let (c, r) = grid.to_grid(p.x, p.y);
        assert!((c - col).abs() < 1e-4, "col {} vs {}", c, col);
        assert!((r - row).abs() < 1e-4, "row {} vs {}", r, row);
    }
}

#[test]
fn test_snap_round_trips_every_cell() {
    let grid = default_grid();
    for cell in grid.cells() {
        let p = grid.cell_to_screen(cell);
        let snapped = grid.snap(p.x, p.y);
        assert_eq!(snapped.cell, cell);
        assert_eq!(snapped.position, p);
    }
    assert_eq!(grid.cells().count(), 100);
}

#[test]
fn test_snap_rounds_to_nearest_cell() {
    let grid = default_grid();
    let p = grid.to_screen(4.3, 6.6);
    assert_eq!(grid.snap(p.x, p.y).cell, GridCell::new(4, 7));
}

#[test]
fn test_snap_clamps_into_playfield() {
    let grid = default_grid();

    let far = grid.to_screen(-5.0, 11.0);
    assert_eq!(grid.snap(far.x, far.y).cell, GridCell::new(0, 9));

    let snapped = grid.snap(100_000.0, 100_000.0);
    assert!(grid.in_bounds(snapped.cell));
}

#[test]
fn test_snap_is_idempotent() {
    let grid = default_grid();
    for (x, y) in [(0.0, 0.0), (640.0, 300.0), (900.0, 450.0), (-20.0, 1000.0)] {
        let once = grid.snap(x, y);
        let twice = grid.snap(once.position.x, once.position.y);
        assert_eq!(once, twice);
    }
}

#[test]
fn test_in_bounds() {
    let grid = default_grid();
    assert!(grid.in_bounds(GridCell::new(0, 0)));
    assert!(grid.in_bounds(GridCell::new(9, 9)));
    assert!(!grid.in_bounds(GridCell::new(10, 0)));
    assert!(!grid.in_bounds(GridCell::new(0, -1)));
}
