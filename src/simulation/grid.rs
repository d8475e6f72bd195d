//! Isometric grid coordinate system
//!
//! Pure conversions between grid cells and screen pixels.

use super::config::GridConfig;
use super::types::{GridCell, Position};

/// Result of snapping a screen position onto the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub position: Position,
    pub cell: GridCell,
}

/// Converts between isometric screen space and grid space
#[derive(Debug, Clone)]
pub struct GridSystem {
    origin_x: f32,
    origin_y: f32,
    half_w: f32,
    half_h: f32,
    size: i32,
}

impl GridSystem {
    pub fn new(config: &GridConfig) -> Self {
        Self {
            origin_x: config.origin_x,
            origin_y: config.origin_y,
            half_w: config.tile_width / 2.0,
            half_h: config.tile_height / 2.0,
            size: config.size.max(1),
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Screen position of a (possibly fractional) grid coordinate
    pub fn to_screen(&self, col: f32, row: f32) -> Position {
        Position::new(
            self.origin_x + (col - row) * self.half_w,
            self.origin_y + (col + row) * self.half_h,
        )
    }

    pub fn cell_to_screen(&self, cell: GridCell) -> Position {
        self.to_screen(cell.col as f32, cell.row as f32)
    }

    /// Fractional grid coordinate of a screen position
    pub fn to_grid(&self, x: f32, y: f32) -> (f32, f32) {
        let u = (x - self.origin_x) / self.half_w;
        let v = (y - self.origin_y) / self.half_h;
        ((u + v) / 2.0, (v - u) / 2.0)
    }

    /// Round to the nearest cell and clamp into the playfield
    pub fn snap(&self, x: f32, y: f32) -> Snapped {
        let (col, row) = self.to_grid(x, y);
        let cell = GridCell::new(
            (col.round() as i32).clamp(0, self.size - 1),
            (row.round() as i32).clamp(0, self.size - 1),
        );
        Snapped {
            position: self.cell_to_screen(cell),
            cell,
        }
    }

    pub fn in_bounds(&self, cell: GridCell) -> bool {
        (0..self.size).contains(&cell.col) && (0..self.size).contains(&cell.row)
    }

    /// Iterate every cell of the playfield, row by row
    pub fn cells(&self) -> impl Iterator<Item = GridCell> + '_ {
        (0..self.size).flat_map(move |row| (0..self.size).map(move |col| GridCell::new(col, row)))
    }
}
