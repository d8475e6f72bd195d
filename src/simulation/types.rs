//! Core types for the coffee shop simulation
//!
//! These are standalone types that don't depend on Bevy.

use serde::{Deserialize, Serialize};

/// A wrapper type for furniture IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FurnitureId(pub u64);

/// A wrapper type for customer IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub u64);

/// An integer cell on the shop floor grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

/// A continuous position in screen space (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn lerp(&self, other: &Position, t: f32) -> Position {
        Position {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Move toward `target` by at most `step`, landing exactly on it when closer than that
    pub fn step_toward(&self, target: &Position, step: f32) -> Position {
        let dist = self.distance(target);
        if dist <= step || dist == 0.0 {
            *target
        } else {
            self.lerp(target, step / dist)
        }
    }

    /// Unit vector perpendicular to the direction toward `other`, scaled by `offset`
    pub fn perpendicular_offset(&self, other: &Position, offset: f32) -> Position {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len > 0.0 {
            Position {
                x: -dy / len * offset,
                y: dx / len * offset,
            }
        } else {
            Position::default()
        }
    }
}

/// Furniture rotation in quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// The next quarter turn clockwise, wrapping 270 back to 0
    pub fn next(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// A drink on the menu, assigned to a customer at spawn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub recipe_id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub xp: u32,
    /// Seconds of patience once seated
    pub time_limit: f32,
}

/// The fixed menu
pub const MENU: [Order; 3] = [
    Order {
        recipe_id: "espresso",
        name: "Espresso",
        price: 10,
        xp: 5,
        time_limit: 30.0,
    },
    Order {
        recipe_id: "latte",
        name: "Latte",
        price: 15,
        xp: 8,
        time_limit: 40.0,
    },
    Order {
        recipe_id: "cappuccino",
        name: "Cappuccino",
        price: 18,
        xp: 10,
        time_limit: 45.0,
    },
];

/// Shirt colors customers are drawn in
pub const CUSTOMER_PALETTE: [&str; 7] = [
    "#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#ffeead", "#d4a5a5", "#9b59b6",
];

/// Full patience
pub const MAX_PATIENCE: f32 = 100.0;
