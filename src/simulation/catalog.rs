//! Placeable item types
//!
//! Each item type resolves once to a [`FurnitureCategory`], which decides its
//! placement rules and runtime state.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::CommandError;

/// Broad behavior class of a placeable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FurnitureCategory {
    Table,
    Decor,
    Machine,
}

impl FurnitureCategory {
    /// Tables and machines may not share a cell with anything
    pub fn is_exclusive(self) -> bool {
        !matches!(self, FurnitureCategory::Decor)
    }
}

/// Every item the shop can place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FurnitureKind {
    TableWood,
    TableMarble,
    TableGlass,
    PlantSmall,
    PlantLarge,
    LampFloor,
    LampTable,
    RugRed,
    RugBlue,
    Clock,
    NeonSign,
    ShelfWood,
    Speaker,
    CoffeeMachine,
}

impl FurnitureKind {
    pub const ALL: [FurnitureKind; 14] = [
        FurnitureKind::TableWood,
        FurnitureKind::TableMarble,
        FurnitureKind::TableGlass,
        FurnitureKind::PlantSmall,
        FurnitureKind::PlantLarge,
        FurnitureKind::LampFloor,
        FurnitureKind::LampTable,
        FurnitureKind::RugRed,
        FurnitureKind::RugBlue,
        FurnitureKind::Clock,
        FurnitureKind::NeonSign,
        FurnitureKind::ShelfWood,
        FurnitureKind::Speaker,
        FurnitureKind::CoffeeMachine,
    ];

    pub fn category(self) -> FurnitureCategory {
        match self {
            FurnitureKind::TableWood | FurnitureKind::TableMarble | FurnitureKind::TableGlass => {
                FurnitureCategory::Table
            }
            FurnitureKind::CoffeeMachine => FurnitureCategory::Machine,
            _ => FurnitureCategory::Decor,
        }
    }

    /// Wire name used by commands, snapshots and the inventory surface
    pub fn as_str(self) -> &'static str {
        match self {
            FurnitureKind::TableWood => "table_wood",
            FurnitureKind::TableMarble => "table_marble",
            FurnitureKind::TableGlass => "table_glass",
            FurnitureKind::PlantSmall => "dec_plant_small",
            FurnitureKind::PlantLarge => "dec_plant_large",
            FurnitureKind::LampFloor => "dec_lamp_floor",
            FurnitureKind::LampTable => "dec_lamp_table",
            FurnitureKind::RugRed => "dec_rug_red",
            FurnitureKind::RugBlue => "dec_rug_blue",
            FurnitureKind::Clock => "dec_clock",
            FurnitureKind::NeonSign => "dec_neon_sign",
            FurnitureKind::ShelfWood => "dec_shelf_wood",
            FurnitureKind::Speaker => "dec_speaker",
            FurnitureKind::CoffeeMachine => "coffee_machine",
        }
    }

    /// Starting (count, max) stock
    pub fn starting_stock(self) -> (u32, u32) {
        match self {
            FurnitureKind::TableWood => (3, 10),
            FurnitureKind::TableMarble => (2, 10),
            FurnitureKind::TableGlass => (2, 10),
            FurnitureKind::PlantSmall => (5, 20),
            FurnitureKind::PlantLarge => (3, 10),
            FurnitureKind::LampFloor => (4, 10),
            FurnitureKind::LampTable => (4, 10),
            FurnitureKind::RugRed => (2, 5),
            FurnitureKind::RugBlue => (2, 5),
            FurnitureKind::Clock => (2, 5),
            FurnitureKind::NeonSign => (2, 5),
            FurnitureKind::ShelfWood => (3, 10),
            FurnitureKind::Speaker => (2, 6),
            FurnitureKind::CoffeeMachine => (2, 5),
        }
    }
}

impl fmt::Display for FurnitureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FurnitureKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FurnitureKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CommandError::UnknownItemType(s.to_string()))
    }
}

/// Seats per table
pub const TABLE_CAPACITY: usize = 2;
