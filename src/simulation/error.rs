//! Reasons a command can be rejected

use thiserror::Error;

use super::catalog::FurnitureKind;
use super::types::{CustomerId, FurnitureId, GridCell};

/// A command that could not be applied. Rejections are dropped with a
/// diagnostic; they never abort a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("unknown furniture {0:?}")]
    UnknownFurniture(FurnitureId),
    #[error("unknown customer {0:?}")]
    UnknownCustomer(CustomerId),
    #[error("unknown item type `{0}`")]
    UnknownItemType(String),
    #[error("no {0} left in inventory")]
    InventoryExhausted(FurnitureKind),
    #[error("cell ({}, {}) is occupied", .0.col, .0.row)]
    CellOccupied(GridCell),
    #[error("cell ({}, {}) is outside the shop floor", .0.col, .0.row)]
    OutOfBounds(GridCell),
    #[error("furniture id {0:?} is already in use")]
    DuplicateId(FurnitureId),
    #[error("furniture id {0:?} is out of range")]
    IdOutOfRange(FurnitureId),
    #[error("furniture {0:?} is not a coffee machine")]
    NotAMachine(FurnitureId),
    #[error("customer {0:?} is not seated and waiting")]
    CustomerNotWaiting(CustomerId),
    #[error("no drink in hand to serve")]
    NothingToServe,
    #[error("already holding a drink")]
    HandsFull,
}
