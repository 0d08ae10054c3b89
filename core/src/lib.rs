#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Tactics engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative map, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what actually changed. Terrain classification, unit traversal
//! rules and movement shapes live here because every other crate consults
//! them.

mod shape;
mod terrain;
mod unit;

use std::ops::Add;

use serde::{Deserialize, Serialize};

pub use shape::MovementShape;
pub use terrain::{Terrain, TerrainKind};
pub use unit::{Unit, UnitId, UnitKind, UnitView, OPAQUE_ALPHA};

/// Integer coordinate on the map, also used for relative offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vector2 {
    x: i32,
    y: i32,
}

impl Vector2 {
    /// The origin, or a zero offset.
    pub const ZERO: Self = Self::new(0, 0);
    /// Offset toward decreasing rows.
    pub const UP: Self = Self::new(0, -1);
    /// Offset toward increasing rows.
    pub const DOWN: Self = Self::new(0, 1);
    /// Offset toward decreasing columns.
    pub const LEFT: Self = Self::new(-1, 0);
    /// Offset toward increasing columns.
    pub const RIGHT: Self = Self::new(1, 0);

    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the coordinate.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the coordinate.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Translates the coordinate by the provided offset.
    ///
    /// Components saturate instead of overflowing, so translating a
    /// coordinate near the integer limits yields a position that simply
    /// fails map bounds checks.
    #[must_use]
    pub const fn offset(self, by: Vector2) -> Self {
        Self {
            x: self.x.saturating_add(by.x),
            y: self.y.saturating_add(by.y),
        }
    }

    /// Sum of the absolute components, i.e. the taxicab length of an offset.
    #[must_use]
    pub const fn manhattan_length(&self) -> u32 {
        self.x.unsigned_abs() + self.y.unsigned_abs()
    }

    /// Computes the Manhattan distance between two coordinates.
    #[must_use]
    pub const fn manhattan_distance(self, other: Vector2) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Self::Output {
        self.offset(rhs)
    }
}

impl From<(i32, i32)> for Vector2 {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Commands that express all permissible map mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the terrain held by a place, or clears it.
    SetTerrain {
        /// Position of the place whose terrain changes.
        position: Vector2,
        /// Terrain variant to assign, `None` leaves the place terrain-less.
        terrain: Option<TerrainKind>,
    },
    /// Requests that a new unit be placed on the map.
    PlaceUnit {
        /// Variant of the unit to create.
        kind: UnitKind,
        /// Place the unit should occupy.
        position: Vector2,
    },
    /// Requests that an existing unit relocate to another place.
    MoveUnit {
        /// Identifier of the unit attempting to move.
        unit: UnitId,
        /// Destination place.
        to: Vector2,
    },
    /// Requests removal of a unit from the map.
    RemoveUnit {
        /// Identifier of the unit to remove.
        unit: UnitId,
    },
    /// Updates the visibility style attribute exposed to renderers.
    SetUnitAlpha {
        /// Identifier of the unit to restyle.
        unit: UnitId,
        /// Opacity in the range `0..=255`.
        alpha: u8,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a place received new terrain.
    TerrainChanged {
        /// Position of the updated place.
        position: Vector2,
        /// Terrain now held by the place.
        terrain: Option<TerrainKind>,
    },
    /// Reports that a terrain update targeted a position outside the map.
    TerrainRejected {
        /// Position named by the rejected command.
        position: Vector2,
        /// Specific reason the update failed.
        reason: MoveError,
    },
    /// Confirms that a unit was created and placed.
    UnitPlaced {
        /// Identifier assigned to the unit by the world.
        unit: UnitId,
        /// Variant of the placed unit.
        kind: UnitKind,
        /// Place occupied by the unit.
        position: Vector2,
    },
    /// Reports that a unit placement request was rejected.
    UnitPlacementRejected {
        /// Variant requested for placement.
        kind: UnitKind,
        /// Position named by the request.
        position: Vector2,
        /// Specific reason the placement failed.
        reason: MoveError,
    },
    /// Confirms that a unit moved between two places.
    UnitMoved {
        /// Identifier of the unit that moved.
        unit: UnitId,
        /// Place the unit vacated.
        from: Vector2,
        /// Place the unit now occupies.
        to: Vector2,
    },
    /// Reports that a move request was rejected.
    UnitMoveRejected {
        /// Identifier of the unit that attempted to move.
        unit: UnitId,
        /// Destination named by the request.
        to: Vector2,
        /// Specific reason the move failed.
        reason: MoveError,
    },
    /// Confirms that a unit left the map.
    UnitRemoved {
        /// Identifier of the removed unit.
        unit: UnitId,
        /// Place the unit occupied before removal.
        position: Vector2,
    },
    /// Reports that a removal or restyle request named an unknown unit.
    UnitMissing {
        /// Identifier named by the request.
        unit: UnitId,
    },
    /// Confirms that a unit's visibility style changed.
    UnitAlphaChanged {
        /// Identifier of the restyled unit.
        unit: UnitId,
        /// Opacity now applied to the unit.
        alpha: u8,
    },
}

/// Reasons a placement or move request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveError {
    /// The requested position lies outside the map.
    OutOfBounds,
    /// Another unit already occupies the requested place.
    Occupied,
    /// The unit cannot enter the terrain held by the requested place.
    Untraversable,
    /// No unit with the provided identifier exists.
    MissingUnit,
    /// The destination lies outside the unit's legal movement destinations.
    Unreachable,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::OutOfBounds => "position lies outside the map",
            Self::Occupied => "place is already occupied",
            Self::Untraversable => "unit cannot enter that terrain",
            Self::MissingUnit => "no such unit",
            Self::Unreachable => "destination is not reachable this turn",
        };
        f.write_str(text)
    }
}

impl std::error::Error for MoveError {}
