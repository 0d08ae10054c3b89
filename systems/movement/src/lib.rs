#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement system that turns a unit's movement shape into legal destinations.
//!
//! Shape generation stays purely geometric in the core crate. This system
//! layers the legality filter on top: map bounds, the unit's traversal
//! predicate and, optionally, occupancy by other units.

use std::collections::{HashSet, VecDeque};

use grid_tactics_core::{Command, MoveError, Unit, UnitId, Vector2};
use grid_tactics_world::{Map, PlaceGrid};
use tracing::trace;

/// How the movement shape is turned into destinations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReachPolicy {
    /// Keeps every cell of the shape that passes the legality filter,
    /// regardless of what lies between the unit and the cell.
    #[default]
    Shape,
    /// Flood-fills outward from the unit through legal cells only, so
    /// untraversable terrain blocks passage.
    Connected,
}

/// Pure system computing reachable cells and validating move requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Movement {
    policy: ReachPolicy,
    respect_occupancy: bool,
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            policy: ReachPolicy::Shape,
            respect_occupancy: true,
        }
    }
}

impl Movement {
    /// Creates a movement system with explicit configuration.
    #[must_use]
    pub const fn new(policy: ReachPolicy, respect_occupancy: bool) -> Self {
        Self {
            policy,
            respect_occupancy,
        }
    }

    /// Policy used to expand the movement shape.
    #[must_use]
    pub const fn policy(&self) -> ReachPolicy {
        self.policy
    }

    /// Reports whether cells held by other units are excluded.
    #[must_use]
    pub const fn respects_occupancy(&self) -> bool {
        self.respect_occupancy
    }

    /// Legal destinations for `unit` on the provided grid, ordered by row and
    /// then by column.
    ///
    /// The unit's own position is always part of the result.
    #[must_use]
    pub fn reachable(&self, grid: &PlaceGrid, unit: &Unit) -> Vec<Vector2> {
        let mut cells: Vec<Vector2> = match self.policy {
            ReachPolicy::Shape => unit
                .movement_shape()
                .into_iter()
                .filter(|cell| *cell == unit.position() || self.can_enter(grid, unit, *cell))
                .collect(),
            ReachPolicy::Connected => self.flood_fill(grid, unit),
        };
        cells.sort_by_key(|cell| (cell.y(), cell.x()));
        trace!(unit = unit.id().get(), count = cells.len(), "computed reachable cells");
        cells
    }

    /// Legal destinations for a unit on a live map.
    pub fn reachable_on(&self, map: &Map, unit: UnitId) -> Result<Vec<Vector2>, MoveError> {
        let (unit, grid) = map.unit_snapshot(unit).ok_or(MoveError::MissingUnit)?;
        Ok(self.reachable(&grid, &unit))
    }

    /// Validates a move request and produces the command that carries it out.
    pub fn plan_move(&self, map: &Map, unit: UnitId, to: Vector2) -> Result<Command, MoveError> {
        let (record, grid) = map.unit_snapshot(unit).ok_or(MoveError::MissingUnit)?;

        if self.reachable(&grid, &record).contains(&to) {
            return Ok(Command::MoveUnit { unit, to });
        }

        Err(self.rejection(&grid, &record, to))
    }

    fn rejection(&self, grid: &PlaceGrid, unit: &Unit, to: Vector2) -> MoveError {
        let Some(place) = grid.place_at(to) else {
            return MoveError::OutOfBounds;
        };

        let offset = offset_between(unit.position(), to);
        if !unit.kind().movement_shape().contains_offset(offset) {
            return MoveError::Unreachable;
        }
        if self.respect_occupancy && place.occupant().map_or(false, |id| id != unit.id()) {
            return MoveError::Occupied;
        }
        if !unit.can_traverse_terrain(place.terrain()) {
            return MoveError::Untraversable;
        }
        MoveError::Unreachable
    }

    fn can_enter(&self, grid: &PlaceGrid, unit: &Unit, cell: Vector2) -> bool {
        let Some(place) = grid.place_at(cell) else {
            return false;
        };

        if self.respect_occupancy {
            if let Some(occupant) = place.occupant() {
                if occupant != unit.id() {
                    return false;
                }
            }
        }

        unit.can_traverse_terrain(place.terrain())
    }

    fn flood_fill(&self, grid: &PlaceGrid, unit: &Unit) -> Vec<Vector2> {
        let origin = unit.position();
        let shape = unit.kind().movement_shape();
        let range = shape.range();

        let mut visited = HashSet::from([origin]);
        let mut reached = vec![origin];
        let mut queue = VecDeque::from([(origin, 0_u32)]);

        while let Some((cell, distance)) = queue.pop_front() {
            if distance >= range {
                continue;
            }

            for neighbor in grid.neighbor_positions(cell) {
                if visited.contains(&neighbor) {
                    continue;
                }

                let offset = offset_between(origin, neighbor);
                if !shape.contains_offset(offset) || !self.can_enter(grid, unit, neighbor) {
                    continue;
                }

                let _ = visited.insert(neighbor);
                reached.push(neighbor);
                queue.push_back((neighbor, distance + 1));
            }
        }

        reached
    }
}

fn offset_between(from: Vector2, to: Vector2) -> Vector2 {
    Vector2::new(to.x().saturating_sub(from.x()), to.y().saturating_sub(from.y()))
}
