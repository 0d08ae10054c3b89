#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative map state for Grid Tactics.
//!
//! The [`Map`] owns a fixed grid of places and the units standing on them.
//! All reads and writes of cell state go through a single coarse lock, and
//! registered listeners are notified only after that lock is released.

mod description;
mod grid;
mod listener;

use std::{collections::BTreeMap, sync::Arc};

use grid_tactics_core::{
    Command, Event, MoveError, Terrain, TerrainKind, Unit, UnitId, UnitKind, UnitView, Vector2,
};
use parking_lot::Mutex;
use tracing::debug;

pub use description::{LoadMode, MapError};
pub use grid::{Place, PlaceGrid};
pub use listener::{ListenerId, MapListener};

use listener::ListenerRegistry;

/// Rectangular playing field shared between the turn loop and presentation.
#[derive(Debug)]
pub struct Map {
    state: Mutex<MapState>,
    listeners: ListenerRegistry,
}

#[derive(Debug)]
struct MapState {
    grid: PlaceGrid,
    units: BTreeMap<UnitId, Unit>,
    next_unit: u32,
}

impl MapState {
    fn new(grid: PlaceGrid) -> Self {
        Self {
            grid,
            units: BTreeMap::new(),
            next_unit: 0,
        }
    }

    fn check_destination(
        &self,
        kind: UnitKind,
        position: Vector2,
        mover: Option<UnitId>,
    ) -> Result<(), MoveError> {
        let place = self.grid.place_at(position).ok_or(MoveError::OutOfBounds)?;
        if let Some(occupant) = place.occupant() {
            if Some(occupant) != mover {
                return Err(MoveError::Occupied);
            }
        }
        if !kind.can_traverse(place.terrain()) {
            return Err(MoveError::Untraversable);
        }
        Ok(())
    }

    fn set_occupant(&mut self, position: Vector2, occupant: Option<UnitId>) {
        if let Some(place) = self.grid.place_mut(position) {
            place.set_occupant(occupant);
        }
    }
}

impl Map {
    /// Creates a map of empty places.
    ///
    /// Both dimensions are expected to be positive.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::from_grid(PlaceGrid::new(width, height))
    }

    /// Builds a map from a plain-text description.
    pub fn from_description(text: &str, mode: LoadMode) -> Result<Self, MapError> {
        let grid = description::parse(text, mode)?;
        debug!(width = grid.width(), height = grid.height(), "map loaded");
        Ok(Self::from_grid(grid))
    }

    fn from_grid(grid: PlaceGrid) -> Self {
        Self {
            state: Mutex::new(MapState::new(grid)),
            listeners: ListenerRegistry::default(),
        }
    }

    /// Replaces every place's terrain with the terrain of a description.
    ///
    /// The description must declare the map's own dimensions. Units keep
    /// their places. Listeners are notified once the new terrain is in place.
    pub fn load_terrain(&self, text: &str, mode: LoadMode) -> Result<(), MapError> {
        let parsed = description::parse(text, mode)?;
        {
            let mut state = self.state.lock();
            if (parsed.width(), parsed.height()) != (state.grid.width(), state.grid.height()) {
                return Err(MapError::DimensionMismatch {
                    width: state.grid.width(),
                    height: state.grid.height(),
                    found_width: parsed.width(),
                    found_height: parsed.height(),
                });
            }

            for source in parsed.places() {
                if let Some(place) = state.grid.place_mut(source.position()) {
                    place.set_terrain(source.terrain());
                }
            }
        }

        debug!("map terrain reloaded");
        self.listeners.notify();
        Ok(())
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.state.lock().grid.width()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.state.lock().grid.height()
    }

    /// Reports whether `0 <= x < width` and `0 <= y < height`.
    #[must_use]
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        self.state.lock().grid.is_valid_position(x, y)
    }

    /// Reports whether the coordinate lies on the map.
    #[must_use]
    pub fn contains(&self, position: Vector2) -> bool {
        self.state.lock().grid.contains(position)
    }

    /// Copy of the place at the coordinate, or `None` when out of range.
    #[must_use]
    pub fn place_at(&self, position: Vector2) -> Option<Place> {
        self.state.lock().grid.place_at(position).copied()
    }

    /// In-bounds neighbors in the order up, down, left, right.
    #[must_use]
    pub fn neighbor_positions(&self, position: Vector2) -> Vec<Vector2> {
        self.state.lock().grid.neighbor_positions(position)
    }

    /// Places adjacent to the coordinate, ordered like
    /// [`Map::neighbor_positions`].
    #[must_use]
    pub fn neighbor_places(&self, position: Vector2) -> Vec<Place> {
        self.state
            .lock()
            .grid
            .neighbor_places(position)
            .into_iter()
            .copied()
            .collect()
    }

    /// Consistent copy of the whole grid taken under a single lock.
    #[must_use]
    pub fn snapshot(&self) -> PlaceGrid {
        self.state.lock().grid.clone()
    }

    /// Copy of a unit's record together with the grid it stands on, both
    /// taken under the same lock.
    #[must_use]
    pub fn unit_snapshot(&self, id: UnitId) -> Option<(Unit, PlaceGrid)> {
        let state = self.state.lock();
        let unit = state.units.get(&id).copied()?;
        Some((unit, state.grid.clone()))
    }

    /// Registers an observer notified after every structural update.
    pub fn register_listener(&self, listener: Arc<dyn MapListener>) -> ListenerId {
        self.listeners.register(listener)
    }

    /// Removes a previously registered observer.
    ///
    /// Returns `false` when the handle is unknown.
    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Assigns terrain of the given kind to a place, or clears it.
    pub fn set_terrain(
        &self,
        position: Vector2,
        terrain: Option<TerrainKind>,
    ) -> Result<(), MoveError> {
        {
            let mut state = self.state.lock();
            let place = state
                .grid
                .place_mut(position)
                .ok_or(MoveError::OutOfBounds)?;
            place.set_terrain(terrain.map(|kind| Terrain::new(kind, position)));
        }

        self.listeners.notify();
        Ok(())
    }

    /// Creates a unit and places it on the map.
    ///
    /// The destination must be on the map, vacant, and traversable by the
    /// unit.
    pub fn place_unit(&self, kind: UnitKind, position: Vector2) -> Result<UnitId, MoveError> {
        let id = {
            let mut state = self.state.lock();
            state.check_destination(kind, position, None)?;

            let id = UnitId::new(state.next_unit);
            state.next_unit = state.next_unit.saturating_add(1);
            let _ = state.units.insert(id, Unit::new(id, kind, position));
            state.set_occupant(position, Some(id));
            id
        };

        debug!(unit = id.get(), x = position.x(), y = position.y(), "unit placed");
        self.listeners.notify();
        Ok(id)
    }

    /// Moves a unit, updating the vacated place, the entered place and the
    /// unit's own position together.
    ///
    /// Returns the position the unit left. Moving a unit onto its own place
    /// succeeds without notifying listeners.
    pub fn move_unit(&self, id: UnitId, to: Vector2) -> Result<Vector2, MoveError> {
        let from = {
            let mut state = self.state.lock();
            let unit = state.units.get(&id).copied().ok_or(MoveError::MissingUnit)?;
            state.check_destination(unit.kind(), to, Some(id))?;

            let from = unit.position();
            if from == to {
                return Ok(from);
            }

            state.set_occupant(from, None);
            state.set_occupant(to, Some(id));
            let _ = state.units.insert(id, unit.moved_to(to));
            from
        };

        debug!(unit = id.get(), from = ?from, to = ?to, "unit moved");
        self.listeners.notify();
        Ok(from)
    }

    /// Removes a unit from the map, returning the place it vacated.
    pub fn remove_unit(&self, id: UnitId) -> Result<Vector2, MoveError> {
        let position = {
            let mut state = self.state.lock();
            let unit = state.units.remove(&id).ok_or(MoveError::MissingUnit)?;
            state.set_occupant(unit.position(), None);
            unit.position()
        };

        self.listeners.notify();
        Ok(position)
    }

    /// Updates the opacity renderers apply to a unit.
    pub fn set_unit_alpha(&self, id: UnitId, alpha: u8) -> Result<(), MoveError> {
        {
            let mut state = self.state.lock();
            let unit = state.units.get_mut(&id).ok_or(MoveError::MissingUnit)?;
            *unit = unit.with_alpha(alpha);
        }

        self.listeners.notify();
        Ok(())
    }

    /// Copy of a unit's record.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<Unit> {
        self.state.lock().units.get(&id).copied()
    }

    /// Unit standing on the provided place, if any.
    #[must_use]
    pub fn unit_at(&self, position: Vector2) -> Option<Unit> {
        let state = self.state.lock();
        let occupant = state.grid.place_at(position)?.occupant()?;
        state.units.get(&occupant).copied()
    }

    /// Snapshot of every unit ordered by identifier.
    #[must_use]
    pub fn units(&self) -> UnitView {
        UnitView::from_units(self.state.lock().units.values().copied().collect())
    }
}

/// Applies the provided command to the map and reports the outcome.
pub fn apply(map: &Map, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetTerrain { position, terrain } => match map.set_terrain(position, terrain) {
            Ok(()) => out_events.push(Event::TerrainChanged { position, terrain }),
            Err(reason) => out_events.push(Event::TerrainRejected { position, reason }),
        },
        Command::PlaceUnit { kind, position } => match map.place_unit(kind, position) {
            Ok(unit) => out_events.push(Event::UnitPlaced {
                unit,
                kind,
                position,
            }),
            Err(reason) => out_events.push(Event::UnitPlacementRejected {
                kind,
                position,
                reason,
            }),
        },
        Command::MoveUnit { unit, to } => match map.move_unit(unit, to) {
            Ok(from) => out_events.push(Event::UnitMoved { unit, from, to }),
            Err(reason) => out_events.push(Event::UnitMoveRejected { unit, to, reason }),
        },
        Command::RemoveUnit { unit } => match map.remove_unit(unit) {
            Ok(position) => out_events.push(Event::UnitRemoved { unit, position }),
            Err(_) => out_events.push(Event::UnitMissing { unit }),
        },
        Command::SetUnitAlpha { unit, alpha } => match map.set_unit_alpha(unit, alpha) {
            Ok(()) => out_events.push(Event::UnitAlphaChanged { unit, alpha }),
            Err(_) => out_events.push(Event::UnitMissing { unit }),
        },
    }
}

/// Query functions that provide read-only access to the map state.
pub mod query {
    use grid_tactics_core::{TerrainKind, UnitId, UnitView, Vector2};

    use super::Map;

    /// Dimensions of the map as `(width, height)`.
    #[must_use]
    pub fn dimensions(map: &Map) -> (u32, u32) {
        let state = map.state.lock();
        (state.grid.width(), state.grid.height())
    }

    /// Terrain variant held by the place, if the place exists and has terrain.
    #[must_use]
    pub fn terrain_at(map: &Map, position: Vector2) -> Option<TerrainKind> {
        map.place_at(position)
            .and_then(|place| place.terrain())
            .map(|terrain| terrain.kind())
    }

    /// Identifier of the unit occupying the place, if any.
    #[must_use]
    pub fn occupant(map: &Map, position: Vector2) -> Option<UnitId> {
        map.place_at(position).and_then(|place| place.occupant())
    }

    /// Captures a read-only view of the units on the map.
    #[must_use]
    pub fn unit_view(map: &Map) -> UnitView {
        map.units()
    }
}
