//! Dense row-major grid of places.

use grid_tactics_core::{Terrain, UnitId, Vector2};

/// Offsets visited by neighbor queries, in the order they are reported.
const NEIGHBOR_OFFSETS: [Vector2; 4] = [Vector2::UP, Vector2::DOWN, Vector2::LEFT, Vector2::RIGHT];

/// A single addressable cell of the map.
///
/// Places are identified by their position, so two places at different
/// coordinates never compare equal even when they hold the same terrain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Place {
    position: Vector2,
    terrain: Option<Terrain>,
    occupant: Option<UnitId>,
}

impl Place {
    pub(crate) const fn empty(position: Vector2) -> Self {
        Self {
            position,
            terrain: None,
            occupant: None,
        }
    }

    /// Coordinate of the place, fixed for its lifetime.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Terrain held by the place.
    ///
    /// Absent after a lenient load met an unknown token or after the terrain
    /// was cleared; no unit can enter such a place.
    #[must_use]
    pub const fn terrain(&self) -> Option<Terrain> {
        self.terrain
    }

    /// Unit occupying the place, if any.
    #[must_use]
    pub const fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    /// Reports whether no unit occupies the place.
    #[must_use]
    pub const fn is_vacant(&self) -> bool {
        self.occupant.is_none()
    }

    pub(crate) fn set_terrain(&mut self, terrain: Option<Terrain>) {
        self.terrain = terrain;
    }

    pub(crate) fn set_occupant(&mut self, occupant: Option<UnitId>) {
        self.occupant = occupant;
    }
}

/// Fixed-size grid holding exactly one [`Place`] per coordinate.
///
/// The grid never resizes. Out-of-range lookups are ordinary outcomes and
/// produce `None` or `false` rather than panicking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceGrid {
    width: u32,
    height: u32,
    places: Vec<Place>,
}

impl PlaceGrid {
    /// Allocates `width * height` empty places.
    ///
    /// Both dimensions are expected to be positive; a zero dimension yields a
    /// grid in which no position is valid.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let capacity_u64 = u64::from(width) * u64::from(height);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut places = Vec::with_capacity(capacity);
        for y in 0..height {
            for x in 0..width {
                places.push(Place::empty(Vector2::new(
                    i32::try_from(x).unwrap_or(i32::MAX),
                    i32::try_from(y).unwrap_or(i32::MAX),
                )));
            }
        }

        Self {
            width,
            height,
            places,
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether `0 <= x < width` and `0 <= y < height`.
    #[must_use]
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(column), Ok(row)) => column < self.width && row < self.height,
            _ => false,
        }
    }

    /// Reports whether the coordinate lies within the grid.
    #[must_use]
    pub fn contains(&self, position: Vector2) -> bool {
        self.is_valid_position(position.x(), position.y())
    }

    /// Place at the provided coordinate, or `None` when out of range.
    #[must_use]
    pub fn place_at(&self, position: Vector2) -> Option<&Place> {
        self.index(position).and_then(|index| self.places.get(index))
    }

    /// In-bounds neighbors in the order up, down, left, right.
    #[must_use]
    pub fn neighbor_positions(&self, position: Vector2) -> Vec<Vector2> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(|offset| position.offset(*offset))
            .filter(|candidate| *candidate != position && self.contains(*candidate))
            .collect()
    }

    /// Places adjacent to the coordinate, in the same order as
    /// [`PlaceGrid::neighbor_positions`].
    #[must_use]
    pub fn neighbor_places(&self, position: Vector2) -> Vec<&Place> {
        self.neighbor_positions(position)
            .into_iter()
            .filter_map(|neighbor| self.place_at(neighbor))
            .collect()
    }

    /// All places in row-major order.
    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Iterator over the rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Place]> {
        let width = usize::try_from(self.width).unwrap_or(usize::MAX).max(1);
        self.places.chunks(width)
    }

    pub(crate) fn place_mut(&mut self, position: Vector2) -> Option<&mut Place> {
        let index = self.index(position)?;
        self.places.get_mut(index)
    }

    fn index(&self, position: Vector2) -> Option<usize> {
        if !self.contains(position) {
            return None;
        }

        let row = usize::try_from(position.y()).ok()?;
        let column = usize::try_from(position.x()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
