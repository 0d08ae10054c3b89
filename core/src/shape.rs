//! Geometric movement templates.

use serde::{Deserialize, Serialize};

use crate::Vector2;

/// Geometric template describing which cells a unit could reach absent
/// terrain, bounds and occupancy constraints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementShape {
    /// All offsets whose Manhattan length does not exceed `range`.
    Diamond {
        /// Largest Manhattan distance covered by the shape.
        range: u32,
    },
}

impl MovementShape {
    /// Creates a diamond shape of the provided radius.
    #[must_use]
    pub const fn diamond(range: u32) -> Self {
        Self::Diamond { range }
    }

    /// Largest Manhattan distance covered by the shape.
    #[must_use]
    pub const fn range(self) -> u32 {
        match self {
            Self::Diamond { range } => range,
        }
    }

    /// Reports whether the relative offset belongs to the shape.
    #[must_use]
    pub const fn contains_offset(self, offset: Vector2) -> bool {
        match self {
            Self::Diamond { range } => offset.manhattan_length() <= range,
        }
    }

    /// Relative offsets covered by the shape, the origin included exactly once.
    ///
    /// Offsets are ordered by row and then by column so callers observe a
    /// reproducible sequence.
    #[must_use]
    pub fn offsets(self) -> Vec<Vector2> {
        match self {
            Self::Diamond { range } => diamond_offsets(range),
        }
    }

    /// Absolute positions covered by the shape when centred on `origin`.
    ///
    /// The result is not filtered by map bounds or terrain.
    #[must_use]
    pub fn around(self, origin: Vector2) -> Vec<Vector2> {
        self.offsets()
            .into_iter()
            .map(|offset| origin.offset(offset))
            .collect()
    }
}

fn diamond_offsets(range: u32) -> Vec<Vector2> {
    let radius = i32::try_from(range).unwrap_or(i32::MAX);
    let cells = u64::from(range)
        .saturating_mul(u64::from(range) + 1)
        .saturating_mul(2)
        .saturating_add(1);
    let capacity = usize::try_from(cells).unwrap_or(0);
    let mut offsets = Vec::with_capacity(capacity);

    for dy in -radius..=radius {
        let span = radius - dy.abs();
        for dx in -span..=span {
            offsets.push(Vector2::new(dx, dy));
        }
    }

    offsets
}
