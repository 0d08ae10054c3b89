//! Units and their traversal rules.

use serde::{Deserialize, Serialize};

use crate::{MovementShape, Terrain, TerrainKind, Vector2};

/// Alpha applied to units that are drawn fully opaque.
pub const OPAQUE_ALPHA: u8 = u8::MAX;

/// Unique identifier assigned to a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Types of units that can be fielded on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Infantry that walks anywhere except valleys and walls.
    Swordsman,
}

impl UnitKind {
    /// Reports whether the unit may enter the provided terrain.
    ///
    /// Absent terrain is never traversable.
    #[must_use]
    pub fn can_traverse(self, terrain: Option<Terrain>) -> bool {
        terrain.map_or(false, |terrain| self.can_traverse_kind(terrain.kind()))
    }

    /// Traversal rule expressed over terrain variants.
    #[must_use]
    pub const fn can_traverse_kind(self, kind: TerrainKind) -> bool {
        match self {
            Self::Swordsman => !matches!(kind, TerrainKind::Valley | TerrainKind::Wall),
        }
    }

    /// Geometric template used to derive the unit's destinations.
    ///
    /// `UnitKind::Swordsman` covers a diamond of radius two.
    #[must_use]
    pub const fn movement_shape(self) -> MovementShape {
        match self {
            Self::Swordsman => MovementShape::diamond(2),
        }
    }

    /// Human readable name of the unit type.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Swordsman => "Swordsman",
        }
    }

    /// Name of the sprite asset presenting this unit.
    #[must_use]
    pub const fn sprite_name(self) -> &'static str {
        match self {
            Self::Swordsman => "unit_swordsman",
        }
    }
}

/// Immutable record of a unit placed on the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    kind: UnitKind,
    position: Vector2,
    alpha: u8,
}

impl Unit {
    /// Creates an opaque unit at the provided position.
    #[must_use]
    pub const fn new(id: UnitId, kind: UnitKind, position: Vector2) -> Self {
        Self {
            id,
            kind,
            position,
            alpha: OPAQUE_ALPHA,
        }
    }

    /// Identifier allocated to the unit.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Variant of the unit.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Map position the unit occupies.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }

    /// Opacity renderers should apply when presenting the unit.
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.alpha
    }

    /// Returns a copy of the unit relocated to `position`.
    #[must_use]
    pub const fn moved_to(self, position: Vector2) -> Self {
        Self { position, ..self }
    }

    /// Returns a copy of the unit using the provided opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: u8) -> Self {
        Self { alpha, ..self }
    }

    /// Reports whether the unit may enter the provided terrain.
    #[must_use]
    pub fn can_traverse_terrain(&self, terrain: Option<Terrain>) -> bool {
        self.kind.can_traverse(terrain)
    }

    /// Unfiltered movement shape centred on the unit's position.
    #[must_use]
    pub fn movement_shape(&self) -> Vec<Vector2> {
        self.kind.movement_shape().around(self.position)
    }
}

/// Read-only snapshot describing all units on the map.
#[derive(Clone, Debug, Default)]
pub struct UnitView {
    units: Vec<Unit>,
}

impl UnitView {
    /// Creates a new unit view, ordering units by identifier.
    #[must_use]
    pub fn from_units(mut units: Vec<Unit>) -> Self {
        units.sort_by_key(|unit| unit.id());
        Self { units }
    }

    /// Iterator over the captured units in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    /// Looks up a unit by identifier.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units
            .binary_search_by_key(&id, |unit| unit.id())
            .ok()
            .and_then(|index| self.units.get(index))
    }

    /// Consumes the view, yielding the underlying units.
    #[must_use]
    pub fn into_vec(self) -> Vec<Unit> {
        self.units
    }
}
