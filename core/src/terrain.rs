//! Terrain classification.

use serde::{Deserialize, Serialize};

use crate::Vector2;

/// Closed set of terrain variants a place may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Open ground.
    Plain,
    /// Wooded ground.
    Forest,
    /// Mountainous ground.
    Mountain,
    /// Running water.
    River,
    /// A deep valley.
    Valley,
    /// An impassable wall segment.
    Wall,
    /// Bridge spanning a river along the vertical axis.
    BridgeVertical,
    /// Bridge spanning a river along the horizontal axis.
    BridgeHorizontal,
}

impl TerrainKind {
    /// Every terrain variant in declaration order.
    pub const ALL: [TerrainKind; 8] = [
        Self::Plain,
        Self::Forest,
        Self::Mountain,
        Self::River,
        Self::Valley,
        Self::Wall,
        Self::BridgeVertical,
        Self::BridgeHorizontal,
    ];

    /// Resolves a map description token, ignoring ASCII case.
    ///
    /// Only the tokens produced by [`TerrainKind::token`] are recognised.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.token().eq_ignore_ascii_case(token))
    }

    /// Canonical lowercase token used by map descriptions.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Plain => "p",
            Self::Forest => "f",
            Self::Mountain => "m",
            Self::River => "r",
            Self::Valley => "v",
            Self::Wall => "w",
            Self::BridgeVertical => "bv",
            Self::BridgeHorizontal => "br",
        }
    }

    /// Name of the sprite asset presenting this terrain.
    #[must_use]
    pub const fn sprite_name(self) -> &'static str {
        match self {
            Self::Plain => "terrain_plain",
            Self::Forest => "terrain_forest",
            Self::Mountain => "terrain_mountain",
            Self::River => "terrain_river",
            Self::Valley => "terrain_valley",
            Self::Wall => "terrain_wall",
            Self::BridgeVertical => "terrain_bridge_v",
            Self::BridgeHorizontal => "terrain_bridge_r",
        }
    }
}

/// Terrain instance bound to the map position it occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terrain {
    kind: TerrainKind,
    position: Vector2,
}

impl Terrain {
    /// Creates terrain of the given kind at the provided position.
    #[must_use]
    pub const fn new(kind: TerrainKind, position: Vector2) -> Self {
        Self { kind, position }
    }

    /// Resolves a description token into terrain bound to `position`.
    #[must_use]
    pub fn from_token(token: &str, position: Vector2) -> Option<Self> {
        TerrainKind::from_token(token).map(|kind| Self::new(kind, position))
    }

    /// Variant of the terrain.
    #[must_use]
    pub const fn kind(&self) -> TerrainKind {
        self.kind
    }

    /// Map position the terrain was created for.
    #[must_use]
    pub const fn position(&self) -> Vector2 {
        self.position
    }
}
