#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Bootstrap system that prepares a Grid Tactics session.
//!
//! Maps are obtained by logical name from a [`ResourceLoader`], parsed under
//! the configured [`LoadMode`], and optionally populated with an initial
//! deployment of units through the world's command interface.

mod resources;

use grid_tactics_core::{Command, Event, UnitKind, Vector2};
use grid_tactics_world::{self as world, LoadMode, Map, MapError};
use thiserror::Error;
use tracing::info;

pub use resources::{DirectoryResources, MemoryResources, ResourceError, ResourceLoader};

/// Failures raised while bootstrapping a map.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The description could not be obtained.
    #[error(transparent)]
    Resource(#[from] ResourceError),
    /// The description was obtained but could not be parsed.
    #[error("map '{name}' could not be loaded")]
    Map {
        /// Logical name of the map.
        name: String,
        /// Parse failure.
        #[source]
        source: MapError,
    },
}

/// Loads maps and deploys starting units.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bootstrap {
    mode: LoadMode,
}

impl Bootstrap {
    /// Creates a bootstrap system using the provided load policy.
    #[must_use]
    pub const fn new(mode: LoadMode) -> Self {
        Self { mode }
    }

    /// Policy applied to unknown terrain tokens.
    #[must_use]
    pub const fn mode(&self) -> LoadMode {
        self.mode
    }

    /// Reads and parses the named map description.
    pub fn load_map(
        &self,
        loader: &dyn ResourceLoader,
        name: &str,
    ) -> Result<Map, BootstrapError> {
        let text = loader.read_to_string(name)?;
        let map = Map::from_description(&text, self.mode).map_err(|source| BootstrapError::Map {
            name: name.to_owned(),
            source,
        })?;
        info!(name, width = map.width(), height = map.height(), "map ready");
        Ok(map)
    }

    /// Places the provided units in order, reporting every outcome.
    ///
    /// Rejected placements are reported as events and do not stop the
    /// deployment of the remaining units.
    pub fn deploy(&self, map: &Map, units: &[(UnitKind, Vector2)], out_events: &mut Vec<Event>) {
        for &(kind, position) in units {
            world::apply(map, Command::PlaceUnit { kind, position }, out_events);
        }
    }
}
