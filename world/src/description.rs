//! Plain-text map description parser.
//!
//! A description starts with a `<width> <height>` header followed by exactly
//! `height` rows of `width` whitespace-separated terrain tokens. Blank lines
//! are ignored.

use grid_tactics_core::{Terrain, TerrainKind, Vector2};
use thiserror::Error;
use tracing::warn;

use crate::grid::PlaceGrid;

/// Policy applied to terrain tokens that match no known variant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LoadMode {
    /// Logs a warning and leaves the place without terrain.
    #[default]
    Lenient,
    /// Rejects the whole description.
    Strict,
}

/// Failures surfaced while loading a map description.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The description contained no header line.
    #[error("map description is empty")]
    Empty,
    /// The header did not hold two positive integers.
    #[error("invalid map header '{0}', expected '<width> <height>'")]
    InvalidHeader(String),
    /// A row held a different number of tokens than the declared width.
    #[error("row {row} has {found} tokens but the map is {expected} wide")]
    RowWidthMismatch {
        /// Zero-based row index.
        row: u32,
        /// Declared map width.
        expected: u32,
        /// Number of tokens present on the row.
        found: usize,
    },
    /// Fewer rows were present than the header declared.
    #[error("map declares {expected} rows but only {found} were present")]
    MissingRows {
        /// Declared map height.
        expected: u32,
        /// Number of rows present.
        found: u32,
    },
    /// Non-blank content followed the last declared row.
    #[error("unexpected content after the last row: '{0}'")]
    TrailingContent(String),
    /// A token matched no terrain variant while loading strictly.
    #[error("unknown terrain token '{token}' at ({x}, {y})")]
    UnresolvedTerrainToken {
        /// Offending token.
        token: String,
        /// Column of the token.
        x: i32,
        /// Row of the token.
        y: i32,
    },
    /// A description was applied to a map of different dimensions.
    #[error("description is {found_width}x{found_height} but the map is {width}x{height}")]
    DimensionMismatch {
        /// Width of the existing map.
        width: u32,
        /// Height of the existing map.
        height: u32,
        /// Width declared by the description.
        found_width: u32,
        /// Height declared by the description.
        found_height: u32,
    },
}

/// Parses a description into a fresh grid carrying the resolved terrain.
pub(crate) fn parse(text: &str, mode: LoadMode) -> Result<PlaceGrid, MapError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());
    let header = lines.next().ok_or(MapError::Empty)?;
    let (width, height) = parse_header(header)?;

    let mut grid = PlaceGrid::new(width, height);
    let mut unresolved = 0_usize;

    for row in 0..height {
        let line = lines.next().ok_or(MapError::MissingRows {
            expected: height,
            found: row,
        })?;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != width as usize {
            return Err(MapError::RowWidthMismatch {
                row,
                expected: width,
                found: tokens.len(),
            });
        }

        let y = coordinate(row);
        for (column, token) in (0..width).zip(tokens) {
            let position = Vector2::new(coordinate(column), y);
            let terrain = match TerrainKind::from_token(token) {
                Some(kind) => Some(Terrain::new(kind, position)),
                None if mode == LoadMode::Strict => {
                    return Err(MapError::UnresolvedTerrainToken {
                        token: token.to_owned(),
                        x: position.x(),
                        y: position.y(),
                    });
                }
                None => {
                    warn!(
                        token,
                        x = position.x(),
                        y = position.y(),
                        "attempted to load an invalid terrain, leaving place empty"
                    );
                    unresolved += 1;
                    None
                }
            };

            if let Some(place) = grid.place_mut(position) {
                place.set_terrain(terrain);
            }
        }
    }

    if let Some(extra) = lines.next() {
        return Err(MapError::TrailingContent(extra.trim().to_owned()));
    }

    tracing::debug!(width, height, unresolved, "parsed map description");
    Ok(grid)
}

fn parse_header(line: &str) -> Result<(u32, u32), MapError> {
    let invalid = || MapError::InvalidHeader(line.trim().to_owned());
    let mut fields = line.split_whitespace();
    let width = parse_dimension(fields.next()).ok_or_else(invalid)?;
    let height = parse_dimension(fields.next()).ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }

    Ok((width, height))
}

fn parse_dimension(field: Option<&str>) -> Option<u32> {
    let value = field?.parse::<u32>().ok()?;
    if value == 0 || i32::try_from(value).is_err() {
        return None;
    }
    Some(value)
}

fn coordinate(index: u32) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
