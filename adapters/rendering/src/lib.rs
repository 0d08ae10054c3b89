#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Grid Tactics adapters.
//!
//! This crate owns no drawing logic. It maps places, terrain and units onto
//! screen rectangles and styles, then hands them to a [`Presenter`]
//! implemented by an adapter.

use anyhow::Result as AnyResult;
use glam::Vec2;
use grid_tactics_core::{Terrain, TerrainKind, Unit, UnitKind, UnitView, Vector2};
use grid_tactics_world::PlaceGrid;
use std::{error::Error, fmt};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the color with its alpha channel replaced by a byte opacity.
    #[must_use]
    pub fn with_alpha_u8(self, alpha: u8) -> Self {
        Self {
            alpha: f32::from(alpha) / 255.0,
            ..self
        }
    }
}

/// Asset name, fallback color and opacity used to present one sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteStyle {
    /// Name of the sprite asset to draw.
    pub sprite: &'static str,
    /// Color used when the asset is unavailable or debug drawing is enabled.
    pub debug_color: Color,
    /// Opacity in the range `0..=255`.
    pub alpha: u8,
}

/// Style applied to a terrain variant.
#[must_use]
pub fn terrain_style(kind: TerrainKind) -> SpriteStyle {
    let debug_color = match kind {
        TerrainKind::Plain => Color::from_rgb_u8(0xff, 0xff, 0x00),
        TerrainKind::Forest => Color::from_rgb_u8(0x2f, 0x95, 0x32),
        TerrainKind::Mountain => Color::from_rgb_u8(0x88, 0x88, 0x88),
        TerrainKind::River => Color::from_rgb_u8(0x1e, 0x6f, 0xd9),
        TerrainKind::Valley => Color::from_rgb_u8(0x5a, 0x3e, 0x2b),
        TerrainKind::Wall => Color::from_rgb_u8(0x22, 0x22, 0x22),
        TerrainKind::BridgeVertical | TerrainKind::BridgeHorizontal => {
            Color::from_rgb_u8(0xa0, 0x6a, 0x3b)
        }
    };

    SpriteStyle {
        sprite: kind.sprite_name(),
        debug_color,
        alpha: u8::MAX,
    }
}

/// Style applied to a unit, honouring its visibility attribute.
#[must_use]
pub fn unit_style(unit: &Unit) -> SpriteStyle {
    let debug_color = match unit.kind() {
        UnitKind::Swordsman => Color::from_rgb_u8(0xff, 0x00, 0x00),
    };

    SpriteStyle {
        sprite: unit.kind().sprite_name(),
        debug_color: debug_color.with_alpha_u8(unit.alpha()),
        alpha: unit.alpha(),
    }
}

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    /// Upper-left corner.
    pub origin: Vec2,
    /// Width and height.
    pub size: Vec2,
}

impl ScreenRect {
    /// Centre point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }
}

/// Maps grid coordinates onto screen space using square tiles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// Number of columns laid out.
    pub columns: u32,
    /// Number of rows laid out.
    pub rows: u32,
    /// Side length of one tile in screen units.
    pub tile_length: f32,
    /// Screen position of the grid's upper-left corner.
    pub origin: Vec2,
}

impl GridLayout {
    /// Creates a layout anchored at the screen origin.
    ///
    /// Returns an error when `tile_length` is not a positive finite number.
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Result<Self, RenderingError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            origin: Vec2::ZERO,
        })
    }

    /// Creates a layout matching the grid's dimensions.
    pub fn for_grid(grid: &PlaceGrid, tile_length: f32) -> Result<Self, RenderingError> {
        Self::new(grid.width(), grid.height(), tile_length)
    }

    /// Total width of the grid in screen units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid in screen units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Screen rectangle covered by the cell, or `None` outside the layout.
    #[must_use]
    pub fn cell_rect(&self, position: Vector2) -> Option<ScreenRect> {
        let column = u32::try_from(position.x()).ok()?;
        let row = u32::try_from(position.y()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }

        Some(ScreenRect {
            origin: self.origin
                + Vec2::new(column as f32, row as f32) * self.tile_length,
            size: Vec2::splat(self.tile_length),
        })
    }

    /// Cell under a screen point, or `None` when the point misses the grid.
    #[must_use]
    pub fn cell_at(&self, point: Vec2) -> Option<Vector2> {
        let local = (point - self.origin) / self.tile_length;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }

        let column = local.x.floor() as u32;
        let row = local.y.floor() as u32;
        if column >= self.columns || row >= self.rows {
            return None;
        }

        Some(Vector2::new(
            i32::try_from(column).ok()?,
            i32::try_from(row).ok()?,
        ))
    }
}

/// Adapter-side drawing surface.
pub trait Presenter {
    /// Draws a place that holds no terrain.
    fn draw_empty(&mut self, position: Vector2, rect: ScreenRect) -> AnyResult<()>;

    /// Draws a place's terrain.
    fn draw_terrain(&mut self, terrain: &Terrain, rect: ScreenRect, style: SpriteStyle)
        -> AnyResult<()>;

    /// Marks a cell as a legal destination.
    fn draw_highlight(&mut self, position: Vector2, rect: ScreenRect) -> AnyResult<()>;

    /// Draws a unit above its place.
    fn draw_unit(&mut self, unit: &Unit, rect: ScreenRect, style: SpriteStyle) -> AnyResult<()>;
}

/// Walks the grid in row-major order and forwards every element to the
/// presenter: terrain first, then highlights, then units.
pub fn present<P>(
    grid: &PlaceGrid,
    units: &UnitView,
    layout: &GridLayout,
    highlights: &[Vector2],
    presenter: &mut P,
) -> AnyResult<()>
where
    P: Presenter + ?Sized,
{
    for place in grid.places() {
        let Some(rect) = layout.cell_rect(place.position()) else {
            continue;
        };
        match place.terrain() {
            Some(terrain) => presenter.draw_terrain(&terrain, rect, terrain_style(terrain.kind()))?,
            None => presenter.draw_empty(place.position(), rect)?,
        }
    }

    for &position in highlights {
        if let Some(rect) = layout.cell_rect(position) {
            presenter.draw_highlight(position, rect)?;
        }
    }

    for unit in units.iter() {
        if let Some(rect) = layout.cell_rect(unit.position()) {
            presenter.draw_unit(unit, rect, unit_style(unit))?;
        }
    }

    Ok(())
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive, finite side length.
    InvalidTileLength {
        /// Provided length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}
