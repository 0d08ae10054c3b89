//! Text presenter that draws a map as a grid of three-character cells.

use anyhow::{anyhow, Result as AnyResult};
use grid_tactics_core::{Terrain, Unit, Vector2};
use grid_tactics_rendering::{GridLayout, Presenter, ScreenRect, SpriteStyle};

const UNIT_MARKER: char = '@';
const HIGHLIGHT_MARKER: char = '*';
const MISSING_TOKEN: &str = "??";

#[derive(Clone, Debug)]
struct Cell {
    marker: char,
    token: String,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            marker: ' ',
            token: MISSING_TOKEN.to_owned(),
        }
    }
}

/// Accumulates presenter calls into printable rows.
#[derive(Debug)]
pub(crate) struct AsciiCanvas {
    layout: GridLayout,
    cells: Vec<Cell>,
}

impl AsciiCanvas {
    pub(crate) fn new(layout: GridLayout) -> Self {
        let count = layout.columns as usize * layout.rows as usize;
        Self {
            layout,
            cells: vec![Cell::default(); count],
        }
    }

    fn cell_mut(&mut self, rect: ScreenRect) -> AnyResult<&mut Cell> {
        let position = self
            .layout
            .cell_at(rect.center())
            .ok_or_else(|| anyhow!("rectangle {rect:?} lies outside the canvas"))?;
        let index = position.y() as usize * self.layout.columns as usize + position.x() as usize;
        self.cells
            .get_mut(index)
            .ok_or_else(|| anyhow!("no cell at {},{}", position.x(), position.y()))
    }

    /// Renders the accumulated cells, one line per map row.
    pub(crate) fn render(&self) -> String {
        let columns = (self.layout.columns as usize).max(1);
        let mut text = String::new();
        for row in self.cells.chunks(columns) {
            let line: Vec<String> = row
                .iter()
                .map(|cell| format!("{}{:<2}", cell.marker, cell.token))
                .collect();
            text.push_str(line.join(" ").trim_end());
            text.push('\n');
        }
        text
    }
}

impl Presenter for AsciiCanvas {
    fn draw_empty(&mut self, _position: Vector2, rect: ScreenRect) -> AnyResult<()> {
        self.cell_mut(rect)?.token = MISSING_TOKEN.to_owned();
        Ok(())
    }

    fn draw_terrain(
        &mut self,
        terrain: &Terrain,
        rect: ScreenRect,
        _style: SpriteStyle,
    ) -> AnyResult<()> {
        self.cell_mut(rect)?.token = terrain.kind().token().to_owned();
        Ok(())
    }

    fn draw_highlight(&mut self, _position: Vector2, rect: ScreenRect) -> AnyResult<()> {
        let cell = self.cell_mut(rect)?;
        if cell.marker != UNIT_MARKER {
            cell.marker = HIGHLIGHT_MARKER;
        }
        Ok(())
    }

    fn draw_unit(&mut self, _unit: &Unit, rect: ScreenRect, style: SpriteStyle) -> AnyResult<()> {
        // Fully transparent units are hidden.
        if style.alpha > 0 {
            self.cell_mut(rect)?.marker = UNIT_MARKER;
        }
        Ok(())
    }
}
