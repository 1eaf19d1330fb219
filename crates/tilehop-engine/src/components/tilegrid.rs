//! Collision grid: per-tile `solid` / `platform` attributes.
//!
//! The grid is immutable once a map is loaded. Every lookup that cannot be
//! answered (off the map, empty cell, tile without properties) reports a solid
//! tile, so the world boundary behaves like a wall.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Edge length of a tile in world units.
pub const TILE_SIZE: f32 = 16.0;

/// Boolean attributes of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileProps {
    #[serde(default)]
    pub solid: bool,
    /// One-way tile: stops downward landing, never blocks upward or sideways motion.
    #[serde(default)]
    pub platform: bool,
}

impl TileProps {
    /// Reported for any lookup that fails.
    pub const SOLID_DEFAULT: Self = Self {
        solid: true,
        platform: false,
    };

    pub const EMPTY: Self = Self {
        solid: false,
        platform: false,
    };

    pub const PLATFORM: Self = Self {
        solid: false,
        platform: true,
    };

    /// True when the tile stops a body moving downward.
    pub fn supports(&self) -> bool {
        self.solid || self.platform
    }
}

/// Tile-property lookup by world position.
pub trait TileQuery {
    fn tile_at(&self, world: Vec2) -> TileProps;

    fn tile_at_xy(&self, x: f32, y: f32) -> TileProps {
        self.tile_at(Vec2::new(x, y))
    }
}

/// Row-major grid of tile properties. `None` cells carry no properties.
#[derive(Debug, Clone)]
pub struct TileGrid {
    pub width: u32,
    pub height: u32,
    pub tile_size: f32,
    cells: Vec<Option<TileProps>>,
}

impl TileGrid {
    /// Create a grid where every cell is empty (passable).
    pub fn new(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells: vec![Some(TileProps::EMPTY); (width * height) as usize],
        }
    }

    /// A grid with no cells at all. Every lookup reports the solid default.
    pub fn missing(width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            width,
            height,
            tile_size,
            cells: vec![None; (width * height) as usize],
        }
    }

    /// Build a grid from ASCII rows: `#` solid, `=` platform, `?` no properties,
    /// anything else empty. Rows shorter than the widest row are padded as empty.
    pub fn from_ascii(rows: &[&str], tile_size: f32) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let height = rows.len() as u32;
        let mut grid = Self::new(width, height, tile_size);
        for (ty, row) in rows.iter().enumerate() {
            for (tx, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '#' => Some(TileProps::SOLID_DEFAULT),
                    '=' => Some(TileProps::PLATFORM),
                    '?' => None,
                    _ => Some(TileProps::EMPTY),
                };
                grid.set(tx as u32, ty as u32, cell);
            }
        }
        grid
    }

    /// Get the cell at grid position (x, y). Outer `None` means out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Option<TileProps>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.cells[(y * self.width + x) as usize])
    }

    /// Set a cell at grid position (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, cell: Option<TileProps>) {
        if x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = cell;
        }
    }

    /// Fill a rectangular region of cells.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, cell: Option<TileProps>) {
        for ty in y..(y + h).min(self.height) {
            for tx in x..(x + w).min(self.width) {
                self.set(tx, ty, cell);
            }
        }
    }

    /// Convert a world position to grid coordinates: `floor(coord / tile_size)`.
    pub fn world_to_tile(&self, world: Vec2) -> Option<(u32, u32)> {
        let tx = (world.x / self.tile_size).floor();
        let ty = (world.y / self.tile_size).floor();
        if tx < 0.0 || ty < 0.0 || tx >= self.width as f32 || ty >= self.height as f32 {
            return None;
        }
        Some((tx as u32, ty as u32))
    }

    /// World-space size of the grid.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.tile_size,
            self.height as f32 * self.tile_size,
        )
    }
}

impl TileQuery for TileGrid {
    fn tile_at(&self, world: Vec2) -> TileProps {
        let Some((tx, ty)) = self.world_to_tile(world) else {
            log::trace!("tile lookup off map at ({}, {})", world.x, world.y);
            return TileProps::SOLID_DEFAULT;
        };
        match self.cells[(ty * self.width + tx) as usize] {
            Some(props) => props,
            None => {
                log::trace!("tile ({tx}, {ty}) has no properties");
                TileProps::SOLID_DEFAULT
            }
        }
    }
}
