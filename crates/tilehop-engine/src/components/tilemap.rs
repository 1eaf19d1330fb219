//! Renderable tile layers.
//!
//! A layer stores the atlas cell of every painted tile. Rendering only walks
//! the tiles under the camera view and emits screen-space instances.

use glam::Vec2;

use crate::components::sprite::AtlasId;
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::RenderInstance;

/// A single painted tile: which atlas cell to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub atlas: AtlasId,
    /// Column in the atlas grid.
    pub col: f32,
    /// Row in the atlas grid.
    pub row: f32,
}

impl Tile {
    pub fn new(atlas: AtlasId, col: f32, row: f32) -> Self {
        Self { atlas, col, row }
    }
}

/// One tile layer. Tiles are stored in row-major order: index = y * width + x.
#[derive(Debug, Clone)]
pub struct TilemapComponent {
    pub name: String,
    /// Width of the layer in tiles.
    pub width: u32,
    /// Height of the layer in tiles.
    pub height: u32,
    /// Size of each tile in world units.
    pub tile_size: f32,
    /// None = empty/transparent tile.
    tiles: Vec<Option<Tile>>,
}

impl TilemapComponent {
    pub fn new(name: impl Into<String>, width: u32, height: u32, tile_size: f32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tile_size,
            tiles: vec![None; (width * height) as usize],
        }
    }

    /// Get a tile at grid position (x, y).
    pub fn get(&self, x: u32, y: u32) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles[(y * self.width + x) as usize].as_ref()
    }

    /// Set a tile at grid position (x, y). Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, tile: Option<Tile>) {
        if x < self.width && y < self.height {
            self.tiles[(y * self.width + x) as usize] = tile;
        }
    }

    /// Emit instances for the tiles the camera can see, in screen space.
    pub fn build_visible_instances(&self, camera: &Camera2D, out: &mut Vec<RenderInstance>) {
        let view = camera.view_rect();
        let min_tx = (view.x / self.tile_size).floor().max(0.0) as u32;
        let min_ty = (view.y / self.tile_size).floor().max(0.0) as u32;
        let max_tx = ((view.right() / self.tile_size).ceil().max(0.0) as u32).min(self.width);
        let max_ty = ((view.bottom() / self.tile_size).ceil().max(0.0) as u32).min(self.height);

        let span = 1.0;
        for ty in min_ty..max_ty {
            for tx in min_tx..max_tx {
                let Some(tile) = self.get(tx, ty) else {
                    continue;
                };
                let world = Vec2::new(tx as f32, ty as f32) * self.tile_size;
                let screen = camera.world_to_screen(world);
                out.push(RenderInstance {
                    x: screen.x.round(),
                    y: screen.y.round(),
                    scale: camera.zoom,
                    span,
                    atlas: tile.atlas.0 as f32,
                    col: tile.col,
                    row: tile.row,
                    flip: 0.0,
                });
            }
        }
    }

    /// Count of non-empty tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_some()).count()
    }
}
