use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::{Direction, Rect};
use crate::assets::registry::{EntitySheets, SpriteRegistry};
use crate::components::entity::Entity;
use crate::components::tilegrid::TileGrid;
use crate::components::tilemap::{Tile, TilemapComponent};
use crate::core::scene::Scene;
use crate::error::Result;
use crate::map::data::{ExitMarker, MapData};
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::RenderInstance;
use crate::systems::render::build_tile_instances;

/// Everything the game needs from one loaded map: collision grid, tile art,
/// markers. Immutable once built.
#[derive(Debug, Clone)]
pub struct World {
    pub id: String,
    pub map: MapData,
    pub grid: TileGrid,
    /// Visible tile layers in draw order.
    pub layers: Vec<TilemapComponent>,
    exits: Vec<ExitMarker>,
}

impl World {
    /// Build the collision grid from `block_layer` and resolve tile art
    /// against the registry. A tileset whose atlas is not declared fails here.
    pub fn build(
        id: impl Into<String>,
        map: MapData,
        registry: &SpriteRegistry,
        block_layer: usize,
    ) -> Result<Self> {
        let id = id.into();
        let grid = map.tile_grid(block_layer);
        let layers = build_layers(&map, registry)?;
        let exits = map.exits();
        log::info!(
            "world '{id}': {}x{} tiles, {} layers, {} exits",
            map.width,
            map.height,
            layers.len(),
            exits.len()
        );
        Ok(Self {
            id,
            map,
            grid,
            layers,
            exits,
        })
    }

    pub fn pixel_size(&self) -> Vec2 {
        self.map.pixel_size()
    }

    /// Where a player arriving in `dir` is placed. Without a matching
    /// entrance this logs and falls back to the map origin.
    pub fn landing(&self, dir: Direction) -> Vec2 {
        self.map.entrance(dir).unwrap_or_else(|| {
            log::warn!(
                "map '{}' has no {} entrance; landing at origin",
                self.id,
                dir.as_str()
            );
            Vec2::ZERO
        })
    }

    /// Spawn one enemy per `enemy_spawn` marker.
    pub fn populate(&self, scene: &mut Scene, sheets: &EntitySheets) -> usize {
        let spawns = self.map.enemy_spawns();
        for &pos in &spawns {
            let id = scene.next_id();
            scene.spawn(Entity::enemy(id, pos, &sheets.enemy));
        }
        log::debug!("world '{}': spawned {} enemies", self.id, spawns.len());
        spawns.len()
    }

    /// Move the player onto the entrance for `dir`, keeping its velocity.
    pub fn place_player(&self, player: &mut Entity, dir: Direction) {
        player.body.pos = self.landing(dir);
    }

    /// First exit overlapping `rect`.
    pub fn exit_hit(&self, rect: &Rect) -> Option<&ExitMarker> {
        self.exits.iter().find(|exit| exit.area.overlaps(rect))
    }

    pub fn exits(&self) -> &[ExitMarker] {
        &self.exits
    }

    /// Tile instances visible through `camera`, screen space.
    pub fn render(&self, camera: &Camera2D, out: &mut Vec<RenderInstance>) {
        build_tile_instances(&self.layers, camera, out);
    }
}

fn build_layers(map: &MapData, registry: &SpriteRegistry) -> Result<Vec<TilemapComponent>> {
    let mut atlases = HashMap::new();
    let mut layers = Vec::new();
    for source in map.tile_layers().filter(|l| l.visible) {
        let mut layer =
            TilemapComponent::new(&source.name, source.width, source.height, map.tile_size());
        for (i, &gid) in source.data.iter().enumerate() {
            let Some((atlas_name, col, row)) = map.tile_cell(gid) else {
                continue;
            };
            let atlas = match atlases.get(atlas_name) {
                Some(&atlas) => atlas,
                None => {
                    let atlas = registry.atlas(atlas_name)?;
                    atlases.insert(atlas_name, atlas);
                    atlas
                }
            };
            let x = i as u32 % source.width;
            let y = i as u32 / source.width;
            layer.set(x, y, Some(Tile::new(atlas, col as f32, row as f32)));
        }
        layers.push(layer);
    }
    Ok(layers)
}
