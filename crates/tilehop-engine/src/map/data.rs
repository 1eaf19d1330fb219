//! Map model: the subset of Tiled's JSON export the game reads.
//!
//! Tile layers carry gids into tilesets; tile properties (`solid`, `platform`)
//! live on tileset tiles. Object layers carry the markers: `enemy_spawn`,
//! `entrance` (with `dir`) and `exit` (with `dest` and `dir`).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{Direction, Rect};
use crate::components::tilegrid::{TileGrid, TileProps, TILE_SIZE};
use crate::error::{EngineError, Result};

/// Tiled stores flip flags in the top bits of a gid.
const GID_MASK: u32 = 0x1FFF_FFFF;

/// Marker object names.
pub const ENEMY_SPAWN: &str = "enemy_spawn";
pub const ENTRANCE: &str = "entrance";
pub const EXIT: &str = "exit";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapData {
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    #[serde(rename = "tilewidth")]
    pub tile_width: u32,
    #[serde(rename = "tileheight")]
    pub tile_height: u32,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub tilesets: Vec<Tileset>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Layer {
    #[serde(rename = "tilelayer")]
    Tiles(TileLayer),
    #[serde(rename = "objectgroup")]
    Objects(ObjectLayer),
    /// Image and group layers are ignored.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileLayer {
    #[serde(default)]
    pub name: String,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Row-major gids; 0 is an empty cell.
    pub data: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectLayer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub objects: Vec<MapObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A Tiled custom property. Values keep their JSON type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tileset {
    #[serde(rename = "firstgid")]
    pub first_gid: u32,
    /// Also the name of the atlas holding the tileset image.
    pub name: String,
    pub columns: u32,
    #[serde(default, rename = "tilecount")]
    pub tile_count: u32,
    #[serde(default)]
    pub tiles: Vec<TilesetTile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilesetTile {
    pub id: u32,
    #[serde(default)]
    pub properties: Vec<Property>,
}

/// A screen exit found in the map.
#[derive(Debug, Clone, PartialEq)]
pub struct ExitMarker {
    pub area: Rect,
    pub dest: String,
    pub dir: Direction,
}

fn default_visible() -> bool {
    true
}

fn find_property<'a>(properties: &'a [Property], name: &str) -> Option<&'a serde_json::Value> {
    properties.iter().find(|p| p.name == name).map(|p| &p.value)
}

fn bool_property(properties: &[Property], name: &str) -> bool {
    match find_property(properties, name) {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

impl MapObject {
    pub fn property_str(&self, name: &str) -> Option<&str> {
        find_property(&self.properties, name).and_then(|v| v.as_str())
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    fn dir(&self) -> Option<Direction> {
        self.property_str("dir").and_then(Direction::parse)
    }
}

impl MapData {
    /// Parse and validate a map. `id` is only used in error messages.
    pub fn from_json(id: &str, json: &str) -> Result<Self> {
        let map: MapData = serde_json::from_str(json).map_err(|source| EngineError::MapParse {
            id: id.to_string(),
            source,
        })?;
        map.validate(id)?;
        Ok(map)
    }

    fn validate(&self, id: &str) -> Result<()> {
        let invalid = |reason: String| EngineError::MapInvalid {
            id: id.to_string(),
            reason,
        };
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!("size {}x{}", self.width, self.height)));
        }
        if self.tile_width != self.tile_height {
            return Err(invalid(format!(
                "tiles must be square, got {}x{}",
                self.tile_width, self.tile_height
            )));
        }
        if self.tile_size() != TILE_SIZE {
            return Err(invalid(format!(
                "tiles must be {TILE_SIZE} px, got {}",
                self.tile_width
            )));
        }
        for layer in self.tile_layers() {
            let expected = (layer.width * layer.height) as usize;
            if layer.data.len() != expected {
                return Err(invalid(format!(
                    "layer '{}' has {} cells, expected {}",
                    layer.name,
                    layer.data.len(),
                    expected
                )));
            }
        }
        if let Some(ts) = self.tilesets.iter().find(|ts| ts.columns == 0) {
            return Err(invalid(format!("tileset '{}' has no columns", ts.name)));
        }
        Ok(())
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_width as f32
    }

    /// Map size in world units.
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(
            (self.width * self.tile_width) as f32,
            (self.height * self.tile_height) as f32,
        )
    }

    pub fn tile_layers(&self) -> impl Iterator<Item = &TileLayer> {
        self.layers.iter().filter_map(|l| match l {
            Layer::Tiles(t) => Some(t),
            _ => None,
        })
    }

    pub fn objects(&self) -> impl Iterator<Item = &MapObject> {
        self.layers
            .iter()
            .filter_map(|l| match l {
                Layer::Objects(o) => Some(o.objects.iter()),
                _ => None,
            })
            .flatten()
    }

    /// Tileset owning `gid` and the tile's local id within it.
    pub fn tileset_for(&self, gid: u32) -> Option<(&Tileset, u32)> {
        let gid = gid & GID_MASK;
        if gid == 0 {
            return None;
        }
        self.tilesets
            .iter()
            .filter(|ts| ts.first_gid <= gid)
            .max_by_key(|ts| ts.first_gid)
            .map(|ts| (ts, gid - ts.first_gid))
    }

    /// Properties of the tile with `gid`. `None` for empty cells and tiles
    /// that declare no properties.
    pub fn tile_props(&self, gid: u32) -> Option<TileProps> {
        let (tileset, local) = self.tileset_for(gid)?;
        let tile = tileset.tiles.iter().find(|t| t.id == local)?;
        if tile.properties.is_empty() {
            return None;
        }
        Some(TileProps {
            solid: bool_property(&tile.properties, "solid"),
            platform: bool_property(&tile.properties, "platform"),
        })
    }

    /// Atlas name, column and row of the artwork for `gid`.
    pub fn tile_cell(&self, gid: u32) -> Option<(&str, u32, u32)> {
        let (tileset, local) = self.tileset_for(gid)?;
        Some((
            tileset.name.as_str(),
            local % tileset.columns,
            local / tileset.columns,
        ))
    }

    /// Collision grid from the layer at index `block_layer` in `layers`.
    /// A missing or non-tile layer yields a grid where every lookup is solid.
    pub fn tile_grid(&self, block_layer: usize) -> TileGrid {
        let tile_size = self.tile_size();
        let Some(Layer::Tiles(layer)) = self.layers.get(block_layer) else {
            log::warn!("map has no tile layer at index {block_layer}; treating all tiles as solid");
            return TileGrid::missing(self.width, self.height, tile_size);
        };
        let mut grid = TileGrid::missing(layer.width, layer.height, tile_size);
        for (i, &gid) in layer.data.iter().enumerate() {
            let x = i as u32 % layer.width;
            let y = i as u32 / layer.width;
            grid.set(x, y, self.tile_props(gid));
        }
        grid
    }

    /// Top-left corners of every `enemy_spawn` marker.
    pub fn enemy_spawns(&self) -> Vec<Vec2> {
        self.objects()
            .filter(|o| o.name == ENEMY_SPAWN)
            .map(MapObject::pos)
            .collect()
    }

    /// Position of the first entrance tagged with `dir`.
    pub fn entrance(&self, dir: Direction) -> Option<Vec2> {
        self.objects()
            .find(|o| o.name == ENTRANCE && o.dir() == Some(dir))
            .map(MapObject::pos)
    }

    /// Every well-formed exit. Exits missing `dest` or with an unknown `dir` are skipped.
    pub fn exits(&self) -> Vec<ExitMarker> {
        self.objects()
            .filter(|o| o.name == EXIT)
            .filter_map(|o| {
                let dest = o.property_str("dest");
                let dir = o.dir();
                match (dest, dir) {
                    (Some(dest), Some(dir)) => Some(ExitMarker {
                        area: o.rect(),
                        dest: dest.to_string(),
                        dir,
                    }),
                    _ => {
                        log::warn!("ignoring exit at ({}, {}) without dest/dir", o.x, o.y);
                        None
                    }
                }
            })
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::components::tilegrid::TileQuery;

    /// A 4×3 map: air on top, a platform row, a solid floor, gid 0 in one corner.
    pub(crate) const SMALL_MAP: &str = r#"{
        "width": 4, "height": 3, "tilewidth": 16, "tileheight": 16,
        "layers": [
            { "type": "tilelayer", "name": "sky", "width": 4, "height": 3,
              "data": [0,0,0,0, 0,0,0,0, 0,0,0,0] },
            { "type": "imagelayer", "name": "backdrop" },
            { "type": "tilelayer", "name": "blocks", "width": 4, "height": 3,
              "data": [1,1,1,0, 3,3,1,1, 2,2,2,2] },
            { "type": "objectgroup", "name": "markers", "objects": [
                { "name": "entrance", "x": 16, "y": 0, "width": 16, "height": 16,
                  "properties": [ { "name": "dir", "type": "string", "value": "RIGHT" } ] },
                { "name": "entrance", "x": 48, "y": 0,
                  "properties": [ { "name": "dir", "type": "string", "value": "LEFT" } ] },
                { "name": "enemy_spawn", "x": 32, "y": 0 },
                { "name": "exit", "x": 0, "y": 0, "width": 8, "height": 16,
                  "properties": [ { "name": "dest", "value": "cave" },
                                  { "name": "dir", "value": "LEFT" } ] },
                { "name": "exit", "x": 60, "y": 0, "width": 4, "height": 16 }
            ] }
        ],
        "tilesets": [
            { "firstgid": 1, "name": "tiles", "columns": 8, "tilecount": 16,
              "tiles": [
                { "id": 0, "properties": [ { "name": "solid", "type": "bool", "value": false } ] },
                { "id": 1, "properties": [ { "name": "solid", "type": "bool", "value": true } ] },
                { "id": 2, "properties": [ { "name": "solid", "type": "bool", "value": false },
                                           { "name": "platform", "type": "bool", "value": true } ] }
              ] }
        ]
    }"#;

    #[test]
    fn parses_layers_and_skips_unknown_kinds() {
        let map = MapData::from_json("small", SMALL_MAP).unwrap();
        assert_eq!(map.layers.len(), 4);
        assert!(matches!(map.layers[1], Layer::Other));
        assert_eq!(map.tile_layers().count(), 2);
        assert_eq!(map.pixel_size(), Vec2::new(64.0, 48.0));
    }

    #[test]
    fn builds_collision_grid_from_block_layer() {
        let map = MapData::from_json("small", SMALL_MAP).unwrap();
        let grid = map.tile_grid(2);
        assert_eq!(grid.tile_at_xy(1.0, 1.0), TileProps::EMPTY);
        assert_eq!(grid.tile_at_xy(1.0, 17.0), TileProps::PLATFORM);
        assert_eq!(grid.tile_at_xy(1.0, 33.0), TileProps::SOLID_DEFAULT);
        // gid 0 carries no properties.
        assert_eq!(grid.tile_at_xy(49.0, 1.0), TileProps::SOLID_DEFAULT);
    }

    #[test]
    fn missing_block_layer_is_all_solid() {
        let map = MapData::from_json("small", SMALL_MAP).unwrap();
        let grid = map.tile_grid(7);
        assert_eq!(grid.tile_at_xy(1.0, 1.0), TileProps::SOLID_DEFAULT);
        let grid = map.tile_grid(1);
        assert_eq!(grid.tile_at_xy(1.0, 1.0), TileProps::SOLID_DEFAULT);
    }

    #[test]
    fn finds_markers() {
        let map = MapData::from_json("small", SMALL_MAP).unwrap();
        assert_eq!(map.enemy_spawns(), vec![Vec2::new(32.0, 0.0)]);
        assert_eq!(map.entrance(Direction::Right), Some(Vec2::new(16.0, 0.0)));
        assert_eq!(map.entrance(Direction::Left), Some(Vec2::new(48.0, 0.0)));
        assert_eq!(map.entrance(Direction::Up), None);

        let exits = map.exits();
        assert_eq!(exits.len(), 1);
        assert_eq!(exits[0].dest, "cave");
        assert_eq!(exits[0].dir, Direction::Left);
        assert_eq!(exits[0].area, Rect::new(0.0, 0.0, 8.0, 16.0));
    }

    #[test]
    fn gids_resolve_to_atlas_cells() {
        let map = MapData::from_json("small", SMALL_MAP).unwrap();
        assert_eq!(map.tile_cell(0), None);
        assert_eq!(map.tile_cell(2), Some(("tiles", 1, 0)));
        assert_eq!(map.tile_cell(10), Some(("tiles", 1, 1)));
        // Flip flags are ignored.
        assert_eq!(map.tile_cell(0x8000_0002), Some(("tiles", 1, 0)));
    }

    #[test]
    fn rejects_malformed_maps() {
        let err = MapData::from_json("bad", "{ not json").unwrap_err();
        assert!(matches!(err, EngineError::MapParse { ref id, .. } if id == "bad"));

        let short = r#"{ "width": 2, "height": 2, "tilewidth": 16, "tileheight": 16,
            "layers": [ { "type": "tilelayer", "width": 2, "height": 2, "data": [1] } ] }"#;
        let err = MapData::from_json("short", short).unwrap_err();
        assert!(matches!(err, EngineError::MapInvalid { .. }));
    }

    #[test]
    fn rejects_tiles_other_than_sixteen_pixels() {
        let big = SMALL_MAP.replace(
            r#""tilewidth": 16, "tileheight": 16"#,
            r#""tilewidth": 32, "tileheight": 32"#,
        );
        assert_ne!(big, SMALL_MAP);
        let err = MapData::from_json("big", &big).unwrap_err();
        assert!(
            matches!(err, EngineError::MapInvalid { ref reason, .. } if reason.contains("16 px"))
        );
    }
}
