use std::collections::HashMap;

use crate::assets::manifest::AssetManifest;
use crate::components::sprite::{AtlasId, SpriteSheet};
use crate::error::{EngineError, Result};

/// Registry of named sprite sheets and atlases, built from an AssetManifest.
/// Lookups fail loudly: an entity without an image is a startup error.
pub struct SpriteRegistry {
    atlases: HashMap<String, AtlasId>,
    sheets: HashMap<String, SpriteSheet>,
}

impl SpriteRegistry {
    pub fn new() -> Self {
        Self {
            atlases: HashMap::new(),
            sheets: HashMap::new(),
        }
    }

    /// Build a registry from a parsed AssetManifest. Sheets must name a declared atlas.
    pub fn from_manifest(manifest: &AssetManifest) -> Result<Self> {
        let atlases: HashMap<String, AtlasId> = manifest
            .atlases
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), AtlasId(i as u32)))
            .collect();

        let mut sheets = HashMap::with_capacity(manifest.sheets.len());
        for (name, desc) in &manifest.sheets {
            let atlas = *atlases.get(&desc.atlas).ok_or_else(|| EngineError::MissingAtlas {
                name: desc.atlas.clone(),
            })?;
            sheets.insert(
                name.clone(),
                SpriteSheet {
                    atlas,
                    row: desc.row as f32,
                    cell_span: desc.span as f32,
                    faces: desc.faces,
                },
            );
        }
        log::info!(
            "sprite registry: {} atlases, {} sheets",
            atlases.len(),
            sheets.len()
        );
        Ok(Self { atlases, sheets })
    }

    /// Look up a sheet by name.
    pub fn sheet(&self, name: &str) -> Result<SpriteSheet> {
        self.sheets
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::MissingSprite(name.to_string()))
    }

    /// Look up an atlas by name.
    pub fn atlas(&self, name: &str) -> Result<AtlasId> {
        self.atlases
            .get(name)
            .copied()
            .ok_or_else(|| EngineError::MissingAtlas {
                name: name.to_string(),
            })
    }
}

impl Default for SpriteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The sheets every entity kind needs, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySheets {
    pub player: SpriteSheet,
    pub enemy: SpriteSheet,
    pub effect: SpriteSheet,
    pub heart: SpriteSheet,
}

impl EntitySheets {
    pub const PLAYER: &'static str = "player";
    pub const ENEMY: &'static str = "enemy";
    pub const EFFECT: &'static str = "explosion";
    pub const HEART: &'static str = "heart";

    pub fn resolve(registry: &SpriteRegistry) -> Result<Self> {
        Ok(Self {
            player: registry.sheet(Self::PLAYER)?,
            enemy: registry.sheet(Self::ENEMY)?,
            effect: registry.sheet(Self::EFFECT)?,
            heart: registry.sheet(Self::HEART)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Facing;

    const MANIFEST: &str = r#"{
        "atlases": [
            { "name": "tiles", "cols": 16, "rows": 8, "path": "tiles.png" },
            { "name": "sprites", "cols": 8, "rows": 8, "path": "sprites.png" }
        ],
        "sheets": {
            "player": { "atlas": "sprites", "row": 0 },
            "enemy": { "atlas": "sprites", "row": 1, "faces": "left" },
            "explosion": { "atlas": "sprites", "row": 2, "span": 2 },
            "heart": { "atlas": "sprites", "row": 4 }
        }
    }"#;

    #[test]
    fn loads_from_manifest() {
        let manifest = AssetManifest::from_json(MANIFEST).unwrap();
        let reg = SpriteRegistry::from_manifest(&manifest).unwrap();

        let boom = reg.sheet("explosion").unwrap();
        assert_eq!(boom.atlas, AtlasId(1));
        assert_eq!(boom.row, 2.0);
        assert_eq!(boom.cell_span, 2.0);
        assert_eq!(reg.sheet("enemy").unwrap().faces, Facing::Left);
        assert_eq!(reg.atlas("tiles").unwrap(), AtlasId(0));

        let sheets = EntitySheets::resolve(&reg).unwrap();
        assert_eq!(sheets.heart.row, 4.0);
    }

    #[test]
    fn unknown_names_are_errors() {
        let reg = SpriteRegistry::new();
        assert!(matches!(
            reg.sheet("nonexistent"),
            Err(EngineError::MissingSprite(name)) if name == "nonexistent"
        ));
        assert!(matches!(reg.atlas("x"), Err(EngineError::MissingAtlas { .. })));
        assert!(EntitySheets::resolve(&reg).is_err());
    }

    #[test]
    fn sheet_with_undeclared_atlas_fails() {
        let json = r#"{ "atlases": [], "sheets": { "player": { "atlas": "nope" } } }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert!(matches!(
            SpriteRegistry::from_manifest(&manifest),
            Err(EngineError::MissingAtlas { .. })
        ));
    }
}
