use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::types::Facing;
use crate::error::{EngineError, Result};

/// Asset manifest describing all atlases, sprite sheets and sounds of the game.
/// Loaded from a JSON file at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetManifest {
    /// List of texture atlases. Tilesets refer to these by name.
    pub atlases: Vec<AtlasDescriptor>,
    /// Named sprite sheets: name → atlas + strip row.
    #[serde(default)]
    pub sheets: HashMap<String, SheetDescriptor>,
    /// Optional audio assets.
    #[serde(default)]
    pub sounds: HashMap<String, SoundDescriptor>,
}

/// Describes a single texture atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasDescriptor {
    /// Name used by sheets and map tilesets (e.g., "tiles").
    pub name: String,
    /// Number of columns in the atlas grid.
    pub cols: u32,
    /// Number of rows in the atlas grid.
    pub rows: u32,
    /// Relative path to the PNG file (e.g., "tiles.png").
    pub path: String,
}

/// A strip of animation frames inside an atlas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetDescriptor {
    /// Atlas name.
    pub atlas: String,
    /// Row of the strip in the atlas grid.
    #[serde(default)]
    pub row: u32,
    /// Number of cells one frame spans (default: 1).
    #[serde(default = "default_span")]
    pub span: u32,
    /// Direction the artwork faces (default: right).
    #[serde(default)]
    pub faces: Facing,
}

/// Describes an audio asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundDescriptor {
    /// Relative path to the audio file.
    pub path: String,
    /// Numeric `SoundEvent` that triggers this sound from Rust.
    #[serde(default)]
    pub event_id: Option<u32>,
}

fn default_span() -> u32 {
    1
}

impl AssetManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(EngineError::Manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_sounds() {
        let json = r#"{
            "atlases": [],
            "sounds": {
                "jump": { "path": "jump.wav", "event_id": 1 },
                "music": { "path": "music.ogg" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sounds.len(), 2);
        assert_eq!(manifest.sounds["jump"].event_id, Some(1));
        assert_eq!(manifest.sounds["music"].event_id, None);
    }

    #[test]
    fn parse_sheets_with_defaults() {
        let json = r#"{
            "atlases": [
                { "name": "sprites", "cols": 8, "rows": 8, "path": "sprites.png" }
            ],
            "sheets": {
                "player": { "atlas": "sprites" },
                "enemy": { "atlas": "sprites", "row": 1, "faces": "left" }
            }
        }"#;
        let manifest = AssetManifest::from_json(json).unwrap();
        assert_eq!(manifest.sheets["player"].span, 1);
        assert_eq!(manifest.sheets["player"].faces, Facing::Right);
        assert_eq!(manifest.sheets["enemy"].faces, Facing::Left);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let err = AssetManifest::from_json("{ \"atlases\": 3 }").unwrap_err();
        assert!(matches!(err, EngineError::Manifest(_)));
    }
}
