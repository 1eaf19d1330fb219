use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{EngineError, Result};
use crate::map::data::MapData;

/// Source of maps by identifier. Loading never touches live game state.
pub trait MapLoader {
    fn load(&self, id: &str) -> Result<MapData>;
}

/// Reads `<root>/<id>.json` from disk.
pub struct DirMapLoader {
    root: PathBuf,
}

impl DirMapLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }
}

impl MapLoader for DirMapLoader {
    fn load(&self, id: &str) -> Result<MapData> {
        let path = self.path_for(id);
        let json = std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                EngineError::MapNotFound(id.to_string())
            } else {
                EngineError::Io { path, source }
            }
        })?;
        log::debug!("read map '{id}' ({} bytes)", json.len());
        MapData::from_json(id, &json)
    }
}

/// Maps held in memory, as registered by the host (or by tests).
#[derive(Default)]
pub struct MemoryMapLoader {
    maps: HashMap<String, String>,
}

impl MemoryMapLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the JSON for `id`. Parsed on each load.
    pub fn insert(&mut self, id: impl Into<String>, json: impl Into<String>) {
        self.maps.insert(id.into(), json.into());
    }

    pub fn with_map(mut self, id: impl Into<String>, json: impl Into<String>) -> Self {
        self.insert(id, json);
        self
    }

    pub fn contains(&self, id: &str) -> bool {
        self.maps.contains_key(id)
    }
}

impl MapLoader for MemoryMapLoader {
    fn load(&self, id: &str) -> Result<MapData> {
        let json = self
            .maps
            .get(id)
            .ok_or_else(|| EngineError::MapNotFound(id.to_string()))?;
        MapData::from_json(id, json)
    }
}
