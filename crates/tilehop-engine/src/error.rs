use std::path::PathBuf;

/// Errors raised while building engine state.
///
/// Per-frame operations never return these: tile lookups fall back to a solid
/// default and missing markers fall back to the map origin. Everything that
/// must exist before the first frame (sprite sheets, atlases, map files,
/// configuration) fails here instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("sprite sheet '{0}' is not declared in the asset manifest")]
    MissingSprite(String),

    #[error("atlas '{name}' is not declared in the asset manifest")]
    MissingAtlas { name: String },

    #[error("map '{0}' was not found")]
    MapNotFound(String),

    #[error("map '{id}' could not be parsed: {source}")]
    MapParse {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("map '{id}' is malformed: {reason}")]
    MapInvalid { id: String, reason: String },

    #[error("invalid asset manifest: {0}")]
    Manifest(#[source] serde_json::Error),

    #[error("invalid game config: {0}")]
    Config(#[source] serde_json::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_missing_asset() {
        let err = EngineError::MissingSprite("player".into());
        assert_eq!(
            err.to_string(),
            "sprite sheet 'player' is not declared in the asset manifest"
        );

        let err = EngineError::MapNotFound("level9".into());
        assert!(err.to_string().contains("level9"));
    }
}
