pub mod api;
pub mod assets;
pub mod components;
pub mod core;
pub mod error;
pub mod game;
pub mod input;
pub mod map;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{EngineContext, Game, GameConfig, RenderContext};
pub use api::types::{Direction, EntityId, Facing, GameEvent, Rect, SoundEvent};
pub use assets::manifest::AssetManifest;
pub use assets::registry::{EntitySheets, SpriteRegistry};
pub use components::animation::{AnimationComponent, AnimationDef};
pub use components::entity::{BehaviorState, Entity, EntityKind, PlayerData};
pub use components::sprite::{AtlasId, SpriteComponent, SpriteSheet};
pub use components::tilegrid::{TileGrid, TileProps, TileQuery, TILE_SIZE};
pub use components::tilemap::{Tile, TilemapComponent};
pub use core::physics::{KinematicBody, StepReport, WallResponse};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use error::{EngineError, Result};
pub use game::menu::{Menu, MenuChoice};
pub use game::platformer::{GameMode, Platformer};
pub use game::transition::{Arrival, Phase, Transition};
pub use game::world::World;
pub use input::queue::{InputEvent, InputQueue};
pub use input::state::{Action, InputState, KeyBindings};
pub use map::data::{ExitMarker, MapData};
pub use map::loader::{DirMapLoader, MapLoader, MemoryMapLoader};
pub use renderer::camera::{Camera2D, ZoomInput};
pub use renderer::instance::{RenderBuffer, RenderInstance};
pub use renderer::view::{Composite, ViewSnapshot};
