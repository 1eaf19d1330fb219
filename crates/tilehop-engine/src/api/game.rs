use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::{EntityId, GameEvent, SoundEvent};
use crate::core::scene::Scene;
use crate::core::time::FRAME_RATE;
use crate::error::{EngineError, Result};
use crate::input::state::InputState;
use crate::renderer::instance::RenderBuffer;

/// Configuration for the engine, provided by the game or loaded from JSON.
/// Every field is optional in JSON and falls back to its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Output size in pixels (default: 640×480).
    pub screen_width: f32,
    pub screen_height: f32,
    /// Starting zoom (default: 1.5).
    pub zoom: f32,
    /// Zoom change per frame while zoom input is held (default: 0.01).
    pub zoom_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Camera follow speed in world units per frame (default: 2).
    pub camera_speed: f32,
    /// Index of the map layer holding collision tiles (default: 2).
    pub block_layer: usize,
    /// Map the game starts on.
    pub start_map: String,
    /// Pixels per frame the transition window slides (default: 40).
    pub transition_step: f32,
    /// Frames between the player's death and the game-over menu (default: 200).
    pub game_over_delay: u32,
    /// Render instance capacity reserved up front (default: 4096).
    pub max_instances: usize,
    /// Maximum number of sound events per frame (default: 32).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / FRAME_RATE,
            screen_width: 640.0,
            screen_height: 480.0,
            zoom: 1.5,
            zoom_step: 0.01,
            min_zoom: 1.0,
            max_zoom: 3.0,
            camera_speed: 2.0,
            block_layer: 2,
            start_map: "level1".to_string(),
            transition_step: 40.0,
            game_over_delay: 200,
            max_instances: 4096,
            max_sounds: 32,
            max_events: 32,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(EngineError::Config)
    }

    pub fn screen(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Load assets and the first map. Errors here abort startup.
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()>;

    /// One fixed-rate tick.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputState);

    /// Fill the render buffer for the current state. Read-only.
    fn render(&self, ctx: &mut RenderContext);

    /// True once the game wants the host loop to stop.
    fn wants_quit(&self) -> bool {
        false
    }
}

/// Mutable engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            sounds: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        self.scene.next_id()
    }

    /// Emit a sound event to be forwarded to the host.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (sounds, events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context handed to Game::render.
pub struct RenderContext<'a> {
    pub scene: &'a Scene,
    pub render_buffer: &'a mut RenderBuffer,
}
