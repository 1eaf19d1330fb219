use tilehop_engine::{
    EngineContext, FixedTimestep, Game, GameConfig, InputEvent, InputQueue, InputState,
    KeyBindings, RenderBuffer, RenderContext, Result,
};

/// Generic game runner that wires up the engine loop.
///
/// The wasm exports keep one `GameRunner` in a `thread_local!`, because
/// wasm-bindgen cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    queue: InputQueue,
    input: InputState,
    bindings: KeyBindings,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    /// Flat buffer of sound event IDs for host reads.
    sound_buffer: Vec<u8>,
}

impl<G: Game> std::fmt::Debug for GameRunner<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRunner")
            .field("config", &self.config)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            render_buffer: RenderBuffer::with_capacity(config.max_instances),
            sound_buffer: Vec::with_capacity(config.max_sounds),
            game,
            ctx: EngineContext::new(),
            queue: InputQueue::new(),
            input: InputState::new(),
            bindings: KeyBindings::default(),
            config,
            initialized: false,
        }
    }

    pub fn with_bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = bindings;
        self
    }

    /// Initialize the game. Call once after construction; ticks are ignored until it succeeds.
    pub fn init(&mut self) -> Result<()> {
        self.config = self.game.config();
        self.game.init(&mut self.ctx)?;
        self.initialized = true;
        self.rebuild_render_buffer();
        self.pack_sounds();
        Ok(())
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.queue.push(event);
    }

    /// Run one host frame: apply queued input, run the fixed steps, rebuild the render buffer.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized || self.game.wants_quit() {
            return;
        }

        self.ctx.clear_frame_data();

        for event in self.queue.drain() {
            self.input.apply(&event, &self.bindings);
        }

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.game.update(&mut self.ctx, &self.input);
            self.input.end_frame();
            if self.game.wants_quit() {
                break;
            }
        }

        self.rebuild_render_buffer();
        self.pack_sounds();
        self.ctx.events.truncate(self.config.max_events);
    }

    fn rebuild_render_buffer(&mut self) {
        self.render_buffer.clear();
        let mut render_ctx = RenderContext {
            scene: &self.ctx.scene,
            render_buffer: &mut self.render_buffer,
        };
        self.game.render(&mut render_ctx);
        if self.render_buffer.instances.len() > self.config.max_instances {
            log::warn!(
                "render buffer overflow: {} instances, keeping {}",
                self.render_buffer.instances.len(),
                self.config.max_instances
            );
            self.render_buffer.instances.truncate(self.config.max_instances);
        }
    }

    fn pack_sounds(&mut self) {
        self.sound_buffer.clear();
        for sound in self.ctx.sounds.iter().take(self.config.max_sounds) {
            self.sound_buffer.push(sound.0 as u8);
        }
    }

    pub fn wants_quit(&self) -> bool {
        self.game.wants_quit()
    }

    // ---- Pointer accessors for host reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn sound_events_ptr(&self) -> *const u8 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len() as u32
    }

    pub fn screen_width(&self) -> f32 {
        self.config.screen_width
    }

    pub fn screen_height(&self) -> f32 {
        self.config.screen_height
    }

    // ---- Capacity accessors ----

    pub fn max_instances(&self) -> u32 {
        self.config.max_instances as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.config.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.config.max_events as u32
    }
}
