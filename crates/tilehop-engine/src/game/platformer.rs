//! The platformer itself: one mode machine driving menus, play, pause and
//! screen transitions through a single `update`/`render` pair.

use glam::Vec2;

use crate::api::game::{EngineContext, Game, GameConfig, RenderContext};
use crate::api::types::{Direction, GameEvent, Rect, SoundEvent};
use crate::assets::manifest::AssetManifest;
use crate::assets::registry::{EntitySheets, SpriteRegistry};
use crate::components::entity::{BehaviorState, Entity};
use crate::components::tilegrid::TILE_SIZE;
use crate::core::scene::Scene;
use crate::error::Result;
use crate::game::menu::{Menu, MenuChoice};
use crate::game::transition::{Arrival, Transition};
use crate::game::world::World;
use crate::input::state::{Action, InputState};
use crate::map::loader::MapLoader;
use crate::renderer::camera::{Camera2D, ZoomInput};
use crate::systems::behavior::{update_effect, update_enemy, update_player};
use crate::systems::collision::resolve_player_enemies;
use crate::systems::render::{build_entity_instances, build_hud_instances};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    MainMenu,
    Playing,
    Paused,
    GameOver,
    Transitioning,
}

impl GameMode {
    /// Payload of [`GameEvent::MODE_CHANGED`].
    pub fn index(self) -> f32 {
        match self {
            Self::MainMenu => 0.0,
            Self::Playing => 1.0,
            Self::Paused => 2.0,
            Self::GameOver => 3.0,
            Self::Transitioning => 4.0,
        }
    }
}

pub struct Platformer {
    config: GameConfig,
    manifest: AssetManifest,
    loader: Box<dyn MapLoader>,
    registry: SpriteRegistry,
    sheets: Option<EntitySheets>,
    world: Option<World>,
    camera: Camera2D,
    transition: Transition,
    mode: GameMode,
    main_menu: Menu,
    game_over_menu: Menu,
    /// An exit whose destination failed to load; ignored until the player leaves it.
    blocked_exit: Option<Rect>,
    last_hit_points: Option<u8>,
    quit: bool,
}

impl Platformer {
    pub fn new(config: GameConfig, manifest: AssetManifest, loader: Box<dyn MapLoader>) -> Self {
        let screen = config.screen();
        let camera = Camera2D::new(screen, config.zoom)
            .with_speed(config.camera_speed)
            .with_zoom_limits(config.zoom_step, config.min_zoom, config.max_zoom);
        Self {
            transition: Transition::new(config.transition_step),
            main_menu: Menu::main(screen),
            game_over_menu: Menu::game_over(screen),
            config,
            manifest,
            loader,
            registry: SpriteRegistry::new(),
            sheets: None,
            world: None,
            camera,
            mode: GameMode::MainMenu,
            blocked_exit: None,
            last_hit_points: None,
            quit: false,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn camera(&self) -> &Camera2D {
        &self.camera
    }

    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// The menu on screen, if any, for the host to draw.
    pub fn menu(&self) -> Option<&Menu> {
        match self.mode {
            GameMode::MainMenu => Some(&self.main_menu),
            GameMode::GameOver => Some(&self.game_over_menu),
            _ => None,
        }
    }

    fn set_mode(&mut self, ctx: &mut EngineContext, mode: GameMode) {
        if self.mode == mode {
            return;
        }
        log::info!("mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        ctx.emit_event(GameEvent {
            kind: GameEvent::MODE_CHANGED,
            a: mode.index(),
            ..Default::default()
        });
    }

    fn request_quit(&mut self, ctx: &mut EngineContext) {
        if self.quit {
            return;
        }
        log::info!("quit requested");
        self.quit = true;
        ctx.emit_sound(SoundEvent::MUSIC_STOP);
        ctx.emit_event(GameEvent {
            kind: GameEvent::QUIT,
            ..Default::default()
        });
    }

    /// Frame the camera on the player immediately.
    fn snap_camera(&mut self, target: Vec2) {
        let Some(world) = &self.world else {
            return;
        };
        self.camera.snap_to(target + Vec2::splat(TILE_SIZE / 2.0));
        self.camera.clamp_to_map(world.pixel_size());
    }

    /// Fresh player on the current map's RIGHT entrance.
    fn spawn_player(&mut self, scene: &mut Scene) {
        let (Some(world), Some(sheets)) = (&self.world, &self.sheets) else {
            return;
        };
        let landing = world.landing(Direction::Right);
        let id = scene.next_id();
        scene.spawn(Entity::player(id, landing, &sheets.player));
        self.last_hit_points = None;
        self.snap_camera(landing);
    }

    fn menu_frame(&mut self, ctx: &mut EngineContext, input: &InputState) {
        if input.just_pressed(Action::Pause) {
            self.request_quit(ctx);
            return;
        }
        let Some(choice) = input.pointer().and_then(|pos| self.menu()?.click(pos)) else {
            return;
        };
        log::info!("menu choice {choice:?}");
        match choice {
            MenuChoice::Begin => {
                ctx.emit_sound(SoundEvent::MUSIC_START);
                self.set_mode(ctx, GameMode::Playing);
            }
            MenuChoice::TryAgain => {
                self.spawn_player(&mut ctx.scene);
                ctx.emit_sound(SoundEvent::MUSIC_START);
                self.set_mode(ctx, GameMode::Playing);
            }
            MenuChoice::Quit | MenuChoice::EndIt => self.request_quit(ctx),
        }
    }

    fn transition_frame(&mut self, ctx: &mut EngineContext) {
        if let Some(arrival) = self.transition.advance() {
            self.commit(ctx, arrival);
            self.transition.reset();
            self.set_mode(ctx, GameMode::Playing);
        }
    }

    /// Make the arrival the live map and carry the player over.
    fn commit(&mut self, ctx: &mut EngineContext, arrival: Arrival) {
        ctx.scene.clear_for_new_map();
        if let Some(sheets) = &self.sheets {
            arrival.world.populate(&mut ctx.scene, sheets);
        }
        if let Some(player) = ctx.scene.player_mut() {
            arrival.world.place_player(player, arrival.dir);
        }
        self.camera.snap_to(arrival.camera_center);
        log::info!(
            "entered '{}' heading {}",
            arrival.world.id,
            arrival.dir.as_str()
        );
        self.world = Some(arrival.world);
        self.blocked_exit = None;
    }

    /// Start a transition if the player stands in an exit. Returns true if one began.
    fn check_exit(&mut self, ctx: &mut EngineContext) -> bool {
        let (Some(world), Some(player)) = (&self.world, ctx.scene.player()) else {
            return false;
        };
        let rect = player.rect();
        if let Some(blocked) = self.blocked_exit {
            if blocked.overlaps(&rect) {
                return false;
            }
            self.blocked_exit = None;
        }
        let Some(exit) = world.exit_hit(&rect) else {
            return false;
        };
        let begun = self.transition.begin(
            exit,
            world,
            &self.camera,
            self.loader.as_ref(),
            &self.registry,
            self.config.block_layer,
        );
        match begun {
            Ok(()) => {
                self.set_mode(ctx, GameMode::Transitioning);
                true
            }
            Err(err) => {
                log::error!("exit to '{}' unavailable: {err}", exit.dest);
                self.blocked_exit = Some(exit.area);
                false
            }
        }
    }

    fn play_frame(&mut self, ctx: &mut EngineContext, input: &InputState) {
        if input.just_pressed(Action::Pause) {
            self.set_mode(ctx, GameMode::Paused);
            return;
        }
        if self.check_exit(ctx) {
            return;
        }
        let Some(world) = &self.world else {
            return;
        };

        ctx.scene.compact();

        let map_size = world.pixel_size();
        if let Some(player) = ctx.scene.player_mut() {
            update_player(player, &world.grid, map_size.y, input, &mut ctx.sounds);
        }
        for enemy in ctx.scene.enemies_mut() {
            update_enemy(enemy, &world.grid, map_size.y, &mut ctx.sounds);
        }
        for effect in ctx.scene.effects_mut() {
            update_effect(effect);
        }

        let stomps = match ctx.scene.player_and_enemies_mut() {
            (Some(player), enemies) => resolve_player_enemies(player, enemies, &mut ctx.sounds).stomps,
            (None, _) => Vec::new(),
        };
        if let Some(sheets) = &self.sheets {
            for pos in stomps {
                let id = ctx.scene.next_id();
                ctx.scene.spawn(Entity::effect(id, pos, &sheets.effect));
            }
        }

        let zoom = if input.held(Action::ZoomIn) {
            ZoomInput::In
        } else if input.held(Action::ZoomOut) {
            ZoomInput::Out
        } else {
            ZoomInput::None
        };
        let Some(player) = ctx.scene.player() else {
            return;
        };
        self.camera.update(player.body.pos, map_size, zoom);

        let hit_points = player.player_data().map_or(0, |data| data.hit_points);
        let (state, counter) = (player.state, player.state_counter);
        if self.last_hit_points != Some(hit_points) {
            self.last_hit_points = Some(hit_points);
            ctx.emit_event(GameEvent {
                kind: GameEvent::HIT_POINTS,
                a: hit_points as f32,
                ..Default::default()
            });
        }

        if state == BehaviorState::Dead {
            if counter == 0 {
                ctx.emit_sound(SoundEvent::MUSIC_STOP);
            }
            if counter >= self.config.game_over_delay {
                ctx.emit_sound(SoundEvent::GAME_OVER);
                self.set_mode(ctx, GameMode::GameOver);
            }
        }
    }
}

impl Game for Platformer {
    fn config(&self) -> GameConfig {
        self.config.clone()
    }

    fn init(&mut self, ctx: &mut EngineContext) -> Result<()> {
        self.registry = SpriteRegistry::from_manifest(&self.manifest)?;
        self.sheets = Some(EntitySheets::resolve(&self.registry)?);

        let start = self.config.start_map.clone();
        let map = self.loader.load(&start)?;
        let world = World::build(start, map, &self.registry, self.config.block_layer)?;

        ctx.scene.clear();
        if let Some(sheets) = &self.sheets {
            world.populate(&mut ctx.scene, sheets);
        }
        self.world = Some(world);
        self.spawn_player(&mut ctx.scene);

        self.mode = GameMode::MainMenu;
        ctx.emit_event(GameEvent {
            kind: GameEvent::MODE_CHANGED,
            a: self.mode.index(),
            ..Default::default()
        });
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputState) {
        if self.quit {
            return;
        }
        if input.quit_requested() {
            self.request_quit(ctx);
            return;
        }
        match self.mode {
            GameMode::MainMenu | GameMode::GameOver => self.menu_frame(ctx, input),
            GameMode::Paused => {
                if input.just_pressed(Action::Pause) {
                    self.set_mode(ctx, GameMode::Playing);
                }
            }
            GameMode::Transitioning => self.transition_frame(ctx),
            GameMode::Playing => self.play_frame(ctx, input),
        }
    }

    fn render(&self, ctx: &mut RenderContext) {
        let out = &mut ctx.render_buffer.instances;
        match self.mode {
            GameMode::MainMenu | GameMode::GameOver => {}
            GameMode::Transitioning => self.transition.render(out),
            GameMode::Playing | GameMode::Paused => {
                if let Some(world) = &self.world {
                    world.render(&self.camera, out);
                }
                build_entity_instances(ctx.scene, &self.camera, out);
                if let (Some(player), Some(sheets)) = (ctx.scene.player(), &self.sheets) {
                    let hit_points = player.player_data().map_or(0, |data| data.hit_points);
                    build_hud_instances(hit_points, &sheets.heart, out);
                }
            }
        }
    }

    fn wants_quit(&self) -> bool {
        self.quit
    }
}
