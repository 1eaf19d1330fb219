//! Screen transitions between maps.
//!
//! `Idle -> Compositing -> Scrolling -> Committed`. Beginning a transition
//! loads and builds the destination without touching live state, then
//! freezes a tiles-only view of both maps. Each tick afterwards slides the
//! window one step; once the far edge has been shown the next tick hands the
//! destination back as an [`Arrival`] for the caller to commit.

use glam::Vec2;

use crate::api::types::Direction;
use crate::assets::registry::SpriteRegistry;
use crate::components::tilegrid::TILE_SIZE;
use crate::error::Result;
use crate::game::world::World;
use crate::map::data::ExitMarker;
use crate::map::loader::MapLoader;
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::RenderInstance;
use crate::renderer::view::{Composite, ViewSnapshot};

/// Pixels the window moves per tick.
pub const DEFAULT_STEP: f32 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Destination loaded and both views captured; nothing shown yet.
    Compositing,
    /// Window has moved `counter` pixels.
    Scrolling { counter: f32 },
    /// Arrival handed out; waiting for [`Transition::reset`].
    Committed,
}

/// The destination, ready to become the live map.
#[derive(Debug, Clone)]
pub struct Arrival {
    pub world: World,
    pub dir: Direction,
    /// Player top-left in the new map.
    pub landing: Vec2,
    /// Camera center that frames the landing spot, already clamped.
    pub camera_center: Vec2,
}

pub struct Transition {
    phase: Phase,
    step: f32,
    composite: Option<Composite>,
    pending: Option<Arrival>,
}

impl Transition {
    pub fn new(step: f32) -> Self {
        Self {
            phase: Phase::Idle,
            step: if step > 0.0 { step } else { DEFAULT_STEP },
            composite: None,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, Phase::Compositing | Phase::Scrolling { .. })
    }

    /// Load `exit.dest` and prepare the composite of `current` (as `camera`
    /// sees it) and the destination framed on its landing spot.
    ///
    /// On error nothing changes and the transition stays idle.
    pub fn begin(
        &mut self,
        exit: &ExitMarker,
        current: &World,
        camera: &Camera2D,
        loader: &dyn MapLoader,
        registry: &SpriteRegistry,
        block_layer: usize,
    ) -> Result<()> {
        let map = loader.load(&exit.dest)?;
        let world = World::build(exit.dest.clone(), map, registry, block_layer)?;
        self.phase = Phase::Compositing;

        let landing = world.landing(exit.dir);
        let mut next_camera = camera.clone();
        next_camera.snap_to(landing + Vec2::splat(TILE_SIZE / 2.0));
        next_camera.clamp_to_map(world.pixel_size());

        let old = ViewSnapshot::capture(&current.layers, camera);
        let new = ViewSnapshot::capture(&world.layers, &next_camera);
        self.composite = Some(Composite::new(old, new, exit.dir));
        log::info!(
            "transition {} from '{}' to '{}'",
            exit.dir.as_str(),
            current.id,
            world.id
        );
        self.pending = Some(Arrival {
            world,
            dir: exit.dir,
            landing,
            camera_center: next_camera.center,
        });
        Ok(())
    }

    /// One tick. Returns the arrival on the tick after the far edge was shown.
    pub fn advance(&mut self) -> Option<Arrival> {
        let limit = self.composite.as_ref().map_or(0.0, Composite::scroll_limit);
        match self.phase {
            Phase::Idle | Phase::Committed => None,
            Phase::Compositing => {
                self.phase = Phase::Scrolling { counter: 0.0 };
                None
            }
            Phase::Scrolling { counter } if counter >= limit => {
                self.phase = Phase::Committed;
                self.composite = None;
                self.pending.take()
            }
            Phase::Scrolling { counter } => {
                self.phase = Phase::Scrolling {
                    counter: (counter + self.step).min(limit),
                };
                None
            }
        }
    }

    /// Emit the current window. Nothing is drawn outside Scrolling.
    pub fn render(&self, out: &mut Vec<RenderInstance>) {
        if let (Phase::Scrolling { counter }, Some(composite)) = (self.phase, &self.composite) {
            composite.frame_at(counter, out);
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.composite = None;
        self.pending = None;
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(DEFAULT_STEP)
    }
}
