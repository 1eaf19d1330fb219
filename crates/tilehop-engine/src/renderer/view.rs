//! Screen-sized views and the two-view composite used by screen transitions.
//!
//! A view is a list of screen-space instances captured once. The composite
//! lays two views out side by side (or stacked) and a screen-sized window
//! slides across it; each frame only the instances under the window are
//! emitted, shifted into screen space.

use glam::Vec2;

use crate::api::types::{Direction, Rect};
use crate::components::tilegrid::TILE_SIZE;
use crate::components::tilemap::TilemapComponent;
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::RenderInstance;

/// A frozen, screen-sized picture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewSnapshot {
    pub size: Vec2,
    pub instances: Vec<RenderInstance>,
}

impl ViewSnapshot {
    /// Capture the tile layers as `camera` sees them. Sprites are not included.
    pub fn capture(layers: &[TilemapComponent], camera: &Camera2D) -> Self {
        let mut instances = Vec::new();
        for layer in layers {
            layer.build_visible_instances(camera, &mut instances);
        }
        Self {
            size: camera.screen,
            instances,
        }
    }
}

/// Two snapshots placed next to each other in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    dir: Direction,
    first: ViewSnapshot,
    second: ViewSnapshot,
    screen: Vec2,
}

impl Composite {
    /// Arrange `old` and `new` so sliding the window in `dir` reveals `new`.
    ///
    /// Right: old | new. Left: new | old. Down: old over new. Up: new over old.
    pub fn new(old: ViewSnapshot, new: ViewSnapshot, dir: Direction) -> Self {
        let screen = old.size;
        let (first, second) = match dir {
            Direction::Right | Direction::Down => (old, new),
            Direction::Left | Direction::Up => (new, old),
        };
        Self {
            dir,
            first,
            second,
            screen,
        }
    }

    pub fn direction(&self) -> Direction {
        self.dir
    }

    /// Double width for horizontal travel, double height for vertical.
    pub fn size(&self) -> Vec2 {
        if self.dir.is_horizontal() {
            Vec2::new(self.screen.x * 2.0, self.screen.y)
        } else {
            Vec2::new(self.screen.x, self.screen.y * 2.0)
        }
    }

    /// Distance the window travels from the old view to the new one.
    pub fn scroll_limit(&self) -> f32 {
        if self.dir.is_horizontal() {
            self.screen.x
        } else {
            self.screen.y
        }
    }

    /// Top-left of the window after scrolling `counter` pixels.
    pub fn window_origin(&self, counter: f32) -> Vec2 {
        let c = counter.clamp(0.0, self.scroll_limit());
        match self.dir {
            Direction::Right => Vec2::new(c, 0.0),
            Direction::Left => Vec2::new(self.screen.x - c, 0.0),
            Direction::Down => Vec2::new(0.0, c),
            Direction::Up => Vec2::new(0.0, self.screen.y - c),
        }
    }

    fn second_offset(&self) -> Vec2 {
        if self.dir.is_horizontal() {
            Vec2::new(self.screen.x, 0.0)
        } else {
            Vec2::new(0.0, self.screen.y)
        }
    }

    /// Emit what the window shows after scrolling `counter` pixels.
    pub fn frame_at(&self, counter: f32, out: &mut Vec<RenderInstance>) {
        let origin = self.window_origin(counter);
        let screen = Rect::from_pos_size(Vec2::ZERO, self.screen);
        let views = [
            (&self.first, -origin),
            (&self.second, self.second_offset() - origin),
        ];
        for (view, shift) in views {
            for inst in &view.instances {
                let moved = inst.offset(shift);
                let extent = TILE_SIZE * moved.span * moved.scale;
                let bounds = Rect::new(moved.x, moved.y, extent, extent);
                if screen.overlaps(&bounds) {
                    out.push(moved);
                }
            }
        }
    }
}
