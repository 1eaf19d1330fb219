use glam::Vec2;

use crate::api::types::Rect;
use crate::components::tilegrid::TILE_SIZE;

/// Zoomable 2D camera measured from its CENTER in world units.
///
/// The visible region is `screen / zoom` world units wide and is scaled back up
/// to the full screen when drawn. Following moves at a constant speed per
/// frame on each axis; it is not a lerp.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera2D {
    /// Camera center in world space.
    pub center: Vec2,
    /// Screen pixels per world unit.
    pub zoom: f32,
    /// Output viewport size in pixels.
    pub screen: Vec2,
    /// World units moved per frame toward the target, per axis.
    pub speed: f32,
    /// Zoom change per frame while a zoom input is held.
    pub zoom_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
}

/// Zoom input for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomInput {
    #[default]
    None,
    In,
    Out,
}

impl Camera2D {
    pub fn new(screen: Vec2, zoom: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            zoom,
            screen,
            speed: 2.0,
            zoom_step: 0.01,
            min_zoom: 1.0,
            max_zoom: 3.0,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_zoom_limits(mut self, step: f32, min: f32, max: f32) -> Self {
        self.zoom_step = step;
        self.min_zoom = min;
        self.max_zoom = max;
        self.zoom = self.zoom.clamp(min, max);
        self
    }

    /// Visible size in world units at the current zoom.
    pub fn view_size(&self) -> Vec2 {
        self.screen / self.zoom
    }

    /// Visible region in world units.
    pub fn view_rect(&self) -> Rect {
        let size = self.view_size();
        Rect::from_pos_size(self.center - size / 2.0, size)
    }

    /// Apply held zoom input, clamped to `[min_zoom, max_zoom]`.
    pub fn apply_zoom(&mut self, input: ZoomInput) {
        let delta = match input {
            ZoomInput::None => return,
            ZoomInput::In => self.zoom_step,
            ZoomInput::Out => -self.zoom_step,
        };
        self.zoom = (self.zoom + delta).clamp(self.min_zoom, self.max_zoom);
    }

    /// One frame of camera motion: zoom, step toward the middle of the
    /// followed tile, then clamp to the map.
    ///
    /// `target` is the top-left corner of the followed entity.
    pub fn update(&mut self, target: Vec2, map_size: Vec2, zoom: ZoomInput) {
        self.apply_zoom(zoom);
        let goal = target + Vec2::splat(TILE_SIZE / 2.0);
        self.center.x = step_toward(self.center.x, goal.x, self.speed);
        self.center.y = step_toward(self.center.y, goal.y, self.speed);
        self.clamp_to_map(map_size);
    }

    /// Keep the view inside the map. The lower bound is applied first and the
    /// upper bound last, so a view larger than the map hugs the far edge.
    pub fn clamp_to_map(&mut self, map_size: Vec2) {
        let half = self.view_size() / 2.0;
        if self.center.x < half.x {
            self.center.x = half.x;
        }
        if self.center.x > map_size.x - half.x {
            self.center.x = map_size.x - half.x;
        }
        if self.center.y < half.y {
            self.center.y = half.y;
        }
        if self.center.y > map_size.y - half.y {
            self.center.y = map_size.y - half.y;
        }
    }

    /// Jump straight to `center` with no easing or clamping.
    pub fn snap_to(&mut self, center: Vec2) {
        self.center = center;
    }

    /// Map a world point to screen pixels.
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.view_rect().pos()) * self.zoom
    }

    /// Map a screen pixel to a world point.
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen / self.zoom + self.view_rect().pos()
    }

    /// Whether any part of `rect` is inside the view.
    pub fn is_rect_visible(&self, rect: &Rect) -> bool {
        self.view_rect().overlaps(rect)
    }
}

/// Move `from` toward `to` by at most `speed`, landing exactly on `to` when close.
fn step_toward(from: f32, to: f32, speed: f32) -> f32 {
    let delta = to - from;
    if delta.abs() <= speed {
        to
    } else {
        from + speed * delta.signum()
    }
}
