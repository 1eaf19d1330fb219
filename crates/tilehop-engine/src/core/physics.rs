//! Kinematic bodies moving through a tile grid.
//!
//! No rigid-body solver here: each frame a body gets gravity, then each axis is
//! checked against the tiles at the *proposed* position and the velocity is
//! zeroed (or reversed) before the move is applied. Speeds stay below one tile
//! per frame, so checking the destination is enough to rule out tunneling.
//!
//! Axes are applied in order, horizontal first, so the vertical samples already
//! see the new X and a diagonal move cannot clip a tile corner.

use glam::Vec2;

use crate::api::types::Rect;
use crate::components::tilegrid::{TileQuery, TILE_SIZE};

/// Downward acceleration per frame.
pub const GRAVITY: f32 = 0.2;
/// Maximum downward speed per frame.
pub const TERMINAL_VELOCITY: f32 = 4.0;
/// How far ahead of its leading edge a patroller looks for ground.
pub const CLIFF_LOOKAHEAD: f32 = 2.0;

/// How a body reacts when its horizontal move is blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallResponse {
    /// Zero horizontal velocity (player).
    Stop,
    /// Reverse horizontal velocity at walls and at ledges (patrolling enemy).
    Patrol,
}

/// What happened during one [`KinematicBody::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// Ground was found directly beneath the body before moving.
    pub supported: bool,
    /// A wall stopped horizontal motion.
    pub blocked: bool,
    /// A patroller turned around.
    pub reversed: bool,
    /// A ceiling stopped upward motion.
    pub bumped_head: bool,
    /// The body landed and was snapped onto the grid.
    pub landed: bool,
}

/// Position, velocity and ground contact of an axis-aligned box. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
}

impl KinematicBody {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            velocity: Vec2::ZERO,
            size,
            on_ground: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Run one frame: gravity, horizontal resolution and move, then vertical
    /// resolution and move. With `falls_through` set, downward resolution is
    /// skipped and the body drops through floors.
    pub fn step(
        &mut self,
        tiles: &impl TileQuery,
        response: WallResponse,
        falls_through: bool,
    ) -> StepReport {
        let supported = self.apply_gravity(tiles);
        let (blocked, reversed) = self.resolve_horizontal(tiles, response, supported);
        self.pos.x += self.velocity.x;

        let bumped_head = self.resolve_up(tiles);
        let landed = !falls_through && self.resolve_down(tiles);
        self.pos.y += self.velocity.y;

        StepReport {
            supported,
            blocked,
            reversed,
            bumped_head,
            landed,
        }
    }

    /// Accelerate downward unless a solid or platform tile sits under the body.
    /// Returns whether the body is supported.
    pub fn apply_gravity(&mut self, tiles: &impl TileQuery) -> bool {
        let below = self.pos.y + self.velocity.y + self.size.y;
        let supported = self
            .column_samples()
            .iter()
            .any(|&x| tiles.tile_at_xy(x, below).supports());
        if !supported {
            self.on_ground = false;
            self.velocity.y = (self.velocity.y + GRAVITY).min(TERMINAL_VELOCITY);
        }
        supported
    }

    /// Check the leading edge at the proposed X. Returns `(blocked, reversed)`.
    pub fn resolve_horizontal(
        &mut self,
        tiles: &impl TileQuery,
        response: WallResponse,
        supported: bool,
    ) -> (bool, bool) {
        if self.velocity.x == 0.0 {
            return (false, false);
        }
        let blocked = self.wall_ahead(tiles, self.velocity.x);

        match response {
            WallResponse::Stop => {
                if blocked {
                    self.velocity.x = 0.0;
                }
                (blocked, false)
            }
            WallResponse::Patrol => {
                let cliff = supported && self.cliff_ahead(tiles, self.velocity.x);
                if !(blocked || cliff) {
                    return (false, false);
                }
                self.velocity.x = -self.velocity.x;
                // Boxed in on both sides: stand still rather than walk into the wall.
                if self.wall_ahead(tiles, self.velocity.x) {
                    self.velocity.x = 0.0;
                }
                (blocked, true)
            }
        }
    }

    /// Zero upward velocity if the top edge would enter a solid tile.
    pub fn resolve_up(&mut self, tiles: &impl TileQuery) -> bool {
        if self.velocity.y >= 0.0 {
            return false;
        }
        let top = self.pos.y + self.velocity.y;
        let hit = self
            .column_samples()
            .iter()
            .any(|&x| tiles.tile_at_xy(x, top).solid);
        if hit {
            self.velocity.y = 0.0;
        }
        hit
    }

    /// Land on a solid or platform tile below: snap onto the grid, stop, mark grounded.
    pub fn resolve_down(&mut self, tiles: &impl TileQuery) -> bool {
        if self.velocity.y <= 0.0 {
            return false;
        }
        let below = self.pos.y + self.velocity.y + self.size.y;
        let hit = self
            .column_samples()
            .iter()
            .any(|&x| tiles.tile_at_xy(x, below).supports());
        if !hit {
            return false;
        }
        // Rest on top of the row that was hit. After a step onto a ledge this
        // lifts the body out of the sub-pixel overlap instead of pushing it in.
        self.pos.y = (below / TILE_SIZE).floor() * TILE_SIZE - self.size.y;
        self.velocity.y = 0.0;
        self.on_ground = true;
        true
    }

    /// True if any solid tile overlaps the body's box.
    pub fn embedded_in_solid(&self, tiles: &impl TileQuery) -> bool {
        let rows = [self.pos.y, self.pos.y + self.size.y / 2.0, self.pos.y + self.size.y - 1.0];
        self.column_samples()
            .iter()
            .any(|&x| rows.iter().any(|&y| tiles.tile_at_xy(x, y).solid))
    }

    fn wall_ahead(&self, tiles: &impl TileQuery, vx: f32) -> bool {
        let lead = if vx < 0.0 {
            self.pos.x + vx
        } else {
            self.pos.x + vx + self.size.x - 1.0
        };
        self.row_samples()
            .iter()
            .any(|&y| tiles.tile_at_xy(lead, y).solid)
    }

    fn cliff_ahead(&self, tiles: &impl TileQuery, vx: f32) -> bool {
        let ahead = if vx < 0.0 {
            self.pos.x + vx - CLIFF_LOOKAHEAD
        } else {
            self.pos.x + vx + self.size.x + CLIFF_LOOKAHEAD
        };
        let under = self.pos.y + self.size.y + 1.0;
        !tiles.tile_at_xy(ahead, under).supports()
    }

    /// Left edge, center, right edge (last pixel inside the box).
    fn column_samples(&self) -> [f32; 3] {
        [
            self.pos.x,
            self.pos.x + self.size.x / 2.0,
            self.pos.x + self.size.x - 1.0,
        ]
    }

    /// Top edge, middle, bottom minus one pixel.
    fn row_samples(&self) -> [f32; 3] {
        [
            self.pos.y,
            self.pos.y + self.size.y / 2.0,
            self.pos.y + self.size.y - 1.0,
        ]
    }
}
