//! Per-kind frame updates: input, physics step, state selection and animation.
//!
//! Each entity kind has one update function. All of them end by copying the
//! animation frame and facing into the sprite, so rendering never looks at
//! behavior state.

use crate::api::types::{Facing, SoundEvent};
use crate::components::entity::{BehaviorState, Entity, EntityKind};
use crate::components::tilegrid::{TileQuery, TILE_SIZE};
use crate::core::physics::{WallResponse, GRAVITY};
use crate::input::state::{Action, InputState};
use crate::systems::collision::{die, squish, take_damage};

/// Horizontal acceleration per frame while a direction is held.
pub const WALK_ACCEL: f32 = 0.2;
/// Horizontal speed multiplier per frame with no direction held.
pub const FRICTION: f32 = 0.9;
/// Below this horizontal speed friction stops the player outright.
pub const STOP_THRESHOLD: f32 = 0.05;
pub const MAX_RUN_SPEED: f32 = 2.0;
pub const JUMP_VELOCITY: f32 = -3.5;
/// Upward kick on the first frame of the player's death.
pub const DEATH_HOP: f32 = -5.0;
pub const PLAYER_DYING_FRAMES: u32 = 100;
pub const ENEMY_DYING_FRAMES: u32 = 30;
pub const PATROL_SPEED: f32 = 1.0;
/// Frames between blink toggles while invulnerable.
pub const BLINK_PERIOD: u32 = 5;

/// True once a body's top edge reaches the last tile row of the map.
fn in_pit(entity: &Entity, map_height: f32) -> bool {
    entity.body.pos.y >= map_height - TILE_SIZE
}

/// Run-and-jump controls. Only called while alive.
fn apply_input(player: &mut Entity, input: &InputState, sounds: &mut Vec<SoundEvent>) {
    let body = &mut player.body;
    if input.held(Action::Left) {
        body.velocity.x -= WALK_ACCEL;
    } else if input.held(Action::Right) {
        body.velocity.x += WALK_ACCEL;
    } else {
        body.velocity.x *= FRICTION;
        if body.velocity.x.abs() < STOP_THRESHOLD {
            body.velocity.x = 0.0;
        }
    }
    body.velocity.x = body.velocity.x.clamp(-MAX_RUN_SPEED, MAX_RUN_SPEED);

    let EntityKind::Player(data) = &mut player.kind else {
        return;
    };
    let body = &mut player.body;
    let jump = input.held(Action::Jump);

    // A new jump needs a grounded frame with the button up.
    if body.on_ground && !jump {
        data.has_jumped = false;
    }
    if jump {
        if body.on_ground && !data.has_jumped {
            data.has_jumped = true;
            data.holding_jump = true;
            body.velocity.y = JUMP_VELOCITY;
            sounds.push(SoundEvent::JUMP);
        }
    } else {
        data.holding_jump = false;
    }

    if data.holding_jump && !body.on_ground {
        body.velocity.y -= GRAVITY / 2.0;
    }
}

/// Count down invulnerability and toggle the blink flag on its period.
fn tick_invulnerability(player: &mut Entity) {
    let Some(data) = player.player_data_mut() else {
        return;
    };
    if data.invulnerability == 0 {
        data.blink = false;
        return;
    }
    data.invulnerability -= 1;
    if data.blink_counter == 0 {
        data.blink = !data.blink;
        data.blink_counter = BLINK_PERIOD;
    } else {
        data.blink_counter -= 1;
    }
    if data.invulnerability == 0 {
        data.blink = false;
    }
}

/// Copy animation and facing into the sprite.
fn sync_sprite(entity: &mut Entity) {
    if let Some(col) = entity.animation.current_col() {
        entity.sprite.col = col;
    }
    entity.sprite.face(entity.facing);
}

fn face_along(entity: &mut Entity) -> bool {
    let vx = entity.body.velocity.x;
    if vx < 0.0 {
        entity.facing = Facing::Left;
    } else if vx > 0.0 {
        entity.facing = Facing::Right;
    }
    vx != 0.0
}

/// One frame of the player.
///
/// `map_height` is the map's pixel height; reaching its last row hurts.
pub fn update_player(
    player: &mut Entity,
    tiles: &impl TileQuery,
    map_height: f32,
    input: &InputState,
    sounds: &mut Vec<SoundEvent>,
) {
    if player.state == BehaviorState::Dead {
        player.state_counter += 1;
        return;
    }

    if player.state.is_terminal() {
        player.body.velocity.x = 0.0;
    } else {
        apply_input(player, input, sounds);
        if in_pit(player, map_height) {
            take_damage(player);
        }
        tick_invulnerability(player);
    }

    let falls_through = player.state.is_terminal();
    let report = player.body.step(tiles, WallResponse::Stop, falls_through);
    if report.landed {
        if let Some(data) = player.player_data_mut() {
            data.holding_jump = false;
        }
    }

    if player.state == BehaviorState::Dying {
        if player.state_counter == 0 {
            player.body.velocity.y = DEATH_HOP;
            sounds.push(SoundEvent::DEATH);
        }
        player.state_counter += 1;
        if player.state_counter >= PLAYER_DYING_FRAMES {
            player.enter_state(BehaviorState::Dead);
        }
    } else {
        let moving = face_along(player);
        let next = if player.body.velocity.y != 0.0 {
            BehaviorState::Jumping
        } else if moving {
            BehaviorState::Walking
        } else {
            BehaviorState::Standing
        };
        if !player.enter_state(next) {
            player.state_counter += 1;
        }
    }

    player.animation.tick();
    sync_sprite(player);
    let hidden = player.player_data().is_some_and(|data| data.blink);
    player.sprite.visible = !hidden && player.state != BehaviorState::Dead;
}

/// One frame of a patrolling enemy.
pub fn update_enemy(
    enemy: &mut Entity,
    tiles: &impl TileQuery,
    map_height: f32,
    sounds: &mut Vec<SoundEvent>,
) {
    match enemy.state {
        BehaviorState::Dead => return,
        BehaviorState::Dying => {
            enemy.state_counter += 1;
            if enemy.state_counter > ENEMY_DYING_FRAMES {
                enemy.enter_state(BehaviorState::Dead);
            }
        }
        _ => {
            enemy.state_counter += 1;
            enemy.body.velocity.x = enemy.facing.sign() * PATROL_SPEED;
            if in_pit(enemy, map_height) {
                squish(enemy, sounds);
            }
        }
    }

    let falls_through = enemy.state.is_terminal();
    enemy.body.step(tiles, WallResponse::Patrol, falls_through);

    if !enemy.state.is_terminal() {
        face_along(enemy);
    }
    enemy.animation.tick();
    sync_sprite(enemy);
}

/// One frame of a one-shot effect: play through, then die.
pub fn update_effect(effect: &mut Entity) {
    if effect.state == BehaviorState::Dead {
        return;
    }
    effect.state_counter += 1;
    effect.animation.tick();
    if effect.animation.finished {
        effect.enter_state(BehaviorState::Dead);
        return;
    }
    sync_sprite(effect);
}

/// Kill the player outright, bypassing hit points and invulnerability.
pub fn kill_player(player: &mut Entity) -> bool {
    if let Some(data) = player.player_data_mut() {
        data.hit_points = 0;
    }
    die(player)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::api::types::EntityId;
    use crate::components::sprite::{AtlasId, SpriteSheet};
    use crate::components::tilegrid::TileGrid;

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            atlas: AtlasId(0),
            row: 0.0,
            cell_span: 1.0,
            faces: Facing::Right,
        }
    }

    /// 10×6 room: walls on the sides, floor on the last solid row, a pit row below.
    fn room() -> TileGrid {
        TileGrid::from_ascii(
            &[
                "#........#",
                "#........#",
                "#........#",
                "#........#",
                "##########",
                "..........",
            ],
            TILE_SIZE,
        )
    }

    fn grounded_player() -> Entity {
        Entity::player(EntityId(1), Vec2::new(48.0, 48.0), &sheet())
    }

    fn hold(actions: &[Action]) -> InputState {
        let mut input = InputState::new();
        for &action in actions {
            input.set(action, true);
        }
        input
    }

    fn run(player: &mut Entity, grid: &TileGrid, input: &InputState, frames: u32) -> Vec<SoundEvent> {
        let mut sounds = Vec::new();
        let height = grid.pixel_size().y;
        for _ in 0..frames {
            update_player(player, grid, height, input, &mut sounds);
        }
        sounds
    }

    #[test]
    fn running_accelerates_to_the_cap() {
        let grid = room();
        let mut p = grounded_player();
        run(&mut p, &grid, &hold(&[Action::Right]), 20);
        assert_eq!(p.body.velocity.x, MAX_RUN_SPEED);
        assert_eq!(p.state, BehaviorState::Walking);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn friction_brings_the_player_to_rest() {
        let grid = room();
        let mut p = grounded_player();
        p.body.velocity.x = -1.0;
        run(&mut p, &grid, &InputState::new(), 60);
        assert_eq!(p.body.velocity.x, 0.0);
        assert_eq!(p.state, BehaviorState::Standing);
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn jump_needs_release_between_jumps() {
        let grid = room();
        let mut p = grounded_player();
        let jump = hold(&[Action::Jump]);

        let sounds = run(&mut p, &grid, &jump, 1);
        assert_eq!(sounds, vec![SoundEvent::JUMP]);
        assert_eq!(p.state, BehaviorState::Jumping);
        assert!(p.body.pos.y < 48.0);

        // Keep holding through the landing: no second jump.
        let sounds = run(&mut p, &grid, &jump, 120);
        assert!(sounds.is_empty());
        assert!(p.body.on_ground);
        assert_eq!(p.body.pos.y, 48.0);

        run(&mut p, &grid, &InputState::new(), 1);
        let sounds = run(&mut p, &grid, &jump, 1);
        assert_eq!(sounds, vec![SoundEvent::JUMP]);
    }

    #[test]
    fn holding_jump_goes_higher() {
        let grid = room();
        let apex = |hold_frames: u32| {
            let mut p = grounded_player();
            let mut sounds = Vec::new();
            let mut top = p.body.pos.y;
            for frame in 0..40 {
                let input = if frame < hold_frames {
                    hold(&[Action::Jump])
                } else {
                    InputState::new()
                };
                update_player(&mut p, &grid, 96.0, &input, &mut sounds);
                top = top.min(p.body.pos.y);
            }
            top
        };
        assert!(apex(30) < apex(1));
    }

    #[test]
    fn falling_into_the_pit_row_hurts() {
        let grid = TileGrid::from_ascii(&["....", "....", "....", "...."], TILE_SIZE);
        let mut p = Entity::player(EntityId(1), Vec2::new(16.0, 48.0), &sheet());
        let mut sounds = Vec::new();
        update_player(&mut p, &grid, 64.0, &InputState::new(), &mut sounds);
        let data = p.player_data().unwrap();
        assert_eq!(data.hit_points, 3);
        assert!(data.invulnerability > 0);
    }

    #[test]
    fn invulnerability_blinks_then_clears() {
        let grid = room();
        let mut p = grounded_player();
        take_damage(&mut p);
        let mut saw_hidden = false;
        for _ in 0..80 {
            run(&mut p, &grid, &InputState::new(), 1);
            saw_hidden |= !p.sprite.visible;
        }
        assert!(saw_hidden);
        assert!(p.sprite.visible);
        assert_eq!(p.player_data().unwrap().invulnerability, 0);
    }

    #[test]
    fn dying_player_hops_then_dies() {
        let grid = room();
        let mut p = grounded_player();
        assert!(kill_player(&mut p));

        let sounds = run(&mut p, &grid, &hold(&[Action::Right]), 1);
        assert_eq!(sounds, vec![SoundEvent::DEATH]);
        assert_eq!(p.body.velocity.x, 0.0);
        assert!(p.body.velocity.y < 0.0);

        let sounds = run(&mut p, &grid, &InputState::new(), PLAYER_DYING_FRAMES - 1);
        assert!(sounds.is_empty());
        assert_eq!(p.state, BehaviorState::Dead);
        assert!(!p.sprite.visible);
        // Dying bodies fall through the floor.
        assert!(p.body.pos.y > 64.0);
    }

    #[test]
    fn enemy_patrols_between_walls() {
        let grid = room();
        let mut e = Entity::enemy(EntityId(2), Vec2::new(96.0, 48.0), &sheet());
        let mut sounds = Vec::new();
        let mut saw_left = false;
        for _ in 0..200 {
            update_enemy(&mut e, &grid, 96.0, &mut sounds);
            assert!(e.body.pos.x >= 16.0 && e.body.pos.x <= 128.0, "x = {}", e.body.pos.x);
            assert_eq!(e.body.pos.y, 48.0);
            saw_left |= e.facing == Facing::Left;
        }
        assert!(saw_left);
        assert!(sounds.is_empty());
    }

    #[test]
    fn enemy_in_pit_is_squished_and_removed_later() {
        let grid = TileGrid::from_ascii(&["....", "....", "....", "...."], TILE_SIZE);
        let mut e = Entity::enemy(EntityId(2), Vec2::new(16.0, 48.0), &sheet());
        let mut sounds = Vec::new();
        update_enemy(&mut e, &grid, 64.0, &mut sounds);
        assert_eq!(e.state, BehaviorState::Dying);
        assert_eq!(sounds, vec![SoundEvent::SQUISH]);

        for _ in 0..ENEMY_DYING_FRAMES + 1 {
            update_enemy(&mut e, &grid, 64.0, &mut sounds);
        }
        assert_eq!(e.state, BehaviorState::Dead);
    }

    #[test]
    fn effect_plays_once_then_dies() {
        let mut fx = Entity::effect(EntityId(3), Vec2::new(40.0, 40.0), &sheet());
        let mut frames = 0;
        while fx.state != BehaviorState::Dead {
            update_effect(&mut fx);
            frames += 1;
            assert!(frames < 100);
        }
        // Six frames, each held for five ticks.
        assert_eq!(frames, 30);
    }
}
