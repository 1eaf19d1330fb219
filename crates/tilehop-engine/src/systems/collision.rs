//! Player-vs-enemy arbitration and the damage rules it triggers.

use glam::Vec2;

use crate::api::types::SoundEvent;
use crate::components::entity::{BehaviorState, Entity};

/// Horizontal knockback speed, applied away from the facing direction.
pub const KNOCKBACK_X: f32 = 4.0;
/// Vertical knockback speed (upward).
pub const KNOCKBACK_Y: f32 = -2.0;
/// Frames of damage immunity after a hit.
pub const INVULNERABILITY_FRAMES: u32 = 60;
/// Frames before the first blink toggle after a hit.
pub const BLINK_DELAY: u32 = 10;

/// What one arbiter pass decided.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArbiterOutcome {
    /// Top-left corners of stomped enemies; an effect is spawned at each.
    pub stomps: Vec<Vec2>,
    /// Damage was applied to the player this pass.
    pub damaged: bool,
}

/// Hurt the player once: knockback, invulnerability, blink timer, and death at
/// zero hit points. A no-op while invulnerable. Returns true if damage landed.
pub fn take_damage(player: &mut Entity) -> bool {
    let facing = player.facing;
    let Some(data) = player.player_data_mut() else {
        return false;
    };
    if data.invulnerability > 0 {
        return false;
    }
    data.hit_points = data.hit_points.saturating_sub(1);
    data.invulnerability = INVULNERABILITY_FRAMES;
    data.blink_counter = BLINK_DELAY;
    let dead = data.hit_points == 0;
    log::debug!("player hit, {} hp left", data.hit_points);

    player.body.velocity = Vec2::new(-facing.sign() * KNOCKBACK_X, KNOCKBACK_Y);
    if dead {
        die(player);
    }
    true
}

/// Start the death sequence. Entering Dying twice is refused by the state rules.
pub fn die(entity: &mut Entity) -> bool {
    entity.enter_state(BehaviorState::Dying)
}

/// Kill an enemy by stomp or pit: stop it and start its death timer.
pub fn squish(enemy: &mut Entity, sounds: &mut Vec<SoundEvent>) -> bool {
    if !die(enemy) {
        return false;
    }
    enemy.body.velocity = Vec2::ZERO;
    sounds.push(SoundEvent::SQUISH);
    true
}

/// Resolve every player/enemy overlap for this frame.
///
/// Skipped entirely while the player is Dying or Dead. Enemies already dying
/// are ignored. An overlap is a stomp when the player is above the enemy and
/// falling; anything else hurts the player, at most once per pass.
pub fn resolve_player_enemies(
    player: &mut Entity,
    enemies: &mut [Entity],
    sounds: &mut Vec<SoundEvent>,
) -> ArbiterOutcome {
    let mut outcome = ArbiterOutcome::default();
    if player.state.is_terminal() {
        return outcome;
    }

    let player_rect = player.rect();
    let falling = player.body.velocity.y > 0.0;
    let mut hit = false;

    for enemy in enemies.iter_mut() {
        if enemy.state.is_terminal() || !player_rect.overlaps(&enemy.rect()) {
            continue;
        }
        let above = player_rect.center().y < enemy.rect().center().y;
        if above && falling {
            if squish(enemy, sounds) {
                outcome.stomps.push(enemy.body.pos);
            }
        } else {
            hit = true;
        }
    }

    if hit {
        outcome.damaged = take_damage(player);
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EntityId, Facing};
    use crate::components::entity::PLAYER_HIT_POINTS;
    use crate::components::sprite::{AtlasId, SpriteSheet};

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            atlas: AtlasId(0),
            row: 0.0,
            cell_span: 1.0,
            faces: Facing::Right,
        }
    }

    fn player_at(x: f32, y: f32) -> Entity {
        Entity::player(EntityId(1), Vec2::new(x, y), &sheet())
    }

    fn enemy_at(id: u32, x: f32, y: f32) -> Entity {
        Entity::enemy(EntityId(id), Vec2::new(x, y), &sheet())
    }

    #[test]
    fn damage_knocks_back_away_from_facing() {
        let mut p = player_at(50.0, 50.0);
        assert!(take_damage(&mut p));
        let data = p.player_data().unwrap();
        assert_eq!(data.hit_points, 3);
        assert_eq!(data.invulnerability, 60);
        assert_eq!(p.body.velocity, Vec2::new(-4.0, -2.0));

        let mut p = player_at(50.0, 50.0);
        p.facing = Facing::Left;
        take_damage(&mut p);
        assert_eq!(p.body.velocity, Vec2::new(4.0, -2.0));
    }

    #[test]
    fn damage_is_idempotent_while_invulnerable() {
        let mut p = player_at(0.0, 0.0);
        assert!(take_damage(&mut p));
        assert!(!take_damage(&mut p));
        assert_eq!(p.player_data().unwrap().hit_points, PLAYER_HIT_POINTS - 1);
    }

    #[test]
    fn last_hit_point_starts_dying() {
        let mut p = player_at(0.0, 0.0);
        p.player_data_mut().unwrap().hit_points = 1;
        take_damage(&mut p);
        assert_eq!(p.player_data().unwrap().hit_points, 0);
        assert_eq!(p.state, BehaviorState::Dying);

        // Further hits never push hit points below zero or restart dying.
        p.player_data_mut().unwrap().invulnerability = 0;
        p.state_counter = 5;
        take_damage(&mut p);
        assert_eq!(p.player_data().unwrap().hit_points, 0);
        assert_eq!(p.state_counter, 5);
    }

    #[test]
    fn falling_onto_an_enemy_stomps_it() {
        let mut p = player_at(100.0, 90.0);
        p.body.velocity.y = 2.0;
        let mut enemies = vec![enemy_at(2, 104.0, 100.0)];
        let mut sounds = Vec::new();

        let outcome = resolve_player_enemies(&mut p, &mut enemies, &mut sounds);
        assert_eq!(outcome.stomps, vec![Vec2::new(104.0, 100.0)]);
        assert!(!outcome.damaged);
        assert_eq!(enemies[0].state, BehaviorState::Dying);
        assert_eq!(sounds, vec![SoundEvent::SQUISH]);
        assert_eq!(p.player_data().unwrap().hit_points, PLAYER_HIT_POINTS);
    }

    #[test]
    fn side_contact_hurts_once_for_many_enemies() {
        let mut p = player_at(100.0, 100.0);
        let mut enemies = vec![enemy_at(2, 110.0, 100.0), enemy_at(3, 92.0, 100.0)];
        let mut sounds = Vec::new();

        let outcome = resolve_player_enemies(&mut p, &mut enemies, &mut sounds);
        assert!(outcome.damaged);
        assert!(outcome.stomps.is_empty());
        assert_eq!(p.player_data().unwrap().hit_points, PLAYER_HIT_POINTS - 1);
    }

    #[test]
    fn dying_participants_are_ignored() {
        let mut p = player_at(100.0, 100.0);
        let mut enemies = vec![enemy_at(2, 100.0, 100.0)];
        enemies[0].enter_state(BehaviorState::Dying);
        let mut sounds = Vec::new();
        assert!(!resolve_player_enemies(&mut p, &mut enemies, &mut sounds).damaged);

        let mut enemies = vec![enemy_at(3, 100.0, 100.0)];
        p.enter_state(BehaviorState::Dying);
        let outcome = resolve_player_enemies(&mut p, &mut enemies, &mut sounds);
        assert_eq!(outcome, ArbiterOutcome::default());
        assert_eq!(enemies[0].state, BehaviorState::Walking);
    }
}
