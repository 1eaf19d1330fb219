use glam::Vec2;

use crate::components::entity::{BehaviorState, Entity};
use crate::components::sprite::{SpriteComponent, SpriteSheet};
use crate::components::tilemap::TilemapComponent;
use crate::core::scene::Scene;
use crate::renderer::camera::Camera2D;
use crate::renderer::instance::RenderInstance;

/// Top-left of the first HUD heart, in screen pixels.
pub const HUD_ORIGIN: Vec2 = Vec2::new(16.0, 16.0);
/// Horizontal distance between HUD hearts, in screen pixels.
pub const HUD_SPACING: f32 = 16.0;

/// Emit every tile layer the camera can see, bottom layer first.
pub fn build_tile_instances(
    layers: &[TilemapComponent],
    camera: &Camera2D,
    out: &mut Vec<RenderInstance>,
) {
    for layer in layers {
        layer.build_visible_instances(camera, out);
    }
}

fn push_entity(entity: &Entity, camera: &Camera2D, out: &mut Vec<RenderInstance>) {
    if !entity.sprite.visible || entity.state == BehaviorState::Dead {
        return;
    }
    if !camera.is_rect_visible(&entity.rect()) {
        return;
    }
    let screen = camera.world_to_screen(entity.body.pos);
    out.push(RenderInstance::from_sprite(&entity.sprite, screen, camera.zoom));
}

/// Emit entities in draw order: enemies, the player, then effects on top.
/// Hidden, dead and off-screen entities are skipped.
pub fn build_entity_instances(scene: &Scene, camera: &Camera2D, out: &mut Vec<RenderInstance>) {
    for enemy in scene.enemies() {
        push_entity(enemy, camera, out);
    }
    if let Some(player) = scene.player() {
        push_entity(player, camera, out);
    }
    for effect in scene.effects() {
        push_entity(effect, camera, out);
    }
}

/// One heart per remaining hit point, left to right, unscaled.
pub fn build_hud_instances(hit_points: u8, heart: &SpriteSheet, out: &mut Vec<RenderInstance>) {
    let sprite = SpriteComponent::from_sheet(heart);
    for i in 0..hit_points {
        let screen = HUD_ORIGIN + Vec2::new(i as f32 * HUD_SPACING, 0.0);
        out.push(RenderInstance::from_sprite(&sprite, screen, 1.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{EntityId, Facing};
    use crate::components::sprite::AtlasId;

    fn sheet(atlas: u32) -> SpriteSheet {
        SpriteSheet {
            atlas: AtlasId(atlas),
            row: 0.0,
            cell_span: 1.0,
            faces: Facing::Right,
        }
    }

    fn camera() -> Camera2D {
        let mut camera = Camera2D::new(Vec2::new(160.0, 160.0), 1.0);
        camera.snap_to(Vec2::new(80.0, 80.0));
        camera
    }

    #[test]
    fn entities_draw_enemies_then_player_then_effects() {
        let mut scene = Scene::new();
        let id = scene.next_id();
        scene.spawn(Entity::effect(id, Vec2::new(40.0, 40.0), &sheet(3)));
        let id = scene.next_id();
        scene.spawn(Entity::player(id, Vec2::new(10.0, 10.0), &sheet(1)));
        let id = scene.next_id();
        scene.spawn(Entity::enemy(id, Vec2::new(20.0, 20.0), &sheet(2)));

        let mut out = Vec::new();
        build_entity_instances(&scene, &camera(), &mut out);
        let atlases: Vec<f32> = out.iter().map(|i| i.atlas).collect();
        assert_eq!(atlases, vec![2.0, 1.0, 3.0]);
        assert_eq!((out[1].x, out[1].y), (10.0, 10.0));
    }

    #[test]
    fn hidden_and_offscreen_entities_are_skipped() {
        let mut scene = Scene::new();
        let id = scene.next_id();
        let mut player = Entity::player(id, Vec2::new(10.0, 10.0), &sheet(1));
        player.sprite.visible = false;
        scene.spawn(player);
        let id = scene.next_id();
        scene.spawn(Entity::enemy(id, Vec2::new(500.0, 20.0), &sheet(2)));

        let mut out = Vec::new();
        build_entity_instances(&scene, &camera(), &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn hud_shows_one_heart_per_hit_point() {
        let mut out = Vec::new();
        build_hud_instances(3, &sheet(4), &mut out);
        assert_eq!(out.len(), 3);
        assert_eq!((out[0].x, out[0].y), (16.0, 16.0));
        assert_eq!(out[2].x, 48.0);
        assert!(out.iter().all(|i| i.scale == 1.0));

        out.clear();
        build_hud_instances(0, &sheet(4), &mut out);
        assert!(out.is_empty());
    }
}
