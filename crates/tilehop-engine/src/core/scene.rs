use crate::api::types::EntityId;
use crate::components::entity::{BehaviorState, Entity, EntityKind};

/// Entity storage for the active map.
///
/// The player lives in its own slot so systems can borrow it alongside the
/// enemy list. Enemies and effects are flat Vecs; dead entries are compacted
/// out once per frame, never in the middle of an iteration.
pub struct Scene {
    player: Option<Entity>,
    enemies: Vec<Entity>,
    effects: Vec<Entity>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::with_capacity(64)
    }

    /// Create a scene with a specific enemy capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            player: None,
            enemies: Vec::with_capacity(capacity),
            effects: Vec::with_capacity(capacity / 2),
            next_id: 1,
        }
    }

    /// Hand out a fresh entity id. Ids are never reused within a scene.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add an entity, routing it by kind. A spawned player replaces the old one.
    pub fn spawn(&mut self, entity: Entity) {
        match entity.kind {
            EntityKind::Player(_) => self.player = Some(entity),
            EntityKind::Enemy => self.enemies.push(entity),
            EntityKind::Effect => self.effects.push(entity),
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.player.as_ref()
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.player.as_mut()
    }

    pub fn enemies(&self) -> &[Entity] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Entity] {
        &mut self.enemies
    }

    pub fn effects(&self) -> &[Entity] {
        &self.effects
    }

    pub fn effects_mut(&mut self) -> &mut [Entity] {
        &mut self.effects
    }

    /// Player and enemy list borrowed together for the collision pass.
    pub fn player_and_enemies_mut(&mut self) -> (Option<&mut Entity>, &mut [Entity]) {
        (self.player.as_mut(), &mut self.enemies)
    }

    /// Iterate over all entities: player, enemies, effects.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.player
            .iter()
            .chain(self.enemies.iter())
            .chain(self.effects.iter())
    }

    /// Drop enemies and effects that reached `Dead`. The player is kept
    /// regardless; its death is handled by the game flow.
    pub fn compact(&mut self) -> usize {
        let before = self.enemies.len() + self.effects.len();
        self.enemies.retain(|e| e.state != BehaviorState::Dead);
        self.effects.retain(|e| e.state != BehaviorState::Dead);
        let removed = before - self.enemies.len() - self.effects.len();
        if removed > 0 {
            log::debug!("scene: removed {removed} dead entities");
        }
        removed
    }

    /// Forget everything except the player, ready for another map.
    pub fn clear_for_new_map(&mut self) {
        self.enemies.clear();
        self.effects.clear();
    }

    /// Clear all entities, player included.
    pub fn clear(&mut self) {
        self.player = None;
        self.clear_for_new_map();
    }

    /// Number of entities in the scene.
    pub fn len(&self) -> usize {
        self.player.iter().count() + self.enemies.len() + self.effects.len()
    }

    /// Whether the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::Facing;
    use crate::components::sprite::{AtlasId, SpriteSheet};
    use glam::Vec2;

    fn sheet() -> SpriteSheet {
        SpriteSheet {
            atlas: AtlasId(0),
            row: 0.0,
            cell_span: 1.0,
            faces: Facing::Right,
        }
    }

    #[test]
    fn spawn_routes_by_kind() {
        let mut scene = Scene::new();
        let p = scene.next_id();
        let e = scene.next_id();
        scene.spawn(Entity::player(p, Vec2::new(10.0, 20.0), &sheet()));
        scene.spawn(Entity::enemy(e, Vec2::ZERO, &sheet()));
        assert_eq!(scene.player().unwrap().id, p);
        assert_eq!(scene.enemies().len(), 1);
        assert!(scene.iter().any(|entity| entity.id == e));
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn ids_are_unique() {
        let mut scene = Scene::new();
        let a = scene.next_id();
        let b = scene.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn compact_removes_only_dead() {
        let mut scene = Scene::new();
        for _ in 0..3 {
            let id = scene.next_id();
            scene.spawn(Entity::enemy(id, Vec2::ZERO, &sheet()));
        }
        let id = scene.next_id();
        scene.spawn(Entity::effect(id, Vec2::ZERO, &sheet()));

        scene.enemies_mut()[1].enter_state(BehaviorState::Dying);
        scene.enemies_mut()[1].enter_state(BehaviorState::Dead);
        scene.effects_mut()[0].enter_state(BehaviorState::Dead);

        assert_eq!(scene.compact(), 2);
        assert_eq!(scene.enemies().len(), 2);
        assert!(scene.effects().is_empty());
    }

    #[test]
    fn clear_for_new_map_keeps_player() {
        let mut scene = Scene::new();
        let p = scene.next_id();
        scene.spawn(Entity::player(p, Vec2::ZERO, &sheet()));
        let e = scene.next_id();
        scene.spawn(Entity::enemy(e, Vec2::ZERO, &sheet()));
        scene.clear_for_new_map();
        assert!(scene.player().is_some());
        assert!(scene.enemies().is_empty());
    }
}
