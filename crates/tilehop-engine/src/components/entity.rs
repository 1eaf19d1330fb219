use glam::Vec2;

use crate::api::types::{EntityId, Facing, Rect};
use crate::components::animation::{AnimationComponent, AnimationDef};
use crate::components::sprite::{SpriteComponent, SpriteSheet};
use crate::components::tilegrid::TILE_SIZE;
use crate::core::physics::KinematicBody;

/// Hit points a fresh player starts with.
pub const PLAYER_HIT_POINTS: u8 = 4;

/// Behavioral state shared by every entity kind.
///
/// Players and enemies move through `Standing`/`Walking`/`Jumping` freely and
/// end in `Dying` then `Dead`. Effects go `Exploding` then `Dead`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BehaviorState {
    #[default]
    Standing,
    Walking,
    Jumping,
    Dying,
    Dead,
    Exploding,
}

impl BehaviorState {
    /// Dying or Dead. Entities in these states never come back to life.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Dying | Self::Dead)
    }
}

/// Player-only fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerData {
    pub hit_points: u8,
    /// Frames of damage immunity left.
    pub invulnerability: u32,
    /// Frames until the blink flag toggles again.
    pub blink_counter: u32,
    /// Sprite hidden this frame.
    pub blink: bool,
    /// A jump was started and the button has not been released on the ground since.
    pub has_jumped: bool,
    /// Jump button still held after takeoff.
    pub holding_jump: bool,
}

impl Default for PlayerData {
    fn default() -> Self {
        Self {
            hit_points: PLAYER_HIT_POINTS,
            invulnerability: 0,
            blink_counter: 0,
            blink: false,
            has_jumped: false,
            holding_jump: false,
        }
    }
}

/// Closed set of entity kinds. Only the player carries extra fields.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Player(PlayerData),
    Enemy,
    Effect,
}

/// Shared entity shape. Behavior lives in free functions under `systems`.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub body: KinematicBody,
    pub facing: Facing,
    pub state: BehaviorState,
    /// Frames elapsed since entering `state`.
    pub state_counter: u32,
    pub sprite: SpriteComponent,
    pub animation: AnimationComponent,
    pub kind: EntityKind,
}

impl Entity {
    /// A player at `pos` (top-left corner), facing right, standing.
    pub fn player(id: EntityId, pos: Vec2, sheet: &SpriteSheet) -> Self {
        let clips = [
            (BehaviorState::Standing, AnimationDef::still(0.0)),
            (BehaviorState::Walking, AnimationDef::strip(0.0, 2, 15)),
            (BehaviorState::Jumping, AnimationDef::still(3.0)),
            (BehaviorState::Dying, AnimationDef::still(4.0)),
            (BehaviorState::Dead, AnimationDef::still(4.0)),
        ];
        let mut body = KinematicBody::new(pos, Vec2::splat(TILE_SIZE));
        // A fresh player may jump before its first landing.
        body.on_ground = true;
        Self::build(
            id,
            body,
            BehaviorState::Standing,
            sheet,
            clips,
            EntityKind::Player(PlayerData::default()),
        )
    }

    /// A patrolling enemy at `pos`, facing right, walking.
    pub fn enemy(id: EntityId, pos: Vec2, sheet: &SpriteSheet) -> Self {
        let clips = [
            (BehaviorState::Walking, AnimationDef::strip(0.0, 4, 8)),
            (BehaviorState::Dying, AnimationDef::still(4.0)),
            (BehaviorState::Dead, AnimationDef::still(4.0)),
        ];
        Self::build(
            id,
            KinematicBody::new(pos, Vec2::splat(TILE_SIZE)),
            BehaviorState::Walking,
            sheet,
            clips,
            EntityKind::Enemy,
        )
    }

    /// A 32×32 explosion centered on a 16×16 entity whose top-left is `origin`.
    pub fn effect(id: EntityId, origin: Vec2, sheet: &SpriteSheet) -> Self {
        let clips = [(BehaviorState::Exploding, AnimationDef::once(0.0, 6, 4))];
        let pos = origin - Vec2::splat(TILE_SIZE / 2.0);
        Self::build(
            id,
            KinematicBody::new(pos, Vec2::splat(TILE_SIZE * 2.0)),
            BehaviorState::Exploding,
            sheet,
            clips,
            EntityKind::Effect,
        )
    }

    fn build(
        id: EntityId,
        body: KinematicBody,
        state: BehaviorState,
        sheet: &SpriteSheet,
        clips: impl IntoIterator<Item = (BehaviorState, AnimationDef)>,
        kind: EntityKind,
    ) -> Self {
        let animation = AnimationComponent::new(clips, state);
        let mut sprite = SpriteComponent::from_sheet(sheet);
        sprite.col = animation.current_col().unwrap_or(0.0);
        let mut entity = Self {
            id,
            body,
            facing: Facing::Right,
            state,
            state_counter: 0,
            sprite,
            animation,
            kind,
        };
        entity.sprite.face(entity.facing);
        entity
    }

    /// Move to `next`, restarting the state counter.
    ///
    /// Returns false (and changes nothing) when already in `next`, or when the
    /// move would bring a Dying/Dead entity back to a living state or a Dead
    /// entity back to Dying.
    pub fn enter_state(&mut self, next: BehaviorState) -> bool {
        if self.state == next {
            return false;
        }
        let revives = self.state.is_terminal() && !next.is_terminal();
        let undies = self.state == BehaviorState::Dead && next == BehaviorState::Dying;
        if revives || undies {
            log::debug!("entity {:?} ignored {:?} -> {:?}", self.id, self.state, next);
            return false;
        }
        self.state = next;
        self.state_counter = 0;
        self.animation.play_if_different(next);
        true
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn player_data(&self) -> Option<&PlayerData> {
        match &self.kind {
            EntityKind::Player(data) => Some(data),
            _ => None,
        }
    }

    pub fn player_data_mut(&mut self) -> Option<&mut PlayerData> {
        match &mut self.kind {
            EntityKind::Player(data) => Some(data),
            _ => None,
        }
    }
}
