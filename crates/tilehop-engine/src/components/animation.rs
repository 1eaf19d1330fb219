//! Animation component for sprite strips.
//!
//! Each behavior state owns a strip of consecutive atlas columns and a delay
//! threshold in frames. Frame advance is independent of state transitions:
//! the behavior system picks the strip, this component only counts frames.

use std::collections::HashMap;

use crate::components::entity::BehaviorState;

/// Definition of a single animation strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDef {
    /// First atlas column of the strip.
    pub start_col: f32,
    /// Number of frames in the strip.
    pub frame_count: u32,
    /// Frames to wait before advancing; the frame advances once the counter exceeds it.
    pub delay: u32,
    /// Whether to wrap around when reaching the end.
    pub looping: bool,
}

impl AnimationDef {
    /// A single still frame.
    pub fn still(col: f32) -> Self {
        Self {
            start_col: col,
            frame_count: 1,
            delay: 0,
            looping: true,
        }
    }

    /// A looping strip of consecutive columns.
    pub fn strip(start_col: f32, frame_count: u32, delay: u32) -> Self {
        Self {
            start_col,
            frame_count,
            delay,
            looping: true,
        }
    }

    /// A strip that stops on its last frame.
    pub fn once(start_col: f32, frame_count: u32, delay: u32) -> Self {
        Self {
            looping: false,
            ..Self::strip(start_col, frame_count, delay)
        }
    }
}

/// Animation state for an entity.
#[derive(Debug, Clone, Default)]
pub struct AnimationComponent {
    /// Strip for each behavior state.
    pub clips: HashMap<BehaviorState, AnimationDef>,
    /// Behavior whose strip is playing.
    pub current: BehaviorState,
    /// Current frame within the strip.
    pub frame_index: u32,
    /// Frames counted toward the next advance.
    pub delay_counter: u32,
    /// Set once a non-looping strip reaches its last frame.
    pub finished: bool,
}

impl AnimationComponent {
    pub fn new(clips: impl IntoIterator<Item = (BehaviorState, AnimationDef)>, current: BehaviorState) -> Self {
        Self {
            clips: clips.into_iter().collect(),
            current,
            ..Default::default()
        }
    }

    /// Switch strips, restarting from frame 0 only if the behavior changed.
    pub fn play_if_different(&mut self, state: BehaviorState) {
        if self.current != state {
            self.current = state;
            self.frame_index = 0;
            self.delay_counter = 0;
            self.finished = false;
        }
    }

    pub fn current_def(&self) -> Option<&AnimationDef> {
        self.clips.get(&self.current)
    }

    /// Atlas column of the frame currently shown.
    pub fn current_col(&self) -> Option<f32> {
        self.current_def()
            .map(|def| def.start_col + self.frame_index as f32)
    }

    /// Advance by one game frame. Returns true if the shown frame changed.
    pub fn tick(&mut self) -> bool {
        let Some(def) = self.clips.get(&self.current).copied() else {
            return false;
        };
        if def.frame_count <= 1 || self.finished {
            return false;
        }

        self.delay_counter += 1;
        if self.delay_counter <= def.delay {
            return false;
        }
        self.delay_counter = 0;
        self.frame_index += 1;

        if self.frame_index >= def.frame_count {
            if def.looping {
                self.frame_index = 0;
            } else {
                self.frame_index = def.frame_count - 1;
                self.finished = true;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_after_delay_is_exceeded() {
        let mut anim = AnimationComponent::new(
            [(BehaviorState::Walking, AnimationDef::strip(0.0, 2, 2))],
            BehaviorState::Walking,
        );
        assert!(!anim.tick());
        assert!(!anim.tick());
        assert!(anim.tick());
        assert_eq!(anim.frame_index, 1);
        assert_eq!(anim.current_col(), Some(1.0));

        for _ in 0..3 {
            anim.tick();
        }
        assert_eq!(anim.frame_index, 0, "looping strip wraps modulo frame count");
    }

    #[test]
    fn non_looping_strip_finishes_on_last_frame() {
        let mut anim = AnimationComponent::new(
            [(BehaviorState::Exploding, AnimationDef::once(0.0, 3, 0))],
            BehaviorState::Exploding,
        );
        for _ in 0..10 {
            anim.tick();
        }
        assert!(anim.finished);
        assert_eq!(anim.frame_index, 2);
    }

    #[test]
    fn still_frames_never_advance() {
        let mut anim = AnimationComponent::new(
            [(BehaviorState::Jumping, AnimationDef::still(3.0))],
            BehaviorState::Jumping,
        );
        for _ in 0..50 {
            assert!(!anim.tick());
        }
        assert_eq!(anim.current_col(), Some(3.0));
    }

    #[test]
    fn play_if_different_resets_only_on_change() {
        let mut anim = AnimationComponent::new(
            [
                (BehaviorState::Walking, AnimationDef::strip(0.0, 4, 0)),
                (BehaviorState::Dying, AnimationDef::still(4.0)),
            ],
            BehaviorState::Walking,
        );
        anim.tick();
        anim.play_if_different(BehaviorState::Walking);
        assert_eq!(anim.frame_index, 1);

        anim.play_if_different(BehaviorState::Dying);
        assert_eq!(anim.frame_index, 0);
        assert_eq!(anim.current_col(), Some(4.0));
    }
}
