//! Logical input snapshot.
//!
//! The host reports raw key codes; [`KeyBindings`] maps them to [`Action`]s and
//! [`InputState`] keeps the held set plus the previous update's set so game
//! code can ask for edge-triggered presses (pause, menu keys).

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::queue::InputEvent;

/// Logical actions the game understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Jump,
    ZoomIn,
    ZoomOut,
    Pause,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::Pause,
    ];

    fn bit(self) -> u16 {
        1 << self as u16
    }
}

/// Key code (DOM `keyCode`) to action table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyBindings {
    keys: HashMap<u32, Action>,
}

impl KeyBindings {
    pub fn new(pairs: impl IntoIterator<Item = (u32, Action)>) -> Self {
        Self {
            keys: pairs.into_iter().collect(),
        }
    }

    pub fn action(&self, key_code: u32) -> Option<Action> {
        self.keys.get(&key_code).copied()
    }

    pub fn bind(&mut self, key_code: u32, action: Action) {
        self.keys.insert(key_code, action);
    }
}

impl Default for KeyBindings {
    /// W/S/A/D, Space, G/H, Escape.
    fn default() -> Self {
        Self::new([
            (87, Action::Up),
            (83, Action::Down),
            (65, Action::Left),
            (68, Action::Right),
            (32, Action::Jump),
            (71, Action::ZoomIn),
            (72, Action::ZoomOut),
            (27, Action::Pause),
        ])
    }
}

/// Input snapshot handed to each game update.
///
/// Holds the actions held now and on the previous update, the last click of
/// the frame (screen pixels) and a sticky quit request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    held: u16,
    previous: u16,
    pointer: Option<Vec2>,
    quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Close out an update: the held set becomes the previous one and the click is consumed.
    pub fn end_frame(&mut self) {
        self.previous = self.held;
        self.pointer = None;
    }

    pub fn set(&mut self, action: Action, down: bool) {
        if down {
            self.held |= action.bit();
        } else {
            self.held &= !action.bit();
        }
    }

    /// Apply a host event, mapping keys through `bindings`. Returns the action a key mapped to.
    pub fn apply(&mut self, event: &InputEvent, bindings: &KeyBindings) -> Option<Action> {
        let (key_code, down) = match *event {
            InputEvent::KeyDown { key_code } => (key_code, true),
            InputEvent::KeyUp { key_code } => (key_code, false),
            InputEvent::PointerDown { x, y } => {
                self.pointer = Some(Vec2::new(x, y));
                return None;
            }
            InputEvent::Quit => {
                self.quit = true;
                return None;
            }
        };
        let action = bindings.action(key_code)?;
        self.set(action, down);
        Some(action)
    }

    pub fn held(&self, action: Action) -> bool {
        self.held & action.bit() != 0
    }

    /// Held now but not on the previous update.
    pub fn just_pressed(&self, action: Action) -> bool {
        self.held(action) && self.previous & action.bit() == 0
    }

    /// Click position of this frame, if any.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn click(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    /// Release everything, e.g. when focus is lost. A pending quit survives.
    pub fn release_all(&mut self) {
        self.held = 0;
        self.previous = 0;
        self.pointer = None;
    }
}
