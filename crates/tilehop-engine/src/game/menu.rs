//! Full-screen menus: two title lines and two clickable buttons.
//!
//! The engine does not draw text. A [`Menu`] serializes to JSON so the host
//! can render it; clicks come back as screen positions.

use glam::Vec2;
use serde::Serialize;

use crate::api::types::Rect;

pub const BUTTON_SIZE: Vec2 = Vec2::new(200.0, 50.0);
/// Label inset from a button's left edge.
pub const LABEL_INSET: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuChoice {
    Begin,
    Quit,
    TryAgain,
    EndIt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuText {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuButton {
    pub label: MenuText,
    pub rect: Rect,
    pub choice: MenuChoice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Menu {
    pub titles: Vec<MenuText>,
    pub buttons: Vec<MenuButton>,
}

impl Menu {
    pub fn main(screen: Vec2) -> Self {
        Self::layout(
            screen,
            ["NOT MARIO", "A Game To Play"],
            [("Begin", MenuChoice::Begin), ("Quit", MenuChoice::Quit)],
        )
    }

    pub fn game_over(screen: Vec2) -> Self {
        Self::layout(
            screen,
            ["WHAT DID YOU DO", "P.S. Lost the Game"],
            [("Try Again", MenuChoice::TryAgain), ("End It", MenuChoice::EndIt)],
        )
    }

    fn layout(screen: Vec2, titles: [&str; 2], buttons: [(&str, MenuChoice); 2]) -> Self {
        let title_pos = [
            Vec2::new(screen.x / 3.0, screen.y / 9.0),
            Vec2::new(screen.x / 3.2, screen.y / 6.0),
        ];
        let button_pos = [
            Vec2::new(screen.x / 3.0, screen.y / 3.0),
            Vec2::new(screen.x / 3.0, screen.y / 2.0),
        ];
        let text = |text: &str, pos: Vec2| MenuText {
            text: text.to_string(),
            x: pos.x,
            y: pos.y,
        };
        Self {
            titles: titles
                .iter()
                .zip(title_pos)
                .map(|(t, pos)| text(*t, pos))
                .collect(),
            buttons: buttons
                .iter()
                .zip(button_pos)
                .map(|(&(label, choice), pos)| MenuButton {
                    label: text(label, pos + Vec2::new(LABEL_INSET, 0.0)),
                    rect: Rect::from_pos_size(pos, BUTTON_SIZE),
                    choice,
                })
                .collect(),
        }
    }

    /// The button under a click, if any.
    pub fn click(&self, pos: Vec2) -> Option<MenuChoice> {
        self.buttons
            .iter()
            .find(|b| b.rect.contains(pos))
            .map(|b| b.choice)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(640.0, 480.0);

    #[test]
    fn main_menu_layout() {
        let menu = Menu::main(SCREEN);
        assert_eq!(menu.titles[0].text, "NOT MARIO");
        assert_eq!((menu.titles[1].x, menu.titles[1].y), (200.0, 80.0));
        assert_eq!(menu.buttons[0].rect.y, 160.0);
        assert_eq!(menu.buttons[1].rect.y, 240.0);
        assert_eq!(menu.buttons[1].rect.w, 200.0);
    }

    #[test]
    fn clicks_hit_buttons() {
        let menu = Menu::game_over(SCREEN);
        let x = 640.0 / 3.0 + 10.0;
        assert_eq!(menu.click(Vec2::new(x, 170.0)), Some(MenuChoice::TryAgain));
        assert_eq!(menu.click(Vec2::new(x, 250.0)), Some(MenuChoice::EndIt));
        assert_eq!(menu.click(Vec2::new(x, 220.0)), None);
        assert_eq!(menu.click(Vec2::new(10.0, 170.0)), None);
    }

    #[test]
    fn serializes_for_the_host() {
        let json = Menu::main(SCREEN).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["buttons"][0]["choice"], "begin");
        assert_eq!(value["buttons"][1]["label"]["text"], "Quit");
        assert_eq!(value["titles"][0]["text"], "NOT MARIO");
    }
}
