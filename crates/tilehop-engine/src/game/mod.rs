pub mod menu;
pub mod platformer;
pub mod transition;
pub mod world;
