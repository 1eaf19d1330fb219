pub mod behavior;
pub mod collision;
pub mod render;
