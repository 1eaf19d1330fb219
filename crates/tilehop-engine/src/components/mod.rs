pub mod animation;
pub mod entity;
pub mod sprite;
pub mod tilegrid;
pub mod tilemap;
