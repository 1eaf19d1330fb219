pub mod camera;
pub mod instance;
pub mod view;

pub use camera::{Camera2D, ZoomInput};
pub use instance::{RenderBuffer, RenderInstance};
pub use view::{Composite, ViewSnapshot};
