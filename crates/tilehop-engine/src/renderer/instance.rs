use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::components::sprite::SpriteComponent;

/// One screen-space sprite blit, read by the host renderer straight out of WASM memory.
/// 8 floats = 32 bytes stride.
///
/// The host copies the atlas cell at `(col, row)` spanning `span` cells to
/// `(x, y)`, scaled by `scale`, mirrored horizontally when `flip` is 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Left edge in screen pixels (rounded).
    pub x: f32,
    /// Top edge in screen pixels (rounded).
    pub y: f32,
    /// Screen pixels per source pixel.
    pub scale: f32,
    /// Cells covered by the source (1.0 = one 16×16 cell).
    pub span: f32,
    /// Atlas index.
    pub atlas: f32,
    /// Atlas column, in cells.
    pub col: f32,
    /// Atlas row, in cells.
    pub row: f32,
    /// 1.0 to mirror horizontally.
    pub flip: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// Instance for `sprite` with its top-left corner at `screen`. Sprite
    /// columns count frames, so they are widened by the frame span here.
    pub fn from_sprite(sprite: &SpriteComponent, screen: Vec2, scale: f32) -> Self {
        Self {
            x: screen.x.round(),
            y: screen.y.round(),
            scale,
            span: sprite.cell_span,
            atlas: sprite.atlas.0 as f32,
            col: sprite.col * sprite.cell_span,
            row: sprite.row,
            flip: if sprite.flip_x { 1.0 } else { 0.0 },
        }
    }

    /// Shifted copy, used when laying views side by side.
    pub fn offset(mut self, by: Vec2) -> Self {
        self.x += by.x;
        self.y += by.y;
        self
    }
}

/// Render buffer containing the sprite instances of one frame, in draw order.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn extend(&mut self, instances: impl IntoIterator<Item = RenderInstance>) {
        self.instances.extend(instances);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    /// The instances as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::sprite::AtlasId;

    #[test]
    fn render_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 32);
        assert_eq!(RenderInstance::FLOATS, 8);
    }

    #[test]
    fn sprite_positions_are_rounded() {
        let mut sprite = SpriteComponent::default();
        sprite.atlas = AtlasId(2);
        sprite.col = 3.0;
        sprite.flip_x = true;
        let inst = RenderInstance::from_sprite(&sprite, Vec2::new(10.4, 20.6), 1.5);
        assert_eq!((inst.x, inst.y), (10.0, 21.0));
        assert_eq!(inst.atlas, 2.0);
        assert_eq!(inst.flip, 1.0);
    }

    #[test]
    fn buffer_exposes_flat_floats() {
        let mut buf = RenderBuffer::new();
        buf.push(RenderInstance::default());
        buf.push(RenderInstance {
            x: 7.0,
            ..Default::default()
        });
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.as_floats().len(), 16);
        assert_eq!(buf.as_floats()[8], 7.0);
    }
}
