use crate::api::types::Facing;

/// Identifies which texture atlas a sprite belongs to.
/// Index into the AssetManifest's atlas list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AtlasId(pub u32);

/// A horizontal strip of equally sized cells in an atlas, as declared in the
/// asset manifest. Entities are built from a sheet; they cannot exist without one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteSheet {
    pub atlas: AtlasId,
    /// Atlas row holding the strip.
    pub row: f32,
    /// Cells covered by one frame (1.0 for 16×16 frames, 2.0 for 32×32).
    pub cell_span: f32,
    /// The direction the artwork faces when drawn unmirrored.
    pub faces: Facing,
}

/// How an entity is drawn: its sheet, current frame and mirroring.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    /// Which atlas this sprite belongs to.
    pub atlas: AtlasId,
    /// Current frame along the sheet's strip, in frames.
    pub col: f32,
    /// Row in the atlas grid.
    pub row: f32,
    /// Cells covered by one frame (1.0 = single cell, 2.0 = 2x2 block).
    pub cell_span: f32,
    /// Mirror horizontally when drawn.
    pub flip_x: bool,
    /// Hidden sprites are skipped by the render system (invulnerability blink).
    pub visible: bool,
    faces: Facing,
}

impl SpriteComponent {
    pub fn from_sheet(sheet: &SpriteSheet) -> Self {
        Self {
            atlas: sheet.atlas,
            col: 0.0,
            row: sheet.row,
            cell_span: sheet.cell_span,
            flip_x: false,
            visible: true,
            faces: sheet.faces,
        }
    }

    /// Mirror the artwork when the entity looks away from the sheet's direction.
    pub fn face(&mut self, facing: Facing) {
        self.flip_x = facing != self.faces;
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            atlas: AtlasId(0),
            col: 0.0,
            row: 0.0,
            cell_span: 1.0,
            flip_x: false,
            visible: true,
            faces: Facing::Right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_only_when_facing_differs_from_sheet() {
        let sheet = SpriteSheet {
            atlas: AtlasId(2),
            row: 0.0,
            cell_span: 1.0,
            faces: Facing::Left,
        };
        let mut sprite = SpriteComponent::from_sheet(&sheet);
        sprite.face(Facing::Left);
        assert!(!sprite.flip_x);
        sprite.face(Facing::Right);
        assert!(sprite.flip_x);
        assert_eq!(sprite.atlas, AtlasId(2));
    }
}
