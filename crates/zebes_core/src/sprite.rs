use serde::{Deserialize, Serialize};

/// One frame of a sprite: a rectangle in the source texture plus how it is
/// drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub index: i32,
    pub texture_x: i32,
    pub texture_y: i32,
    pub texture_w: i32,
    pub texture_h: i32,
    pub render_w: i32,
    pub render_h: i32,
    /// Ticks the frame is held before the animator advances.
    pub frames_per_cycle: i32,
    #[serde(default)]
    pub offset_x: i32,
    #[serde(default)]
    pub offset_y: i32,
}

impl SpriteFrame {
    /// Normalized `(u0, v0, u1, v1)` of this frame inside a texture of the
    /// given size. Degenerate textures map to the full unit square.
    pub fn uv(&self, texture_w: u32, texture_h: u32) -> (f32, f32, f32, f32) {
        if texture_w == 0 || texture_h == 0 {
            return (0.0, 0.0, 1.0, 1.0);
        }
        let tw = texture_w as f32;
        let th = texture_h as f32;
        (
            self.texture_x as f32 / tw,
            self.texture_y as f32 / th,
            (self.texture_x + self.texture_w) as f32 / tw,
            (self.texture_y + self.texture_h) as f32 / th,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprite {
    pub id: String,
    pub name: String,
    pub texture_id: String,
    #[serde(default)]
    pub frames: Vec<SpriteFrame>,
}

impl Sprite {
    /// Slice a texture region into a `columns` x `rows` grid of equally sized
    /// frames, row-major.
    pub fn grid_frames(
        columns: i32,
        rows: i32,
        frame_w: i32,
        frame_h: i32,
        frames_per_cycle: i32,
    ) -> Vec<SpriteFrame> {
        let mut frames = Vec::new();
        for row in 0..rows.max(0) {
            for col in 0..columns.max(0) {
                frames.push(SpriteFrame {
                    index: row * columns + col,
                    texture_x: col * frame_w,
                    texture_y: row * frame_h,
                    texture_w: frame_w,
                    texture_h: frame_h,
                    render_w: frame_w,
                    render_h: frame_h,
                    frames_per_cycle,
                    offset_x: 0,
                    offset_y: 0,
                });
            }
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uv_normalizes_frame_rect() {
        let frame = SpriteFrame {
            texture_x: 16,
            texture_y: 0,
            texture_w: 16,
            texture_h: 32,
            ..SpriteFrame::default()
        };
        assert_eq!(frame.uv(64, 32), (0.25, 0.0, 0.5, 1.0));
        assert_eq!(frame.uv(0, 32), (0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn grid_frames_are_row_major() {
        let frames = Sprite::grid_frames(3, 2, 8, 10, 6);
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[4].index, 4);
        assert_eq!((frames[4].texture_x, frames[4].texture_y), (8, 10));
        assert!(frames.iter().all(|f| f.frames_per_cycle == 6));
    }

    #[test]
    fn offsets_are_optional_in_json() {
        let json = r#"{
            "index": 0, "texture_x": 0, "texture_y": 0, "texture_w": 4,
            "texture_h": 4, "render_w": 8, "render_h": 8, "frames_per_cycle": 2
        }"#;
        let frame: SpriteFrame = serde_json::from_str(json).expect("parse");
        assert_eq!(frame.offset_x, 0);
        assert_eq!(frame.render_w, 8);
    }
}
