//! Tick-based sprite animation.
//!
//! Each `update()` is one tick. A frame is held for its `frames_per_cycle`
//! ticks before the animator moves on; the last frame wraps to the first.
//! Frames with a non-positive `frames_per_cycle` advance every tick.

use crate::error::{Result, ZebesError};
use crate::sprite::{Sprite, SpriteFrame};

#[derive(Debug, Clone, Default)]
pub struct Animator {
    sprite: Option<Sprite>,
    frame_index: usize,
    tick: i32,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start animating `sprite` from its first frame.
    pub fn set_sprite(&mut self, sprite: Sprite) {
        self.sprite = Some(sprite);
        self.frame_index = 0;
        self.tick = 0;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn sprite(&self) -> Option<&Sprite> {
        self.sprite.as_ref()
    }

    /// True when a sprite with at least one frame is loaded.
    pub fn is_active(&self) -> bool {
        self.sprite.as_ref().is_some_and(|s| !s.frames.is_empty())
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn update(&mut self) {
        let Some(sprite) = &self.sprite else {
            return;
        };
        let Some(frame) = sprite.frames.get(self.frame_index) else {
            return;
        };
        self.tick += 1;
        if self.tick >= frame.frames_per_cycle {
            self.tick = 0;
            self.frame_index = (self.frame_index + 1) % sprite.frames.len();
        }
    }

    pub fn current_frame(&self) -> Result<&SpriteFrame> {
        let sprite = self
            .sprite
            .as_ref()
            .ok_or_else(|| ZebesError::failed_precondition("No sprite set."))?;
        sprite.frames.get(self.frame_index).ok_or_else(|| {
            ZebesError::failed_precondition(format!("Sprite '{}' has no frames.", sprite.name))
        })
    }
}
