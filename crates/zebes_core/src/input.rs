//! Keyboard and mouse state plus named action bindings.
//!
//! `InputState` tracks raw keys: `is_held` is level-triggered, `is_just_pressed`
//! and `is_just_released` are edge-triggered and cleared by `end_frame()`.
//! `ActionMap` maps action names ("PanUp", "ZoomIn", ...) onto one or more keys
//! so gameplay and editor code never test physical keys directly.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
    Enter,
    F1,
    W,
    A,
    S,
    D,
    Q,
    E,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Held and edge sets for one kind of button.
#[derive(Debug, Clone)]
struct ButtonSet<T> {
    held: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T> Default for ButtonSet<T> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }
}

impl<T: Copy + Eq + Hash> ButtonSet<T> {
    // Repeats of an already held button are not new presses.
    fn down(&mut self, b: T) {
        if self.held.insert(b) {
            self.pressed.insert(b);
        }
    }

    fn up(&mut self, b: T) {
        if self.held.remove(&b) {
            self.released.insert(b);
        }
    }

    fn release_all(&mut self) {
        self.released.extend(self.held.drain());
    }

    fn clear_edges(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: ButtonSet<Key>,
    mouse: ButtonSet<MouseBtn>,
    pub mouse_position: (f64, f64),
    quit_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.keys.down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys.up(key);
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        self.mouse.down(btn);
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.mouse.up(btn);
    }

    /// Drop every held key and button, e.g. when the window loses focus and
    /// release events will never arrive.
    pub fn release_all(&mut self) {
        self.keys.release_all();
        self.mouse.release_all();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.keys.pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.keys.released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse.held.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.mouse.pressed.contains(&btn)
    }

    pub fn is_mouse_just_released(&self, btn: MouseBtn) -> bool {
        self.mouse.released.contains(&btn)
    }

    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Clear the edge-triggered sets. Held state carries over.
    pub fn end_frame(&mut self) {
        self.keys.clear_edges();
        self.mouse.clear_edges();
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActionMap {
    bindings: HashMap<String, Vec<Key>>,
}

impl ActionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind_action(&mut self, action: &str, key: Key) {
        let keys = self.bindings.entry(action.to_string()).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    pub fn keys(&self, action: &str) -> &[Key] {
        self.bindings.get(action).map_or(&[], |keys| keys.as_slice())
    }

    pub fn is_action_active(&self, input: &InputState, action: &str) -> bool {
        self.keys(action).iter().any(|&k| input.is_held(k))
    }

    pub fn is_action_just_pressed(&self, input: &InputState, action: &str) -> bool {
        self.keys(action).iter().any(|&k| input.is_just_pressed(k))
    }
}
