//! Translation from winit key codes and buttons to engine input ids.

use winit::event::MouseButton;
use winit::keyboard::KeyCode;
use zebes_core::input::{Key, MouseBtn};

pub fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::F1 => Some(Key::F1),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::KeyE => Some(Key::E),
        _ => None,
    }
}

pub fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_keys_are_mapped() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::KeyQ), Some(Key::Q));
        assert_eq!(map_key(KeyCode::KeyE), Some(Key::E));
        assert_eq!(map_key(KeyCode::F1), Some(Key::F1));
        assert_eq!(map_key(KeyCode::NumpadEnter), Some(Key::Enter));
    }

    #[test]
    fn test_unmapped_inputs() {
        assert_eq!(map_key(KeyCode::KeyZ), None);
        assert_eq!(map_mouse_button(MouseButton::Back), None);
        assert_eq!(map_mouse_button(MouseButton::Middle), Some(MouseBtn::Middle));
    }
}
