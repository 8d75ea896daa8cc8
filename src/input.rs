use std::collections::HashSet;

use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Tracks keyboard state between frames.
///
/// Held keys are tracked only to tell a fresh press from an auto-repeat. Per
/// frame this records which keys went down for the first time (`pressed`) and
/// which repeated while held (`repeated`).
#[derive(Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_repeated: HashSet<KeyCode>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the end of each frame to reset per-frame state.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_repeated.clear();
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput { event, .. } = event
            && let PhysicalKey::Code(key) = event.physical_key
        {
            self.handle_key(key, event.state, event.repeat);
        }
    }

    /// Records a single key transition.
    pub fn handle_key(&mut self, key: KeyCode, state: ElementState, repeat: bool) {
        match state {
            ElementState::Pressed => {
                if repeat || self.keys_down.contains(&key) {
                    self.keys_repeated.insert(key);
                } else {
                    self.keys_pressed.insert(key);
                }
                self.keys_down.insert(key);
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
            }
        }
    }

    /// Returns true if the key went down this frame (ignores auto-repeat).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key went down or auto-repeated this frame.
    pub fn key_triggered(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key) || self.keys_repeated.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_press_is_pressed_not_repeated() {
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed, false);
        assert!(input.key_pressed(KeyCode::KeyW));
        assert!(input.key_triggered(KeyCode::KeyW));
    }

    #[test]
    fn auto_repeat_triggers_without_pressing() {
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed, false);
        input.begin_frame();
        input.handle_key(KeyCode::KeyW, ElementState::Pressed, true);

        assert!(!input.key_pressed(KeyCode::KeyW));
        assert!(input.key_triggered(KeyCode::KeyW));
    }

    #[test]
    fn held_key_without_repeat_flag_counts_as_repeat() {
        let mut input = Input::new();
        input.handle_key(KeyCode::KeyS, ElementState::Pressed, false);
        input.begin_frame();
        input.handle_key(KeyCode::KeyS, ElementState::Pressed, false);

        assert!(!input.key_pressed(KeyCode::KeyS));
        assert!(input.key_triggered(KeyCode::KeyS));
    }

    #[test]
    fn release_then_press_is_fresh_again() {
        let mut input = Input::new();
        input.handle_key(KeyCode::Escape, ElementState::Pressed, false);
        input.handle_key(KeyCode::Escape, ElementState::Released, false);
        input.begin_frame();
        assert!(!input.key_triggered(KeyCode::Escape));

        input.handle_key(KeyCode::Escape, ElementState::Pressed, false);
        assert!(input.key_pressed(KeyCode::Escape));
    }
}
