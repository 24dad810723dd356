//! Keyboard state

use rustc_hash::FxHashSet;
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::player::MoveInput;

const LEFT: [KeyCode; 2] = [KeyCode::KeyA, KeyCode::ArrowLeft];
const RIGHT: [KeyCode; 2] = [KeyCode::KeyD, KeyCode::ArrowRight];
const UP: [KeyCode; 2] = [KeyCode::KeyW, KeyCode::ArrowUp];
const DOWN: [KeyCode; 2] = [KeyCode::KeyS, KeyCode::ArrowDown];

/// Input state manager
#[derive(Debug, Default)]
pub struct Input {
    /// Currently pressed keys
    pressed_keys: FxHashSet<KeyCode>,
    /// Keys that were just pressed this frame
    just_pressed_keys: FxHashSet<KeyCode>,
    /// Keys that were just released this frame
    just_released_keys: FxHashSet<KeyCode>,
}

impl Input {
    /// Create a new input manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the end of each frame to clear per-frame state
    pub fn update(&mut self) {
        self.just_pressed_keys.clear();
        self.just_released_keys.clear();
    }

    /// Process a keyboard event
    pub fn process_keyboard(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.pressed_keys.insert(key_code) {
                    self.just_pressed_keys.insert(key_code);
                }
            }
            ElementState::Released => {
                if self.pressed_keys.remove(&key_code) {
                    self.just_released_keys.insert(key_code);
                }
            }
        }
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Check if a key was just released this frame
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.just_released_keys.contains(&key)
    }

    fn any_pressed(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|&key| self.is_key_pressed(key))
    }

    /// Movement intent from WASD and the arrow keys
    ///
    /// Opposite keys held together cancel out on that axis.
    pub fn move_input(&self) -> MoveInput {
        let axis = |negative: bool, positive: bool| i8::from(positive) - i8::from(negative);
        MoveInput::new(
            axis(self.any_pressed(&LEFT), self.any_pressed(&RIGHT)),
            axis(self.any_pressed(&UP), self.any_pressed(&DOWN)),
        )
    }

    /// `R` went down this frame
    pub fn restart_requested(&self) -> bool {
        self.is_key_just_pressed(KeyCode::KeyR)
    }

    /// `Escape` went down this frame
    pub fn quit_requested(&self) -> bool {
        self.is_key_just_pressed(KeyCode::Escape)
    }

    /// `C` went down this frame
    pub fn cone_toggle_requested(&self) -> bool {
        self.is_key_just_pressed(KeyCode::KeyC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_lasts_one_frame() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(input.restart_requested());
        assert!(input.is_key_pressed(KeyCode::KeyR));

        input.update();
        // Key repeat does not count as a new press
        input.process_keyboard(KeyCode::KeyR, ElementState::Pressed);
        assert!(!input.restart_requested());
        assert!(input.is_key_pressed(KeyCode::KeyR));

        input.process_keyboard(KeyCode::KeyR, ElementState::Released);
        assert!(input.is_key_just_released(KeyCode::KeyR));
        assert!(!input.is_key_pressed(KeyCode::KeyR));
    }

    #[test]
    fn test_move_input_from_keys() {
        let mut input = Input::new();
        assert_eq!(input.move_input(), MoveInput::NONE);

        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        input.process_keyboard(KeyCode::ArrowUp, ElementState::Pressed);
        assert_eq!(input.move_input(), MoveInput::new(1, -1));

        input.process_keyboard(KeyCode::KeyA, ElementState::Pressed);
        assert_eq!(input.move_input(), MoveInput::new(0, -1));

        input.process_keyboard(KeyCode::ArrowUp, ElementState::Released);
        input.process_keyboard(KeyCode::KeyS, ElementState::Pressed);
        assert_eq!(input.move_input(), MoveInput::new(0, 1));
    }

    #[test]
    fn test_quit_and_toggle_keys() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyC, ElementState::Pressed);
        assert!(input.quit_requested());
        assert!(input.cone_toggle_requested());

        input.update();
        assert!(!input.quit_requested());
        assert!(!input.cone_toggle_requested());
    }
}
