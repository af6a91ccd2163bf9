//! Keyboard state tracking for edge-triggered key presses.
//!
//! `is_just_pressed(key)` is true only during the frame the key went down and is
//! cleared by `end_frame()`. The held set exists so OS auto-repeat of a key that
//! is still down does not fire again. The jump, music and overlay toggles all
//! read the edge so a held key fires exactly once.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Escape,
    Up,
    Down,
    P,
    F3,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        assert!(input.held.contains(&Key::Space));
        assert!(input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_key_up_clears_held() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.key_up(Key::Space);
        assert!(!input.held.contains(&Key::Space));
    }

    #[test]
    fn test_os_key_repeat_does_not_retrigger_after_end_frame() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        // Auto-repeat delivers another press while the key is still held.
        input.key_down(Key::Space);
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn test_release_then_press_triggers_again() {
        let mut input = InputState::new();
        input.key_down(Key::P);
        input.end_frame();
        input.key_up(Key::P);
        input.key_down(Key::P);
        assert!(input.is_just_pressed(Key::P));
    }

    #[test]
    fn test_key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::P);
        assert!(input.held.is_empty());
        assert!(!input.is_just_pressed(Key::P));
    }

    #[test]
    fn test_end_frame_clears_transient_state() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Space);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Up));
        assert!(!input.is_just_pressed(Key::Space));
        // Held state persists across frames.
        assert!(input.held.contains(&Key::Up));
        assert!(input.held.contains(&Key::Space));
    }

    #[test]
    fn test_multiple_keys_independent() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::P);
        input.key_up(Key::Up);
        assert!(!input.held.contains(&Key::Up));
        assert!(input.held.contains(&Key::P));
        assert!(input.is_just_pressed(Key::P));
    }

    #[test]
    fn test_default_state_is_empty() {
        let input = InputState::new();
        for key in [Key::Space, Key::Escape, Key::Up, Key::Down, Key::P, Key::F3] {
            assert!(!input.is_just_pressed(key));
        }
        assert!(input.held.is_empty());
    }
}
