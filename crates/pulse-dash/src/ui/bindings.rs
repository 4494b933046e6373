//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and key mapping logic.

use nannou::prelude::*;

/// Volume change per arrow key press, in percent
pub const VOLUME_STEP: i32 = 5;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    ShowHelp,
    HideHelp,
    /// Stop playback and pulse emission
    Stop,
    /// Change volume by a percent delta
    Volume(i32),
}

/// Parse a key into an action based on current mode
pub fn parse_key(key: Key, help_visible: bool) -> Option<Action> {
    // Global quit key
    if key == Key::Q {
        return Some(Action::Quit);
    }

    if help_visible && key == Key::Escape {
        return Some(Action::HideHelp);
    }

    match key {
        Key::H => Some(Action::ShowHelp),
        Key::S => Some(Action::Stop),
        Key::Up => Some(Action::Volume(VOLUME_STEP)),
        Key::Down => Some(Action::Volume(-VOLUME_STEP)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(parse_key(Key::Q, true), Some(Action::Quit));
        assert_eq!(parse_key(Key::S, false), Some(Action::Stop));
        assert_eq!(parse_key(Key::Down, false), Some(Action::Volume(-5)));
        assert_eq!(parse_key(Key::Escape, true), Some(Action::HideHelp));
        assert_eq!(parse_key(Key::Escape, false), None);
        assert_eq!(parse_key(Key::Space, false), None);
    }
}
