//! Keyboard shortcut decoding.
//!
//! Maps raw key events to logical editor actions. Ctrl and Cmd are one
//! modifier flag so the mapping is OS-agnostic.

use serde::{Deserialize, Serialize};

/// Logical editor shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shortcut {
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
}

impl Shortcut {
    /// Decode a key press. `ctrl_or_cmd` is Ctrl on Linux/Windows, Cmd on
    /// macOS; without it nothing here matches.
    pub fn from_key(key: char, ctrl_or_cmd: bool) -> Option<Self> {
        if !ctrl_or_cmd {
            return None;
        }
        match key.to_ascii_lowercase() {
            'c' => Some(Shortcut::Copy),
            'v' => Some(Shortcut::Paste),
            'x' => Some(Shortcut::Cut),
            'z' => Some(Shortcut::Undo),
            'y' => Some(Shortcut::Redo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_with_modifier() {
        assert_eq!(Shortcut::from_key('c', true), Some(Shortcut::Copy));
        assert_eq!(Shortcut::from_key('V', true), Some(Shortcut::Paste));
        assert_eq!(Shortcut::from_key('x', true), Some(Shortcut::Cut));
        assert_eq!(Shortcut::from_key('z', true), Some(Shortcut::Undo));
        assert_eq!(Shortcut::from_key('y', true), Some(Shortcut::Redo));
    }

    #[test]
    fn test_requires_modifier() {
        assert_eq!(Shortcut::from_key('c', false), None);
        assert_eq!(Shortcut::from_key('q', true), None);
    }
}
