use iced::keyboard::{Key, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    TakeSnippet,
    ReadFile,
}

impl ShortcutAction {
    pub fn all() -> &'static [ShortcutAction] {
        &[ShortcutAction::TakeSnippet, ShortcutAction::ReadFile]
    }

    pub fn key(&self) -> char {
        match self {
            ShortcutAction::TakeSnippet => 'S',
            ShortcutAction::ReadFile => 'F',
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutAction::TakeSnippet => "New snippet",
            ShortcutAction::ReadFile => "Read image file",
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|action| action.key().eq_ignore_ascii_case(&c))
    }
}

/// Maps a key press in the main window to its action. Presses combined with
/// Ctrl, Alt or the logo key never match, and nothing matches while shortcuts
/// are disabled.
pub fn action_for_key(key: &Key, modifiers: Modifiers, disabled: bool) -> Option<ShortcutAction> {
    if disabled || modifiers.control() || modifiers.alt() || modifiers.logo() {
        return None;
    }
    match key.as_ref() {
        Key::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => ShortcutAction::from_char(c),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Help text listing every shortcut, e.g. `S: New snippet`.
pub fn describe_shortcuts() -> String {
    ShortcutAction::all()
        .iter()
        .map(|action| format!("{}: {}", action.key(), action.display_name()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use iced::keyboard::key::Named;

    fn character(c: &str) -> Key {
        Key::Character(c.into())
    }

    #[test]
    fn letters_map_to_actions_in_either_case() {
        for (text, expected) in [
            ("s", ShortcutAction::TakeSnippet),
            ("S", ShortcutAction::TakeSnippet),
            ("f", ShortcutAction::ReadFile),
            ("F", ShortcutAction::ReadFile),
        ] {
            assert_eq!(
                action_for_key(&character(text), Modifiers::empty(), false),
                Some(expected)
            );
        }
    }

    #[test]
    fn shift_is_allowed_but_other_modifiers_are_not() {
        let key = character("S");
        assert_eq!(
            action_for_key(&key, Modifiers::SHIFT, false),
            Some(ShortcutAction::TakeSnippet)
        );
        assert_eq!(action_for_key(&key, Modifiers::CTRL, false), None);
        assert_eq!(action_for_key(&key, Modifiers::ALT, false), None);
        assert_eq!(action_for_key(&key, Modifiers::LOGO, false), None);
    }

    #[test]
    fn disabled_shortcuts_never_match() {
        assert_eq!(action_for_key(&character("s"), Modifiers::empty(), true), None);
        assert_eq!(action_for_key(&character("f"), Modifiers::empty(), true), None);
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(action_for_key(&character("x"), Modifiers::empty(), false), None);
        assert_eq!(action_for_key(&character("sf"), Modifiers::empty(), false), None);
        assert_eq!(
            action_for_key(&Key::Named(Named::Enter), Modifiers::empty(), false),
            None
        );
    }

    #[test]
    fn help_lists_every_shortcut() {
        let help = describe_shortcuts();
        assert!(help.contains("S: New snippet"));
        assert!(help.contains("F: Read image file"));
    }
}
