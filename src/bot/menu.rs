//! Main reply keyboard.
//!
//! Captions come from the locale files, and a caption typed or tapped in
//! either language is recognised regardless of the user's own language.

use teloxide::types::{KeyboardButton, KeyboardMarkup};

use crate::localization::LocalizationManager;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Applications,
    Inbox,
    Search,
    Filters,
    ConnectionOrder,
    TechnicalOrder,
    Staff,
    Monitoring,
    Export,
    Help,
}

impl MenuAction {
    pub const ALL: [MenuAction; 10] = [
        MenuAction::Applications,
        MenuAction::Inbox,
        MenuAction::Search,
        MenuAction::Filters,
        MenuAction::ConnectionOrder,
        MenuAction::TechnicalOrder,
        MenuAction::Staff,
        MenuAction::Monitoring,
        MenuAction::Export,
        MenuAction::Help,
    ];

    pub fn caption_key(self) -> &'static str {
        match self {
            MenuAction::Applications => "menu-applications",
            MenuAction::Inbox => "menu-inbox",
            MenuAction::Search => "menu-search",
            MenuAction::Filters => "menu-filters",
            MenuAction::ConnectionOrder => "menu-connection-order",
            MenuAction::TechnicalOrder => "menu-technical-order",
            MenuAction::Staff => "menu-staff",
            MenuAction::Monitoring => "menu-monitoring",
            MenuAction::Export => "menu-export",
            MenuAction::Help => "menu-help",
        }
    }

    /// Match `text` against the captions of every supported language
    pub fn parse(text: &str, loc: &LocalizationManager) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|action| {
            loc.languages()
                .into_iter()
                .any(|lang| loc.get_message_in_language(action.caption_key(), lang, None) == text)
        })
    }
}

pub fn main_menu_keyboard(loc: &LocalizationManager, lang: &str) -> KeyboardMarkup {
    let buttons: Vec<KeyboardButton> = MenuAction::ALL
        .iter()
        .map(|action| KeyboardButton::new(loc.get_message_in_language(action.caption_key(), lang, None)))
        .collect();

    KeyboardMarkup::new(buttons.chunks(2).map(|row| row.to_vec())).resize_keyboard()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captions_parse_in_both_languages() {
        let loc = LocalizationManager::new().unwrap();
        for action in MenuAction::ALL {
            for lang in ["uz", "ru"] {
                let caption = loc.get_message_in_language(action.caption_key(), lang, None);
                assert_eq!(MenuAction::parse(&caption, &loc), Some(action), "{}", caption);
            }
        }
        assert_eq!(MenuAction::parse("hello", &loc), None);
    }

    #[test]
    fn test_menu_has_two_columns() {
        let loc = LocalizationManager::new().unwrap();
        let markup = main_menu_keyboard(&loc, "uz");
        assert_eq!(markup.keyboard.len(), 5);
        assert!(markup.keyboard.iter().all(|row| row.len() == 2));
    }
}
