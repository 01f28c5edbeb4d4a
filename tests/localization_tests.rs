//! # Localization Tests
//!
//! Both locale files must define the same messages, and language detection
//! must fall back to the configured default.

use std::collections::BTreeSet;

use telecom_manager_bot::localization::{detect_language, t_args_lang, t_lang, LocalizationManager};

/// Message ids defined at the start of a line in an FTL file
fn message_ids(language: &str) -> BTreeSet<String> {
    let path = format!("{}/locales/{}/main.ftl", env!("CARGO_MANIFEST_DIR"), language);
    let source = std::fs::read_to_string(&path).expect("Failed to read locale file");
    source
        .lines()
        .filter(|line| !line.starts_with('#') && !line.starts_with(char::is_whitespace))
        .filter_map(|line| line.split_once(" = ").map(|(id, _)| id.trim().to_string()))
        .filter(|id| !id.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locales_define_the_same_messages() {
        let uz = message_ids("uz");
        let ru = message_ids("ru");
        assert!(uz.len() > 50);

        let only_uz: Vec<_> = uz.difference(&ru).collect();
        let only_ru: Vec<_> = ru.difference(&uz).collect();
        assert!(only_uz.is_empty(), "missing in ru: {:?}", only_uz);
        assert!(only_ru.is_empty(), "missing in uz: {:?}", only_ru);
    }

    #[test]
    fn test_every_message_resolves() {
        let manager = LocalizationManager::new().unwrap();
        for language in manager.languages() {
            for id in message_ids(language) {
                let text = manager.get_message_in_language(&id, language, None);
                assert!(!text.starts_with("Missing"), "{} in {}: {}", id, language, text);
            }
        }
    }

    #[test]
    fn test_missing_key_is_reported() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(
            manager.get_message_in_language("no-such-key", "uz", None),
            "Missing translation: no-such-key"
        );
    }

    #[test]
    fn test_detect_language() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(detect_language(&manager, Some("ru")), "ru");
        assert_eq!(detect_language(&manager, Some("ru-RU")), "ru");
        assert_eq!(detect_language(&manager, Some("uz_Latn")), "uz");
        assert_eq!(detect_language(&manager, Some("en")), "uz");
        assert_eq!(detect_language(&manager, None), "uz");
    }

    #[test]
    fn test_configured_default_language() {
        let manager = LocalizationManager::new()
            .unwrap()
            .with_default_language("ru")
            .unwrap();
        assert_eq!(manager.default_language(), "ru");
        assert_eq!(detect_language(&manager, Some("en")), "ru");
        assert_eq!(detect_language(&manager, Some("uz")), "uz");

        // Unknown languages read from the default bundle
        assert_eq!(
            manager.get_message_in_language("currency", "de", None),
            "сум"
        );

        assert!(LocalizationManager::new()
            .unwrap()
            .with_default_language("en")
            .is_err());
    }

    #[test]
    fn test_arguments_are_substituted() {
        let manager = LocalizationManager::new().unwrap();
        assert_eq!(
            t_args_lang(&manager, "filter-applied", &[("count", "3")], Some("uz")),
            "Topildi: 3"
        );
        assert_eq!(
            t_args_lang(&manager, "filter-applied", &[("count", "7")], Some("ru-RU")),
            "Найдено: 7"
        );
        assert_eq!(t_lang(&manager, "currency", Some("en")), "so'm");
    }
}
