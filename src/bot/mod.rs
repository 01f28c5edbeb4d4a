//! Bot module for handling Telegram interactions
//!
//! - `callbacks`: callback query parsing and per-feature handlers
//! - `command_handlers`: `/start`, `/help`, `/cancel`
//! - `message_handler`: text, photo and location messages
//! - `menu`: the main reply keyboard and its bilingual captions
//! - `formatters` / `keyboards`: pure rendering of messages and markups

pub mod callbacks;
pub mod command_handlers;
pub mod formatters;
pub mod keyboards;
pub mod menu;
pub mod message_handler;

use std::sync::Arc;

use teloxide::{ApiError, Bot, RequestError};

use crate::localization::{detect_language, t_args_lang, t_lang, LocalizationManager};
use crate::repository::InMemoryStore;

/// Common context for bot handlers containing shared dependencies
#[derive(Debug)]
pub struct HandlerContext<'a> {
    pub bot: &'a Bot,
    pub store: &'a Arc<InMemoryStore>,
    pub localization: &'a Arc<LocalizationManager>,
    pub language_code: Option<&'a str>,
    pub user_id: i64,
}

impl HandlerContext<'_> {
    pub fn t(&self, key: &str) -> String {
        t_lang(self.localization, key, self.language_code)
    }

    pub fn t_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        t_args_lang(self.localization, key, args, self.language_code)
    }

    /// Supported language resolved from the user's Telegram language
    pub fn language(&self) -> String {
        detect_language(self.localization, self.language_code)
    }

    /// Name recorded as `updated_by` / `created_by`
    pub fn actor(&self) -> String {
        format!("manager:{}", self.user_id)
    }
}

/// Treat Telegram's "message is not modified" reply as success.
///
/// Re-rendering an inline message whose text and markup did not change
/// (double taps, a refresh with nothing new) is not a failure.
pub fn tolerate_unmodified<T>(result: Result<T, RequestError>) -> Result<(), RequestError> {
    match result {
        Ok(_) | Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(()),
        Err(err) => Err(err),
    }
}

pub use callbacks::callback_handler::callback_handler;
pub use message_handler::message_handler;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_edit_is_not_an_error() {
        let unchanged: Result<(), RequestError> =
            Err(RequestError::Api(ApiError::MessageNotModified));
        assert!(tolerate_unmodified(unchanged).is_ok());
        assert!(tolerate_unmodified(Ok::<_, RequestError>(42)).is_ok());
    }

    #[test]
    fn test_other_edit_failures_still_propagate() {
        let missing: Result<(), RequestError> =
            Err(RequestError::Api(ApiError::MessageToEditNotFound));
        assert!(matches!(
            tolerate_unmodified(missing),
            Err(RequestError::Api(ApiError::MessageToEditNotFound))
        ));
    }
}
