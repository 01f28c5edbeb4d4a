//! Client lookup used by the first wizard steps.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::models::Client;

/// Results shown to the manager are capped at this many clients
pub const MAX_CLIENT_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    Phone,
    Name,
    Id,
    New,
}

impl SearchMethod {
    pub fn code(self) -> &'static str {
        match self {
            SearchMethod::Phone => "phone",
            SearchMethod::Name => "name",
            SearchMethod::Id => "id",
            SearchMethod::New => "new",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "phone" => Some(SearchMethod::Phone),
            "name" => Some(SearchMethod::Name),
            "id" => Some(SearchMethod::Id),
            "new" => Some(SearchMethod::New),
            _ => None,
        }
    }

    pub fn prompt_key(self) -> &'static str {
        match self {
            SearchMethod::Phone => "order-enter-phone",
            SearchMethod::Name => "order-enter-name",
            SearchMethod::Id => "order-enter-id",
            SearchMethod::New => "order-new-client-name",
        }
    }
}

fn digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Finds at most [`MAX_CLIENT_RESULTS`] clients, keeping list order
pub fn search_clients<'a>(
    clients: &'a [Client],
    method: SearchMethod,
    query: &str,
) -> AppResult<Vec<&'a Client>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::Validation("empty search query".to_string()));
    }

    let found: Vec<&Client> = match method {
        SearchMethod::Phone => {
            let needle = digits(query);
            if needle.len() < 3 {
                return Err(AppError::Validation(
                    "phone query needs at least 3 digits".to_string(),
                ));
            }
            clients
                .iter()
                .filter(|client| digits(&client.phone).contains(&needle))
                .take(MAX_CLIENT_RESULTS)
                .collect()
        }
        SearchMethod::Name => {
            let needle = query.to_lowercase();
            clients
                .iter()
                .filter(|client| client.full_name.to_lowercase().contains(&needle))
                .take(MAX_CLIENT_RESULTS)
                .collect()
        }
        SearchMethod::Id => {
            let id: u32 = query
                .parse()
                .map_err(|_| AppError::Validation(format!("invalid client id: {}", query)))?;
            clients.iter().filter(|client| client.id == id).collect()
        }
        SearchMethod::New => {
            return Err(AppError::Validation(
                "new client is not a search".to_string(),
            ))
        }
    };

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data::seed_clients;

    #[test]
    fn test_phone_ignores_formatting() {
        let clients = seed_clients();
        let found = search_clients(&clients, SearchMethod::Phone, "90 123-45-67").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_name, "Aziz Karimov");
    }

    #[test]
    fn test_results_are_capped_in_list_order() {
        let clients = seed_clients();

        // Every seeded phone contains 998
        let by_phone = search_clients(&clients, SearchMethod::Phone, "998").unwrap();
        let ids: Vec<u32> = by_phone.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(by_phone.len(), MAX_CLIENT_RESULTS);

        // Every seeded surname contains "ov"
        let by_name = search_clients(&clients, SearchMethod::Name, "OV").unwrap();
        assert_eq!(by_name.len(), MAX_CLIENT_RESULTS);
        assert_eq!(by_name[0].full_name, "Aziz Karimov");
        assert!(by_name.iter().all(|c| c.id <= 5));
    }

    #[test]
    fn test_id_requires_number() {
        let clients = seed_clients();
        assert!(search_clients(&clients, SearchMethod::Id, "abc").is_err());
        assert_eq!(
            search_clients(&clients, SearchMethod::Id, "3").unwrap()[0].id,
            3
        );
    }
}
