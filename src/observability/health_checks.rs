//! Readiness checks behind `/health/ready`.

use std::sync::Arc;

use anyhow::Result;

use crate::repository::StaffRepository;

/// Dependencies checked by the readiness probe
#[derive(Clone, Default)]
pub struct ReadinessProbe {
    pub bot_token: Option<String>,
    pub store: Option<Arc<dyn StaffRepository>>,
}

impl std::fmt::Debug for ReadinessProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadinessProbe")
            .field("has_bot_token", &self.bot_token.is_some())
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

/// Perform all readiness checks
pub async fn perform_readiness_checks(probe: &ReadinessProbe) -> Result<()> {
    if let Some(token) = &probe.bot_token {
        check_bot_token_health(token)?;
    }

    if let Some(store) = &probe.store {
        check_store_health(store.as_ref())?;
    }

    Ok(())
}

/// Check the token still has the `<id>:<secret>` shape
pub fn check_bot_token_health(token: &str) -> Result<()> {
    crate::config::check_token_shape(token)?;
    tracing::debug!("Bot token health check passed");
    Ok(())
}

/// The store is usable once it holds at least one staff member
pub fn check_store_health(store: &dyn StaffRepository) -> Result<()> {
    if store.all_staff().is_empty() {
        return Err(anyhow::anyhow!("Store has no staff records"));
    }

    tracing::debug!("Store health check passed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    #[tokio::test]
    async fn test_readiness_with_seeded_store() {
        let probe = ReadinessProbe {
            bot_token: Some("123456789:AAFakeTokenForTestingPurposes1234567890".to_string()),
            store: Some(Arc::new(InMemoryStore::seeded())),
        };
        assert!(perform_readiness_checks(&probe).await.is_ok());
    }

    #[tokio::test]
    async fn test_readiness_fails_on_bad_token() {
        let probe = ReadinessProbe {
            bot_token: Some("no-colon".to_string()),
            store: None,
        };
        assert!(perform_readiness_checks(&probe).await.is_err());
    }

    #[test]
    fn test_empty_store_not_ready() {
        let store = InMemoryStore::with_records(vec![], vec![], vec![]);
        assert!(check_store_health(&store).is_err());
    }
}
