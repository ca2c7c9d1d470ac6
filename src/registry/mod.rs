//! Registration store: user contact details alongside the latest
//! assessment. An external collaborator to the scoring core.

pub mod sled_registry;

pub use sled_registry::SledRegistry;

use crate::error::Result;
use crate::models::Registration;
use async_trait::async_trait;
use dashmap::DashMap;

/// Store for user registrations, keyed by phone number
#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Insert or replace a registration
    async fn save(&self, registration: Registration) -> Result<()>;

    /// Fetch a registration by phone number
    async fn get(&self, phone: &str) -> Result<Option<Registration>>;

    /// List all registrations
    async fn list(&self) -> Result<Vec<Registration>>;
}

/// In-memory registration store for tests and ephemeral deployments
#[derive(Default)]
pub struct InMemoryRegistry {
    registrations: DashMap<String, Registration>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationStore for InMemoryRegistry {
    async fn save(&self, registration: Registration) -> Result<()> {
        self.registrations
            .insert(registration.phone.clone(), registration);
        Ok(())
    }

    async fn get(&self, phone: &str) -> Result<Option<Registration>> {
        Ok(self.registrations.get(phone).map(|r| r.clone()))
    }

    async fn list(&self) -> Result<Vec<Registration>> {
        Ok(self
            .registrations
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_save_and_get() {
        let store = InMemoryRegistry::new();
        let registration = Registration::new(
            "Asha".to_string(),
            "+919876543210".to_string(),
            "Jayanagar".to_string(),
        );

        store.save(registration.clone()).await.unwrap();

        let fetched = store.get("+919876543210").await.unwrap().unwrap();
        assert_eq!(fetched.name, "Asha");
        assert_eq!(fetched.location, "Jayanagar");

        assert!(store.get("+910000000000").await.unwrap().is_none());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_save_replaces() {
        let store = InMemoryRegistry::new();
        let first = Registration::new(
            "Asha".to_string(),
            "+919876543210".to_string(),
            "Jayanagar".to_string(),
        );
        let second = Registration::new(
            "Asha K".to_string(),
            "+919876543210".to_string(),
            "Koramangala".to_string(),
        );

        store.save(first).await.unwrap();
        store.save(second).await.unwrap();

        let fetched = store.get("+919876543210").await.unwrap().unwrap();
        assert_eq!(fetched.location, "Koramangala");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
