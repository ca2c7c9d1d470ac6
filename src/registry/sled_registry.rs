use crate::error::{AppError, Result};
use crate::models::Registration;
use crate::registry::RegistrationStore;
use async_trait::async_trait;
use sled::Db;
use std::path::Path;
use std::sync::Arc;

/// Persistent registration store using the Sled embedded database
#[derive(Clone)]
pub struct SledRegistry {
    db: Arc<Db>,
    registrations_tree: sled::Tree,
}

impl SledRegistry {
    /// Open (or create) a Sled store at the specified path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = sled::open(path)
            .map_err(|e| AppError::Registry(format!("Failed to open Sled database: {}", e)))?;

        let registrations_tree = db
            .open_tree("registrations")
            .map_err(|e| AppError::Registry(format!("Failed to open registrations tree: {}", e)))?;

        tracing::info!("Initialized registration store at {:?}", path);

        Ok(Self {
            db: Arc::new(db),
            registrations_tree,
        })
    }

    fn serialize(registration: &Registration) -> Result<Vec<u8>> {
        bincode::serialize(registration)
            .map_err(|e| AppError::Registry(format!("Failed to serialize registration: {}", e)))
    }

    fn deserialize(bytes: &[u8]) -> Result<Registration> {
        bincode::deserialize(bytes)
            .map_err(|e| AppError::Registry(format!("Failed to deserialize registration: {}", e)))
    }
}

#[async_trait]
impl RegistrationStore for SledRegistry {
    async fn save(&self, registration: Registration) -> Result<()> {
        let bytes = Self::serialize(&registration)?;
        self.registrations_tree
            .insert(registration.phone.as_bytes(), bytes)
            .map_err(|e| AppError::Registry(format!("Failed to store registration: {}", e)))?;

        self.db
            .flush_async()
            .await
            .map_err(|e| AppError::Registry(format!("Failed to flush registry: {}", e)))?;

        tracing::info!(phone = %registration.phone, "Registration stored");

        Ok(())
    }

    async fn get(&self, phone: &str) -> Result<Option<Registration>> {
        let bytes = self
            .registrations_tree
            .get(phone.as_bytes())
            .map_err(|e| AppError::Registry(format!("Failed to read registration: {}", e)))?;

        bytes.map(|b| Self::deserialize(&b)).transpose()
    }

    async fn list(&self) -> Result<Vec<Registration>> {
        let mut registrations = Vec::new();
        for entry in self.registrations_tree.iter() {
            let (_, bytes) =
                entry.map_err(|e| AppError::Registry(format!("Failed to scan registry: {}", e)))?;
            registrations.push(Self::deserialize(&bytes)?);
        }
        Ok(registrations)
    }
}
