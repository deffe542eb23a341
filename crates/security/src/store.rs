//! Principal store capability

use async_trait::async_trait;
use dashmap::DashMap;
use merchant_core::{ApiKey, PrincipalRecord, StoreError};
use std::sync::Arc;

/// Resolves an API key to a principal and its shared secret.
///
/// Implementations must be safe for concurrent reads. The authentication
/// subsystem never writes through this interface.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
    /// `Ok(None)` means the key is unknown; `Err` means the store could not answer
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<PrincipalRecord>, StoreError>;
}

#[async_trait]
impl<T: PrincipalStore + ?Sized> PrincipalStore for Arc<T> {
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<PrincipalRecord>, StoreError> {
        (**self).find_by_api_key(api_key).await
    }
}

/// Process-local store backed by a concurrent map
#[derive(Debug, Default)]
pub struct InMemoryPrincipalStore {
    records: DashMap<ApiKey, PrincipalRecord>,
}

impl InMemoryPrincipalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a record, returning the previous one
    pub fn insert(&self, record: PrincipalRecord) -> Option<PrincipalRecord> {
        self.records
            .insert(record.principal.api_key.clone(), record)
    }

    pub fn remove(&self, api_key: &ApiKey) -> Option<PrincipalRecord> {
        self.records.remove(api_key).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<PrincipalRecord> for InMemoryPrincipalStore {
    fn from_iter<I: IntoIterator<Item = PrincipalRecord>>(iter: I) -> Self {
        let store = Self::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[async_trait]
impl PrincipalStore for InMemoryPrincipalStore {
    async fn find_by_api_key(&self, api_key: &ApiKey) -> Result<Option<PrincipalRecord>, StoreError> {
        Ok(self.records.get(api_key).map(|entry| entry.value().clone()))
    }
}
