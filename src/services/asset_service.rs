use std::sync::Arc;

use crate::auth::CallerIdentity;
use crate::database::models::asset::{Asset, AssetId, AssetPatch, NewAsset, PayloadError};
use crate::database::store::{AssetFilter, AssetStore, OwnerFilter, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Invalid asset ID format: {0}")]
    InvalidIdentifier(String),
    #[error("Validation error: {0}")]
    Validation(#[from] PayloadError),
    /// No asset with this id belongs to the caller. Deliberately the same
    /// whether the asset is missing or owned by someone else.
    #[error("Asset not found")]
    NotFound,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Owner-scoped CRUD over an asset store.
///
/// Every method takes the caller's identity and folds it into the store
/// filter, so there is no way to reach another owner's assets through here.
#[derive(Clone)]
pub struct AssetService {
    store: Arc<dyn AssetStore>,
}

impl AssetService {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn AssetStore> {
        &self.store
    }

    /// Store a new asset owned by `caller` and return its generated id
    pub async fn create(&self, caller: &CallerIdentity, fields: NewAsset) -> Result<AssetId, AssetError> {
        let id = self.store.insert(&OwnerFilter::new(caller), &fields).await?;
        tracing::debug!("Created asset {} for owner {}", id, caller);
        Ok(id)
    }

    pub async fn list(&self, caller: &CallerIdentity) -> Result<Vec<Asset>, AssetError> {
        Ok(self.store.find(&OwnerFilter::new(caller)).await?)
    }

    pub async fn get(&self, caller: &CallerIdentity, id: &str) -> Result<Asset, AssetError> {
        let filter = AssetFilter::new(caller, parse_id(id)?);
        self.store.find_one(&filter).await?.ok_or(AssetError::NotFound)
    }

    /// Set-merge `patch` into the caller's asset. Returns the number of
    /// fields whose value changed, which may be 0.
    pub async fn update(&self, caller: &CallerIdentity, id: &str, patch: AssetPatch) -> Result<u64, AssetError> {
        let filter = AssetFilter::new(caller, parse_id(id)?);
        let outcome = self.store.update_one(&filter, &patch).await?;
        if outcome.matched == 0 {
            return Err(AssetError::NotFound);
        }
        tracing::debug!("Updated asset {} for owner {} ({} fields changed)", filter.id(), caller, outcome.modified);
        Ok(outcome.modified)
    }

    pub async fn delete(&self, caller: &CallerIdentity, id: &str) -> Result<(), AssetError> {
        let filter = AssetFilter::new(caller, parse_id(id)?);
        if self.store.delete_one(&filter).await? == 0 {
            return Err(AssetError::NotFound);
        }
        tracing::debug!("Deleted asset {} for owner {}", filter.id(), caller);
        Ok(())
    }
}

fn parse_id(raw: &str) -> Result<AssetId, AssetError> {
    raw.parse().map_err(|_| AssetError::InvalidIdentifier(raw.to_string()))
}
