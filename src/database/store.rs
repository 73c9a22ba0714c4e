use async_trait::async_trait;
use thiserror::Error;

use crate::auth::CallerIdentity;
use crate::database::models::asset::{Asset, AssetId, AssetPatch, NewAsset};

/// Infrastructure failures from an asset store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Matches every asset owned by one caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerFilter {
    owner_id: i64,
}

impl OwnerFilter {
    pub fn new(caller: &CallerIdentity) -> Self {
        Self { owner_id: caller.id() }
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn matches(&self, asset: &Asset) -> bool {
        asset.owner_id == self.owner_id
    }
}

/// Matches a single asset by id, and only when the caller owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetFilter {
    id: AssetId,
    owner: OwnerFilter,
}

impl AssetFilter {
    pub fn new(caller: &CallerIdentity, id: AssetId) -> Self {
        Self { id, owner: OwnerFilter::new(caller) }
    }

    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn owner_id(&self) -> i64 {
        self.owner.owner_id()
    }

    pub fn matches(&self, asset: &Asset) -> bool {
        asset.id == self.id && self.owner.matches(asset)
    }
}

/// Result of a single-document update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    /// Number of fields whose stored value changed
    pub modified: u64,
}

/// Document-style asset persistence. Every read and write is scoped by a
/// filter built from the caller's identity.
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Insert a new asset owned by `owner` and return its generated id
    async fn insert(&self, owner: &OwnerFilter, fields: &NewAsset) -> Result<AssetId, StoreError>;

    async fn find(&self, filter: &OwnerFilter) -> Result<Vec<Asset>, StoreError>;

    async fn find_one(&self, filter: &AssetFilter) -> Result<Option<Asset>, StoreError>;

    /// Set-merge the patch into the matching asset
    async fn update_one(&self, filter: &AssetFilter, patch: &AssetPatch) -> Result<UpdateOutcome, StoreError>;

    /// Returns the number of deleted assets (0 or 1)
    async fn delete_one(&self, filter: &AssetFilter) -> Result<u64, StoreError>;

    /// Connectivity check for the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}
