//! In-memory asset store for tests and local runs without Postgres

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::database::models::asset::{Asset, AssetId, AssetPatch, NewAsset};
use crate::database::store::{AssetFilter, AssetStore, OwnerFilter, StoreError, UpdateOutcome};

/// Not persistent; data is lost on drop. Keeps insertion order.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: RwLock<Vec<Asset>>,
    calls: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store operations invoked so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make every subsequent operation fail with `StoreError::Unavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.assets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store marked unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn insert(&self, owner: &OwnerFilter, fields: &NewAsset) -> Result<AssetId, StoreError> {
        self.begin()?;
        let asset = Asset {
            id: AssetId::new(),
            name: fields.name.clone(),
            asset_type: fields.asset_type.clone(),
            owner_id: owner.owner_id(),
        };
        let id = asset.id;
        self.assets.write().await.push(asset);
        Ok(id)
    }

    async fn find(&self, filter: &OwnerFilter) -> Result<Vec<Asset>, StoreError> {
        self.begin()?;
        Ok(self
            .assets
            .read()
            .await
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect())
    }

    async fn find_one(&self, filter: &AssetFilter) -> Result<Option<Asset>, StoreError> {
        self.begin()?;
        Ok(self.assets.read().await.iter().find(|a| filter.matches(a)).cloned())
    }

    async fn update_one(&self, filter: &AssetFilter, patch: &AssetPatch) -> Result<UpdateOutcome, StoreError> {
        self.begin()?;
        let mut assets = self.assets.write().await;
        match assets.iter_mut().find(|a| filter.matches(a)) {
            Some(asset) => Ok(UpdateOutcome {
                matched: 1,
                modified: patch.apply_to(asset),
            }),
            None => Ok(UpdateOutcome::default()),
        }
    }

    async fn delete_one(&self, filter: &AssetFilter) -> Result<u64, StoreError> {
        self.begin()?;
        let mut assets = self.assets.write().await;
        match assets.iter().position(|a| filter.matches(a)) {
            Some(index) => {
                assets.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.begin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::CallerIdentity;

    fn new_asset(name: &str) -> NewAsset {
        NewAsset { name: name.into(), asset_type: "vehicle".into() }
    }

    #[tokio::test]
    async fn filters_by_owner_and_id() {
        let store = MemoryAssetStore::new();
        let alice = CallerIdentity::for_test(1);
        let bob = CallerIdentity::for_test(2);

        let id = store.insert(&OwnerFilter::new(&alice), &new_asset("drone")).await.unwrap();

        assert!(store.find_one(&AssetFilter::new(&alice, id)).await.unwrap().is_some());
        assert!(store.find_one(&AssetFilter::new(&bob, id)).await.unwrap().is_none());
        assert_eq!(store.delete_one(&AssetFilter::new(&bob, id)).await.unwrap(), 0);
        assert_eq!(store.delete_one(&AssetFilter::new(&alice, id)).await.unwrap(), 1);
        assert!(store.is_empty().await);
        assert_eq!(store.call_count(), 5);
    }

    #[tokio::test]
    async fn unavailable_store_fails() {
        let store = MemoryAssetStore::new();
        store.set_unavailable(true);
        let err = store.ping().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
