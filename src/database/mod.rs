pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryAssetStore;
pub use models::{Asset, AssetId, AssetPatch, NewAsset, PayloadError};
pub use postgres::PgAssetStore;
pub use store::{AssetFilter, AssetStore, OwnerFilter, StoreError, UpdateOutcome};
