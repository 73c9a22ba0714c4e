use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseManager;
use crate::database::models::asset::{Asset, AssetId, AssetPatch, NewAsset};
use crate::database::store::{AssetFilter, AssetStore, OwnerFilter, StoreError, UpdateOutcome};

const INSERT_SQL: &str = r#"
    INSERT INTO assets (name, "type", owner_id)
    VALUES ($1, $2, $3)
    RETURNING id
"#;

const FIND_SQL: &str = r#"
    SELECT id, name, "type", owner_id
    FROM assets
    WHERE owner_id = $1
"#;

const FIND_ONE_SQL: &str = r#"
    SELECT id, name, "type", owner_id
    FROM assets
    WHERE id = $1 AND owner_id = $2
"#;

// Locks the owned row, merges the supplied fields and reports how many of
// them differ from the prior values. No row back means nothing matched.
const UPDATE_SQL: &str = r#"
    WITH prior AS (
        SELECT id, name, "type"
        FROM assets
        WHERE id = $1 AND owner_id = $2
        FOR UPDATE
    )
    UPDATE assets AS a
    SET name = COALESCE($3, prior.name),
        "type" = COALESCE($4, prior."type")
    FROM prior
    WHERE a.id = prior.id
    RETURNING (a.name IS DISTINCT FROM prior.name)::int
            + (a."type" IS DISTINCT FROM prior."type")::int AS modified
"#;

const DELETE_SQL: &str = r#"
    DELETE FROM assets
    WHERE id = $1 AND owner_id = $2
"#;

/// Asset store backed by the `assets` table
#[derive(Clone)]
pub struct PgAssetStore {
    pool: PgPool,
}

impl PgAssetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn insert(&self, owner: &OwnerFilter, fields: &NewAsset) -> Result<AssetId, StoreError> {
        let id = sqlx::query_scalar::<_, AssetId>(INSERT_SQL)
            .bind(&fields.name)
            .bind(&fields.asset_type)
            .bind(owner.owner_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(id)
    }

    async fn find(&self, filter: &OwnerFilter) -> Result<Vec<Asset>, StoreError> {
        let assets = sqlx::query_as::<_, Asset>(FIND_SQL)
            .bind(filter.owner_id())
            .fetch_all(&self.pool)
            .await?;
        Ok(assets)
    }

    async fn find_one(&self, filter: &AssetFilter) -> Result<Option<Asset>, StoreError> {
        let asset = sqlx::query_as::<_, Asset>(FIND_ONE_SQL)
            .bind(filter.id())
            .bind(filter.owner_id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(asset)
    }

    async fn update_one(&self, filter: &AssetFilter, patch: &AssetPatch) -> Result<UpdateOutcome, StoreError> {
        let modified = sqlx::query_scalar::<_, i32>(UPDATE_SQL)
            .bind(filter.id())
            .bind(filter.owner_id())
            .bind(patch.name.as_deref())
            .bind(patch.asset_type.as_deref())
            .fetch_optional(&self.pool)
            .await?;

        Ok(match modified {
            Some(count) => UpdateOutcome { matched: 1, modified: count.max(0) as u64 },
            None => UpdateOutcome::default(),
        })
    }

    async fn delete_one(&self, filter: &AssetFilter) -> Result<u64, StoreError> {
        let result = sqlx::query(DELETE_SQL)
            .bind(filter.id())
            .bind(filter.owner_id())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
