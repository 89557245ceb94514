//! Postgres-backed catalog store.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::postgres::Postgres;
use sqlx::{PgPool, Row};
use tokio::sync::Mutex;

use crate::traits::CatalogStore;
use crate::types::{
    CatalogEntry, Category, NormalizedModel, PriceKind, PriceSource, SyncRun,
};

/// Advisory lock key for run single-flight ("models" in ASCII). Advisory
/// locks are session-scoped, so the connection that acquired the lock is
/// pinned until release.
const RUN_LOCK_KEY: i64 = 0x6d6f_6465_6c73;

pub struct PostgresCatalogStore {
    pool: PgPool,
    run_lock_conn: Mutex<Option<PoolConnection<Postgres>>>,
}

impl PostgresCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            run_lock_conn: Mutex::new(None),
        }
    }
}

fn entry_from_row(row: &sqlx::postgres::PgRow) -> Result<CatalogEntry> {
    let category: String = row.get("category");
    let category = Category::parse(&category)
        .with_context(|| format!("unknown category in catalog row: {category}"))?;
    let price_kind: Option<String> = row.get("price_kind");
    let price_source: Option<String> = row.get("price_source");

    Ok(CatalogEntry {
        model_id: row.get("model_id"),
        category,
        name: row.get("name"),
        provider: row.get("provider"),
        description: row.get("description"),
        price_amount: row.get("price_amount"),
        price_kind: price_kind.as_deref().and_then(PriceKind::parse),
        price_source: price_source.as_deref().and_then(PriceSource::parse),
        tags: row.get("tags"),
        popularity: row.get("popularity"),
        run_count: row.get("run_count"),
        attributes: row.get("attributes"),
        source_updated_at: row.get("source_updated_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    })
}

fn category_names(categories: &[Category]) -> Vec<String> {
    categories.iter().map(|c| c.as_str().to_string()).collect()
}

#[async_trait]
impl CatalogStore for PostgresCatalogStore {
    async fn find_by_model_id(&self, model_id: &str) -> Result<Option<CatalogEntry>> {
        let row = sqlx::query(
            r#"
            SELECT model_id, category, name, provider, description,
                   price_amount, price_kind, price_source,
                   tags, popularity, run_count, attributes, source_updated_at,
                   created_at, updated_at, deleted_at
            FROM catalog_models
            WHERE model_id = $1
            "#,
        )
        .bind(model_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to find catalog entry")?;

        row.as_ref().map(entry_from_row).transpose()
    }

    async fn upsert(&self, model: &NormalizedModel, now: DateTime<Utc>) -> Result<()> {
        let (price_amount, price_kind, price_source) = model.price.columns();
        let attributes = serde_json::to_value(&model.attributes)
            .context("Failed to serialize model attributes")?;

        sqlx::query(
            r#"
            INSERT INTO catalog_models (
                model_id, category, name, provider, description,
                price_amount, price_kind, price_source,
                tags, popularity, run_count, attributes, source_updated_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)
            ON CONFLICT (model_id) DO UPDATE SET
                name = EXCLUDED.name,
                provider = EXCLUDED.provider,
                description = EXCLUDED.description,
                price_amount = EXCLUDED.price_amount,
                price_kind = EXCLUDED.price_kind,
                price_source = EXCLUDED.price_source,
                tags = EXCLUDED.tags,
                popularity = EXCLUDED.popularity,
                run_count = EXCLUDED.run_count,
                attributes = EXCLUDED.attributes,
                source_updated_at = EXCLUDED.source_updated_at,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&model.id)
        .bind(model.category.as_str())
        .bind(&model.name)
        .bind(&model.provider)
        .bind(&model.description)
        .bind(price_amount)
        .bind(price_kind.map(|k| k.as_str()))
        .bind(price_source.map(|s| s.as_str()))
        .bind(&model.tags)
        .bind(model.popularity)
        .bind(model.run_count)
        .bind(attributes)
        .bind(model.updated_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to upsert catalog entry")?;
        Ok(())
    }

    async fn list_active_ids(&self, categories: &[Category]) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT model_id FROM catalog_models
            WHERE deleted_at IS NULL AND category = ANY($1)
            "#,
        )
        .bind(category_names(categories))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list active catalog ids")?;

        Ok(rows.into_iter().map(|r| r.get("model_id")).collect())
    }

    async fn list_deleted_ids(&self, categories: &[Category]) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT model_id FROM catalog_models
            WHERE deleted_at IS NOT NULL AND category = ANY($1)
            "#,
        )
        .bind(category_names(categories))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list soft-deleted catalog ids")?;

        Ok(rows.into_iter().map(|r| r.get("model_id")).collect())
    }

    async fn soft_delete(&self, ids: &[String], at: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE catalog_models
            SET deleted_at = $2
            WHERE model_id = ANY($1) AND deleted_at IS NULL
            "#,
        )
        .bind(ids)
        .bind(at)
        .execute(&self.pool)
        .await
        .context("Failed to soft delete catalog entries")?;
        Ok(result.rows_affected())
    }

    async fn restore(&self, ids: &[String]) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE catalog_models
            SET deleted_at = NULL
            WHERE model_id = ANY($1) AND deleted_at IS NOT NULL
            "#,
        )
        .bind(ids)
        .execute(&self.pool)
        .await
        .context("Failed to restore catalog entries")?;
        Ok(result.rows_affected())
    }

    async fn append_run_log(&self, run: &SyncRun) -> Result<()> {
        let counts = run.counts.unwrap_or_default();
        sqlx::query(
            r#"
            INSERT INTO sync_runs (
                id, status, text_count, image_count, video_count, audio_count,
                duration_ms, error_message, started_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(run.id)
        .bind(run.status.as_str())
        .bind(counts.text)
        .bind(counts.image)
        .bind(counts.video)
        .bind(counts.audio)
        .bind(run.duration_ms)
        .bind(&run.error)
        .bind(run.started_at)
        .execute(&self.pool)
        .await
        .context("Failed to append sync run log")?;
        Ok(())
    }

    async fn try_acquire_run_lock(&self) -> Result<bool> {
        let mut guard = self.run_lock_conn.lock().await;
        if guard.is_some() {
            // This process already holds the lock.
            return Ok(false);
        }

        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection for run lock")?;
        let locked: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
            .bind(RUN_LOCK_KEY)
            .fetch_one(&mut *conn)
            .await
            .context("Failed to take advisory run lock")?;

        if locked {
            *guard = Some(conn);
        }
        Ok(locked)
    }

    async fn release_run_lock(&self) -> Result<()> {
        let mut guard = self.run_lock_conn.lock().await;
        if let Some(mut conn) = guard.take() {
            sqlx::query("SELECT pg_advisory_unlock($1)")
                .bind(RUN_LOCK_KEY)
                .execute(&mut *conn)
                .await
                .context("Failed to release advisory run lock")?;
        }
        Ok(())
    }
}
