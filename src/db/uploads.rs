use sqlx::SqlitePool;

use crate::models::UploadRecord;
use crate::types::AppResult;

/// CRUD persistence for upload records. Records are inserted once and only
/// ever removed by id; there is no update operation.
pub struct UploadStore;

impl UploadStore {
    pub async fn insert(pool: &SqlitePool, record: &UploadRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO uploads (id, filename, extracted_text, category, auto_response, raw_result, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.filename)
        .bind(&record.extracted_text)
        .bind(&record.category)
        .bind(&record.auto_response)
        .bind(&record.raw_result)
        .bind(record.created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// All records, most recent first, materialized.
    pub async fn list(pool: &SqlitePool) -> AppResult<Vec<UploadRecord>> {
        let records = sqlx::query_as::<_, UploadRecord>(
            r#"
            SELECT id, filename, extracted_text, category, auto_response, raw_result, created_at
            FROM uploads
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    pub async fn get(pool: &SqlitePool, id: &str) -> AppResult<Option<UploadRecord>> {
        let record = sqlx::query_as::<_, UploadRecord>(
            r#"
            SELECT id, filename, extracted_text, category, auto_response, raw_result, created_at
            FROM uploads
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Returns false when no record with `id` exists; the caller owns the
    /// Not-Found mapping.
    pub async fn delete(pool: &SqlitePool, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM uploads WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::{Duration, Utc};

    async fn memory_pool() -> SqlitePool {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_schema(&pool).await.unwrap();
        pool
    }

    fn sample_record(id: &str, offset_secs: i64) -> UploadRecord {
        UploadRecord {
            id: id.to_string(),
            filename: format!("{id}.txt"),
            extracted_text: "body".to_string(),
            category: "invoice".to_string(),
            auto_response: "thanks".to_string(),
            raw_result: "{}".to_string(),
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let pool = memory_pool().await;
        let record = sample_record("a", 0);
        UploadStore::insert(&pool, &record).await.unwrap();

        let stored = UploadStore::get(&pool, "a").await.unwrap().unwrap();
        assert_eq!(stored.id, record.id);
        assert_eq!(stored.filename, record.filename);
        assert_eq!(stored.category, "invoice");
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let pool = memory_pool().await;
        assert!(UploadStore::get(&pool, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_id_insert_is_a_storage_error() {
        let pool = memory_pool().await;
        let record = sample_record("dup", 0);
        UploadStore::insert(&pool, &record).await.unwrap();
        assert!(UploadStore::insert(&pool, &record).await.is_err());
    }

    #[tokio::test]
    async fn list_returns_all_records_newest_first() {
        let pool = memory_pool().await;
        for (i, id) in ["oldest", "middle", "newest"].iter().enumerate() {
            UploadStore::insert(&pool, &sample_record(id, i as i64 * 10))
                .await
                .unwrap();
        }

        let records = UploadStore::list(&pool).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, "newest");
        assert_eq!(records[2].id, "oldest");
    }

    #[tokio::test]
    async fn delete_removes_record_permanently() {
        let pool = memory_pool().await;
        UploadStore::insert(&pool, &sample_record("gone", 0)).await.unwrap();

        assert!(UploadStore::delete(&pool, "gone").await.unwrap());
        assert!(UploadStore::get(&pool, "gone").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_id_returns_false_without_mutation() {
        let pool = memory_pool().await;
        UploadStore::insert(&pool, &sample_record("keep", 0)).await.unwrap();

        assert!(!UploadStore::delete(&pool, "missing").await.unwrap());
        assert_eq!(UploadStore::list(&pool).await.unwrap().len(), 1);
    }
}
