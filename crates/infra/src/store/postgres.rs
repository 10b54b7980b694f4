//! Postgres-backed document collections.
//!
//! All collections share one `documents` table keyed by `(collection, id)`; the
//! record itself lives in a `jsonb` column so secondary lookups can match on
//! any top-level field. Back-reference arrays are edited with a single
//! `UPDATE ... jsonb_set` so concurrent appends never overwrite each other.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Anything else | any | `Database` |

use std::marker::PhantomData;

use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use super::{Document, DocumentCollection, StoreError};

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS documents (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body JSONB NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
        PRIMARY KEY (collection, id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS documents_body_idx ON documents USING GIN (body)",
];

/// Create the `documents` table and its index if missing.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    Ok(())
}

/// Postgres-backed collection for one document type.
///
/// `PgPool` is internally reference counted, so clones share connections.
pub struct PostgresCollection<D> {
    pool: PgPool,
    _doc: PhantomData<fn() -> D>,
}

impl<D: Document> PostgresCollection<D> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _doc: PhantomData,
        }
    }

    fn decode(row: &sqlx::postgres::PgRow) -> Result<D, StoreError> {
        let body: serde_json::Value = row
            .try_get("body")
            .map_err(|e| map_sqlx_error("decode", e))?;
        Ok(serde_json::from_value(body)?)
    }
}

#[async_trait::async_trait]
impl<D: Document> DocumentCollection<D> for PostgresCollection<D> {
    #[instrument(skip(self), fields(collection = D::COLLECTION))]
    async fn find_by_id(&self, id: &D::Id) -> Result<Option<D>, StoreError> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(D::COLLECTION)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;

        row.as_ref().map(Self::decode).transpose()
    }

    #[instrument(skip(self, doc), fields(collection = D::COLLECTION))]
    async fn insert(&self, doc: D) -> Result<D, StoreError> {
        let body = serde_json::to_value(&doc)?;
        let id = doc.id().to_string();

        sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(D::COLLECTION)
            .bind(&id)
            .bind(Json(body))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                    StoreError::Duplicate {
                        collection: D::COLLECTION,
                        id: id.clone(),
                    }
                }
                other => map_sqlx_error("insert", other),
            })?;

        Ok(doc)
    }

    #[instrument(skip(self), fields(collection = D::COLLECTION))]
    async fn find_by_id_and_delete(&self, id: &D::Id) -> Result<Option<D>, StoreError> {
        let row = sqlx::query(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 RETURNING body",
        )
        .bind(D::COLLECTION)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_by_id_and_delete", e))?;

        row.as_ref().map(Self::decode).transpose()
    }

    #[instrument(skip(self), fields(collection = D::COLLECTION))]
    async fn push_reference(&self, id: &D::Id, field: &str, reference: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                body,
                ARRAY[$3::text],
                CASE WHEN jsonb_typeof(body -> $3) = 'array' THEN body -> $3 ELSE '[]'::jsonb END
                    || jsonb_build_array($4::text)
            )
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(D::COLLECTION)
        .bind(id.to_string())
        .bind(field)
        .bind(reference)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("push_reference", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(collection = D::COLLECTION))]
    async fn pull_reference(&self, id: &D::Id, field: &str, reference: &str) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE documents
            SET body = jsonb_set(
                body,
                ARRAY[$3::text],
                COALESCE(
                    (
                        SELECT jsonb_agg(item ORDER BY pos)
                        FROM jsonb_array_elements(
                            CASE WHEN jsonb_typeof(body -> $3) = 'array' THEN body -> $3 ELSE '[]'::jsonb END
                        ) WITH ORDINALITY AS t(item, pos)
                        WHERE item <> to_jsonb($4::text)
                    ),
                    '[]'::jsonb
                )
            )
            WHERE collection = $1 AND id = $2
            "#,
        )
        .bind(D::COLLECTION)
        .bind(id.to_string())
        .bind(field)
        .bind(reference)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("pull_reference", e))?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, value), fields(collection = D::COLLECTION))]
    async fn find_where(
        &self,
        field: &str,
        value: &serde_json::Value,
    ) -> Result<Vec<D>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT body
            FROM documents
            WHERE collection = $1 AND body -> $2 = $3
            ORDER BY created_at, id
            "#,
        )
        .bind(D::COLLECTION)
        .bind(field)
        .bind(Json(value.clone()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_where", e))?;

        rows.iter().map(Self::decode).collect()
    }

    #[instrument(skip(self), fields(collection = D::COLLECTION))]
    async fn list(&self) -> Result<Vec<D>, StoreError> {
        let rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(D::COLLECTION)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        rows.iter().map(Self::decode).collect()
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> StoreError {
    let message = match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    };
    StoreError::Database { operation, message }
}
