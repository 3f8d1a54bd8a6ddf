use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Postgres, QueryBuilder};

use super::{CalorieBound, CategoryFilter, Collection, Document, DocumentStore, Filter};
use crate::error::AppResult;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    Ok(pool)
}

#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: i64,
    category: Option<String>,
    calories: Option<i64>,
    body: Json<Value>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            category: row.category,
            calories: row.calories,
            body: row.body.0,
        }
    }
}

/// Document store backed by a single `documents` table
///
/// Each row keeps the JSON body next to the `category` and `calories` columns
/// that queries filter on.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects and applies pending migrations
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = create_pool(database_url, max_connections).await?;
        sqlx::migrate!().run(&pool).await?;
        tracing::info!(max_connections, "PostgreSQL store ready");
        Ok(Self::new(pool))
    }
}

fn select_matching(collection: Collection, filter: &Filter) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "SELECT id, category, calories, body FROM documents WHERE collection = ",
    );
    builder.push_bind(collection.as_str());

    match &filter.category {
        CategoryFilter::Any => {}
        CategoryFilter::Equals(Some(category)) => {
            builder.push(" AND category = ");
            builder.push_bind(category.clone());
        }
        CategoryFilter::Equals(None) => {
            builder.push(" AND category IS NULL");
        }
    }

    match filter.calories {
        Some(CalorieBound::Below(bound)) => {
            builder.push(" AND calories < ");
            builder.push_bind(bound);
        }
        Some(CalorieBound::AtMost(bound)) => {
            builder.push(" AND calories <= ");
            builder.push_bind(bound);
        }
        None => {}
    }

    builder
}

#[async_trait::async_trait]
impl DocumentStore for PostgresStore {
    async fn get(&self, collection: Collection, id: i64) -> AppResult<Option<Document>> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, category, calories, body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn insert(&self, collection: Collection, document: Document) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO documents (collection, id, category, calories, body) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (collection, id) DO NOTHING",
        )
        .bind(collection.as_str())
        .bind(document.id)
        .bind(document.category)
        .bind(document.calories)
        .bind(Json(document.body))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn update(&self, collection: Collection, document: Document) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE documents SET category = $3, calories = $4, body = $5 \
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(document.id)
        .bind(document.category)
        .bind(document.calories)
        .bind(Json(document.body))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, collection: Collection, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn query(&self, collection: Collection, filter: &Filter) -> AppResult<Vec<Document>> {
        let rows = select_matching(collection, filter)
            .build_query_as::<DocumentRow>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(%collection, matched = rows.len(), "Document query");

        Ok(rows.into_iter().map(Document::from).collect())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELECT: &str = "SELECT id, category, calories, body FROM documents WHERE collection = $1";

    #[test]
    fn test_select_all() {
        let builder = select_matching(Collection::Recipes, &Filter::all());
        assert_eq!(builder.sql(), SELECT);
    }

    #[test]
    fn test_select_category_below() {
        let builder = select_matching(Collection::Foods, &Filter::category_below(Some("Snack"), 300));
        assert_eq!(
            builder.sql(),
            format!("{} AND category = $2 AND calories < $3", SELECT)
        );
    }

    #[test]
    fn test_select_uncategorized_at_most() {
        let builder = select_matching(Collection::Recipes, &Filter::category_at_most(None, 500));
        assert_eq!(
            builder.sql(),
            format!("{} AND category IS NULL AND calories <= $2", SELECT)
        );
    }

    #[test]
    fn test_select_at_most() {
        let builder = select_matching(Collection::Recipes, &Filter::at_most(100));
        assert_eq!(builder.sql(), format!("{} AND calories <= $2", SELECT));
    }
}
