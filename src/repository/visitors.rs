//! Visitors repository
//!
//! Every method borrows one connection from the pool for exactly one
//! statement. The connection goes back to the pool when it is dropped, which
//! happens on the error path too, so a failing query never starves the pool.

use async_trait::async_trait;
use sqlx::{pool::PoolConnection, Pool, Postgres};

use crate::{
    error::AppResult,
    models::visitor::{FieldValue, NewVisitor, Visitor, VisitorField, VisitorSummary},
};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS visitors (
        id SERIAL PRIMARY KEY,
        name VARCHAR(20) NOT NULL,
        age INTEGER NOT NULL,
        date_of_visit DATE NOT NULL,
        time_of_visit TIME NOT NULL,
        assistor_name VARCHAR(20) NOT NULL,
        comments VARCHAR(200)
    )
"#;

/// Storage operations needed by the visitors service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitorStore: Send + Sync {
    /// Create the `visitors` table if it is missing
    async fn create_table(&self) -> AppResult<()>;

    /// Insert a visitor and return the stored row
    async fn insert(&self, visitor: &NewVisitor) -> AppResult<Visitor>;

    /// `id` and `name` of every visitor, ordered by id
    async fn list_summaries(&self) -> AppResult<Vec<VisitorSummary>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Visitor>>;

    /// Visitor with the latest date, ties broken by the latest time
    async fn find_latest(&self) -> AppResult<Option<Visitor>>;

    /// Set one column of one row; returns the affected-row count
    async fn update_field(&self, id: i32, field: VisitorField, value: FieldValue) -> AppResult<u64>;

    /// Returns the affected-row count
    async fn delete_by_id(&self, id: i32) -> AppResult<u64>;

    /// Returns the number of deleted rows
    async fn delete_all(&self) -> AppResult<u64>;

    async fn count(&self) -> AppResult<i64>;
}

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> AppResult<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await?)
    }
}

#[async_trait]
impl VisitorStore for VisitorsRepository {
    async fn create_table(&self) -> AppResult<()> {
        let mut conn = self.acquire().await?;
        sqlx::query(CREATE_TABLE).execute(&mut *conn).await?;
        Ok(())
    }

    async fn insert(&self, visitor: &NewVisitor) -> AppResult<Visitor> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, Visitor>(
            r#"
            INSERT INTO visitors (name, age, date_of_visit, time_of_visit, assistor_name, comments)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&visitor.name)
        .bind(visitor.age)
        .bind(visitor.date_of_visit)
        .bind(visitor.time_of_visit)
        .bind(&visitor.assistor_name)
        .bind(&visitor.comments)
        .fetch_one(&mut *conn)
        .await?;

        Ok(row)
    }

    async fn list_summaries(&self) -> AppResult<Vec<VisitorSummary>> {
        let mut conn = self.acquire().await?;
        let rows = sqlx::query_as::<_, VisitorSummary>("SELECT id, name FROM visitors ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Visitor>> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, Visitor>("SELECT * FROM visitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row)
    }

    async fn find_latest(&self) -> AppResult<Option<Visitor>> {
        let mut conn = self.acquire().await?;
        let row = sqlx::query_as::<_, Visitor>(
            r#"
            SELECT * FROM visitors
            WHERE date_of_visit = (SELECT MAX(date_of_visit) FROM visitors)
            ORDER BY time_of_visit DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&mut *conn)
        .await?;
        Ok(row)
    }

    async fn update_field(&self, id: i32, field: VisitorField, value: FieldValue) -> AppResult<u64> {
        // The column name only ever comes from the VisitorField allow-list
        let query = format!("UPDATE visitors SET {} = $1 WHERE id = $2", field.column_name());

        let builder = sqlx::query(&query);
        let builder = match value {
            FieldValue::Integer(n) => builder.bind(n),
            FieldValue::Text(s) => builder.bind(s),
            FieldValue::Date(d) => builder.bind(d),
            FieldValue::Time(t) => builder.bind(t),
        };

        let mut conn = self.acquire().await?;
        let result = builder.bind(id).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    async fn delete_by_id(&self, id: i32) -> AppResult<u64> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("DELETE FROM visitors WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query("DELETE FROM visitors")
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> AppResult<i64> {
        let mut conn = self.acquire().await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM visitors")
            .fetch_one(&mut *conn)
            .await?;
        Ok(total)
    }
}
