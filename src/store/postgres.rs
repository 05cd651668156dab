//! PostgreSQL-backed contact store and database bootstrap.

use super::{ContactStore, StoreError};
use crate::model::{Contact, ContactChanges, ListQuery, NewContact, Page};
use crate::sql::{self, BindParams, QueryBuf};
use async_trait::async_trait;
use sqlx::{ConnectOptions, PgConnection, PgPool, Postgres};
use std::str::FromStr;

/// Contacts persisted in `<schema>.contacts` through an injected pool.
#[derive(Clone)]
pub struct PgContactStore {
    pool: PgPool,
    table: String,
}

impl PgContactStore {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgContactStore {
            pool,
            table: sql::qualified_table(schema, sql::CONTACTS_TABLE),
        }
    }

    async fn fetch_one(&self, q: &QueryBuf) -> Result<Option<Contact>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = sqlx::query_as::<Postgres, Contact>(&q.sql)
            .bind_all(&q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn fetch_many_tx(tx: &mut PgConnection, q: &QueryBuf) -> Result<Vec<Contact>, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let rows = sqlx::query_as::<Postgres, Contact>(&q.sql)
            .bind_all(&q.params)
            .fetch_all(&mut *tx)
            .await?;
        Ok(rows)
    }

    async fn fetch_count_tx(tx: &mut PgConnection, q: &QueryBuf) -> Result<u64, StoreError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let n = sqlx::query_scalar::<Postgres, i64>(&q.sql)
            .bind_all(&q.params)
            .fetch_one(&mut *tx)
            .await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }
}

#[async_trait]
impl ContactStore for PgContactStore {
    async fn create(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let q = sql::insert(&self.table, &contact);
        let row = self
            .fetch_one(&q)
            .await?
            .ok_or(StoreError::Backend(sqlx::Error::RowNotFound))?;
        tracing::info!(id = row.id, "contact created");
        Ok(row)
    }

    async fn get(&self, id: i64) -> Result<Contact, StoreError> {
        let q = sql::select_by_id(&self.table, id);
        self.fetch_one(&q).await?.ok_or(StoreError::NotFound(id))
    }

    /// Count and window read from one snapshot so `total` agrees with `items`.
    async fn list(&self, query: &ListQuery) -> Result<Page, StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
            .execute(&mut *tx)
            .await?;
        let total = Self::fetch_count_tx(&mut tx, &sql::count(&self.table, query)).await?;
        let items = if query.offset() >= total {
            Vec::new()
        } else {
            Self::fetch_many_tx(&mut tx, &sql::select_page(&self.table, query)).await?
        };
        tx.commit().await?;
        Ok(Page { items, total })
    }

    async fn update(&self, id: i64, changes: ContactChanges) -> Result<Contact, StoreError> {
        let q = sql::update(&self.table, id, &changes);
        let row = self.fetch_one(&q).await?.ok_or(StoreError::NotFound(id))?;
        tracing::info!(id, "contact updated");
        Ok(row)
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        let q = sql::delete(&self.table, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let deleted = sqlx::query_scalar::<Postgres, i64>(&q.sql)
            .bind_all(&q.params)
            .fetch_optional(&self.pool)
            .await?;
        match deleted {
            Some(_) => {
                tracing::info!(id, "contact deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Create the contacts schema, table and ordering index if missing.
pub async fn ensure_contacts_table(pool: &PgPool, schema: &str) -> Result<(), StoreError> {
    for ddl in sql::create_table(schema) {
        tracing::debug!(sql = %ddl.trim(), "ddl");
        sqlx::query(&ddl).execute(pool).await?;
    }
    Ok(())
}

/// Create the database named in `database_url` when it does not exist yet.
/// Connects to the server's `postgres` maintenance database to do so.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let Some((admin_url, db_name)) = split_db_name(database_url) else {
        return Ok(());
    };
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `postgres://host/db?opts` into (`postgres://host/postgres?opts`, `db`).
fn split_db_name(url: &str) -> Option<(String, String)> {
    let scheme_end = url.find("://")? + 3;
    let path_start = scheme_end + url[scheme_end..].find('/')? + 1;
    let (base, rest) = url.split_at(path_start);
    let (db_name, query) = match rest.split_once('?') {
        Some((db, q)) => (db, Some(q)),
        None => (rest, None),
    };
    let admin_url = match query {
        Some(q) => format!("{}postgres?{}", base, q),
        None => format!("{}postgres", base),
    };
    Some((admin_url, db_name.trim().to_string()))
}
