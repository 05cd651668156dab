//! Builds parameterized INSERT, SELECT, UPDATE, DELETE for the contacts table.

use crate::model::{ContactChanges, ListQuery, NewContact};
use crate::sql::BindValue;

/// Quote identifier for PostgreSQL (identifiers come from settings, never from requests).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

pub const CONTACTS_TABLE: &str = "contacts";

/// Columns in wire order; `created_at` maps to `Contact::created_at`.
const COLUMNS: &[&str] = &["id", "name", "email", "phone", "address", "created_at"];

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: BindValue) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

fn select_column_list() -> String {
    COLUMNS.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

/// Escape LIKE metacharacters so the search text matches literally, then wrap in `%`.
pub fn like_pattern(search: &str) -> String {
    let mut out = String::with_capacity(search.len() + 2);
    out.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// WHERE clause for the optional name/phone search. Pushes at most one param.
fn search_clause(q: &mut QueryBuf, search: Option<&str>) -> String {
    match search {
        None => String::new(),
        Some(s) => {
            let n = q.push_param(BindValue::Text(Some(like_pattern(s))));
            format!(
                " WHERE ({} ILIKE ${n} ESCAPE '\\' OR {} ILIKE ${n} ESCAPE '\\')",
                quoted("name"),
                quoted("phone"),
            )
        }
    }
}

/// SELECT by primary key.
pub fn select_by_id(table: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::BigInt(id));
    q.sql = format!("SELECT {} FROM {} WHERE {} = ${}", select_column_list(), table, quoted("id"), n);
    q
}

/// SELECT one pagination window, ORDER BY created_at then id.
pub fn select_page(table: &str, query: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = search_clause(&mut q, query.search.as_deref());
    let limit = q.push_param(BindValue::BigInt(i64::from(query.limit)));
    let offset = q.push_param(BindValue::BigInt(i64::try_from(query.offset()).unwrap_or(i64::MAX)));
    q.sql = format!(
        "SELECT {} FROM {}{} ORDER BY {}, {} LIMIT ${} OFFSET ${}",
        select_column_list(),
        table,
        where_clause,
        quoted("created_at"),
        quoted("id"),
        limit,
        offset
    );
    q
}

/// COUNT of all rows matching the search, regardless of window.
pub fn count(table: &str, query: &ListQuery) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = search_clause(&mut q, query.search.as_deref());
    q.sql = format!("SELECT COUNT(*) FROM {}{}", table, where_clause);
    q
}

/// INSERT; id and created_at come from column defaults.
pub fn insert(table: &str, contact: &NewContact) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values = [
        ("name", Some(contact.name.clone())),
        ("email", contact.email.clone()),
        ("phone", Some(contact.phone.clone())),
        ("address", contact.address.clone()),
    ];
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for (name, value) in values {
        let n = q.push_param(BindValue::Text(value));
        cols.push(quoted(name));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        table,
        cols.join(", "),
        placeholders.join(", "),
        select_column_list()
    );
    q
}

/// UPDATE by id: SET only the provided fields. Without changes this is a plain SELECT by id.
pub fn update(table: &str, id: i64, changes: &ContactChanges) -> QueryBuf {
    if changes.is_empty() {
        return select_by_id(table, id);
    }
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    let fields = [
        ("name", changes.name.clone().map(Some)),
        ("email", changes.email.clone()),
        ("phone", changes.phone.clone().map(Some)),
        ("address", changes.address.clone()),
    ];
    for (name, value) in fields {
        let Some(value) = value else { continue };
        let n = q.push_param(BindValue::Text(value));
        sets.push(format!("{} = ${}", quoted(name), n));
    }
    let id_param = q.push_param(BindValue::BigInt(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ${} RETURNING {}",
        table,
        sets.join(", "),
        quoted("id"),
        id_param,
        select_column_list()
    );
    q
}

/// DELETE by id, returning the id so a miss is detectable.
pub fn delete(table: &str, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(BindValue::BigInt(id));
    q.sql = format!("DELETE FROM {} WHERE {} = ${} RETURNING {}", table, quoted("id"), n, quoted("id"));
    q
}

/// Idempotent DDL for the contacts table and its ordering index.
pub fn create_table(schema: &str) -> Vec<String> {
    let table = qualified_table(schema, CONTACTS_TABLE);
    vec![
        format!("CREATE SCHEMA IF NOT EXISTS {}", quoted(schema)),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                "id" BIGSERIAL PRIMARY KEY,
                "name" TEXT NOT NULL,
                "email" TEXT,
                "phone" TEXT NOT NULL,
                "address" TEXT,
                "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS {} ON {} ({}, {})",
            quoted("contacts_created_at_id_idx"),
            table,
            quoted("created_at"),
            quoted("id")
        ),
    ]
}
