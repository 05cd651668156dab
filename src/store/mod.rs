//! Persistence gateway: the only layer that talks to storage.

mod memory;
mod postgres;

pub use memory::MemoryContactStore;
pub use postgres::{ensure_contacts_table, ensure_database_exists, PgContactStore};

use crate::model::{Contact, ContactChanges, ListQuery, NewContact, Page};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("contact {0} not found")]
    NotFound(i64),
    #[error("database: {0}")]
    Backend(#[from] sqlx::Error),
}

/// CRUD over contacts. Implementations must assign `id` and `created_at` on
/// create and never change them afterwards.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn create(&self, contact: NewContact) -> Result<Contact, StoreError>;

    async fn get(&self, id: i64) -> Result<Contact, StoreError>;

    /// Filtered window ordered by `created_at`, then `id`. `total` ignores the window.
    async fn list(&self, query: &ListQuery) -> Result<Page, StoreError>;

    /// Apply only the provided fields. An empty change set returns the current record.
    async fn update(&self, id: i64, changes: ContactChanges) -> Result<Contact, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;

    /// Liveness check for readiness probes.
    async fn ping(&self) -> Result<(), StoreError>;
}

fn demo_contacts() -> Vec<NewContact> {
    vec![
        NewContact {
            name: "Alice".into(),
            email: Some("alice@prisma.io".into()),
            phone: "1234567890".into(),
            address: Some("123 Main St, City, Country".into()),
        },
        NewContact {
            name: "Bob".into(),
            email: Some("bob@prisma.io".into()),
            phone: "0987654321".into(),
            address: Some("456 Oak Ave, Town, Country".into()),
        },
    ]
}

/// Insert the demo contacts when the store is empty. Returns how many were inserted.
pub async fn seed_demo_contacts(store: &dyn ContactStore) -> Result<usize, StoreError> {
    let existing = store.list(&ListQuery::default()).await?;
    if existing.total > 0 {
        tracing::info!(total = existing.total, "store not empty, skipping seed");
        return Ok(0);
    }
    let mut inserted = 0;
    for contact in demo_contacts() {
        let created = store.create(contact).await?;
        tracing::debug!(id = created.id, name = %created.name, "seeded contact");
        inserted += 1;
    }
    tracing::info!(inserted, "seeded demo contacts");
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_only_fills_an_empty_store() {
        let store = MemoryContactStore::new();
        assert_eq!(seed_demo_contacts(&store).await.unwrap(), 2);
        assert_eq!(seed_demo_contacts(&store).await.unwrap(), 0);
        let page = store.list(&ListQuery::default()).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].name, "Alice");
        assert_eq!(page.items[1].name, "Bob");
    }
}
