//! Ephemeral in-process store for development and tests.

use super::{ContactStore, StoreError};
use crate::model::{Contact, ContactChanges, ListQuery, NewContact, Page};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Contact>,
}

/// Contacts keyed by id. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct MemoryContactStore {
    inner: RwLock<Inner>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        MemoryContactStore::default()
    }

    // Poisoning is ignored: every mutation completes before its guard drops.
    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ContactStore for MemoryContactStore {
    async fn create(&self, contact: NewContact) -> Result<Contact, StoreError> {
        let mut inner = self.write();
        inner.next_id += 1;
        let stored = Contact {
            id: inner.next_id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            address: contact.address,
            created_at: Utc::now(),
        };
        inner.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get(&self, id: i64) -> Result<Contact, StoreError> {
        self.read().rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, query: &ListQuery) -> Result<Page, StoreError> {
        let inner = self.read();
        let mut matching: Vec<&Contact> = inner.rows.values().filter(|c| query.matches(c)).collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let total = matching.len() as u64;
        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(Page { items, total })
    }

    async fn update(&self, id: i64, changes: ContactChanges) -> Result<Contact, StoreError> {
        let mut inner = self.write();
        let row = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        changes.apply_to(row);
        Ok(row.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.write().rows.remove(&id).map(|_| ()).ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
