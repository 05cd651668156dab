//! ContactService: validation in front of the injected store.

use crate::error::AppError;
use crate::model::{Contact, ListQuery, Page};
use crate::service::ContactValidator;
use crate::store::ContactStore;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct ContactService {
    store: Arc<dyn ContactStore>,
}

impl ContactService {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        ContactService { store }
    }

    pub fn store(&self) -> &dyn ContactStore {
        self.store.as_ref()
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page, AppError> {
        Ok(self.store.list(query).await?)
    }

    pub async fn read(&self, id: i64) -> Result<Contact, AppError> {
        Ok(self.store.get(id).await?)
    }

    /// Validate the body fully, then insert. Nothing reaches storage on validation failure.
    pub async fn create(&self, body: &Map<String, Value>) -> Result<Contact, AppError> {
        let contact = ContactValidator::validate_new(body)?;
        Ok(self.store.create(contact).await?)
    }

    /// Validate only the fields present, then apply them.
    pub async fn update(&self, id: i64, body: &Map<String, Value>) -> Result<Contact, AppError> {
        let changes = ContactValidator::validate_changes(body)?;
        Ok(self.store.update(id, changes).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        Ok(self.store.delete(id).await?)
    }
}
