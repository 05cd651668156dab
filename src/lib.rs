//! Address book: validated contact CRUD over PostgreSQL, served as a JSON API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{Settings, StoreKind};
pub use error::{AppError, ConfigError};
pub use model::{Contact, ContactChanges, ListQuery, NewContact, Page};
pub use routes::{app, common_routes, contact_routes};
pub use service::{ContactService, ContactValidator, FieldErrors};
pub use state::AppState;
pub use store::{
    ensure_contacts_table, ensure_database_exists, seed_demo_contacts, ContactStore, MemoryContactStore,
    PgContactStore, StoreError,
};
