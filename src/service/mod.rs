//! ContactService and the request validator it runs before storage.

mod crud;
mod validation;
pub use crud::ContactService;
pub use validation::{ContactValidator, FieldErrors};
