//! Success response helpers.

use crate::model::{Contact, Page};
use axum::{http::StatusCode, Json};
use serde::Serialize;

/// `{"success": true}` acknowledgment for deletes.
#[derive(Serialize)]
pub struct Ack {
    pub success: bool,
}

pub fn created(contact: Contact) -> (StatusCode, Json<Contact>) {
    (StatusCode::CREATED, Json(contact))
}

pub fn ok(contact: Contact) -> (StatusCode, Json<Contact>) {
    (StatusCode::OK, Json(contact))
}

pub fn page(page: Page) -> (StatusCode, Json<Page>) {
    (StatusCode::OK, Json(page))
}

pub fn ack() -> (StatusCode, Json<Ack>) {
    (StatusCode::OK, Json(Ack { success: true }))
}
