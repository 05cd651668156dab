//! Contact CRUD handlers: list, create, read, update, delete.

use crate::error::AppError;
use crate::model::{ListQuery, DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};
use crate::response;
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str.trim().parse().map_err(|_| AppError::BadRequest("Invalid id".into()))
}

/// Path segments that fail to decode (e.g. invalid UTF-8) are bad ids, not extractor text.
fn path_id(path: Result<Path<String>, PathRejection>) -> Result<i64, AppError> {
    match path {
        Ok(Path(id_str)) => parse_id(&id_str),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected path");
            Err(AppError::BadRequest("Invalid id".into()))
        }
    }
}

fn body_to_map(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    match body {
        Ok(Json(Value::Object(m))) => Ok(m),
        Ok(_) => Err(AppError::BadRequest("body must be a JSON object".into())),
        Err(JsonRejection::BytesRejection(rejection)) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!(error = %rejection, "request body over limit");
            Err(AppError::PayloadTooLarge)
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected request body");
            Err(AppError::BadRequest("Invalid JSON body".into()))
        }
    }
}

/// Positive integer query parameter. Absent or blank falls back to `default`.
fn positive_param(params: &HashMap<String, String>, key: &str, default: u32) -> Result<u32, AppError> {
    match params.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(v) => match v.parse::<u32>() {
            Ok(n) if n >= 1 => Ok(n),
            _ => Err(AppError::BadRequest(format!("{} must be a positive integer", key))),
        },
    }
}

/// `?query=&page=&limit=`: blank query means no filter, limit is clamped to `MAX_LIMIT`.
pub fn parse_list_query(params: &HashMap<String, String>) -> Result<ListQuery, AppError> {
    let search = params
        .get("query")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let page = positive_param(params, "page", DEFAULT_PAGE)?;
    let limit = positive_param(params, "limit", DEFAULT_LIMIT)?.min(MAX_LIMIT);
    Ok(ListQuery { search, page, limit })
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = parse_list_query(&params)?;
    let page = state.contacts.list(&query).await?;
    Ok(response::page(page))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = body_to_map(body)?;
    let contact = state.contacts.create(&body).await?;
    Ok(response::created(contact))
}

pub async fn read(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let contact = state.contacts.read(id).await?;
    Ok(response::ok(contact))
}

pub async fn update(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    let body = body_to_map(body)?;
    let contact = state.contacts.update(id, &body).await?;
    Ok(response::ok(contact))
}

pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = path_id(path)?;
    state.contacts.delete(id).await?;
    Ok(response::ack())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn list_query_defaults() {
        let q = parse_list_query(&params(&[])).unwrap();
        assert_eq!(q, ListQuery { search: None, page: 1, limit: 5 });
        let q = parse_list_query(&params(&[("query", "  "), ("page", ""), ("limit", "")])).unwrap();
        assert_eq!(q, ListQuery::default());
    }

    #[test]
    fn list_query_parses_and_clamps() {
        let q = parse_list_query(&params(&[("query", " ali "), ("page", "3"), ("limit", "500")])).unwrap();
        assert_eq!(q.search.as_deref(), Some("ali"));
        assert_eq!(q.page, 3);
        assert_eq!(q.limit, MAX_LIMIT);
    }

    #[test]
    fn list_query_rejects_non_numeric_and_zero() {
        for bad in [("page", "abc"), ("page", "0"), ("limit", "-1"), ("limit", "2.5")] {
            let err = parse_list_query(&params(&[bad])).unwrap_err();
            assert!(matches!(err, AppError::BadRequest(ref m) if m.starts_with(bad.0)), "{bad:?}");
        }
    }

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(AppError::BadRequest(ref m)) if m == "Invalid id"));
        assert!(parse_id("1.5").is_err());
    }
}
