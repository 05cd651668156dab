//! Contact record and the typed payloads flowing between validator, service and store.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored address-book entry. Serialized with camelCase keys (`createdAt`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Validated input for create. `id` and `created_at` are assigned by storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: Option<String>,
}

/// Validated partial update. `None` leaves a field unchanged; for the nullable
/// fields `Some(None)` clears it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<String>,
    pub address: Option<Option<String>>,
}

impl ContactChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }

    /// Apply onto an in-memory record. `id` and `created_at` are never touched.
    pub fn apply_to(&self, contact: &mut Contact) {
        if let Some(name) = &self.name {
            contact.name = name.clone();
        }
        if let Some(email) = &self.email {
            contact.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            contact.phone = phone.clone();
        }
        if let Some(address) = &self.address {
            contact.address = address.clone();
        }
    }
}

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 5;
pub const MAX_LIMIT: u32 = 100;

/// Filter and pagination window for listing. `page` and `limit` are both >= 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        ListQuery {
            search: None,
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl ListQuery {
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Case-insensitive substring match on name or phone.
    pub fn matches(&self, contact: &Contact) -> bool {
        match &self.search {
            None => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                contact.name.to_lowercase().contains(&needle) || contact.phone.to_lowercase().contains(&needle)
            }
        }
    }
}

/// One pagination window plus the count of all matching records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    pub items: Vec<Contact>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, phone: &str) -> Contact {
        Contact {
            id: 1,
            name: name.into(),
            email: None,
            phone: phone.into(),
            address: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn offset_from_page_and_limit() {
        let q = ListQuery { search: None, page: 3, limit: 5 };
        assert_eq!(q.offset(), 10);
        assert_eq!(ListQuery::default().offset(), 0);
    }

    #[test]
    fn search_matches_name_or_phone_ignoring_case() {
        let q = ListQuery {
            search: Some("ALI".into()),
            ..ListQuery::default()
        };
        assert!(q.matches(&contact("Alice", "1234567")));
        assert!(!q.matches(&contact("Bob", "7654321")));

        let q = ListQuery {
            search: Some("4567".into()),
            ..ListQuery::default()
        };
        assert!(q.matches(&contact("Bob", "1234567")));
    }

    #[test]
    fn changes_leave_identity_alone() {
        let mut c = contact("Alice", "1234567");
        let created_at = c.created_at;
        let changes = ContactChanges {
            address: Some(Some("1 Main St".into())),
            ..ContactChanges::default()
        };
        changes.apply_to(&mut c);
        assert_eq!(c.id, 1);
        assert_eq!(c.created_at, created_at);
        assert_eq!(c.name, "Alice");
        assert_eq!(c.address.as_deref(), Some("1 Main St"));
    }

    #[test]
    fn contact_serializes_camel_case() {
        let v = serde_json::to_value(contact("Alice", "1234567")).unwrap();
        assert!(v.get("createdAt").is_some());
        assert_eq!(v["email"], serde_json::Value::Null);
    }
}
