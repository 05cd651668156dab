//! Contact validation: decode a JSON object into typed create/update payloads.

use crate::model::{ContactChanges, NewContact};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Field name -> human-readable messages. Serializes as a plain JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Email,
}

/// Per-field rule. Lengths count characters.
struct FieldRule {
    field: &'static str,
    label: &'static str,
    required: bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    format: Option<Format>,
    required_message: &'static str,
    min_message: &'static str,
    max_message: &'static str,
}

const NAME: FieldRule = FieldRule {
    field: "name",
    label: "Name",
    required: true,
    min_length: Some(1),
    max_length: Some(100),
    format: None,
    required_message: "Name is required",
    min_message: "Name is required",
    max_message: "Name must be at most 100 characters",
};

const PHONE: FieldRule = FieldRule {
    field: "phone",
    label: "Phone number",
    required: true,
    min_length: Some(7),
    max_length: Some(15),
    format: None,
    required_message: "Phone number is required",
    min_message: "Phone number must be at least 7 digits",
    max_message: "Phone number must be at most 15 digits",
};

const EMAIL: FieldRule = FieldRule {
    field: "email",
    label: "Email",
    required: false,
    min_length: None,
    max_length: None,
    format: Some(Format::Email),
    required_message: "",
    min_message: "",
    max_message: "",
};

const ADDRESS: FieldRule = FieldRule {
    field: "address",
    label: "Address",
    required: false,
    min_length: None,
    max_length: None,
    format: None,
    required_message: "",
    min_message: "",
    max_message: "",
};

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .expect("email pattern is valid")
    })
}

pub struct ContactValidator;

impl ContactValidator {
    /// Full validation for create. All failing fields are reported together.
    pub fn validate_new(body: &Map<String, Value>) -> Result<NewContact, FieldErrors> {
        let mut errors = FieldErrors::new();
        let name = check_required(body.get(NAME.field), &NAME, &mut errors);
        let phone = check_required(body.get(PHONE.field), &PHONE, &mut errors);
        let email = check_optional(body.get(EMAIL.field), &EMAIL, &mut errors).flatten();
        let address = check_optional(body.get(ADDRESS.field), &ADDRESS, &mut errors).flatten();
        match (name, phone) {
            (Some(name), Some(phone)) if errors.is_empty() => Ok(NewContact {
                name,
                email,
                phone,
                address,
            }),
            _ => Err(errors),
        }
    }

    /// Validate only the fields present in body (partial update).
    pub fn validate_changes(body: &Map<String, Value>) -> Result<ContactChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let mut changes = ContactChanges::default();
        if let Some(v) = body.get(NAME.field) {
            changes.name = check_required(Some(v), &NAME, &mut errors);
        }
        if let Some(v) = body.get(PHONE.field) {
            changes.phone = check_required(Some(v), &PHONE, &mut errors);
        }
        changes.email = check_optional(body.get(EMAIL.field), &EMAIL, &mut errors);
        changes.address = check_optional(body.get(ADDRESS.field), &ADDRESS, &mut errors);
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(errors)
        }
    }
}

/// Required string field. Missing, null or blank is reported as required.
fn check_required(v: Option<&Value>, rule: &FieldRule, errors: &mut FieldErrors) -> Option<String> {
    let s = match v {
        None | Some(Value::Null) => {
            errors.add(rule.field, rule.required_message);
            return None;
        }
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            errors.add(rule.field, format!("{} must be a string", rule.label));
            return None;
        }
    };
    if s.is_empty() && rule.required {
        errors.add(rule.field, rule.required_message);
        return None;
    }
    validate_field(s, rule, errors).then(|| s.to_string())
}

/// Optional string field. Outer `None`: key absent. `Some(None)`: null or blank, stored as null.
fn check_optional(v: Option<&Value>, rule: &FieldRule, errors: &mut FieldErrors) -> Option<Option<String>> {
    match v? {
        Value::Null => Some(None),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(None);
            }
            validate_field(s, rule, errors).then(|| Some(s.to_string()))
        }
        _ => {
            errors.add(rule.field, format!("{} must be a string", rule.label));
            None
        }
    }
}

fn validate_field(s: &str, rule: &FieldRule, errors: &mut FieldErrors) -> bool {
    let before = errors.get(rule.field).map_or(0, <[String]>::len);
    let len = s.chars().count();
    if let Some(min) = rule.min_length {
        if len < min {
            errors.add(rule.field, rule.min_message);
        }
    }
    if let Some(max) = rule.max_length {
        if len > max {
            errors.add(rule.field, rule.max_message);
        }
    }
    if rule.format == Some(Format::Email) && !email_regex().is_match(s) {
        errors.add(rule.field, "Invalid email address");
    }
    errors.get(rule.field).map_or(0, <[String]>::len) == before
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn minimal_contact_is_valid() {
        let c = ContactValidator::validate_new(&obj(json!({ "name": "Alice", "phone": "1234567" }))).unwrap();
        assert_eq!(c.name, "Alice");
        assert_eq!(c.phone, "1234567");
        assert_eq!(c.email, None);
        assert_eq!(c.address, None);
    }

    #[test]
    fn empty_email_and_address_become_null() {
        let c = ContactValidator::validate_new(&obj(json!({
            "name": "Bob", "phone": "0987654321", "email": "", "address": "  "
        })))
        .unwrap();
        assert_eq!(c.email, None);
        assert_eq!(c.address, None);
    }

    #[test]
    fn empty_name_is_reported() {
        let errs = ContactValidator::validate_new(&obj(json!({ "name": "", "phone": "1234567" }))).unwrap_err();
        assert_eq!(errs.get("name"), Some(&["Name is required".to_string()][..]));
        assert!(errs.get("phone").is_none());
    }

    #[test]
    fn all_failing_fields_reported_together() {
        let errs = ContactValidator::validate_new(&obj(json!({
            "name": "x".repeat(101), "phone": "123", "email": "not-an-email"
        })))
        .unwrap_err();
        assert_eq!(errs.len(), 3);
        assert_eq!(errs.get("name").unwrap()[0], "Name must be at most 100 characters");
        assert_eq!(errs.get("phone").unwrap()[0], "Phone number must be at least 7 digits");
        assert_eq!(errs.get("email").unwrap()[0], "Invalid email address");
    }

    #[test]
    fn phone_length_bounds() {
        let ok = |p: &str| ContactValidator::validate_new(&obj(json!({ "name": "A", "phone": p }))).is_ok();
        assert!(ok("1234567"));
        assert!(ok("123456789012345"));
        assert!(!ok("123456"));
        assert!(!ok("1234567890123456"));
        assert!(ok("+1 555-0100"));
    }

    #[test]
    fn lengths_count_characters() {
        let name: String = "é".repeat(100);
        assert!(ContactValidator::validate_new(&obj(json!({ "name": name, "phone": "1234567" }))).is_ok());
    }

    #[test]
    fn non_string_fields_rejected() {
        let errs = ContactValidator::validate_new(&obj(json!({ "name": 42, "phone": "1234567", "address": [] }))).unwrap_err();
        assert_eq!(errs.get("name").unwrap()[0], "Name must be a string");
        assert_eq!(errs.get("address").unwrap()[0], "Address must be a string");
    }

    #[test]
    fn email_syntax() {
        for good in ["alice@prisma.io", "a.b+c@sub.example.co.uk"] {
            assert!(email_regex().is_match(good), "{good}");
        }
        for bad in ["alice", "alice@", "@prisma.io", "alice@prisma", "a b@c.io", "a..b@x.io", ".a@x.io", "a.@x.io"] {
            assert!(!email_regex().is_match(bad), "{bad}");
        }
    }

    #[test]
    fn changes_only_touch_present_fields() {
        let c = ContactValidator::validate_changes(&obj(json!({ "address": "1 Main St" }))).unwrap();
        assert_eq!(
            c,
            ContactChanges {
                address: Some(Some("1 Main St".into())),
                ..ContactChanges::default()
            }
        );
        assert!(ContactValidator::validate_changes(&obj(json!({}))).unwrap().is_empty());
    }

    #[test]
    fn changes_can_clear_optional_fields() {
        let c = ContactValidator::validate_changes(&obj(json!({ "email": "", "address": null }))).unwrap();
        assert_eq!(c.email, Some(None));
        assert_eq!(c.address, Some(None));
    }

    #[test]
    fn changes_cannot_null_required_fields() {
        let errs = ContactValidator::validate_changes(&obj(json!({ "name": null, "phone": "12" }))).unwrap_err();
        assert_eq!(errs.get("name").unwrap()[0], "Name is required");
        assert_eq!(errs.get("phone").unwrap()[0], "Phone number must be at least 7 digits");
    }

    #[test]
    fn unknown_keys_ignored() {
        let c = ContactValidator::validate_new(&obj(json!({
            "id": 99, "createdAt": "x", "name": "Alice", "phone": "1234567"
        })))
        .unwrap();
        assert_eq!(c.name, "Alice");
    }
}
