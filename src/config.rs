//! Process settings read from the environment (optionally via `.env`).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/address_book";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Which `ContactStore` backs the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Postgres,
    /// Ephemeral; contents are lost on exit.
    Memory,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    /// Schema holding the `contacts` table.
    pub schema: String,
    pub store: StoreKind,
    pub max_body_bytes: usize,
    pub seed_demo_data: bool,
}

impl Settings {
    /// Read from process environment: DATABASE_URL, BIND_ADDR, DATABASE_MAX_CONNECTIONS,
    /// CONTACTS_SCHEMA, CONTACTS_STORE, MAX_BODY_BYTES, SEED_DEMO_DATA.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
            reason: "expected host:port",
        })?;

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            None => 5,
            Some(v) => match v.parse::<u32>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DATABASE_MAX_CONNECTIONS",
                        value: v,
                        reason: "expected a positive integer",
                    })
                }
            },
        };

        let schema = get("CONTACTS_SCHEMA").unwrap_or_else(|| "public".into());
        if !is_identifier(&schema) {
            return Err(ConfigError::Invalid {
                key: "CONTACTS_SCHEMA",
                value: schema,
                reason: "expected a PostgreSQL identifier",
            });
        }

        let store = match get("CONTACTS_STORE").map(|v| v.to_lowercase()).as_deref() {
            None | Some("postgres") => StoreKind::Postgres,
            Some("memory") => StoreKind::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "CONTACTS_STORE",
                    value: other.to_string(),
                    reason: "expected postgres or memory",
                })
            }
        };

        let max_body_bytes = match get("MAX_BODY_BYTES") {
            None => 64 * 1024,
            Some(v) => v.parse::<usize>().map_err(|_| ConfigError::Invalid {
                key: "MAX_BODY_BYTES",
                value: v.clone(),
                reason: "expected a byte count",
            })?,
        };

        let seed_demo_data = match get("SEED_DEMO_DATA").map(|v| v.to_lowercase()).as_deref() {
            None | Some("false") | Some("0") => false,
            Some("true") | Some("1") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "SEED_DEMO_DATA",
                    value: other.to_string(),
                    reason: "expected true or false",
                })
            }
        };

        Ok(Settings {
            database_url,
            bind_addr,
            max_connections,
            schema,
            store,
            max_body_bytes,
            seed_demo_data,
        })
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && s.len() <= 63
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.schema, "public");
        assert_eq!(s.store, StoreKind::Postgres);
        assert_eq!(s.max_body_bytes, 65536);
        assert!(!s.seed_demo_data);
    }

    #[test]
    fn overrides() {
        let s = settings(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("CONTACTS_STORE", "Memory"),
            ("SEED_DEMO_DATA", "true"),
            ("CONTACTS_SCHEMA", "address_book"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr.port(), 8080);
        assert_eq!(s.store, StoreKind::Memory);
        assert!(s.seed_demo_data);
        assert_eq!(s.schema, "address_book");
        assert_eq!(s.max_connections, 12);
    }

    #[test]
    fn invalid_values_name_the_key() {
        for (key, value) in [
            ("BIND_ADDR", "nowhere"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
            ("CONTACTS_SCHEMA", "bad-name"),
            ("CONTACTS_STORE", "redis"),
            ("SEED_DEMO_DATA", "maybe"),
        ] {
            match settings(&[(key, value)]) {
                Err(ConfigError::Invalid { key: k, .. }) => assert_eq!(k, key),
                other => panic!("{key}: expected error, got {other:?}"),
            }
        }
    }
}
