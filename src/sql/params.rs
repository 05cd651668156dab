//! Typed query parameters and binding onto sqlx queries.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{QueryAs, QueryScalar};

/// A value bound to a PostgreSQL query. Contact columns are either TEXT or BIGINT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    Text(Option<String>),
    BigInt(i64),
}

/// Bind a list of `BindValue`s in placeholder order.
pub trait BindParams: Sized {
    fn bind_value(self, v: &BindValue) -> Self;

    fn bind_all(self, params: &[BindValue]) -> Self {
        params.iter().fold(self, |q, p| q.bind_value(p))
    }
}

impl<'q, O> BindParams for QueryAs<'q, Postgres, O, PgArguments> {
    fn bind_value(self, v: &BindValue) -> Self {
        match v {
            BindValue::Text(s) => self.bind(s.clone()),
            BindValue::BigInt(n) => self.bind(*n),
        }
    }
}

impl<'q, O> BindParams for QueryScalar<'q, Postgres, O, PgArguments> {
    fn bind_value(self, v: &BindValue) -> Self {
        match v {
            BindValue::Text(s) => self.bind(s.clone()),
            BindValue::BigInt(n) => self.bind(*n),
        }
    }
}
