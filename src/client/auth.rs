//! Authenticated payloads
//!
//! The remote API authenticates every mutating call through two body fields,
//! `user` and `password`. [`auth`] merges them into a request body.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Stored login of the current user
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Build an authenticated body: `{ user, password, ...extra }`.
///
/// `extra` is merged after the two auth fields, so same-named keys in `extra`
/// win. Without a credential the auth keys are absent, not null; callers must
/// not hit authenticated endpoints while signed out. `Null` is treated as an
/// empty object and any other non-object `extra` is ignored.
pub fn auth(user: Option<&Credential>, extra: Value) -> Value {
    let mut body = Map::new();

    if let Some(credential) = user {
        body.insert("user".to_string(), Value::String(credential.username.clone()));
        body.insert(
            "password".to_string(),
            Value::String(credential.password.clone()),
        );
    }

    match extra {
        Value::Object(fields) => body.extend(fields),
        Value::Null => {}
        other => {
            tracing::warn!(kind = %json_kind(&other), "Ignoring non-object auth payload");
        }
    }

    Value::Object(body)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
