//! ID types for Amuzz entities
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Backend ids arrive as JSON numbers or strings depending on the endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(f) => f.to_string(),
        }
    }
}

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new id
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the inner string
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
            }
        }
    };
}

string_id!(
    /// Track identifier, unique within a queue
    TrackId
);

string_id!(
    /// Server-assigned playlist identifier
    PlaylistId
);

/// Bearer token held by the surrounding application.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw bearer token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the token is blank
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(***)")
    }
}
