use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FetchError;

/// A search query as entered by the caller, trimmed of outer whitespace.
///
/// The query is the primary key of the lyrics cache, so it stays
/// case-sensitive and inner whitespace is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    /// Build a query from raw caller input.
    ///
    /// Returns [`FetchError::MissingQuery`] when the input is empty or
    /// whitespace-only.
    pub fn parse(raw: &str) -> Result<Self, FetchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FetchError::MissingQuery);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Query {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
