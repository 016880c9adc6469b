use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

/// A retailer listing tracked products (e.g. `walmart`, `target`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Retailer {
    pub id: String,
    pub name: String,
    pub base_url: String,
}

impl Retailer {
    /// Create a new Retailer
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
