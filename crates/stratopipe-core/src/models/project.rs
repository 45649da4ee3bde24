use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A production project as returned by `projects/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Owner's username
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Absent on servers without soft delete
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Fields this client does not model, kept as sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Projects without an `active` flag count as active
    pub fn is_active(&self) -> bool {
        self.active.unwrap_or(true)
    }
}
