//! Dashboard view state and the timer records it displays

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A timer record reported by the remote server.
///
/// The dashboard only cares about how many records there are and in which
/// order they arrived; everything else stays in `attributes` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerResource {
    pub id: String,
    #[serde(default)]
    pub attributes: Value,
}

impl TimerResource {
    pub fn new(id: impl Into<String>, attributes: Value) -> Self {
        Self {
            id: id.into(),
            attributes,
        }
    }

    /// Table number reported by the device, when present
    pub fn table_number(&self) -> Option<u64> {
        self.attributes.get("table_number").and_then(Value::as_u64)
    }
}

/// What the dashboard should show right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ViewState {
    Loading,
    Empty,
    Error { message: String },
    Populated { items: Vec<TimerResource> },
}

impl ViewState {
    /// Settle a successful fetch: no items is `Empty`, anything else is
    /// `Populated` with the items in the order they were returned.
    pub fn from_items(items: Vec<TimerResource>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Populated { items }
        }
    }

    /// Number of items on screen
    pub fn item_count(&self) -> usize {
        match self {
            Self::Populated { items } => items.len(),
            _ => 0,
        }
    }

    /// Short name of the active variant, used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Empty => "empty",
            Self::Error { .. } => "error",
            Self::Populated { .. } => "populated",
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::Loading
    }
}
