use serde::{Deserialize, Serialize};

use super::{DateValue, Nullable, Others, State};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub display_name: Nullable<String>,
    /// Null for free tags.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub vocabulary_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub state: Nullable<State>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub revision_timestamp: Nullable<DateValue>,

    #[serde(flatten)]
    pub others: Others,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Nullable::Present(name.into()),
            ..Default::default()
        }
    }
}
