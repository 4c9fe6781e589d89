use serde::{Deserialize, Serialize};

use super::{Dataset, DateValue, Nullable, Others, Pair, State, User};

/// A CKAN group or organization.
///
/// Both share one wire shape and differ only in `is_organization`. An
/// organization owns datasets, while a group is a loose thematic collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    /// Lower case slug, i.e. `management-of-territory`.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub display_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub image_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub image_display_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_organization: Nullable<bool>,
    #[serde(default, rename = "type", skip_serializing_if = "Nullable::is_absent")]
    pub kind: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub approval_status: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub state: Nullable<State>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub created: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub revision_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub package_count: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub num_followers: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub packages: Nullable<Vec<Dataset>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub users: Nullable<Vec<User>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub extras: Nullable<Vec<Pair>>,

    #[serde(flatten)]
    pub others: Others,
}

/// Organizations use the same representation as groups.
pub type Organization = Group;

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Nullable::Present(name.into()),
            ..Default::default()
        }
    }

    /// An organization with the minimum CKAN needs to create it.
    pub fn organization(name: impl Into<String>) -> Self {
        Self {
            is_organization: Nullable::Present(true),
            ..Self::new(name)
        }
    }

    pub fn is_organization(&self) -> bool {
        self.is_organization.as_option().copied().unwrap_or(false)
    }
}
