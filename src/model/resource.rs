use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{DateValue, Nullable, Others, Pair, State, TrackingSummary, extras_map};

/// Metadata describing one physical file or API endpoint of a [`Dataset`].
///
/// `package_id` refers back to the owning dataset. CKAN omits it on some
/// reads but requires it on create.
///
/// [`Dataset`]: super::Dataset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Usually a UUID, i.e. `c4577b8f-5603-4098-917e-da03e8ddf461`.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub package_id: Nullable<String>,
    /// Human readable name. Some catalogs leave it null and use the
    /// description instead.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub description: Nullable<String>,
    /// Location of the physical file.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub url_type: Nullable<String>,
    /// Upper case on recent catalogs (`CSV`), lower case on older ones.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub format: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub mimetype: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub mimetype_inner: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub hash: Nullable<String>,
    /// Byte count for files in CKAN storage, a number or a numeric string
    /// depending on the version, free text elsewhere.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub size: Nullable<Value>,
    /// `api`, `file`, `file.upload` have been observed.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub resource_type: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub resource_group_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub position: Nullable<u32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub owner: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub state: Nullable<State>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub extras: Nullable<Vec<Pair>>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub created: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub last_modified: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub cache_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub cache_last_updated: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub webstore_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub webstore_last_updated: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub revision_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub revision_timestamp: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub tracking_summary: Nullable<TrackingSummary>,

    #[serde(flatten)]
    pub others: Others,
}

impl Resource {
    /// A resource with the fields CKAN requires on create.
    pub fn new(
        format: impl Into<String>,
        name: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
        package_id: impl Into<String>,
    ) -> Self {
        Self {
            format: Nullable::Present(format.into()),
            name: Nullable::Present(name.into()),
            url: Nullable::Present(url.into()),
            description: Nullable::Present(description.into()),
            package_id: Nullable::Present(package_id.into()),
            ..Default::default()
        }
    }

    pub fn extras_map(&self) -> HashMap<String, String> {
        extras_map(&self.extras)
    }

    /// The size in bytes, when the catalog reported one.
    pub fn size_bytes(&self) -> Option<u64> {
        match self.size.as_option()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}
