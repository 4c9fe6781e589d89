//! Typed CKAN entities.
//!
//! Every entity keeps fields it does not know about in an `others` map, so a
//! record read from one catalog can be written back without losing custom
//! schema fields. Optional fields use [`Nullable`] so that absent, `null` and
//! empty values survive a round trip unchanged.

mod dataset;
mod group;
mod license;
mod nullable;
mod resource;
mod search;
mod tag;
mod timestamp;
mod user;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

use crate::error::{CkanError, DecodeError};

pub use dataset::Dataset;
pub use group::{Group, Organization};
pub use license::License;
pub use nullable::Nullable;
pub use resource::Resource;
pub use search::{FacetItem, SearchFacet, SearchResults};
pub use tag::Tag;
pub use timestamp::{DateValue, Timestamp};
pub use user::User;

/// Fields outside the known schema, kept verbatim.
pub type Others = serde_json::Map<String, Value>;

/// Common behaviour of the wire-level entity types.
pub trait Entity: Serialize + DeserializeOwned {
    /// Decodes an entity from its JSON wire form.
    fn from_json(bytes: &[u8]) -> Result<Self, CkanError> {
        serde_json::from_slice(bytes)
            .map_err(|e| DecodeError::detached(String::from_utf8_lossy(bytes), e).into())
    }

    /// Encodes the entity, including every overflow field.
    fn to_json(&self) -> Vec<u8> {
        // Entities only contain string-keyed maps, which always serialize.
        serde_json::to_vec(self).expect("entity serialization is infallible")
    }

    fn others(&self) -> &Others;
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn others(&self) -> &Others {
                    &self.others
                }
            }
        )*
    };
}

impl_entity!(Dataset, Resource, Group, Tag, User, License);

/// Lifecycle state of a catalog object.
///
/// Catalogs with custom workflows report other values; those are kept as
/// [`State::Other`] so they encode back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum State {
    Active,
    Deleted,
    Draft,
    Other(String),
}

impl State {
    pub fn as_str(&self) -> &str {
        match self {
            State::Active => "active",
            State::Deleted => "deleted",
            State::Draft => "draft",
            State::Other(s) => s,
        }
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => State::Active,
            "deleted" => State::Deleted,
            "draft" => State::Draft,
            _ => State::Other(s),
        }
    }
}

impl From<State> for String {
    fn from(state: State) -> Self {
        match state {
            State::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A key/value entry of the `extras` list on datasets and resources.
///
/// Older catalogs attach `id`, `state` and `revision_timestamp` to each
/// entry. Those land in `others` and are sent back on update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub key: String,
    #[serde(default)]
    pub value: Value,

    #[serde(flatten)]
    pub others: Others,
}

impl Pair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Value::String(value.into()),
            others: Others::new(),
        }
    }
}

/// Page view counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingSummary {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub total: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub recent: Nullable<u64>,

    #[serde(flatten)]
    pub others: Others,
}

/// Flattens an extras list into a map, rendering non-string values as JSON.
pub(crate) fn extras_map(extras: &Nullable<Vec<Pair>>) -> HashMap<String, String> {
    extras
        .as_option()
        .map(|pairs| {
            pairs
                .iter()
                .map(|p| {
                    let value = match &p.value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (p.key.clone(), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unknown_states_survive() {
        let s: State = serde_json::from_value(json!("pending-review")).unwrap();
        assert_eq!(s, State::Other("pending-review".into()));
        assert_eq!(serde_json::to_value(&s).unwrap(), json!("pending-review"));

        let s: State = serde_json::from_value(json!("active")).unwrap();
        assert_eq!(s, State::Active);
    }

    #[test]
    fn extras_as_map() {
        let extras = Nullable::Present(vec![
            Pair::new("spatial", "trento"),
            Pair {
                key: "version".into(),
                value: json!(2),
                ..Default::default()
            },
        ]);
        let map = extras_map(&extras);
        assert_eq!(map["spatial"], "trento");
        assert_eq!(map["version"], "2");
        assert!(extras_map(&Nullable::Null).is_empty());
    }

    #[test]
    fn malformed_json_is_a_decode_error() {
        let err = Dataset::from_json(b"{\"name\": ").unwrap_err();
        assert!(matches!(err, CkanError::Decode(_)));
    }

    #[test]
    fn extras_entries_keep_their_bookkeeping() {
        let wire = json!({
            "key": "spatial",
            "value": "trento",
            "state": "active",
            "revision_timestamp": "2013-05-09T14:08:32.666477"
        });
        let pair: Pair = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(pair.key, "spatial");
        assert_eq!(pair.others["state"], json!("active"));
        assert_eq!(serde_json::to_value(&pair).unwrap(), wire);
    }

    #[test]
    fn tracking_counters_tolerate_null_and_extra_counters() {
        let wire = json!({"total": null, "recent": 1, "weekly": 2});
        let summary: TrackingSummary = serde_json::from_value(wire.clone()).unwrap();
        assert!(summary.total.is_null());
        assert_eq!(summary.recent, Nullable::Present(1));
        assert_eq!(summary.others["weekly"], json!(2));
        assert_eq!(serde_json::to_value(&summary).unwrap(), wire);
    }
}
