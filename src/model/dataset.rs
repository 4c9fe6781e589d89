use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{
    DateValue, Group, Nullable, Others, Pair, Resource, State, Tag, TrackingSummary, extras_map,
};

/// A CKAN dataset (a "package" in the Action API).
///
/// In DCAT terms this is a `dcat:Dataset`; its [`Resource`]s are the
/// distributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    /// Slug used in URLs, i.e. `laghi-monitorati-trento`.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub notes: Nullable<String>,
    /// Source page of the data, not the CKAN page.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub version: Nullable<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Nullable::is_absent")]
    pub kind: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub author: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub author_email: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub maintainer: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub maintainer_email: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub creator_user_id: Nullable<String>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub license_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub license_title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub license_url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub isopen: Nullable<bool>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub owner_org: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub organization: Nullable<Group>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub groups: Nullable<Vec<Group>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub tags: Nullable<Vec<Tag>>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub resources: Nullable<Vec<Resource>>,
    /// Schema-recognised custom metadata. Unexpected top-level fields go to
    /// [`Dataset::others`] instead.
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub extras: Nullable<Vec<Pair>>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub num_resources: Nullable<u32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub num_tags: Nullable<u32>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub private: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub state: Nullable<State>,

    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub metadata_created: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub metadata_modified: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub revision_id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub revision_timestamp: Nullable<DateValue>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub tracking_summary: Nullable<TrackingSummary>,

    #[serde(flatten)]
    pub others: Others,
}

impl Dataset {
    /// A dataset with only the name set, the minimum CKAN needs on create.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Nullable::Present(name.into()),
            ..Default::default()
        }
    }

    pub fn extras_map(&self) -> HashMap<String, String> {
        extras_map(&self.extras)
    }

    /// Resources, or an empty slice when the catalog sent none.
    pub fn resources(&self) -> &[Resource] {
        self.resources.as_option().map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::model::Entity;

    #[test]
    fn snake_case_wire_names() {
        let d: Dataset = serde_json::from_str(r#"{"author_email":"a@b.org"}"#).unwrap();
        assert_eq!(d.author_email.as_deref(), Some("a@b.org"));

        let mut d = Dataset::new("x");
        d.maintainer_email = "m@b.org".into();
        d.kind = "dataset".into();
        let v: Value = serde_json::from_slice(&d.to_json()).unwrap();
        assert_eq!(v["maintainer_email"], "m@b.org");
        assert_eq!(v["type"], "dataset");
    }

    #[test]
    fn unexpected_fields_are_kept() {
        let d = Dataset::from_json(br#"{"name":"n","unexpected_field":1}"#).unwrap();
        assert_eq!(d.name.as_deref(), Some("n"));
        assert_eq!(d.others.get("unexpected_field"), Some(&json!(1)));

        let v: Value = serde_json::from_slice(&d.to_json()).unwrap();
        assert_eq!(v, json!({"name": "n", "unexpected_field": 1}));
    }

    #[test]
    fn full_package_round_trips() {
        let wire = json!({
            "id": "96b8aae4e211f3e5a70cdbcbb722264256ae2e7d",
            "name": "laghi-monitorati-trento",
            "title": "Laghi monitorati Trento",
            "notes": "",
            "url": null,
            "license_id": "cc-by",
            "isopen": true,
            "private": false,
            "state": "active",
            "metadata_created": "2013-05-09T14:08:32.666477",
            "metadata_modified": "2014-01-31T09:10:11Z",
            "organization": {"name": "comune-di-trento", "is_organization": true},
            "groups": [{"name": "gestione-del-territorio", "custom": [1, 2]}],
            "tags": [{"name": "laghi", "vocabulary_id": null}],
            "extras": [{"key": "spatial", "value": "trento"}],
            "resources": [{
                "id": "c4577b8f-5603-4098-917e-da03e8ddf461",
                "format": "CSV",
                "size": null,
                "mimetype_inner": "",
                "url": "http://dati.trentino.it/storage/f/laghi.csv",
                "position": 0,
                "datastore_active": true
            }],
            "tracking_summary": {"total": 10, "recent": 2},
            "holder_name": "PAT",
            "spatial_harvester": true
        });

        let d: Dataset = serde_json::from_value(wire.clone()).unwrap();
        assert_eq!(d.resources().len(), 1);
        assert!(d.resources()[0].size.is_null());
        assert!(d.url.is_null());
        assert_eq!(d.others.len(), 2);
        assert_eq!(d.resources()[0].others["datastore_active"], json!(true));
        let groups = d.groups.as_option().unwrap();
        assert_eq!(groups[0].others["custom"], json!([1, 2]));

        let again = Dataset::from_json(&d.to_json()).unwrap();
        assert_eq!(again, d);

        // Timestamps come back in canonical form, everything else verbatim.
        let mut out: Value = serde_json::from_slice(&d.to_json()).unwrap();
        assert_eq!(out["metadata_created"], "2013-05-09T14:08:32.666477Z");
        out["metadata_created"] = wire["metadata_created"].clone();
        assert_eq!(out, wire);
    }

    #[test]
    fn extras_map_and_empty_resources() {
        let mut d = Dataset::new("x");
        assert!(d.resources().is_empty());
        d.extras = Nullable::Present(vec![Pair::new("k", "v")]);
        assert_eq!(d.extras_map().get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn blank_dates_do_not_fail_the_record() {
        let wire = json!({
            "name": "n",
            "metadata_modified": "",
            "revision_timestamp": null,
            "resources": [{"name": "r", "last_modified": "", "cache_last_updated": "ieri"}]
        });
        let d = Dataset::from_json(wire.to_string().as_bytes()).unwrap();
        assert!(d.metadata_modified.as_option().unwrap().is_empty());
        assert!(d.revision_timestamp.is_null());
        assert!(d.metadata_created.is_absent());
        assert!(d.resources()[0].last_modified.as_option().unwrap().is_empty());

        let out: Value = serde_json::from_slice(&d.to_json()).unwrap();
        assert_eq!(out, wire);
    }
}
