use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Nullable, Others};

/// One page of a `package_search`, with the total number of matches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults<T> {
    /// Total matches on the catalog, not the size of this page.
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<T>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub search_facets: Nullable<BTreeMap<String, SearchFacet>>,

    #[serde(flatten)]
    pub others: Others,
}

impl<T> SearchResults<T> {
    pub fn facet(&self, field: &str) -> Option<&SearchFacet> {
        self.search_facets.as_option()?.get(field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFacet {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub title: Nullable<String>,
    #[serde(default)]
    pub items: Vec<FacetItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacetItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub display_name: Nullable<String>,
    #[serde(default)]
    pub count: u64,
}
