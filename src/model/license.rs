use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Nullable, Others};

/// An entry of `license_list`.
///
/// The `domain_*` and `is_*` flags are booleans on current catalogs and
/// strings on older ones, so they are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub title: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub url: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub status: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub maintainer: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub family: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub od_conformance: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub osd_conformance: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub domain_content: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub domain_data: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub domain_software: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_generic: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_okd_compliant: Nullable<Value>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub is_osi_compliant: Nullable<Value>,

    #[serde(flatten)]
    pub others: Others,
}

impl License {
    /// Whether the license is open data compliant, reading both the boolean
    /// and the textual (`"approved"`, `"True"`) encodings.
    pub fn is_open(&self) -> bool {
        let flag = |v: &Nullable<Value>| match v.as_option() {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => {
                s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("approved")
            }
            _ => false,
        };
        flag(&self.is_okd_compliant)
            || self.od_conformance.as_deref() == Some("approved")
    }
}
