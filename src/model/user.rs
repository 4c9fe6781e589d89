use serde::{Deserialize, Serialize};

use super::{DateValue, Nullable, Others, State};

/// A catalog account as returned by `user_show` and `user_list`.
///
/// Inside group member lists `capacity` holds the member's role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub id: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub fullname: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub display_name: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub about: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub email: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub email_hash: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub openid: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub capacity: Nullable<String>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub sysadmin: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub activity_streams_email_notifications: Nullable<bool>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub number_of_edits: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub number_created_packages: Nullable<u64>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub state: Nullable<State>,
    #[serde(default, skip_serializing_if = "Nullable::is_absent")]
    pub created: Nullable<DateValue>,

    #[serde(flatten)]
    pub others: Others,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entity;

    #[test]
    fn reads_user_show_payload() {
        let u = User::from_json(
            br#"{
                "name": "admin",
                "sysadmin": true,
                "created": "2012-11-12T16:13:30.311203",
                "number_of_edits": 42,
                "apikey": "redacted",
                "state": "active"
            }"#,
        )
        .unwrap();
        assert_eq!(u.name.as_deref(), Some("admin"));
        assert_eq!(u.sysadmin, Nullable::Present(true));
        assert_eq!(u.state, Nullable::Present(State::Active));
        assert!(u.others.contains_key("apikey"));
        assert_eq!(User::from_json(&u.to_json()).unwrap(), u);
    }
}
