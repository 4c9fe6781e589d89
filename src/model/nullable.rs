use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A field that CKAN may send as a value, as `null`, or not at all.
///
/// Catalogs are inconsistent about which of the three they use, and some
/// writes behave differently depending on it, so the distinction is kept
/// instead of collapsing everything into an `Option`.
///
/// Struct fields of this type are declared with
/// `#[serde(default, skip_serializing_if = "Nullable::is_absent")]`, so a
/// missing key decodes to [`Nullable::Absent`] and is omitted again on encode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Nullable<T> {
    #[default]
    Absent,
    Null,
    Present(T),
}

impl<T> Nullable<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Nullable::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Nullable::Null)
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Nullable::Present(_))
    }

    /// Borrows the value, treating `null` and absence alike.
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Nullable::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Nullable::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mut(&mut self) -> Option<&mut T> {
        match self {
            Nullable::Present(v) => Some(v),
            _ => None,
        }
    }
}

impl Nullable<String> {
    pub fn as_deref(&self) -> Option<&str> {
        self.as_option().map(String::as_str)
    }
}

impl<T> From<T> for Nullable<T> {
    fn from(value: T) -> Self {
        Nullable::Present(value)
    }
}

impl From<&str> for Nullable<String> {
    fn from(value: &str) -> Self {
        Nullable::Present(value.to_string())
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Nullable::Present(v) => serializer.serialize_some(v),
            // Absent fields are skipped by the container; reaching here means
            // the caller serialized the wrapper directly.
            Nullable::Null | Nullable::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Nullable::Present(v),
            None => Nullable::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Holder {
        #[serde(default, skip_serializing_if = "Nullable::is_absent")]
        size: Nullable<String>,
    }

    #[test]
    fn three_states_decode_distinctly() {
        let absent: Holder = serde_json::from_str("{}").unwrap();
        let null: Holder = serde_json::from_str(r#"{"size":null}"#).unwrap();
        let empty: Holder = serde_json::from_str(r#"{"size":""}"#).unwrap();

        assert_eq!(absent.size, Nullable::Absent);
        assert_eq!(null.size, Nullable::Null);
        assert_eq!(empty.size, Nullable::Present(String::new()));
    }

    #[test]
    fn three_states_encode_distinctly() {
        let out = |size| serde_json::to_string(&Holder { size }).unwrap();

        assert_eq!(out(Nullable::Absent), "{}");
        assert_eq!(out(Nullable::Null), r#"{"size":null}"#);
        assert_eq!(out(Nullable::from("")), r#"{"size":""}"#);
    }

    #[test]
    fn option_views() {
        let v: Nullable<String> = "x".into();
        assert_eq!(v.as_deref(), Some("x"));
        assert_eq!(Nullable::<String>::Null.as_deref(), None);
        assert!(Nullable::<u32>::Absent.into_option().is_none());
    }
}
