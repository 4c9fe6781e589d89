//! A blocking Rust client for the [CKAN](https://ckan.org) Action API.
//!
//! It reads and writes datasets, resources, organizations, groups, tags,
//! users and licenses, and is built to cope with real catalogs: optional and
//! undocumented fields are kept, several date layouts are accepted, and the
//! `{"success": false, ...}` replies are turned into typed errors.
//!
//! ## Quick start
//! - Point [`ClientConfig`] at the catalog root, or configure it via
//!   environment variables (`CKAN_URL`, `CKAN_TOKEN`, `CKAN_PROXY`) or a
//!   `.ckanrc` file (current directory or home directory) and call
//!   [`CkanClient::from_env`].
//! - Writes need a token and the [`CkanWrite`] trait in scope. Wrap the
//!   client in [`CheckedClient`] to validate writes before they are sent.
//!
//! ```no_run
//! use anyhow::Result;
//! use ckanapi::{CkanClient, ClientConfig, Query};
//!
//! fn main() -> Result<()> {
//!     let client = CkanClient::new(ClientConfig::new("https://dati.trentino.it"))?;
//!
//!     let dataset = client.dataset("laghi-monitorati-trento")?;
//!     for resource in dataset.resources() {
//!         println!("{:?} {:?}", resource.format, resource.url);
//!     }
//!
//!     let page = client.search_datasets(&Query::new().with_tags(["cisis"]), 10, 0)?;
//!     println!("{} datasets tagged cisis", page.count);
//!     match client.dataset("no-such-dataset") {
//!         Err(e) if e.is_not_found() => println!("not there"),
//!         other => println!("{:?}", other.map(|d| d.name)),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For full usage and configuration details, see the crate README.

#![forbid(unsafe_code)]

mod checked;
mod client;
mod config;
mod envelope;
mod error;
pub mod model;
mod query;
mod util;

#[cfg(test)]
mod test_support;

pub use checked::CheckedClient;
pub use client::{CkanClient, CkanWrite, ClientConfig};
pub use error::{
    CkanError, DecodeError, ErrorDetail, RemoteError, RequestContext, Result, ValidationError,
};
pub use model::{
    Dataset, DateValue, Entity, Group, License, Nullable, Organization, Resource, SearchResults,
    State, Tag, Timestamp, User,
};
pub use query::Query;
