use std::ops::Deref;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::client::{CkanClient, CkanWrite};
use crate::error::{CkanError, Result, ValidationError};
use crate::model::{Dataset, Group, Nullable, Resource};
use crate::util::is_blank;

/// A [`CkanClient`] that checks writes before sending them.
///
/// CKAN accepts some malformed records without complaint (ids that are not
/// UUIDs, duplicate resource ids, broken URLs). These checks are stricter
/// than the catalog's own and may cost an extra lookup per write. Reads go
/// straight to the wrapped client.
///
/// The duplicate-id lookup and the following create are two separate
/// requests, so two callers racing on the same id can both pass the check;
/// the catalog then rejects one of them.
#[derive(Debug, Clone)]
pub struct CheckedClient {
    inner: CkanClient,
}

impl CheckedClient {
    pub fn new(inner: CkanClient) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &CkanClient {
        &self.inner
    }

    pub fn into_inner(self) -> CkanClient {
        self.inner
    }

    fn invalid(&self, message: String) -> CkanError {
        debug!(%message, "rejected write");
        ValidationError {
            message,
            client: self.inner.config().to_string(),
        }
        .into()
    }

    fn require_token(&self, what: &str) -> Result<()> {
        if is_blank(self.inner.token()) {
            return Err(self.invalid(format!(
                "tried to create {}, but no API token is configured",
                what
            )));
        }
        Ok(())
    }

    fn check_uuid(&self, what: &str, id: &str) -> Result<()> {
        Uuid::parse_str(id)
            .map(|_| ())
            .map_err(|e| self.invalid(format!("{} id {:?} is not a valid UUID: {}", what, id, e)))
    }

    /// Succeeds only when the lookup reports the id as unknown.
    fn check_free<T>(
        &self,
        what: &str,
        id: &str,
        lookup: impl FnOnce(&CkanClient, &str) -> Result<T>,
    ) -> Result<()> {
        match lookup(&self.inner, id) {
            Ok(_) => Err(self.invalid(format!("a {} with id {:?} already exists", what, id))),
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn check_url(&self, what: &str, url: &Nullable<String>) -> Result<()> {
        let Some(raw) = url.as_deref() else {
            return Err(self.invalid(format!("{} has no url", what)));
        };
        let url = Url::parse(raw)
            .map_err(|e| self.invalid(format!("{} has ill-formed url {:?}: {}", what, raw, e)))?;
        if !url.has_host() {
            return Err(self.invalid(format!("{} url {:?} has no host", what, raw)));
        }
        Ok(())
    }
}

impl Deref for CheckedClient {
    type Target = CkanClient;

    fn deref(&self) -> &CkanClient {
        &self.inner
    }
}

/// The id, if one was given and is not empty.
fn supplied_id(id: &Nullable<String>) -> Option<&str> {
    id.as_deref().filter(|id| !id.is_empty())
}

impl CkanWrite for CheckedClient {
    fn create_dataset(&self, dataset: &Dataset) -> Result<Dataset> {
        if let Some(id) = supplied_id(&dataset.id) {
            self.check_free("dataset", id, CkanClient::dataset)?;
        }
        self.inner.create_dataset(dataset)
    }

    fn update_dataset(&self, dataset: &Dataset) -> Result<Dataset> {
        self.inner.update_dataset(dataset)
    }

    fn create_resource(&self, resource: &Resource) -> Result<Resource> {
        self.require_token("a resource")?;
        if let Some(id) = supplied_id(&resource.id) {
            self.check_uuid("resource", id)?;
            self.check_free("resource", id, CkanClient::resource)?;
        }
        self.check_url("resource", &resource.url)?;
        self.inner.create_resource(resource)
    }

    fn update_resource(&self, resource: &Resource) -> Result<Resource> {
        if let Some(id) = supplied_id(&resource.id) {
            self.check_uuid("resource", id)?;
        }
        self.check_url("resource", &resource.url)?;
        self.inner.update_resource(resource)
    }

    fn create_organization(&self, organization: &Group) -> Result<Group> {
        if let Some(id) = supplied_id(&organization.id) {
            self.check_free("organization", id, CkanClient::organization)?;
        }
        self.inner.create_organization(organization)
    }

    fn create_group(&self, group: &Group) -> Result<Group> {
        if let Some(id) = supplied_id(&group.id) {
            self.check_free("group", id, CkanClient::group)?;
        }
        self.inner.create_group(group)
    }
}
