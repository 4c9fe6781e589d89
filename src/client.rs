use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};
use url::Url;

use crate::config::load_config;
use crate::envelope;
use crate::error::{CkanError, DecodeError, RequestContext, Result};
use crate::model::{Dataset, Group, License, Resource, SearchResults, Tag, User};
use crate::query::Query;
use crate::util::{action_url, normalize_base_url, normalize_proxy};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Where and how to reach a catalog.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    url: String,
    token: Option<String>,
    proxy: Option<String>,
}

impl ClientConfig {
    /// `url` is the catalog root, i.e. `https://dati.trentino.it`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: normalize_base_url(&url.into()),
            token: None,
            proxy: None,
        }
    }

    /// API token, needed for writes and for reading private data.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = Some(token.trim().to_string()).filter(|t| !t.is_empty());
        self
    }

    /// Outbound proxy as `host:port` or a full URL.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        let proxy = proxy.into();
        self.proxy = Some(proxy.trim().to_string()).filter(|p| !p.is_empty());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }
}

// Never print the token itself: this text ends up in error messages.
impl fmt::Display for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "url={}, token={}, proxy={}",
            self.url,
            if self.token.is_some() { "<set>" } else { "<none>" },
            self.proxy.as_deref().unwrap_or("<none>")
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("proxy", &self.proxy)
            .finish()
    }
}

/// Blocking client for the CKAN Action API (v3).
///
/// The client holds only immutable configuration and a pooled HTTP client,
/// so one instance can be shared between threads. Every call is a single
/// round trip: there is no caching and no retry, so transient failures reach
/// the caller unchanged.
#[derive(Debug, Clone)]
pub struct CkanClient {
    config: ClientConfig,
    timeout: Duration,
    http: HttpClient,
}

impl CkanClient {
    /// Creates a client using environment variables and/or `.ckanrc`.
    ///
    /// See [`CkanClient::from_parts`] for the lookup order.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_parts(None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`token`/`proxy` arguments
    /// - environment variables `CKAN_URL` / `CKAN_TOKEN` / `CKAN_PROXY`
    /// - config file from `CKAN_RC`, `./.ckanrc` or `~/.ckanrc`
    pub fn from_parts(
        url: Option<String>,
        token: Option<String>,
        proxy: Option<String>,
    ) -> anyhow::Result<Self> {
        let cfg = load_config(url, token, proxy)?;
        Ok(Self::new(cfg)?)
    }

    pub fn new(config: ClientConfig) -> Result<Self> {
        let base = Url::parse(&config.url).map_err(|e| {
            CkanError::Config(format!("invalid catalog url {:?}: {}", config.url, e))
        })?;
        // `localhost:5000` parses with `localhost` as the scheme.
        if !matches!(base.scheme(), "http" | "https") || !base.has_host() {
            return Err(CkanError::Config(format!(
                "catalog url {:?} must be an http(s) url with a host",
                config.url
            )));
        }

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("ckanapi-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("ckanapi-rs")),
        );

        let mut builder = HttpClient::builder().default_headers(default_headers);

        // Only the configured proxy is used; HTTP_PROXY and friends are ignored.
        builder = match config.proxy() {
            Some(proxy) => {
                let proxy = reqwest::Proxy::all(normalize_proxy(proxy)).map_err(|e| {
                    CkanError::Config(format!("invalid proxy {:?}: {}", proxy, e))
                })?;
                builder.proxy(proxy)
            }
            None => builder.no_proxy(),
        };

        let http = builder
            .build()
            .map_err(|e| CkanError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            timeout: DEFAULT_TIMEOUT,
            http,
        })
    }

    /// Deadline applied to each request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self) -> &str {
        self.config.url()
    }

    pub fn token(&self) -> Option<&str> {
        self.config.token()
    }

    /// The Action API version the catalog advertises at `/api/3`.
    pub fn api_version(&self) -> Result<u32> {
        #[derive(serde::Deserialize)]
        struct ApiVersion {
            version: u32,
        }

        let endpoint = format!("{}/api/3", self.config.url());
        let context = self.context(&endpoint);
        debug!(method = "GET", endpoint = %endpoint, "calling catalog");
        let (status, text) = self.send(self.http.get(&endpoint), &context)?;

        serde_json::from_str::<ApiVersion>(&text)
            .map(|v| v.version)
            .map_err(|e| {
                DecodeError::new(
                    status.as_u16(),
                    &text,
                    &context,
                    format!("not an API version document: {}", e),
                    Some(e),
                )
                .into()
            })
    }

    /// Names of all public datasets.
    pub fn dataset_list(&self) -> Result<Vec<String>> {
        self.get("package_list", &[])
    }

    /// Names of datasets, `limit` at a time starting from `offset`.
    ///
    /// Page boundaries are only stable if the catalog's own ordering is.
    pub fn dataset_list_page(&self, limit: usize, offset: usize) -> Result<Vec<String>> {
        self.get(
            "package_list",
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
    }

    /// Fetches a dataset by id or name.
    pub fn dataset(&self, id_or_name: &str) -> Result<Dataset> {
        self.get("package_show", &[("id", id_or_name.to_string())])
    }

    pub fn resource(&self, id: &str) -> Result<Resource> {
        self.get("resource_show", &[("id", id.to_string())])
    }

    pub fn organization_list(&self) -> Result<Vec<Group>> {
        self.get("organization_list", &[("all_fields", "True".to_string())])
    }

    pub fn organization_names(&self) -> Result<Vec<String>> {
        self.get("organization_list", &[])
    }

    pub fn organization(&self, id_or_name: &str) -> Result<Group> {
        self.get("organization_show", &[("id", id_or_name.to_string())])
    }

    pub fn group_list(&self) -> Result<Vec<Group>> {
        self.get("group_list", &[("all_fields", "True".to_string())])
    }

    pub fn group_names(&self) -> Result<Vec<String>> {
        self.get("group_list", &[])
    }

    pub fn group(&self, id_or_name: &str) -> Result<Group> {
        self.get("group_show", &[("id", id_or_name.to_string())])
    }

    pub fn tag_list(&self) -> Result<Vec<Tag>> {
        self.get("tag_list", &[("all_fields", "True".to_string())])
    }

    /// Tag names containing `query`, or all tag names when it is empty.
    pub fn tag_names(&self, query: &str) -> Result<Vec<String>> {
        if query.is_empty() {
            self.get("tag_list", &[])
        } else {
            self.get("tag_list", &[("query", query.to_string())])
        }
    }

    pub fn user_list(&self) -> Result<Vec<User>> {
        self.get("user_list", &[])
    }

    pub fn user(&self, id_or_name: &str) -> Result<User> {
        self.get("user_show", &[("id", id_or_name.to_string())])
    }

    pub fn license_list(&self) -> Result<Vec<License>> {
        self.get("license_list", &[])
    }

    /// Runs a faceted dataset search. `count` in the result is the total
    /// number of matches, of which at most `limit` are returned.
    pub fn search_datasets(
        &self,
        query: &Query,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResults<Dataset>> {
        let mut params = query.to_params();
        params.push(("rows", limit.to_string()));
        params.push(("start", offset.to_string()));
        self.get("package_search", &params)
    }

    pub fn search_datasets_by_text(
        &self,
        text: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchResults<Dataset>> {
        self.search_datasets(&Query::new().with_text(text), limit, offset)
    }

    /// Distinct resource formats used in the catalog, most common first.
    pub fn formats(&self) -> Result<Vec<String>> {
        let page: SearchResults<Dataset> = self.get(
            "package_search",
            &[
                ("rows", "0".to_string()),
                ("facet.field", r#"["res_format"]"#.to_string()),
                ("facet.limit", "-1".to_string()),
            ],
        )?;

        let mut items = page
            .facet("res_format")
            .map(|f| f.items.clone())
            .unwrap_or_default();
        items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
        Ok(items.into_iter().map(|i| i.name).collect())
    }

    fn get<T: DeserializeOwned>(&self, action: &str, params: &[(&str, String)]) -> Result<T> {
        let mut url = Url::parse(&action_url(self.config.url(), action)).map_err(|e| {
            CkanError::Config(format!("cannot build url for action {}: {}", action, e))
        })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }

        let context = self.context(url.as_str());
        debug!(method = "GET", endpoint = %url, "calling catalog");
        let (status, text) = self.send(self.http.get(url), &context)?;
        envelope::decode(status, &text, &context)
    }

    fn post<B, T>(&self, action: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = action_url(self.config.url(), action);
        let context = self.context(&url);
        debug!(method = "POST", endpoint = %url, "calling catalog");
        let (status, text) = self.send(self.http.post(&url).json(body), &context)?;
        envelope::decode(status, &text, &context)
    }

    fn send(&self, req: RequestBuilder, context: &RequestContext) -> Result<(StatusCode, String)> {
        let transport = |source: reqwest::Error| CkanError::Transport {
            endpoint: context.endpoint.clone(),
            source,
        };

        let resp = self
            .apply_auth(req)
            .timeout(self.timeout)
            .send()
            .map_err(transport)?;
        let status = resp.status();
        let text = resp.text().map_err(transport)?;
        trace!(status = status.as_u16(), bytes = text.len(), "catalog replied");
        Ok((status, text))
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.token() {
            Some(token) => req.header(AUTHORIZATION, token),
            None => req,
        }
    }

    fn context(&self, endpoint: &str) -> RequestContext {
        RequestContext {
            endpoint: endpoint.to_string(),
            client: self.config.to_string(),
        }
    }
}

/// Operations that change catalog state.
///
/// Implemented by [`CkanClient`], which sends them as-is, and by
/// [`CheckedClient`](crate::CheckedClient), which validates first.
pub trait CkanWrite {
    fn create_dataset(&self, dataset: &Dataset) -> Result<Dataset>;

    /// Replaces the dataset identified by `id` or `name`. Fields left out
    /// are cleared by CKAN, so send a full record.
    fn update_dataset(&self, dataset: &Dataset) -> Result<Dataset>;

    fn create_resource(&self, resource: &Resource) -> Result<Resource>;

    fn update_resource(&self, resource: &Resource) -> Result<Resource>;

    fn create_organization(&self, organization: &Group) -> Result<Group>;

    fn create_group(&self, group: &Group) -> Result<Group>;
}

impl CkanWrite for CkanClient {
    fn create_dataset(&self, dataset: &Dataset) -> Result<Dataset> {
        self.post("package_create", dataset)
    }

    fn update_dataset(&self, dataset: &Dataset) -> Result<Dataset> {
        self.post("package_update", dataset)
    }

    fn create_resource(&self, resource: &Resource) -> Result<Resource> {
        self.post("resource_create", resource)
    }

    fn update_resource(&self, resource: &Resource) -> Result<Resource> {
        self.post("resource_update", resource)
    }

    fn create_organization(&self, organization: &Group) -> Result<Group> {
        self.post("organization_create", organization)
    }

    fn create_group(&self, group: &Group) -> Result<Group> {
        self.post("group_create", group)
    }
}
