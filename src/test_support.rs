use serde_json::{Value, json};

use crate::client::{CkanClient, ClientConfig};

pub(crate) fn action_path(action: &str) -> String {
    format!("/api/3/action/{}", action)
}

pub(crate) fn client_for(server: &mockito::Server, token: Option<&str>) -> CkanClient {
    let mut cfg = ClientConfig::new(server.url());
    if let Some(token) = token {
        cfg = cfg.with_token(token);
    }
    CkanClient::new(cfg).unwrap()
}

pub(crate) fn success(result: Value) -> String {
    json!({
        "help": "http://ckan.test/api/3/action/help_show",
        "success": true,
        "result": result
    })
    .to_string()
}

pub(crate) fn failure(kind: &str) -> String {
    json!({
        "help": "http://ckan.test/api/3/action/help_show",
        "success": false,
        "error": {"__type": kind, "message": kind}
    })
    .to_string()
}
