use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    token: Option<String>,
    proxy: Option<String>,
}

pub(crate) fn load_config(
    url: Option<String>,
    token: Option<String>,
    proxy: Option<String>,
) -> Result<ClientConfig> {
    let mut url = url.or_else(|| env_var("CKAN_URL"));
    let mut token = token.or_else(|| env_var("CKAN_TOKEN"));
    let mut proxy = proxy.or_else(|| env_var("CKAN_PROXY"));

    let rc_candidates = rc_candidates();

    if url.is_none() || token.is_none() || proxy.is_none() {
        for rc_path in &rc_candidates {
            if rc_path.exists() {
                let cfg = read_rc(rc_path).with_context(|| {
                    format!("failed to read configuration file {}", rc_path.display())
                })?;
                tracing::debug!(path = %rc_path.display(), "loaded catalog configuration file");

                url = url.or(cfg.url);
                token = token.or(cfg.token);
                proxy = proxy.or(cfg.proxy);
                break;
            }
        }
    }

    let Some(url) = url else {
        if !rc_candidates.is_empty() {
            bail!(
                "Missing configuration: url (set CKAN_URL or put `url:` in one of: {})",
                rc_candidates
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        bail!("Missing configuration: url (set CKAN_URL or create .ckanrc)");
    };

    let mut cfg = ClientConfig::new(url);
    if let Some(token) = token {
        cfg = cfg.with_token(token);
    }
    if let Some(proxy) = proxy {
        cfg = cfg.with_proxy(proxy);
    }
    Ok(cfg)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // Support formatting where `token:` is on one line and the value is on the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            // Continuation value line. URLs contain colons, so only a
            // recognised `key:` prefix ends the continuation.
            if rc_key(line).is_none() {
                set(&mut cfg, pk, strip_quotes(line));
                continue;
            }
        }

        if let Some((k, v)) = rc_key(line) {
            let v = strip_quotes(v);
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                set(&mut cfg, k, v);
            }
        }
    }

    cfg
}

fn rc_key(line: &str) -> Option<(&'static str, &str)> {
    let (k, v) = line.split_once(':')?;
    let key = match k.trim() {
        "url" => "url",
        "token" | "key" => "token",
        "proxy" => "proxy",
        _ => return None,
    };
    Some((key, v.trim()))
}

fn set(cfg: &mut RcConfig, key: &str, value: &str) {
    let value = Some(value.to_string());
    match key {
        "url" => cfg.url = value,
        "token" => cfg.token = value,
        "proxy" => cfg.proxy = value,
        _ => {}
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) CKAN_RC (explicit)
    // 2) ./.ckanrc
    // 3) ~/.ckanrc
    if let Ok(p) = std::env::var("CKAN_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".ckanrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".ckanrc"));
    }
    v
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_rc_lines() {
        let cfg = parse_rc(
            "# catalog\nurl: https://dati.trentino.it\ntoken: \"9630625b-43e1-45f0-baa2-35bc7e685f5a\"\nproxy: proxy.local:3128\nverbose: yes\n",
        );
        assert_eq!(
            cfg,
            RcConfig {
                url: Some("https://dati.trentino.it".into()),
                token: Some("9630625b-43e1-45f0-baa2-35bc7e685f5a".into()),
                proxy: Some("proxy.local:3128".into()),
            }
        );
    }

    #[test]
    fn value_on_following_line() {
        let cfg = parse_rc("url:\n  'http://ckan.test'\ntoken:\nabc\n");
        assert_eq!(cfg.url.as_deref(), Some("http://ckan.test"));
        assert_eq!(cfg.token.as_deref(), Some("abc"));
    }

    #[test]
    fn legacy_key_name_is_a_token() {
        let cfg = parse_rc("key: abc");
        assert_eq!(cfg.token.as_deref(), Some("abc"));
        assert_eq!(cfg.url, None);
    }

    #[test]
    fn explicit_arguments_win() {
        let cfg = load_config(
            Some("http://ckan.test/".into()),
            Some("tok".into()),
            Some("proxy.local:3128".into()),
        )
        .unwrap();
        assert_eq!(cfg.url(), "http://ckan.test");
        assert_eq!(cfg.token(), Some("tok"));
        assert_eq!(cfg.proxy(), Some("proxy.local:3128"));
    }
}
