use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::client::ClientConfig;

pub const DEFAULT_HOST: &str = "https://api.gitbook.com";

#[derive(Debug, Default, PartialEq, Eq)]
struct RcConfig {
    host: Option<String>,
    verify: Option<bool>,
}

/// Resolves the client configuration.
///
/// Host precedence: explicit argument, `GITBOOK_HOST`, rc file, [`DEFAULT_HOST`].
/// Credentials are never part of this configuration.
pub(crate) fn load_config(host: Option<String>, verify: Option<bool>) -> Result<ClientConfig> {
    let host = host.or_else(|| non_empty_env("GITBOOK_HOST"));

    let mut rc = RcConfig::default();
    if host.is_none() || verify.is_none() {
        for rc_path in rc_candidates() {
            if rc_path.exists() {
                rc = read_rc(&rc_path).with_context(|| {
                    format!("failed to read configuration file {}", rc_path.display())
                })?;
                tracing::debug!(path = %rc_path.display(), "loaded rc file");
                break;
            }
        }
    }

    Ok(resolve(host, verify, rc))
}

fn resolve(host: Option<String>, verify: Option<bool>, rc: RcConfig) -> ClientConfig {
    ClientConfig {
        host: host
            .or(rc.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string()),
        verify: verify.or(rc.verify).unwrap_or(true),
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // `host:` may be on one line with the value on the next.
    let mut pending_host = false;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if pending_host {
            pending_host = false;
            let is_key = line.contains(':') && !line.contains("://");
            if !is_key {
                cfg.host = Some(strip_quotes(line).to_string());
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            match k.trim() {
                "host" | "url" => {
                    if !v.is_empty() {
                        cfg.host = Some(v.to_string());
                    } else {
                        pending_host = true;
                    }
                }
                "verify" => {
                    if !v.is_empty() {
                        cfg.verify = Some(v != "0");
                    }
                }
                _ => {}
            }
        }
    }

    cfg
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
    // 1) GITBOOK_RC (explicit)
    // 2) ./.gitbookrc
    // 3) ~/.gitbookrc
    if let Some(p) = non_empty_env("GITBOOK_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".gitbookrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".gitbookrc"));
    }
    v
}
