use anyhow::{Context, Result, bail};
use reqwest::Url;
use serde_json::Value;

/// Builds the book identifier used by `GET /book/{identifier}`: `author` or `author/book`.
///
/// An empty book name counts as absent.
pub fn book_identifier(author: &str, book: Option<&str>) -> Result<String> {
    let author = author.trim();
    if author.is_empty() {
        bail!("the GitBook author must not be empty");
    }
    match book.map(str::trim).filter(|b| !b.is_empty()) {
        Some(book) => Ok(format!("{}/{}", author, book)),
        None => Ok(author.to_string()),
    }
}

/// Appends path segments to `base`, percent-encoding each one.
pub(crate) fn endpoint_url(base: &str, segments: &[&str]) -> Result<Url> {
    let mut url =
        Url::parse(base).with_context(|| format!("invalid GitBook API host ({})", base))?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("GitBook API host cannot be a base URL ({})", base))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Whether `url` has the same scheme, host and port as `base`.
pub(crate) fn same_origin(base: &str, url: &Url) -> bool {
    Url::parse(base)
        .map(|b| b.origin() == url.origin())
        .unwrap_or(false)
}

pub(crate) fn urljoin(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

pub(crate) fn guess_filename_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().and_then(|s| {
        if s.is_empty() {
            None
        } else {
            Some(s.to_string())
        }
    })
}

/// Re-indents a JSON document with two spaces, keeping key order.
pub fn reindent_json(raw: &str) -> Result<String> {
    let value: Value = serde_json::from_str(raw).context("invalid JSON")?;
    serde_json::to_string_pretty(&value).context("failed to serialize JSON")
}
