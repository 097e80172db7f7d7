use anyhow::anyhow;
use reqwest::StatusCode;

#[derive(Debug, serde::Deserialize)]
pub(crate) struct GitBookErrorResponse {
    #[serde(default)]
    pub(crate) error: Option<String>,
    #[serde(default)]
    pub(crate) code: Option<u16>,
    // Some endpoints respond with {"message":...}
    #[serde(default)]
    pub(crate) message: Option<String>,
}

pub(crate) fn format_api_error(
    status: StatusCode,
    url: &str,
    e: &GitBookErrorResponse,
) -> anyhow::Error {
    let message = e
        .error
        .as_deref()
        .or(e.message.as_deref())
        .map(single_line)
        .unwrap_or_default();
    let status_in_body = e.code.unwrap_or(status.as_u16());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return anyhow!(
            "GitBook authentication/authorization failed (HTTP {}) for url ({}): {}",
            status_in_body,
            url,
            or_none(&message)
        );
    }

    if status == StatusCode::NOT_FOUND {
        return anyhow!(
            "GitBook resource not found (HTTP 404) for url ({}): {}",
            url,
            or_none(&message)
        );
    }

    anyhow!(
        "API request failed: HTTP {} for url ({}): {}",
        status_in_body,
        url,
        or_none(&message)
    )
}

/// Collapses a server-provided body to one line so an error report stays a single line.
pub(crate) fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn or_none(s: &str) -> &str {
    if s.is_empty() { "(no message)" } else { s }
}
