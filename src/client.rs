use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::header::{HeaderMap, HeaderValue, RANGE, USER_AGENT};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::config::load_config;
use crate::credentials::Credentials;
use crate::error::{GitBookErrorResponse, format_api_error, single_line};
use crate::models::{AuthorBooks, Book};
use crate::util::{endpoint_url, guess_filename_from_url, same_origin, urljoin};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base GitBook API URL, typically `https://api.gitbook.com`.
    pub host: String,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

/// The calls the command-line front-end makes against GitBook.
pub trait GitBookApi {
    /// `GET /book/{author}/{book}`, or `GET /book/{author}` without a book name.
    fn get_book(&self, author: &str, book: Option<&str>) -> Result<Book>;

    /// `GET /author/{author}/books`.
    fn list_author_books(&self, author: &str) -> Result<AuthorBooks>;

    /// Streams `url` into `target` and returns the path written.
    ///
    /// A relative `url` is resolved against the API host.
    fn download(&self, url: &str, target: &Path) -> Result<PathBuf>;
}

#[derive(Debug, Clone)]
pub struct Client {
    host: String,
    credentials: Option<Credentials>,

    http: HttpClient,
}

impl Client {
    /// Creates a client from the environment.
    ///
    /// This is equivalent to `Client::new(None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::new(None, None)
    }

    /// Creates a client using `host`/`verify` when given, otherwise `GITBOOK_HOST`
    /// or `.gitbookrc`, and authenticates with `GITBOOK_USER` / `GITBOOK_PASSWD`
    /// if set. The two credential variables are cleared once read.
    pub fn new(host: Option<String>, verify: Option<bool>) -> Result<Self> {
        let credentials = Credentials::take_from_env();
        let cfg = load_config(host, verify)?;
        Self::with_config(cfg, credentials)
    }

    /// Creates a client from an explicit configuration. `None` credentials
    /// means anonymous access. Credentials are not checked until the first request.
    pub fn with_config(cfg: ClientConfig, credentials: Option<Credentials>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("gitbookapi-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("gitbookapi-rs")),
        );

        let mut builder = HttpClient::builder().default_headers(default_headers);
        if !cfg.verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().context("failed to build HTTP client")?;

        tracing::debug!(
            host = %cfg.host,
            authenticated = credentials.is_some(),
            "GitBook client ready"
        );

        Ok(Self {
            host: cfg.host,
            credentials,
            http,
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub(crate) fn book_url(&self, author: &str, book: Option<&str>) -> Result<Url> {
        match book {
            Some(book) => endpoint_url(&self.host, &["book", author, book]),
            None => endpoint_url(&self.host, &["book", author]),
        }
    }

    pub(crate) fn author_books_url(&self, author: &str) -> Result<Url> {
        endpoint_url(&self.host, &["author", author, "books"])
    }

    /// Adds Basic auth, but only for requests to the API host itself.
    fn apply_auth(&self, req: RequestBuilder, url: &Url) -> RequestBuilder {
        match &self.credentials {
            Some(c) if same_origin(&self.host, url) => {
                req.basic_auth(&c.username, Some(&c.password))
            }
            _ => req,
        }
    }

    /// The GET for a download, resolved against the host, resuming from `existing` bytes.
    pub(crate) fn download_request(&self, url: &str, existing: u64) -> Result<RequestBuilder> {
        let url = Url::parse(&urljoin(&self.host, url))
            .with_context(|| format!("invalid download url ({})", url))?;
        let mut req = self.apply_auth(self.http.get(url.clone()), &url);
        if existing > 0 {
            req = req.header(RANGE, format!("bytes={}-", existing));
        }
        Ok(req)
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(%url, "GET");
        let resp = self
            .apply_auth(self.http.get(url.clone()), &url)
            .send()
            .with_context(|| format!("could not connect to {}", url))?;

        let status = resp.status();
        tracing::debug!(%url, %status, "response");
        let text = resp.text().context("failed to read response body")?;
        if !status.is_success() {
            if let Ok(err_json) = serde_json::from_str::<GitBookErrorResponse>(&text) {
                return Err(format_api_error(status, url.as_str(), &err_json));
            }

            bail!(
                "API request failed: HTTP {} for url ({}): {}",
                status,
                url,
                single_line(&text)
            );
        }

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("failed to parse API JSON (url={}, status={})", url, status))
    }

    fn progress_bar(&self, total: Option<u64>, position: u64) -> Result<ProgressBar> {
        let pb = match total {
            Some(total) => {
                let pb = ProgressBar::new(total);
                pb.set_style(
                    ProgressStyle::with_template(
                        "{spinner:.green} {bytes}/{total_bytes} ({bytes_per_sec}) {wide_bar} {eta}",
                    )
                    .context("invalid progress bar template")?
                    .progress_chars("=>-"),
                );
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::with_template("{spinner:.green} {bytes} ({bytes_per_sec})")
                        .context("invalid progress bar template")?,
                );
                pb
            }
        };
        pb.set_position(position);
        Ok(pb)
    }
}

impl GitBookApi for Client {
    fn get_book(&self, author: &str, book: Option<&str>) -> Result<Book> {
        let url = self.book_url(author, book)?;
        self.get_json(url)
    }

    fn list_author_books(&self, author: &str) -> Result<AuthorBooks> {
        let url = self.author_books_url(author)?;
        let books: AuthorBooks = self.get_json(url)?;
        tracing::info!(total = ?books.total, limit = ?books.limit, "author listing");
        Ok(books)
    }

    fn download(&self, url: &str, target: &Path) -> Result<PathBuf> {
        let resolved = urljoin(&self.host, url);
        let target = download_target(&resolved, target);

        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory {}", parent.display()))?;
            }
        }

        // A partial file left by an interrupted run is resumed.
        let existing = match std::fs::metadata(&target) {
            Ok(m) if m.is_file() => m.len(),
            _ => 0,
        };

        let req = self.download_request(&resolved, existing)?;
        tracing::debug!(url = %resolved, target = %target.display(), resume_from = existing, "download");
        let resp = req
            .send()
            .with_context(|| format!("could not connect to {}", resolved))?;

        if existing > 0 && resp.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            tracing::info!(target = %target.display(), "already downloaded");
            return Ok(target);
        }

        let mut resp = resp.error_for_status().context("download request failed")?;
        let append = existing > 0 && resp.status() == StatusCode::PARTIAL_CONTENT;
        let offset = if append { existing } else { 0 };

        let mut out = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&target)
            .with_context(|| format!("failed to open {}", target.display()))?;

        let pb = self.progress_bar(resp.content_length().map(|len| len + offset), offset)?;

        let mut buf = [0u8; 64 * 1024];
        loop {
            let n = resp.read(&mut buf).context("download interrupted")?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])
                .with_context(|| format!("failed to write {}", target.display()))?;
            pb.inc(n as u64);
        }
        out.flush()?;

        pb.finish_and_clear();
        Ok(target)
    }
}

/// An empty target means "name the file after the URL".
pub(crate) fn download_target(url: &str, target: &Path) -> PathBuf {
    if target.as_os_str().is_empty() {
        guess_filename_from_url(url)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("download"))
    } else {
        target.to_path_buf()
    }
}
