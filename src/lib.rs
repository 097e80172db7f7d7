//! A small Rust client for the GitBook API.
//!
//! Looks up a book's metadata and its EPUB/PDF/Mobi download links, downloads
//! one of those formats, or lists the books written by an author.
//!
//! ## Quick start
//! - Optionally authenticate via `GITBOOK_USER` / `GITBOOK_PASSWD`. Both are read
//!   once when the client is built and then cleared from the process environment.
//! - Override the API host with `GITBOOK_HOST` or a `.gitbookrc` file.
//!
//! ```no_run
//! use anyhow::Result;
//! use gitbookapi::{Client, DownloadFormat, GitBookApi};
//!
//! fn main() -> Result<()> {
//!     let client = Client::from_env()?;
//!     let book = client.get_book("jdoe", Some("mybook"))?;
//!     if let Some(url) = book.download_url(DownloadFormat::Epub) {
//!         println!("EPUB={}", url);
//!     }
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

mod client;
mod config;
mod credentials;
mod error;
mod models;
mod output;
mod report;
mod util;

pub use client::{Client, ClientConfig, GitBookApi};
pub use config::DEFAULT_HOST;
pub use credentials::{Credentials, PASSWD_VAR, USER_VAR};
pub use models::{AuthorBooks, Book, DownloadFormat};
pub use output::{format_author_books, format_book_dump, format_download_links};
pub use report::{BookOutput, Lookup, run};
pub use util::{book_identifier, reindent_json};
