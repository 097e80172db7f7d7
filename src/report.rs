//! Dispatches one lookup and reports the outcome.
//!
//! Results go to `out`, failures to `err` as a single line. A failed lookup is
//! reported and swallowed; only I/O errors on the streams themselves propagate.

use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::client::GitBookApi;
use crate::credentials::{PASSWD_VAR, USER_VAR};
use crate::models::DownloadFormat;
use crate::output::{format_author_books, format_book_dump, format_download_links};
use crate::util::book_identifier;

/// How a single book is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookOutput {
    /// `EPUB=…`, `PDF=…`, `Mobi=…`.
    Links,
    /// The full metadata as JSON.
    Dump,
    /// Save one format to `target` (empty: named after the URL).
    Download {
        format: DownloadFormat,
        target: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Book {
        author: String,
        book: String,
        identifier: String,
        output: BookOutput,
    },
    AuthorBooks {
        author: String,
    },
}

impl Lookup {
    /// A book lookup when `book` is given and non-empty, otherwise an author listing.
    pub fn new(author: &str, book: Option<&str>, output: BookOutput) -> Result<Self> {
        let identifier = book_identifier(author, book)?;
        let author = author.trim().to_string();
        match book.map(str::trim).filter(|b| !b.is_empty()) {
            Some(book) => Ok(Self::Book {
                author,
                book: book.to_string(),
                identifier,
                output,
            }),
            None => Ok(Self::AuthorBooks { author }),
        }
    }
}

pub fn run<A: GitBookApi + ?Sized>(
    api: &A,
    lookup: &Lookup,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    match lookup {
        Lookup::Book {
            author,
            book,
            identifier,
            output,
        } => report_book(api, author, book, identifier, output, out, err),
        Lookup::AuthorBooks { author } => report_author_books(api, author, out, err),
    }
}

fn report_book<A: GitBookApi + ?Sized>(
    api: &A,
    author: &str,
    book_name: &str,
    identifier: &str,
    output: &BookOutput,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    tracing::info!(identifier, author, "looking up book");

    let book = match api.get_book(author, Some(book_name)) {
        Ok(book) => book,
        Err(e) => return report_api_error(err, "querying the GitBook API for book", &e),
    };
    tracing::debug!(id = ?book.id(), title = ?book.title(), "book found");

    match output {
        BookOutput::Links => out.write_all(format_download_links(&book).as_bytes()),
        BookOutput::Dump => match format_book_dump(&book) {
            Ok(json) => writeln!(out, "{}", json),
            Err(e) => report_error(err, "in book's JSON response", &e),
        },
        BookOutput::Download { format, target } => {
            let Some(url) = book.download_url(*format) else {
                return writeln!(
                    err,
                    "Error: book {} has no {} download link",
                    identifier,
                    format.label()
                );
            };
            match api.download(url, target) {
                Ok(path) => writeln!(out, "{}={}", format.label(), path.display()),
                Err(e) => report_error(err, "downloading book", &e),
            }
        }
    }
}

fn report_author_books<A: GitBookApi + ?Sized>(
    api: &A,
    author: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<()> {
    tracing::info!(author, "looking up all books of author");

    let books = match api.list_author_books(author) {
        Ok(books) => books,
        Err(e) => return report_api_error(err, "querying the GitBook API for author", &e),
    };

    match format_author_books(&books) {
        Ok(json) => writeln!(out, "{}", json),
        Err(e) => report_error(err, "in author's JSON response", &e),
    }
}

fn report_error(err: &mut dyn Write, what: &str, e: &anyhow::Error) -> io::Result<()> {
    writeln!(err, "Error: {}: {:#}", what, e)
}

fn report_api_error(err: &mut dyn Write, what: &str, e: &anyhow::Error) -> io::Result<()> {
    writeln!(
        err,
        "Error: {}: {:#}. You might need to verify the values of your {} and {} environment variables.",
        what, e, USER_VAR, PASSWD_VAR
    )
}
