//! End-to-end lookups through the public API with a canned GitBook backend.

use anyhow::{Result, bail};
use gitbookapi::{AuthorBooks, Book, BookOutput, GitBookApi, Lookup, book_identifier, run};
use std::cell::Cell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Canned {
    book: &'static str,
    books: &'static str,
    requests: Cell<usize>,
}

impl Canned {
    fn new(book: &'static str, books: &'static str) -> Self {
        Self {
            book,
            books,
            requests: Cell::new(0),
        }
    }
}

impl GitBookApi for Canned {
    fn get_book(&self, author: &str, book: Option<&str>) -> Result<Book> {
        self.requests.set(self.requests.get() + 1);
        let identifier = book_identifier(author, book)?;
        if identifier != "jdoe/mybook" {
            bail!("GitBook resource not found (HTTP 404) for url (/book/{})", identifier);
        }
        Ok(serde_json::from_str(self.book)?)
    }

    fn list_author_books(&self, _author: &str) -> Result<AuthorBooks> {
        self.requests.set(self.requests.get() + 1);
        Ok(serde_json::from_str(self.books)?)
    }

    fn download(&self, url: &str, target: &Path) -> Result<PathBuf> {
        std::fs::write(target, format!("contents of {}", url))?;
        Ok(target.to_path_buf())
    }
}

const BOOK: &str = r#"{
  "id": "jdoe/mybook",
  "title": "My Book",
  "public": true,
  "urls": {
    "homepage": "https://jdoe.gitbooks.io/mybook/",
    "download": {"epub": "e.epub", "pdf": "p.pdf", "mobi": "m.mobi"}
  }
}"#;

const BOOKS: &str = r#"{"total":2,"limit":20,"list":[{"a":1}]}"#;

fn capture(api: &Canned, lookup: &Lookup) -> (String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    run(api, lookup, &mut out, &mut err).unwrap();
    (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
}

#[test]
fn links_for_one_book() {
    let api = Canned::new(BOOK, BOOKS);
    let lookup = Lookup::new("jdoe", Some("mybook"), BookOutput::Links).unwrap();
    let (out, err) = capture(&api, &lookup);
    assert_eq!(out.lines().collect::<Vec<_>>(), ["EPUB=e.epub", "PDF=p.pdf", "Mobi=m.mobi"]);
    assert!(err.is_empty());
    assert_eq!(api.requests.get(), 1);
}

#[test]
fn dump_keeps_every_field() {
    let api = Canned::new(BOOK, BOOKS);
    let lookup = Lookup::new("jdoe", Some("mybook"), BookOutput::Dump).unwrap();
    let (out, _) = capture(&api, &lookup);
    let dumped: serde_json::Value = serde_json::from_str(&out).unwrap();
    let original: serde_json::Value = serde_json::from_str(BOOK).unwrap();
    assert_eq!(dumped, original);
    assert!(out.contains("\n  \"public\": true,\n"));
}

#[test]
fn dump_keeps_null_and_non_string_fields() {
    let book = r#"{"id":42,"title":null,"urls":{"download":{"epub":"e.epub","pdf":null}}}"#;
    let api = Canned::new(book, BOOKS);
    let lookup = Lookup::new("jdoe", Some("mybook"), BookOutput::Dump).unwrap();
    let (out, err) = capture(&api, &lookup);
    assert!(err.is_empty());
    let dumped: serde_json::Value = serde_json::from_str(&out).unwrap();
    let original: serde_json::Value = serde_json::from_str(book).unwrap();
    assert_eq!(dumped, original);
}

#[test]
fn author_listing_with_null_counts_and_list() {
    let api = Canned::new(BOOK, r#"{"total":null,"limit":null,"list":null}"#);
    let lookup = Lookup::new("jdoe", None, BookOutput::Links).unwrap();
    let (out, err) = capture(&api, &lookup);
    assert_eq!(out, "null\n");
    assert!(err.is_empty());
}

#[test]
fn author_listing() {
    let api = Canned::new(BOOK, BOOKS);
    let lookup = Lookup::new("jdoe", None, BookOutput::Links).unwrap();
    let (out, err) = capture(&api, &lookup);
    assert_eq!(out, "[\n  {\n    \"a\": 1\n  }\n]\n");
    assert!(err.is_empty());
}

#[test]
fn not_found_is_reported_not_printed() {
    let api = Canned::new(BOOK, BOOKS);
    let lookup = Lookup::new("jdoe", Some("other"), BookOutput::Links).unwrap();
    let (out, err) = capture(&api, &lookup);
    assert!(out.is_empty());
    assert_eq!(err.lines().count(), 1);
    assert!(err.contains("HTTP 404"));
}

#[test]
fn download_writes_target() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("mybook.epub");
    let api = Canned::new(BOOK, BOOKS);
    let output = BookOutput::Download {
        format: "epub".parse().unwrap(),
        target: target.clone(),
    };
    let lookup = Lookup::new("jdoe", Some("mybook"), output).unwrap();
    let (out, err) = capture(&api, &lookup);
    assert!(err.is_empty());
    assert_eq!(out, format!("EPUB={}\n", target.display()));
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "contents of e.epub");
}
