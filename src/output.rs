//! Text rendering of API results. Nothing here writes to a stream.

use anyhow::{Context, Result, anyhow};

use crate::models::{AuthorBooks, Book, DownloadFormat};
use crate::util::reindent_json;

/// The whole book record, two-space indented.
pub fn format_book_dump(book: &Book) -> Result<String> {
    serde_json::to_string_pretty(book).context("failed to serialize book metadata")
}

/// One `LABEL=url` line per format, EPUB, PDF and Mobi in that order.
///
/// A format without a URL prints with an empty value.
pub fn format_download_links(book: &Book) -> String {
    DownloadFormat::ALL
        .iter()
        .map(|f| format!("{}={}\n", f.label(), book.download_url(*f).unwrap_or("")))
        .collect()
}

/// The `list` payload of an author listing, re-indented.
pub fn format_author_books(books: &AuthorBooks) -> Result<String> {
    let list = books
        .list
        .as_ref()
        .ok_or_else(|| anyhow!("response has no `list` field"))?;
    reindent_json(list.get())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_link_lines() {
        let book: Book = serde_json::from_str(
            r#"{"urls":{"download":{"epub":"e.epub","pdf":"p.pdf","mobi":"m.mobi"}}}"#,
        )
        .unwrap();
        assert_eq!(
            format_download_links(&book),
            "EPUB=e.epub\nPDF=p.pdf\nMobi=m.mobi\n"
        );
    }

    #[test]
    fn links_without_urls_are_empty() {
        let book = Book::default();
        assert_eq!(format_download_links(&book), "EPUB=\nPDF=\nMobi=\n");
    }

    #[test]
    fn dump_is_two_space_indented() {
        let book: Book =
            serde_json::from_str(r#"{"id":"jdoe/mybook","urls":{"download":{"pdf":"p.pdf"}}}"#)
                .unwrap();
        let out = format_book_dump(&book).unwrap();
        assert_eq!(
            out,
            "{\n  \"id\": \"jdoe/mybook\",\n  \"urls\": {\n    \"download\": {\n      \"pdf\": \"p.pdf\"\n    }\n  }\n}"
        );
    }

    #[test]
    fn author_list_only() {
        let books: AuthorBooks =
            serde_json::from_str(r#"{"total":2,"limit":20,"list":[{"a":1}]}"#).unwrap();
        assert_eq!(
            format_author_books(&books).unwrap(),
            "[\n  {\n    \"a\": 1\n  }\n]"
        );
    }

    #[test]
    fn author_list_null_prints_null() {
        let books: AuthorBooks = serde_json::from_str(r#"{"total":null,"list":null}"#).unwrap();
        assert_eq!(format_author_books(&books).unwrap(), "null");
    }

    #[test]
    fn dump_keeps_null_fields() {
        let json = r#"{"id":"jdoe/mybook","title":null,"urls":{"download":{"pdf":null}}}"#;
        let book: Book = serde_json::from_str(json).unwrap();
        let out = format_book_dump(&book).unwrap();
        assert!(out.contains("\n  \"title\": null,\n"));
        assert!(out.contains("\"pdf\": null"));
    }

    #[test]
    fn author_list_missing_is_an_error() {
        let books: AuthorBooks = serde_json::from_str(r#"{"total":0,"limit":20}"#).unwrap();
        assert!(format_author_books(&books).is_err());
    }
}
