//! CLI argument definitions via clap derive.
use clap::{ArgAction, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

use gitbookapi::{BookOutput, DownloadFormat};

/// Query the GitBook API for a book's download links, or list an author's books.
#[derive(Debug, Parser)]
#[command(name = "gitbookapi", version)]
pub struct Cli {
    /// The GitBook account which authored the book.
    #[arg(long, value_name = "AUTHOR")]
    pub author: Option<String>,

    /// The name of the GitBook book belonging to that author.
    /// Without it, all books of the author are listed.
    #[arg(long, value_name = "BOOK")]
    pub book: Option<String>,

    /// Dump all details of the book besides the URLs to download it.
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_name = "BOOL",
        value_parser = parse_go_bool
    )]
    pub dump: bool,

    /// Download the book in this format (epub, pdf or mobi) instead of printing links.
    #[arg(long, value_name = "FORMAT", value_parser = parse_format, conflicts_with = "dump")]
    pub download: Option<DownloadFormat>,

    /// Where to save the download. Defaults to the file name in the download URL.
    #[arg(long, value_name = "PATH", requires = "download")]
    pub output: Option<PathBuf>,

    /// GitBook API host (overrides GITBOOK_HOST and .gitbookrc).
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,

    /// Print debug diagnostics to stderr.
    #[arg(long)]
    pub verbose: bool,

    /// Flag parsing stops at the first non-flag argument; it and everything
    /// after it are ignored.
    #[arg(hide = true, trailing_var_arg = true, num_args = 1..)]
    pub ignored: Vec<String>,
}

impl Cli {
    /// The author, if given and non-empty.
    pub fn author(&self) -> Option<&str> {
        self.author
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }

    pub fn book_output(&self) -> BookOutput {
        match self.download {
            Some(format) => BookOutput::Download {
                format,
                target: self.output.clone().unwrap_or_default(),
            },
            None if self.dump => BookOutput::Dump,
            None => BookOutput::Links,
        }
    }
}

const LONG_FLAGS: &[&str] = &[
    "author", "book", "dump", "download", "output", "host", "verbose", "help", "version",
];

/// Rewrites Go-style single-dash long flags (`-author=x`, `-dump`) to `--author=x`, `--dump`.
///
/// Arguments after a bare `--` are left alone.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        let Some(s) = arg.to_str() else {
            out.push(arg);
            continue;
        };
        if s == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        let is_single_dash_long = s.starts_with('-')
            && !s.starts_with("--")
            && LONG_FLAGS.contains(&s[1..].split('=').next().unwrap_or(""));
        if is_single_dash_long {
            out.push(OsString::from(format!("-{}", s)));
        } else {
            out.push(arg);
        }
    }
    out
}

/// Same spellings as Go's `strconv.ParseBool`.
fn parse_go_bool(s: &str) -> Result<bool, String> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(format!("invalid boolean value [{}]", other)),
    }
}

fn parse_format(s: &str) -> Result<DownloadFormat, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}
