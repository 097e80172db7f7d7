//! gitbookapi — print GitBook download links, dump book metadata, or list an author's books.

mod cli;

use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

use cli::{Cli, normalize_args};
use gitbookapi::{Client, Lookup, run};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gitbookapi=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));
    init_tracing(cli.verbose);
    if !cli.ignored.is_empty() {
        tracing::debug!(ignored = ?cli.ignored, "ignoring arguments after the flags");
    }

    let Some(author) = cli.author() else {
        eprintln!("The GitBook 'author' argument must be provided in the command-line.");
        std::process::exit(1);
    };

    let lookup = match Lookup::new(author, cli.book.as_deref(), cli.book_output()) {
        Ok(lookup) => lookup,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let client = match Client::new(cli.host.clone(), None) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    if let Err(e) = run(&client, &lookup, &mut stdout.lock(), &mut io::stderr()) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            eprintln!("Error: writing output: {}", e);
            std::process::exit(1);
        }
    }
}
