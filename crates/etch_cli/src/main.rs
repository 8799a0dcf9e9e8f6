//! etch-schema command line
//!
//! ```text
//! etch-schema schema <file> [options]      Print schemas as JSON
//! etch-schema markdown <file> [options]    Print Markdown tables
//! ```
//!
//! Logging goes to stderr and is controlled with `ETCH_LOG`
//! (e.g. `ETCH_LOG=etch_schema=debug`).

mod schema;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter = EnvFilter::try_from_env("ETCH_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    match args.first().map(String::as_str) {
        Some("schema") => schema::run(schema::Format::Json, &args[1..]),
        Some("markdown") | Some("md") => schema::run(schema::Format::Markdown, &args[1..]),
        Some("--version") | Some("-V") => {
            println!("etch-schema {}", etch_schema::VERSION);
            Ok(())
        }
        Some("--help") | Some("-h") | Some("help") | None => {
            schema::usage();
            Ok(())
        }
        Some(other) => {
            schema::usage();
            anyhow::bail!("Unknown command: {}", other)
        }
    }
}
