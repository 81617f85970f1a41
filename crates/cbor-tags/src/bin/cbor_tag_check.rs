//! `cbor-tag-check`: validate the tags of one CBOR item read from stdin.
//!
//! Usage:
//!   cbor-tag-check [--reject-unknown] [--max-depth N]
//!
//! Prints a JSON report to stdout and exits with status 1 when the item is
//! rejected. Set `RUST_LOG=cbor_tags=debug` to see why.

use std::io::{self, Read, Write};

use cbor_tags::cli::{check, parse_args};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opts = match parse_args(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let mut buf = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let report = check(&buf, &opts);
    let out = match serde_json::to_string(&report) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = writeln!(io::stdout(), "{out}") {
        eprintln!("{e}");
        std::process::exit(1);
    }
    if !report.ok {
        std::process::exit(1);
    }
}
