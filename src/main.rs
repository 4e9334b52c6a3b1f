//! bookvault CLI entry point
//!
//! All work is delegated to `cli::run`. Errors go to stderr with a
//! non-zero exit code.

use bookvault::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
