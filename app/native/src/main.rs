#![allow(clippy::multiple_crate_versions)]

//! `CarrotPlay` command-line entry point.
//!
//! Every invocation runs a CLI command; the pane UI is hosted by the
//! embedding launcher through the library.

fn main() {
    if let Err(err) = carrotplay_lib::cli::run() {
        eprintln!("carrotplay: {err}");
        std::process::exit(1);
    }
}
