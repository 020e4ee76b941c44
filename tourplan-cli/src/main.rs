//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::EnvFilter;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    if let Err(err) = tourplan_cli::run() {
        eprintln!("tourplan: {err}");
        std::process::exit(1);
    }
}
