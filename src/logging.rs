// src/logging.rs
// =============================================================================
// Structured logging setup.
//
// Logs go to stderr so that `--json` output on stdout stays parseable.
// RUST_LOG always wins over the built-in default.
// =============================================================================

use tracing_subscriber::EnvFilter;

// Installs the global subscriber
//
// Defaults to `wiki_pathfinder=warn`, or `wiki_pathfinder=debug` when
// `verbose` is set. Calling it twice is harmless.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "wiki_pathfinder=debug"
    } else {
        "wiki_pathfinder=warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // try_init so a second call doesn't panic
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
