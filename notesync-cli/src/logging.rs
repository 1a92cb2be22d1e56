// ============================================================================
// notesync-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: env_logger initialisation
//
// The application logs through the `log` facade; this module installs
// `env_logger` as the backend.
//
// USAGE:
// - default: warnings and errors only
// - -v: info (composition summaries)
// - -vv and more: debug (merge results, dispatch steps)
// - RUST_LOG overrides the level chosen from the flags

use log::LevelFilter;

/// Maps the `-v` count to a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initializes the global logger. Later calls are ignored.
pub fn init(verbosity: u8) {
    let _ = env_logger::Builder::new()
        .filter_level(level_for(verbosity))
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}
