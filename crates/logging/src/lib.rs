// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

//! # Logging for the landscape tools
//!
//! Logging goes through the [`log`] facade; this crate installs
//! [`env_logger`] as the backend. Only the crates passed to [`init`] are
//! captured, at the level chosen by the caller. Setting the `RUST_LOG`
//! environment variable replaces that filter entirely:
//!
//! ```sh
//! $> RUST_LOG=landscape_storage=debug landscape import --atoms 38
//! ```

pub use log::LevelFilter;

/// The crates of this workspace, as they appear in log targets.
pub const CRATES: &[&str] = &[
    "landscape",
    "landscape_config",
    "landscape_import",
    "landscape_storage",
];

/// Level used when the user asks for nothing in particular: info in debug
/// builds, warnings only in release builds.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    }
}

/// Moves `base` up by `verbose` steps, or down to errors only when `quiet`.
pub fn adjusted_level(base: LevelFilter, verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    LevelFilter::iter()
        .skip_while(|level| *level != base)
        .nth(usize::from(verbose))
        .unwrap_or(LevelFilter::Trace)
}

/// Builds the filter string that would otherwise be given in `RUST_LOG`,
/// e.g. `landscape=info,landscape_import=info`.
pub fn filter_string(crates: &[&str], level: LevelFilter) -> String {
    let level = level.as_str().to_ascii_lowercase();
    crates
        .iter()
        .map(|name| format!("{}={}", name, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Installs the logger. Calling it again is harmless; the first call wins.
pub fn init(crates: &[&str], level: LevelFilter) {
    let filter = filter_string(crates, level);
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_millis()
        .try_init();
}


// End of File
