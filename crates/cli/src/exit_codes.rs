//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Domain    | Description                                      |
//! |------|-----------|--------------------------------------------------|
//! | 0    | Universal | Success                                          |
//! | 1    | Universal | General error (unspecified)                      |
//! | 2    | Universal | CLI usage error (bad args)                       |
//! | 3    | run       | Invalid configuration file                       |
//! | 4    | run       | Input could not be read or is missing a column   |
//! | 5    | history   | History database could not be opened or written  |
//! | 6    | run       | Discrepancies found and `--strict` was given     |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use roster_recon::ReconError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
/// clap exits with this code on its own for parse failures.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Reconciliation (3-9)
// =============================================================================

/// Config file is unreadable, is not valid TOML, or fails validation.
pub const EXIT_RECON_INVALID_CONFIG: u8 = 3;

/// An input roster could not be read, decoded or is missing a required column.
/// Also covers report export failures.
pub const EXIT_RECON_RUNTIME: u8 = 4;

/// The history database could not be opened, read or written.
pub const EXIT_RECON_STORE: u8 = 5;

/// The run finished but at least one row needs action (`--strict` only).
pub const EXIT_RECON_DISCREPANCIES: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_RECON_INVALID_CONFIG,
        ReconError::MissingColumn { .. } | ReconError::Csv { .. } | ReconError::Io(_) => {
            EXIT_RECON_RUNTIME
        }
        ReconError::Store(_) => EXIT_RECON_STORE,
        ReconError::Serialize(_) => EXIT_ERROR,
    }
}
