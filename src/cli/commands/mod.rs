//! CLI command implementations
//!
//! Exit codes: 0 success, 2 configuration error, 4 initialization error,
//! 5 export failure.

pub mod export;
pub mod init;
pub mod validate;

/// Configuration problem
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Export could not be set up
pub const EXIT_INIT_ERROR: i32 = 4;

/// Export failed while running
pub const EXIT_FATAL: i32 = 5;
