//! Input handling module
//!
//! Tracks raw keyboard state and maps it onto movement intent.

mod state;

pub use state::Input;
