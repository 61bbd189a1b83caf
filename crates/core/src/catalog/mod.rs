//! Package catalog domain types.
//!
//! The catalog mirrors the two remote Homebrew indexes: formulae
//! (command-line tools) and casks (application bundles). Records are
//! immutable between syncs and are replaced wholesale by the sync manager.

mod types;

pub use types::*;
