//! User metadata: favorites and tags.
//!
//! A service object owning in-memory mirrors of the favorite and tag
//! tables. The mirrors are rebuilt from the store at load and kept
//! consistent by writing durably first, then updating memory, with every
//! mutation serialized through one internal lock.

mod store;

pub use store::{MetadataSnapshot, UserDataError, UserDataStore};
