//! Ranking and query engine.
//!
//! Parses the compact query mini-language (`#tag` filters, `*` for
//! favorites), filters records by type/tag/favorite/deprecation, scores
//! text matches, sorts with a strict total order and paginates. Pure
//! computation over the store's records and the metadata maps; parsing
//! and scoring never fail.

mod engine;
mod query;
mod score;
mod types;

pub use engine::SearchEngine;
pub use query::{parse_query, ParsedQuery};
pub use score::match_score;
pub use types::{SearchRequest, TypeFilter};
