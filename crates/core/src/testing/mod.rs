//! Testing utilities and mock implementations.
//!
//! This module provides a mock catalog fetcher and record fixtures so
//! sync and query behavior can be tested without network access.

mod mock_fetcher;

pub use mock_fetcher::MockCatalogFetcher;

/// Shared test fixtures.
pub mod fixtures {
    use crate::catalog::{Cask, Formula, FormulaVersions};

    /// A minimal formula with a name and description.
    pub fn formula(name: &str, desc: &str) -> Formula {
        Formula {
            name: name.to_string(),
            full_name: name.to_string(),
            tap: "homebrew/core".to_string(),
            desc: Some(desc.to_string()),
            homepage: format!("https://example.com/{name}"),
            versions: FormulaVersions {
                stable: Some("1.0.0".to_string()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// A formula marked deprecated.
    pub fn deprecated_formula(name: &str, desc: &str) -> Formula {
        Formula {
            deprecated: true,
            deprecation_reason: Some("unmaintained".to_string()),
            ..formula(name, desc)
        }
    }

    /// A minimal cask with a token and description.
    pub fn cask(token: &str, desc: &str) -> Cask {
        Cask {
            token: token.to_string(),
            full_token: token.to_string(),
            tap: "homebrew/cask".to_string(),
            desc: Some(desc.to_string()),
            homepage: format!("https://example.com/{token}"),
            version: "2.0.0".to_string(),
            ..Default::default()
        }
    }

    /// `count` formulae named `{prefix}-0` .. `{prefix}-{count-1}`.
    pub fn formulae_batch(prefix: &str, count: usize) -> Vec<Formula> {
        (0..count)
            .map(|i| formula(&format!("{prefix}-{i}"), "batch fixture"))
            .collect()
    }
}
