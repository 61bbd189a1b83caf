//! Types for search requests.

use serde::{Deserialize, Serialize};

use crate::catalog::PackageType;

/// Package-kind filter for a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeFilter {
    #[default]
    All,
    Formula,
    Cask,
}

impl TypeFilter {
    pub fn matches(&self, package_type: PackageType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Formula => package_type == PackageType::Formula,
            TypeFilter::Cask => package_type == PackageType::Cask,
        }
    }
}

/// A search request as issued by the caller-facing surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Free-text query in the mini-language.
    #[serde(default)]
    pub query: String,
    #[serde(default, rename = "type")]
    pub type_filter: TypeFilter,
    /// Explicit required tag, unioned with `#tags` parsed from the query.
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default = "default_hide_deprecated")]
    pub hide_deprecated: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            type_filter: TypeFilter::All,
            tag: None,
            favorites_only: false,
            hide_deprecated: default_hide_deprecated(),
            limit: default_limit(),
            offset: 0,
        }
    }
}

fn default_hide_deprecated() -> bool {
    true
}

fn default_limit() -> usize {
    30
}
