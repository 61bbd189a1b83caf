//! Search engine: filter, score, sort, paginate.

use std::sync::Arc;

use crate::catalog::PackageRecord;
use crate::metrics;
use crate::store::{PackageStore, StoreError};
use crate::userdata::UserDataStore;

use super::query::parse_query;
use super::score::match_score;
use super::types::SearchRequest;

struct ScoredRecord {
    record: PackageRecord,
    score: f64,
}

/// Stateless query engine over the store's records and the metadata maps.
pub struct SearchEngine {
    store: Arc<dyn PackageStore>,
    userdata: Arc<UserDataStore>,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn PackageStore>, userdata: Arc<UserDataStore>) -> Self {
        Self { store, userdata }
    }

    /// Run a search and return one page of records.
    ///
    /// The whole eligible record set is filtered, scored and sorted
    /// before slicing; score ordering is global, so there is no early
    /// termination.
    pub fn search(&self, request: &SearchRequest) -> Result<Vec<PackageRecord>, StoreError> {
        metrics::SEARCH_EXECUTIONS.inc();
        let timer = metrics::SEARCH_DURATION.start_timer();

        let mut matches = self.collect_matches(request)?;
        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.record.id.cmp(&b.record.id))
                .then_with(|| a.record.package_type.cmp(&b.record.package_type))
        });

        let page = matches
            .into_iter()
            .skip(request.offset)
            .take(request.limit)
            .map(|scored| scored.record)
            .collect();

        timer.observe_duration();
        Ok(page)
    }

    /// Total number of records matching the request's filters.
    ///
    /// Shares the predicate with [`search`](Self::search) so page counts
    /// always agree with visible results.
    pub fn count(&self, request: &SearchRequest) -> Result<usize, StoreError> {
        Ok(self.collect_matches(request)?.len())
    }

    fn collect_matches(&self, request: &SearchRequest) -> Result<Vec<ScoredRecord>, StoreError> {
        let parsed = parse_query(&request.query);
        let snapshot = self.userdata.snapshot();

        let mut required_tags = parsed.tags;
        if let Some(tag) = &request.tag {
            required_tags.push(tag.to_lowercase());
        }
        let require_favorites = request.favorites_only || parsed.favorites_only;

        let mut matches = Vec::new();
        for record in self.store.all_packages()? {
            if !request.type_filter.matches(record.package_type) {
                continue;
            }

            let key = record.key();
            if require_favorites && !snapshot.favorites.contains(&key) {
                continue;
            }

            if !required_tags.is_empty() {
                let item_tags = snapshot.tags.get(&key);
                // Every required tag must be a case-insensitive substring
                // of at least one of the record's tags.
                let satisfied = required_tags.iter().all(|required| {
                    item_tags.is_some_and(|tags| {
                        tags.iter().any(|tag| tag.to_lowercase().contains(required))
                    })
                });
                if !satisfied {
                    continue;
                }
            }

            if request.hide_deprecated && (record.deprecated || record.disabled) {
                continue;
            }

            if parsed.text.is_empty() {
                matches.push(ScoredRecord { record, score: 0.0 });
            } else {
                let score = match_score(&parsed.text, &record.id, record.desc.as_deref());
                if score > 0.0 {
                    matches.push(ScoredRecord { record, score });
                }
            }
        }

        Ok(matches)
    }
}
