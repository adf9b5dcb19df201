//! Predicate evaluation and visible-set memoization.

use std::sync::Arc;

use indexmap::IndexSet;

use crate::entry::Record;
use crate::job::JobId;

use super::predicate::Predicate;
use super::state::FilterState;

/// Evaluates a tool's predicates over its entries.
///
/// Pure: nothing here mutates entries or keeps state between calls.
#[derive(Debug, Clone)]
pub struct FilterEngine<R: Record> {
    predicates: Vec<Predicate<R::Field>>,
    defaults: FilterState,
}

impl<R: Record> FilterEngine<R> {
    /// Create an engine with the tool's registered predicates.
    pub fn new() -> Self {
        Self {
            predicates: R::predicates(),
            defaults: R::default_filters(),
        }
    }

    /// The tool's default filter values.
    pub fn defaults(&self) -> &FilterState {
        &self.defaults
    }

    /// Names of the registered predicates, in registration order.
    pub fn predicate_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.predicates.iter().map(|p| p.name())
    }

    /// Whether an entry passes every predicate under `filters`.
    pub fn admits(&self, entry: &R, filters: &FilterState) -> bool {
        self.predicates
            .iter()
            .all(|p| p.admits(entry, filters.get(p.name())))
    }

    /// Entries passing every predicate, in their original order.
    pub fn visible<'a>(&self, entries: &'a [R], filters: &FilterState) -> Vec<&'a R> {
        entries
            .iter()
            .filter(|e| self.admits(e, filters))
            .collect()
    }

    /// Positions (in `entries`) of the visible entries.
    pub fn visible_indices(&self, entries: &[R], filters: &FilterState) -> Vec<usize> {
        entries
            .iter()
            .enumerate()
            .filter(|(_, e)| self.admits(e, filters))
            .map(|(i, _)| i)
            .collect()
    }

    /// Distinct values of a field in first-seen order, for choice lists such
    /// as the section selector. Entries without a value are skipped.
    pub fn distinct_values(&self, entries: &[R], field: R::Field) -> Vec<String> {
        let values: IndexSet<String> = entries
            .iter()
            .filter_map(|e| e.value(field))
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.into_owned())
            .collect();
        values.into_iter().collect()
    }
}

impl<R: Record> Default for FilterEngine<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Memoized visible set for one `(job, store revision, filters)` input.
///
/// Entry lists run into the thousands, so the session only re-evaluates
/// predicates when one of the inputs actually changed.
#[derive(Debug, Default)]
pub struct VisibleCache {
    input: Option<(JobId, u64, FilterState)>,
    indices: Arc<[usize]>,
    computations: u64,
}

impl VisibleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached indices, recomputing only on a new input.
    pub fn refresh<F>(
        &mut self,
        job: &JobId,
        revision: u64,
        filters: &FilterState,
        compute: F,
    ) -> Arc<[usize]>
    where
        F: FnOnce() -> Vec<usize>,
    {
        let hit = matches!(
            &self.input,
            Some((j, r, f)) if j == job && *r == revision && f == filters
        );
        if !hit {
            self.indices = compute().into();
            self.input = Some((job.clone(), revision, filters.clone()));
            self.computations += 1;
        }
        Arc::clone(&self.indices)
    }

    /// Cached indices from the last refresh.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Drop the cached set (no active entries).
    pub fn clear(&mut self) {
        self.input = None;
        self.indices = Arc::from(Vec::new());
    }

    /// How many times predicates were evaluated.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}
