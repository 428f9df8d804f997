// AlumnosAdmin - app/state.rs
//
// Application state management. Holds the fetched records, the current
// query and the filtered view.
// Owned by the CLI command runner.

use crate::app::store::RecordStore;
use crate::core::filter::{apply_filters, SearchQuery};
use crate::core::model::Alumno;
use crate::core::stats::Summary;
use crate::util::error::{FilterError, StoreError};
use chrono::NaiveDate;

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// All records as last fetched from the store.
    pub records: Vec<Alumno>,

    /// Current search term and facet filter.
    pub query: SearchQuery,

    /// Reference date for age derivation. Fixed per state so a long-lived
    /// view does not shift across midnight.
    pub today: NaiveDate,

    /// Indices of records matching the current query (into `records`).
    pub filtered_indices: Vec<usize>,
}

impl AppState {
    /// Create an empty state evaluated against `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            records: Vec::new(),
            query: SearchQuery::default(),
            today,
            filtered_indices: Vec::new(),
        }
    }

    /// Replace the record set with a fresh fetch from `store` and
    /// re-apply the current query.
    pub fn load_from(&mut self, store: &dyn RecordStore) -> Result<(), StoreError> {
        self.records = store.list()?;
        // The query was validated when it was set; an error here means the
        // caller bypassed `set_query`, so fall back to showing everything.
        if let Err(e) = self.apply_filters() {
            tracing::warn!(error = %e, "Stored query rejected after reload; showing all records");
            self.query = SearchQuery::default();
            self.filtered_indices = (0..self.records.len()).collect();
        }
        Ok(())
    }

    /// Replace the query and recompute the view. On error the previous
    /// query and view are kept.
    pub fn set_query(&mut self, query: SearchQuery) -> Result<(), FilterError> {
        let indices = apply_filters(&self.records, &query.term, &query.spec, self.today)?;
        self.query = query;
        self.filtered_indices = indices;
        Ok(())
    }

    /// Recompute filtered indices from current records and query.
    pub fn apply_filters(&mut self) -> Result<(), FilterError> {
        self.filtered_indices =
            apply_filters(&self.records, &self.query.term, &self.query.spec, self.today)?;
        tracing::debug!(
            total = self.records.len(),
            visible = self.filtered_indices.len(),
            active_facets = self.query.spec.active_facets(),
            "Filters applied"
        );
        Ok(())
    }

    /// Records in the current view, in store order.
    pub fn visible(&self) -> Vec<&Alumno> {
        self.filtered_indices
            .iter()
            .filter_map(|&idx| self.records.get(idx))
            .collect()
    }

    /// Totals and mean age for the current view.
    pub fn summary(&self) -> Summary {
        Summary::compute(self.records.len(), &self.visible(), self.today)
    }
}
