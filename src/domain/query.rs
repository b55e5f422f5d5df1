//! Pagination and scope state owned by one overlay instance.
//!
//! [`QueryState`] replaces the page-global cursor and submit flag of a classic
//! embed: each widget owns its own value, so several overlays can live on the
//! same page without interfering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Page size used when the host form carries no usable `maximumRecords` field.
pub const DEFAULT_MAXIMUM_RECORDS: u64 = 10;

/// Where a query is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only the contacted peer's own index.
    #[default]
    Local,
    /// The whole peer-to-peer network.
    Global,
}

impl Scope {
    /// Returns `Global` when `global` is set, `Local` otherwise.
    #[must_use]
    pub const fn from_flag(global: bool) -> Self {
        if global {
            Self::Global
        } else {
            Self::Local
        }
    }

    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(self, Self::Global)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pagination cursor, page size, scope, and submit guard of one overlay.
///
/// `start_record` is unsigned, so no sequence of [`advance`](Self::advance) and
/// [`retreat`](Self::retreat) calls can drive it below zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    /// Zero-based offset of the first displayed result.
    pub start_record: u64,

    /// Page size, always greater than zero.
    pub maximum_records: u64,

    /// Current query text as last reported by the host.
    pub query: String,

    /// Scope of the most recently issued request.
    pub scope: Scope,

    /// Set by an explicit submit, consumed by the next key-up.
    pub submit_guard: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_MAXIMUM_RECORDS)
    }
}

impl QueryState {
    /// Creates a state at the first page with the given page size.
    ///
    /// A zero page size is replaced by [`DEFAULT_MAXIMUM_RECORDS`].
    #[must_use]
    pub fn new(maximum_records: u64) -> Self {
        let maximum_records = if maximum_records == 0 {
            DEFAULT_MAXIMUM_RECORDS
        } else {
            maximum_records
        };
        Self {
            start_record: 0,
            maximum_records,
            query: String::new(),
            scope: Scope::Local,
            submit_guard: false,
        }
    }

    /// Restarts pagination. Editing the query always lands on the first page.
    pub fn reset(&mut self) {
        self.start_record = 0;
    }

    /// Moves the cursor one page forward.
    pub fn advance(&mut self, page_size: u64) {
        self.start_record = self.start_record.saturating_add(page_size);
    }

    /// Moves the cursor one page back, clamped at the first record.
    pub fn retreat(&mut self, page_size: u64) {
        self.start_record = self.start_record.saturating_sub(page_size);
    }

    /// Arms the guard after an explicit submit.
    pub fn arm_guard(&mut self) {
        self.submit_guard = true;
    }

    /// Clears the guard and reports whether it was armed.
    pub fn consume_guard(&mut self) -> bool {
        std::mem::take(&mut self.submit_guard)
    }

    #[must_use]
    pub fn is_query_empty(&self) -> bool {
        self.query.is_empty()
    }

    /// One-based index of the first displayed result.
    #[must_use]
    pub const fn display_start(&self) -> u64 {
        self.start_record.saturating_add(1)
    }

    /// One-based index of the last displayed result.
    ///
    /// Not clamped to the total: on the final page it can exceed the number of
    /// results actually returned.
    #[must_use]
    pub const fn display_end(&self) -> u64 {
        self.start_record.saturating_add(self.maximum_records)
    }

    /// Page size usable as a divisor. A deserialized state may carry zero.
    #[must_use]
    pub const fn page_size(&self) -> u64 {
        if self.maximum_records == 0 {
            DEFAULT_MAXIMUM_RECORDS
        } else {
            self.maximum_records
        }
    }

    /// One-based page number of the cursor.
    #[must_use]
    pub const fn current_page(&self) -> u64 {
        (self.start_record / self.page_size()).saturating_add(1)
    }

    /// Moves the cursor to the first record of the one-based `page`.
    pub fn jump_to_page(&mut self, page: u64) {
        self.start_record = page.saturating_sub(1).saturating_mul(self.page_size());
    }
}
