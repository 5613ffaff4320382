//! Row progress for table enrichment.
//!
//! [`enrich_table_with_progress`](crate::enrich_table_with_progress)
//! announces the row count, ticks once per row, and reports a summary
//! line at the end. The CLI draws these as a terminal bar; [`enrich_table`]
//! passes [`NullProgress`].
//!
//! [`enrich_table`]: crate::enrich_table

/// Observer for rows passing through enrichment.
pub trait ProgressCallback: Send + Sync {
    /// Number of rows about to be processed.
    fn set_total(&self, total: u64);

    /// `delta` more rows are done.
    fn inc(&self, delta: u64);

    /// Label for the work in progress.
    fn set_message(&self, msg: String);

    /// All rows are done; `msg` summarizes the outcome.
    fn finish(&self, msg: String);
}

/// Discards every update.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}
