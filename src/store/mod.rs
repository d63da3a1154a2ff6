//! Record storage for stock-out reports
//!
//! Endpoints talk to the [`RecordStore`] trait only, so the in-memory
//! implementation can be replaced by a persistent one without touching the
//! HTTP layer.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{BinId, DuplicatePolicy, ReportRecord};

pub use memory::InMemoryStore;

/// Result of submitting a report
#[derive(Debug, Clone)]
pub enum ReportOutcome {
    /// A new pending record was appended
    Created(ReportRecord),

    /// The report was folded into an existing pending record
    Merged(ReportRecord),
}

impl ReportOutcome {
    /// The record that was created or updated
    pub fn record(&self) -> &ReportRecord {
        match self {
            Self::Created(record) | Self::Merged(record) => record,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Store statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Ordered collection of report records
///
/// Records are only ever appended or mutated in place; nothing is deleted.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Push a record to the end of the store
    async fn append(&self, record: ReportRecord) -> Result<(), StoreError>;

    /// Most recently created pending record for `bin_id`
    async fn find_pending(&self, bin_id: &BinId) -> Result<Option<ReportRecord>, StoreError>;

    /// Pending records in insertion order
    async fn all_pending(&self) -> Result<Vec<ReportRecord>, StoreError>;

    /// Every record in insertion order
    async fn all(&self) -> Result<Vec<ReportRecord>, StoreError>;

    /// Complete the most recently created pending record for `bin_id`
    ///
    /// Returns the updated record, or `None` when nothing was pending.
    async fn complete(&self, bin_id: &BinId, locale: &str) -> Result<Option<ReportRecord>, StoreError>;

    /// Record a stock-out report for `bin_id`
    ///
    /// Under [`DuplicatePolicy::Merge`] the lookup and the insert happen
    /// atomically.
    async fn report(
        &self,
        bin_id: BinId,
        policy: DuplicatePolicy,
        locale: &str,
    ) -> Result<ReportOutcome, StoreError>;

    async fn stats(&self) -> Result<StoreStats, StoreError>;
}
