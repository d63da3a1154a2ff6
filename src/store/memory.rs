//! In-memory record store
//!
//! Records live in a single `Vec` behind one lock for the lifetime of the
//! process.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{RecordStore, ReportOutcome, StoreStats};
use crate::error::StoreError;
use crate::models::{BinId, DuplicatePolicy, ReportRecord};

/// Process-local store backed by a `Vec`
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Vec<ReportRecord>>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

/// Index of the newest pending record for `bin_id`
fn newest_pending(records: &[ReportRecord], bin_id: &BinId) -> Option<usize> {
    records
        .iter()
        .rposition(|r| r.is_pending() && &r.bin_id == bin_id)
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn append(&self, record: ReportRecord) -> Result<(), StoreError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn find_pending(&self, bin_id: &BinId) -> Result<Option<ReportRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(newest_pending(&records, bin_id).map(|idx| records[idx].clone()))
    }

    async fn all_pending(&self) -> Result<Vec<ReportRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.is_pending())
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<ReportRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn complete(&self, bin_id: &BinId, locale: &str) -> Result<Option<ReportRecord>, StoreError> {
        let mut records = self.records.write().await;

        let Some(idx) = newest_pending(&records, bin_id) else {
            tracing::debug!(bin_id = %bin_id, "No pending record to complete");
            return Ok(None);
        };

        let record = &mut records[idx];
        record.complete(locale);
        tracing::info!(bin_id = %bin_id, record_id = %record.id, "Report completed");

        Ok(Some(record.clone()))
    }

    async fn report(
        &self,
        bin_id: BinId,
        policy: DuplicatePolicy,
        locale: &str,
    ) -> Result<ReportOutcome, StoreError> {
        let mut records = self.records.write().await;

        if policy == DuplicatePolicy::Merge {
            if let Some(idx) = newest_pending(&records, &bin_id) {
                let record = &mut records[idx];
                record.merge_duplicate(locale);
                tracing::info!(
                    bin_id = %bin_id,
                    record_id = %record.id,
                    report_count = record.report_count,
                    "Duplicate report merged"
                );
                return Ok(ReportOutcome::Merged(record.clone()));
            }
        }

        let record = ReportRecord::new(bin_id, locale);
        tracing::info!(bin_id = %record.bin_id, record_id = %record.id, "Report created");
        records.push(record.clone());

        Ok(ReportOutcome::Created(record))
    }

    async fn stats(&self) -> Result<StoreStats, StoreError> {
        let records = self.records.read().await;
        let pending = records.iter().filter(|r| r.is_pending()).count();

        Ok(StoreStats {
            total: records.len(),
            pending,
            completed: records.len() - pending,
        })
    }
}
