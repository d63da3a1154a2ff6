// Core data structures for the restock service

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::i18n::t;

/// Display format used for report and completion timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Bin Identifier
// ============================================================================

/// Normalized bin (pick location) identifier
///
/// Always trimmed and uppercased; never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BinId(String);

impl BinId {
    /// Normalize raw user input into a bin id
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptyBinId);
        }
        Ok(Self(normalized))
    }

    /// Get the normalized string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BinId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BinId> for String {
    fn from(value: BinId) -> Self {
        value.0
    }
}

// ============================================================================
// Report Status
// ============================================================================

/// Lifecycle state of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Awaiting restock
    Pending,

    /// Restocked
    Completed,
}

impl ReportStatus {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }

    /// Get the user-facing label in the given locale
    pub fn localized_label(&self, locale: &str) -> String {
        match self {
            Self::Pending => t!("status.pending", locale = locale).to_string(),
            Self::Completed => t!("status.completed", locale = locale).to_string(),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl Default for ReportStatus {
    fn default() -> Self {
        Self::Pending
    }
}

// ============================================================================
// Report Record
// ============================================================================

/// A single stock-out report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Uuid,
    pub bin_id: BinId,
    pub reported_at: DateTime<Utc>,
    pub status: ReportStatus,
    pub message: String,
    /// Set only once the record is completed
    pub completed_at: Option<DateTime<Utc>>,
    /// Reports merged into this record, including the first
    pub report_count: u32,
}

impl ReportRecord {
    /// Create a new pending record stamped with the current time
    pub fn new(bin_id: BinId, locale: &str) -> Self {
        let message = t!("messages.reported", locale = locale, bin = bin_id.as_str()).to_string();
        Self {
            id: Uuid::new_v4(),
            bin_id,
            reported_at: Utc::now(),
            status: ReportStatus::Pending,
            message,
            completed_at: None,
            report_count: 1,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_pending()
    }

    /// Fold a repeated report for the same bin into this record
    pub fn merge_duplicate(&mut self, locale: &str) {
        self.report_count = self.report_count.saturating_add(1);
        self.message = t!(
            "messages.duplicate",
            locale = locale,
            bin = self.bin_id.as_str(),
            count = self.report_count
        )
        .to_string();
    }

    /// Transition to completed
    ///
    /// Returns false without touching the record if it is already completed.
    pub fn complete(&mut self, locale: &str) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.status = ReportStatus::Completed;
        self.completed_at = Some(Utc::now());
        self.message = t!("messages.completed", locale = locale, bin = self.bin_id.as_str()).to_string();
        true
    }

    /// Report time formatted in local time
    pub fn reported_at_display(&self) -> String {
        self.reported_at
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }
}

// ============================================================================
// Duplicate Policy
// ============================================================================

/// What to do when a bin is reported while it already has a pending record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Fold the report into the existing pending record
    Merge,

    /// Always create a new pending record
    Append,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Append => "append",
        }
    }

    /// Create from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "merge" | "dedup" => Some(Self::Merge),
            "append" | "always" => Some(Self::Append),
            _ => None,
        }
    }
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self::Merge
    }
}

impl fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bin_id_normalization() {
        let bin = BinId::parse("  a1-03 ").unwrap();
        assert_eq!(bin.as_str(), "A1-03");
        assert_eq!(bin.to_string(), "A1-03");
    }

    #[test]
    fn test_bin_id_rejects_blank() {
        assert!(matches!(BinId::parse(""), Err(ValidationError::EmptyBinId)));
        assert!(matches!(BinId::parse("   \t"), Err(ValidationError::EmptyBinId)));
    }

    #[test]
    fn test_bin_id_serde_roundtrip_validates() {
        let bin: BinId = serde_json::from_str("\" b2 \"").unwrap();
        assert_eq!(bin.as_str(), "B2");
        assert!(serde_json::from_str::<BinId>("\"  \"").is_err());
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = ReportRecord::new(BinId::parse("a1").unwrap(), "en");
        assert_eq!(record.status, ReportStatus::Pending);
        assert!(record.completed_at.is_none());
        assert_eq!(record.report_count, 1);
        assert!(record.message.contains("A1"));
    }

    #[test]
    fn test_complete_sets_timestamp_once() {
        let mut record = ReportRecord::new(BinId::parse("a1").unwrap(), "en");
        assert!(record.complete("en"));
        assert_eq!(record.status, ReportStatus::Completed);
        let first = record.completed_at;
        assert!(first.is_some());

        assert!(!record.complete("en"));
        assert_eq!(record.completed_at, first);
    }

    #[test]
    fn test_merge_duplicate_bumps_count() {
        let mut record = ReportRecord::new(BinId::parse("c3").unwrap(), "en");
        let before = record.message.clone();
        record.merge_duplicate("en");
        assert_eq!(record.report_count, 2);
        assert_ne!(record.message, before);
        assert!(record.message.contains('2'));
    }

    #[test]
    fn test_merge_duplicate_count_saturates() {
        let mut record = ReportRecord::new(BinId::parse("c3").unwrap(), "en");
        record.report_count = u32::MAX;
        record.merge_duplicate("en");
        assert_eq!(record.report_count, u32::MAX);
    }

    #[test]
    fn test_duplicate_policy_parse() {
        assert_eq!(DuplicatePolicy::parse("merge"), Some(DuplicatePolicy::Merge));
        assert_eq!(DuplicatePolicy::parse(" Append "), Some(DuplicatePolicy::Append));
        assert_eq!(DuplicatePolicy::parse("dedup"), Some(DuplicatePolicy::Merge));
        assert_eq!(DuplicatePolicy::parse("sometimes"), None);
        assert_eq!(DuplicatePolicy::default(), DuplicatePolicy::Merge);
    }

    proptest! {
        #[test]
        fn prop_bin_id_is_trimmed_uppercase(raw in "[ \\t]{0,3}[a-zA-Z0-9-]{1,12}[ \\t]{0,3}") {
            let bin = BinId::parse(&raw).unwrap();
            prop_assert_eq!(bin.as_str(), raw.trim().to_uppercase());
            prop_assert!(!bin.as_str().is_empty());
        }

        #[test]
        fn prop_bin_id_parse_is_idempotent(raw in "[a-zA-Z0-9 ]{1,16}") {
            if let Ok(bin) = BinId::parse(&raw) {
                let again = BinId::parse(bin.as_str()).unwrap();
                prop_assert_eq!(bin, again);
            }
        }
    }
}
