//! restock - warehouse stock-out reporting
//!
//! Pickers report a bin as out of stock, a restocker works through a live
//! queue of pending bins (each labelled with a Code128 barcode) and marks
//! them restocked.
//!
//! # Architecture
//!
//! - [`models`] - Report records, bin ids and duplicate policy
//! - [`store`] - Record store trait and in-memory implementation
//! - [`barcode`] - Code128 PNG rendering
//! - [`web`] - Axum server, handlers and Handlebars views
//! - [`config`] - Configuration management
//! - [`i18n`] - Localized labels and messages
//! - [`error`] - Error types
//!
//! # Example
//!
//! ```no_run
//! use restock::config::Config;
//! use restock::web::RestockServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = RestockServer::new(config)?;
//!     server.start().await?;
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "en");

pub mod barcode;
pub mod config;
pub mod error;
pub mod i18n;
pub mod models;
pub mod store;
pub mod web;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::barcode::BarcodeRenderer;
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{BinId, DuplicatePolicy, ReportRecord, ReportStatus};
    pub use crate::store::{InMemoryStore, RecordStore, ReportOutcome};
    pub use crate::web::RestockServer;
}

pub use models::{BinId, DuplicatePolicy, ReportRecord, ReportStatus};
