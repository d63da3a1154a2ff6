//! Web interface for stock-out reporting
//!
//! # Routes
//!
//! ```text
//! GET  /               menu
//! GET  /report         report form with scanner and live pending table
//! POST /report         report a bin (JSON acknowledgement)
//! POST /report-ajax    report a bin (204)
//! GET  /refill-table   pending fragment
//! GET  /list           restock queue page
//! GET  /list-table     pending fragment with barcodes
//! POST /list           mark a bin restocked (204)
//! POST /list-table     mark a bin restocked (204)
//! GET  /api/health     health check
//! GET  /api/stats      record counts
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use restock::config::Config;
//! use restock::web::RestockServer;
//!
//! let server = RestockServer::new(Config::default())?;
//! server.start().await?;
//! ```

pub mod api;
pub mod server;
pub mod views;

pub use server::{AppState, RestockServer, ServerError, ServerInfo};
pub use views::Views;
