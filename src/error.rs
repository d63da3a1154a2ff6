//! Unified error handling for the restock crate
//!
//! Each concern has its own error enum; [`Error`] wraps them so that the
//! server and CLI can propagate a single type while still classifying
//! failures through [`ErrorCategory`].

use thiserror::Error;

use crate::i18n::t;

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad user input (surfaced as 400)
    Validation,
    /// Barcode encoding failures
    Barcode,
    /// Record store failures
    Storage,
    /// Template registration or rendering failures
    Rendering,
}

impl ErrorCategory {
    /// Whether the caller, not the server, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation)
    }
}

/// Rejected user input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Bin id was missing or blank after trimming
    #[error("bin id must not be empty")]
    EmptyBinId,
}

impl ValidationError {
    /// Get localized description for user-facing messages
    pub fn localized_desc(&self, locale: &str) -> String {
        match self {
            Self::EmptyBinId => t!("errors.bin_id_empty", locale = locale).to_string(),
        }
    }
}

/// Errors raised while rendering a barcode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BarcodeError {
    #[error("nothing to encode")]
    Empty,

    /// Character outside the Code128 set B range
    #[error("character {ch:?} in {input:?} cannot be encoded as Code128")]
    UnsupportedCharacter { input: String, ch: char },

    /// The symbology or image generator rejected the input
    #[error("failed to encode {input:?}: {reason}")]
    Encode { input: String, reason: String },
}

/// Record store failures
///
/// The in-memory store never produces these; they exist for backends that
/// can fail.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Template registration and rendering errors
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("failed to register template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("failed to render template '{name}': {source}")]
    Render {
        name: String,
        #[source]
        source: handlebars::RenderError,
    },

    #[error("barcode for row failed: {0}")]
    Barcode(#[from] BarcodeError),
}

/// Unified error type for the restock crate
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Barcode error: {0}")]
    Barcode(#[from] BarcodeError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("View error: {0}")]
    View(#[from] ViewError),
}

impl Error {
    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Barcode(_) | Self::View(ViewError::Barcode(_)) => ErrorCategory::Barcode,
            Self::View(_) => ErrorCategory::Rendering,
            Self::Store(_) => ErrorCategory::Storage,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
