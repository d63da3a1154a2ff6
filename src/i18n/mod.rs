//! Internationalization (i18n) support
//!
//! Status labels, record messages and page text are translated through
//! `rust-i18n`. Supported languages: English (en) and Traditional Chinese
//! (zh-TW).
//!
//! Callers pass the locale explicitly to [`t!`] so that messages stored on
//! records never depend on process-global state.
//!
//! # Environment Variables
//!
//! - `RESTOCK_LANG`: preferred language (en, zh-TW). Defaults to English.

// Note: rust_i18n::i18n! macro is declared in lib.rs (crate root)

/// Default locale when none is configured
pub const DEFAULT_LOCALE: &str = "en";

/// Locales shipped in `locales/`
pub const SUPPORTED_LOCALES: &[&str] = &["en", "zh-TW"];

/// Normalize locale code to supported format
///
/// - zh, zh-TW, zh_Hant, chinese -> zh-TW
/// - anything else -> en
pub fn normalize_locale(locale: &str) -> String {
    let lower = locale.trim().to_lowercase();

    if lower.starts_with("zh") || lower == "chinese" {
        "zh-TW".to_string()
    } else {
        DEFAULT_LOCALE.to_string()
    }
}

/// Translate a key with optional parameters
///
/// This is a re-export of rust_i18n::t! for convenience.
///
/// ```rust,ignore
/// use restock::i18n::t;
///
/// let msg = t!("messages.reported", locale = "zh-TW", bin = "A1");
/// ```
#[doc(inline)]
pub use rust_i18n::t;
