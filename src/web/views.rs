//! HTML pages and polled fragments rendered with Handlebars
//!
//! Row construction is a plain filter-then-map over records
//! ([`pending_rows`], [`barcode_rows`]) so the queue logic does not depend on
//! the template engine.

use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

use crate::barcode::BarcodeRenderer;
use crate::error::{BarcodeError, ViewError};
use crate::i18n::t;
use crate::models::ReportRecord;

const STYLES_PARTIAL: &str = include_str!("../../templates/styles.hbs");
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");
const REPORT_TEMPLATE: &str = include_str!("../../templates/report.hbs");
const LIST_TEMPLATE: &str = include_str!("../../templates/list.hbs");
const REFILL_TABLE_TEMPLATE: &str = include_str!("../../templates/refill_table.hbs");
const LIST_TABLE_TEMPLATE: &str = include_str!("../../templates/list_table.hbs");

// ============================================================================
// View Models
// ============================================================================

/// Row of the picker-facing pending table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueRow {
    pub bin_id: String,
    pub reported_at: String,
    pub status: String,
    pub message: String,
}

/// Row of the restocker queue, with an inline barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarcodeRow {
    pub bin_id: String,
    pub reported_at: String,
    pub status: String,
    /// `data:image/png;base64,...`
    pub barcode: String,
}

/// Pending records as table rows, in store order
pub fn pending_rows(records: &[ReportRecord], locale: &str) -> Vec<QueueRow> {
    records
        .iter()
        .filter(|r| r.is_pending())
        .map(|r| QueueRow {
            bin_id: r.bin_id.to_string(),
            reported_at: r.reported_at_display(),
            status: r.status.localized_label(locale),
            message: r.message.clone(),
        })
        .collect()
}

/// Pending records as queue rows carrying a Code128 image of the bin id
pub fn barcode_rows(
    records: &[ReportRecord],
    locale: &str,
    renderer: &BarcodeRenderer,
) -> Result<Vec<BarcodeRow>, BarcodeError> {
    records
        .iter()
        .filter(|r| r.is_pending())
        .map(|r| {
            Ok(BarcodeRow {
                bin_id: r.bin_id.to_string(),
                reported_at: r.reported_at_display(),
                status: r.status.localized_label(locale),
                barcode: renderer.render_data_uri(r.bin_id.as_str())?,
            })
        })
        .collect()
}

// ============================================================================
// Views
// ============================================================================

/// Registered templates plus the settings they render with
pub struct Views {
    handlebars: Handlebars<'static>,
    renderer: BarcodeRenderer,
    locale: String,
    poll_interval_ms: u64,
}

impl std::fmt::Debug for Views {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Views")
            .field("renderer", &self.renderer)
            .field("locale", &self.locale)
            .field("poll_interval_ms", &self.poll_interval_ms)
            .finish()
    }
}

impl Views {
    /// Register the built-in templates
    pub fn new(
        locale: impl Into<String>,
        poll_interval_ms: u64,
        renderer: BarcodeRenderer,
    ) -> Result<Self, ViewError> {
        let mut handlebars = Handlebars::new();

        handlebars
            .register_partial("styles", STYLES_PARTIAL)
            .map_err(|e| template_error("styles", e))?;

        for (name, source) in [
            ("index", INDEX_TEMPLATE),
            ("report", REPORT_TEMPLATE),
            ("list", LIST_TEMPLATE),
            ("refill_table", REFILL_TABLE_TEMPLATE),
            ("list_table", LIST_TABLE_TEMPLATE),
        ] {
            handlebars
                .register_template_string(name, source)
                .map_err(|e| template_error(name, e))?;
        }

        Ok(Self {
            handlebars,
            renderer,
            locale: locale.into(),
            poll_interval_ms,
        })
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Menu page
    pub fn index(&self) -> Result<String, ViewError> {
        let locale = self.locale.as_str();
        self.render(
            "index",
            &json!({
                "lang": locale,
                "labels": {
                    "title": t!("app.title", locale = locale),
                    "menu_report": t!("app.menu_report", locale = locale),
                    "menu_list": t!("app.menu_list", locale = locale),
                },
            }),
        )
    }

    /// Picker page: report form, scanner and live pending table
    pub fn report_page(&self) -> Result<String, ViewError> {
        let locale = self.locale.as_str();
        self.render(
            "report",
            &json!({
                "lang": locale,
                "poll_interval_ms": self.poll_interval_ms,
                "labels": {
                    "heading": t!("report.heading", locale = locale),
                    "placeholder": t!("report.placeholder", locale = locale),
                    "submit": t!("report.submit", locale = locale),
                    "queue_heading": t!("report.queue_heading", locale = locale),
                    "error": t!("errors.internal", locale = locale),
                },
            }),
        )
    }

    /// Restocker page polling the barcode queue
    pub fn list_page(&self) -> Result<String, ViewError> {
        let locale = self.locale.as_str();
        self.render(
            "list",
            &json!({
                "lang": locale,
                "poll_interval_ms": self.poll_interval_ms,
                "labels": {
                    "heading": t!("list.heading", locale = locale),
                },
            }),
        )
    }

    /// Fragment listing pending reports with their messages
    pub fn refill_table(&self, records: &[ReportRecord]) -> Result<String, ViewError> {
        let locale = self.locale.as_str();
        let rows = pending_rows(records, locale);
        self.render(
            "refill_table",
            &json!({
                "rows": rows,
                "labels": self.table_labels(),
            }),
        )
    }

    /// Fragment listing pending reports with barcodes and complete buttons
    pub fn list_table(&self, records: &[ReportRecord]) -> Result<String, ViewError> {
        let locale = self.locale.as_str();
        let rows = barcode_rows(records, locale, &self.renderer)?;
        self.render(
            "list_table",
            &json!({
                "rows": rows,
                "barcode_height": self.renderer.height(),
                "labels": self.table_labels(),
            }),
        )
    }

    fn table_labels(&self) -> serde_json::Value {
        let locale = self.locale.as_str();
        json!({
            "time": t!("table.time", locale = locale),
            "status": t!("table.status", locale = locale),
            "message": t!("table.message", locale = locale),
            "action": t!("table.action", locale = locale),
            "empty": t!("table.empty", locale = locale),
            "complete": t!("list.complete", locale = locale),
        })
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> Result<String, ViewError> {
        self.handlebars
            .render(name, data)
            .map_err(|source| ViewError::Render {
                name: name.to_string(),
                source,
            })
    }
}

fn template_error(name: &str, source: handlebars::TemplateError) -> ViewError {
    ViewError::Template {
        name: name.to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BinId;

    fn record(raw: &str) -> ReportRecord {
        ReportRecord::new(BinId::parse(raw).unwrap(), "en")
    }

    fn views() -> Views {
        Views::new("en", 3000, BarcodeRenderer::default()).unwrap()
    }

    #[test]
    fn test_pending_rows_skip_completed() {
        let mut done = record("a1");
        done.complete("en");
        let records = vec![done, record("b2"), record("c3")];

        let rows = pending_rows(&records, "en");
        let ids: Vec<_> = rows.iter().map(|r| r.bin_id.as_str()).collect();
        assert_eq!(ids, vec!["B2", "C3"]);
    }

    #[test]
    fn test_pending_rows_use_locale() {
        let records = vec![record("a1")];
        let en = pending_rows(&records, "en");
        let zh = pending_rows(&records, "zh-TW");
        assert_ne!(en[0].status, zh[0].status);
    }

    #[test]
    fn test_barcode_rows_embed_data_uri() {
        let records = vec![record("a1")];
        let rows = barcode_rows(&records, "en", &BarcodeRenderer::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].barcode.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_barcode_rows_propagate_encoding_failure() {
        let records = vec![record("揀位")];
        let result = barcode_rows(&records, "en", &BarcodeRenderer::default());
        assert!(matches!(result, Err(BarcodeError::UnsupportedCharacter { .. })));
    }

    #[test]
    fn test_pages_render() {
        let views = views();
        assert!(views.index().unwrap().contains("/report"));
        assert!(views.report_page().unwrap().contains("/refill-table"));

        let list = views.list_page().unwrap();
        assert!(list.contains("/list-table"));
        assert!(list.contains("3000"));
    }

    #[test]
    fn test_refill_table_rows() {
        let views = views();
        let html = views.refill_table(&[record("a1"), record("b2")]).unwrap();
        assert_eq!(html.matches("<tr data-bin-id=").count(), 2);
        assert!(html.contains("A1"));
    }

    #[test]
    fn test_empty_table_shows_placeholder() {
        let views = views();
        let html = views.list_table(&[]).unwrap();
        assert_eq!(html.matches("<tr data-bin-id=").count(), 0);
        assert!(html.contains("colspan=\"3\""));
    }

    #[test]
    fn test_bin_ids_are_escaped() {
        let views = views();
        let html = views.refill_table(&[record("<b>\"x")]).unwrap();
        assert!(!html.contains("<B>"));
        assert!(html.contains("&lt;B&gt;"));
    }

    #[test]
    fn test_list_table_binds_complete_button() {
        let views = views();
        let html = views.list_table(&[record("a1")]).unwrap();
        assert!(html.contains("<button type=\"button\" data-bin-id=\"A1\">"));
        assert!(html.contains("data:image/png;base64,"));
    }

    #[test]
    fn test_list_table_uses_barcode_height() {
        let views = Views::new("en", 3000, BarcodeRenderer::new(80)).unwrap();
        let html = views.list_table(&[record("a1")]).unwrap();
        assert!(html.contains("height: 80px;"));
    }

    #[test]
    fn test_report_page_reports_failed_submissions() {
        let html = views().report_page().unwrap();
        assert!(html.contains(".catch("));
        assert!(html.contains("Something went wrong"));
    }
}
