//! HTTP handlers for the restock service
//!
//! Pages and fragments return HTML; report submission returns JSON; the
//! completion endpoints answer `204 No Content`.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::i18n::t;
use crate::models::BinId;
use crate::store::{ReportOutcome, StoreStats};

use super::server::AppState;

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Form body posted by the report and completion endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PickForm {
    #[serde(default)]
    pub pick_id: Option<String>,
}

impl PickForm {
    fn bin_id(&self) -> Result<BinId, Error> {
        Ok(BinId::parse(self.pick_id.as_deref().unwrap_or_default())?)
    }
}

/// Acknowledgement for a submitted report
#[derive(Debug, Serialize, Deserialize)]
pub struct ReportAck {
    pub message: String,
    pub bin_id: String,
    pub duplicate: bool,
}

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Store statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub store: StoreStats,
    pub uptime_secs: u64,
}

/// Error returned by handlers, already localized
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(err: Error, locale: &str) -> Self {
        let category = err.category();
        if !category.is_client_error() {
            tracing::error!(error = %err, category = ?category, "Request failed");
            return Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: t!("errors.internal", locale = locale).to_string(),
            };
        }

        tracing::warn!(error = %err, category = ?category, "Rejected request");
        let message = match &err {
            Error::Validation(e) => e.localized_desc(locale),
            other => other.to_string(),
        };
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse::new(self.message))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// API Routes
// ============================================================================

/// Create the router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(index))
        .route("/report", get(report_page).post(submit_report))
        .route("/report-ajax", post(submit_report_ajax))
        .route("/list", get(list_page).post(complete_report))
        // Polled fragments
        .route("/refill-table", get(refill_table))
        .route("/list-table", get(list_table).post(complete_report))
        // Operational endpoints
        .route("/api/health", get(health_check))
        .route("/api/stats", get(get_stats))
        .with_state(state)
}

// ============================================================================
// Page Handlers
// ============================================================================

async fn index(State(state): State<AppState>) -> ApiResult<Html<String>> {
    state.views.index().map(Html).map_err(|e| state.error(e.into()))
}

async fn report_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    state.views.report_page().map(Html).map_err(|e| state.error(e.into()))
}

async fn list_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    state.views.list_page().map(Html).map_err(|e| state.error(e.into()))
}

// ============================================================================
// Report Handlers
// ============================================================================

async fn record_report(state: &AppState, form: &PickForm) -> Result<ReportOutcome, Error> {
    let bin_id = form.bin_id()?;
    let outcome = state
        .store
        .report(bin_id, state.config.reports.duplicate_policy, state.locale())
        .await?;
    Ok(outcome)
}

/// Report a bin as out of stock, answering with a JSON acknowledgement
async fn submit_report(
    State(state): State<AppState>,
    Form(form): Form<PickForm>,
) -> ApiResult<Json<ReportAck>> {
    let outcome = record_report(&state, &form).await.map_err(|e| state.error(e))?;

    let locale = state.locale();
    let bin = outcome.record().bin_id.as_str();
    let message = if outcome.is_duplicate() {
        t!("messages.duplicate_ack", locale = locale, bin = bin)
    } else {
        t!("messages.report_ack", locale = locale, bin = bin)
    };

    Ok(Json(ReportAck {
        message: message.to_string(),
        bin_id: bin.to_string(),
        duplicate: outcome.is_duplicate(),
    }))
}

/// Report a bin as out of stock with an empty response
async fn submit_report_ajax(
    State(state): State<AppState>,
    Form(form): Form<PickForm>,
) -> ApiResult<StatusCode> {
    record_report(&state, &form).await.map_err(|e| state.error(e))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark the newest pending report for a bin as restocked
///
/// Unknown or blank bin ids are ignored.
async fn complete_report(
    State(state): State<AppState>,
    Form(form): Form<PickForm>,
) -> ApiResult<StatusCode> {
    let Ok(bin_id) = form.bin_id() else {
        return Ok(StatusCode::NO_CONTENT);
    };

    state
        .store
        .complete(&bin_id, state.locale())
        .await
        .map_err(|e| state.error(e.into()))?;

    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Fragment Handlers
// ============================================================================

async fn refill_table(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let records = state.store.all_pending().await.map_err(|e| state.error(e.into()))?;
    state
        .views
        .refill_table(&records)
        .map(Html)
        .map_err(|e| state.error(e.into()))
}

async fn list_table(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let records = state.store.all_pending().await.map_err(|e| state.error(e.into()))?;
    state
        .views
        .list_table(&records)
        .map(Html)
        .map_err(|e| state.error(e.into()))
}

// ============================================================================
// Operational Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    }))
}

async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<StatsResponse>>> {
    let store = state.store.stats().await.map_err(|e| state.error(e.into()))?;

    Ok(Json(ApiResponse::success(StatsResponse {
        store,
        uptime_secs: state.start_time.elapsed().as_secs(),
    })))
}

impl AppState {
    fn error(&self, err: Error) -> ApiError {
        ApiError::new(err, self.locale())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_success() {
        let response = ApiResponse::success("test data");
        assert!(response.success);
        assert!(response.data.is_some());
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::new("test error");
        assert!(!response.success);
        assert_eq!(response.error, "test error");
    }

    #[test]
    fn test_pick_form_normalizes() {
        let form = PickForm {
            pick_id: Some(" a1 ".to_string()),
        };
        assert_eq!(form.bin_id().unwrap().as_str(), "A1");
    }

    #[test]
    fn test_pick_form_missing_is_validation_error() {
        let err = PickForm::default().bin_id().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::new(
            Error::Validation(crate::error::ValidationError::EmptyBinId),
            "en",
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_errors_map_to_server_error() {
        let err = ApiError::new(
            Error::Store(crate::error::StoreError::Unavailable("broken".to_string())),
            "en",
        );
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.message.contains("broken"));
    }

    #[test]
    fn test_status_follows_error_category() {
        let err = ApiError::new(Error::Barcode(crate::error::BarcodeError::Empty), "en");
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err = ApiError::new(
            Error::Validation(crate::error::ValidationError::EmptyBinId),
            "zh-TW",
        );
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            crate::error::ValidationError::EmptyBinId.localized_desc("zh-TW")
        );
    }
}
