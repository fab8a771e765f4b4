//! HTTP API endpoints for state management.
//!
//! Snapshot export/import for backup between sessions, plus the CSV
//! report as a plain download. All routes here sit behind the CR
//! Basic Auth middleware.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::state::{submissions_csv, AppState, BoardExport};

/// Export the entire shared state as JSON.
///
/// GET /api/state/export
pub async fn export_state(State(state): State<Arc<AppState>>) -> Json<BoardExport> {
    Json(state.export_state().await)
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub ok: bool,
}

/// Import a state snapshot, replacing both documents.
///
/// POST /api/state/import
pub async fn import_state(
    State(state): State<Arc<AppState>>,
    Json(export): Json<BoardExport>,
) -> Response {
    match state.import_state(export).await {
        Ok(()) => (StatusCode::OK, Json(ImportResponse { ok: true })).into_response(),
        Err(e) => {
            tracing::warn!("state import rejected: {}", e);
            (StatusCode::UNPROCESSABLE_ENTITY, e).into_response()
        }
    }
}

/// Download the submission report.
///
/// GET /api/submissions.csv
pub async fn download_csv(State(state): State<Arc<AppState>>) -> Response {
    let csv = submissions_csv(&state.ledger().await);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"submissions.csv\"",
            ),
        ],
        csv,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LedgerAction;

    #[tokio::test]
    async fn test_export_import_roundtrip() {
        let state = Arc::new(AppState::default());
        state
            .apply_ledger(LedgerAction::Submit {
                roll_no: "1".to_string(),
                name: "Asha Rao".to_string(),
                link: "https://example.com/v".to_string(),
                at: chrono::Utc::now(),
            })
            .await;

        let Json(export) = export_state(State(state.clone())).await;
        assert_eq!(export.ledger.submissions.len(), 1);

        let fresh = Arc::new(AppState::default());
        let response = import_state(State(fresh.clone()), Json(export)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fresh.ledger().await.submissions.len(), 1);
    }

    #[tokio::test]
    async fn test_import_rejects_bad_snapshot() {
        let state = Arc::new(AppState::default());
        let mut export = state.export_state().await;
        export.schema_version += 1;

        let response = import_state(State(state), Json(export)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_csv_download_has_header_row() {
        let state = Arc::new(AppState::default());
        let response = download_csv(State(state)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/csv; charset=utf-8")
        );
    }
}
