use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use paperpull_core::{download_client, fetch_full_text};

use crate::state::AppState;

const TOKEN_NOT_FOUND_DETAIL: &str =
    "Download token not found or expired. Run lookup again to create a fresh token.";

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Response {
    state.tokens.sweep();
    let Some(entry) = state.tokens.get(&token) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "detail": TOKEN_NOT_FOUND_DETAIL })),
        )
            .into_response();
    };

    let client = match download_client() {
        Ok(client) => client,
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "detail": format!("Failed to build HTTP client: {e}") })),
            )
                .into_response();
        }
    };

    match fetch_full_text(&client, &entry.url).await {
        Ok(file) => {
            // Upstream-declared filename wins over the one stored at lookup time.
            let filename = file.filename.unwrap_or(entry.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, file.content_type),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                file.bytes,
            )
                .into_response()
        }
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({
                "detail": format!("Failed to fetch upstream full text: {e}")
            })),
        )
            .into_response(),
    }
}
