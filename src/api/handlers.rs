use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, warn};

use super::dto::CheckEmailRequest;
use super::state::AppState;
use crate::auth::LookupTxt;
use crate::mx::{LookupHost, LookupMx};
use crate::smtp_verify::ProbeMailbox;
use crate::verifier::BatchError;

const INVALID_INPUT: &str = "Invalid input. Provide an array of emails.";

/// Liveness probe behind `GET /` and `GET /api/`.
pub async fn liveness() -> Json<serde_json::Value> {
    Json(json!({ "message": "Server Running Properly!" }))
}

/// `POST /api/check-email`: verify a batch of addresses.
///
/// A malformed body (missing `emails`, not a list, or empty) is a client
/// error; per-address failures stay inside that address's report and never
/// turn into an HTTP error.
pub async fn check_email<R, P>(
    State(state): State<AppState<R, P>>,
    payload: Result<Json<CheckEmailRequest>, JsonRejection>,
) -> Response
where
    R: LookupMx + LookupHost + LookupTxt + Send + Sync + 'static,
    P: ProbeMailbox + Send + Sync + 'static,
{
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            debug!(error = %rejection, "rejected malformed batch request");
            return invalid_input();
        }
    };

    debug!(count = request.emails.len(), "batch verification requested");

    match state.verifier.verify_batch(&request.emails).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(BatchError::EmptyInput) => invalid_input(),
        Err(BatchError::Unexpected(detail)) => {
            warn!(error = %detail, "batch verification aborted");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "message": "Error verifying emails",
                    "error": detail,
                })),
            )
                .into_response()
        }
    }
}

fn invalid_input() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "message": INVALID_INPUT })),
    )
        .into_response()
}
