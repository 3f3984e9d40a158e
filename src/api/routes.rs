use axum::Router;
use axum::routing::{get, post};

use super::handlers;
use super::state::AppState;
use crate::auth::LookupTxt;
use crate::mx::{LookupHost, LookupMx};
use crate::smtp_verify::ProbeMailbox;

/// Builds the application router over the given state.
pub fn create_router<R, P>(state: AppState<R, P>) -> Router
where
    R: LookupMx + LookupHost + LookupTxt + Send + Sync + 'static,
    P: ProbeMailbox + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handlers::liveness))
        .route("/api/", get(handlers::liveness))
        .route("/api/check-email", post(handlers::check_email::<R, P>))
        .with_state(state)
}
