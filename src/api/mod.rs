//! HTTP surface for the verification engine: the batch endpoint plus the
//! liveness probes. The core never parses requests itself; handlers hand it
//! an already-deserialized list of candidate addresses and serialize
//! whatever report comes back.

mod dto;
mod handlers;
mod routes;
mod state;

pub use dto::CheckEmailRequest;
pub use routes::create_router;
pub use state::AppState;
