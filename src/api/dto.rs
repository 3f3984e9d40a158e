use serde::Deserialize;

/// Body of `POST /api/check-email`.
#[derive(Debug, Deserialize)]
pub struct CheckEmailRequest {
    pub emails: Vec<String>,
}
