use trust_dns_resolver::TokioAsyncResolver;

use crate::smtp_verify::SmtpProber;
use crate::verifier::EmailVerifier;

/// Shared state injected into every handler.
pub struct AppState<R = TokioAsyncResolver, P = SmtpProber> {
    pub verifier: EmailVerifier<R, P>,
}

impl<R, P> AppState<R, P> {
    pub fn new(verifier: EmailVerifier<R, P>) -> Self {
        Self { verifier }
    }
}

impl<R, P> Clone for AppState<R, P> {
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
        }
    }
}
