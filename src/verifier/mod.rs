//! The verification engine: a four-way concurrent fan-out per address and
//! batch orchestration across addresses.
//!
//! Each sub-check converts its own failure into a [`CheckResult`] at its own
//! boundary; nothing a single check does can cancel a sibling check or
//! abort the batch. Addresses run as independent tasks and their reports are
//! collected in input order, never in completion order.

mod error;
mod types;

pub use error::BatchError;
pub use types::{AddressReport, BatchReport, CheckResult, Summary};

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::warn;
use trust_dns_resolver::TokioAsyncResolver;

use crate::auth::{self, LookupTxt, RecordStatus};
use crate::mx::{self, LookupHost, LookupMx, MxEntry, MxError};
use crate::smtp_verify::{ProbeMailbox, SmtpProbeOptions, SmtpProber};

/// Tuning for one verifier instance.
#[derive(Debug, Clone)]
pub struct VerifierOptions {
    /// Upper bound on each of the four sub-checks. Expiry degrades that
    /// check to its failure shape instead of stalling the address.
    pub check_timeout: Duration,
    pub smtp: SmtpProbeOptions,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(10),
            smtp: SmtpProbeOptions::default(),
        }
    }
}

/// Runs the four deliverability checks for single addresses and whole
/// batches. Cheap to clone; clones share the resolver and the prober.
pub struct EmailVerifier<R = TokioAsyncResolver, P = SmtpProber> {
    resolver: Arc<R>,
    prober: Arc<P>,
    options: VerifierOptions,
}

impl EmailVerifier {
    /// Build a verifier on the system DNS configuration, probing mailboxes
    /// over plain SMTP.
    pub fn from_system_conf(
        options: VerifierOptions,
    ) -> Result<Self, trust_dns_resolver::error::ResolveError> {
        let resolver = TokioAsyncResolver::tokio_from_system_conf()?;
        let prober = SmtpProber::new(resolver.clone(), options.smtp.clone());
        Ok(Self::with_parts(resolver, prober, options))
    }
}

impl<R, P> Clone for EmailVerifier<R, P> {
    fn clone(&self) -> Self {
        Self {
            resolver: Arc::clone(&self.resolver),
            prober: Arc::clone(&self.prober),
            options: self.options.clone(),
        }
    }
}

impl<R, P> EmailVerifier<R, P>
where
    R: LookupMx + LookupHost + LookupTxt + Send + Sync + 'static,
    P: ProbeMailbox + Send + Sync + 'static,
{
    /// Assemble a verifier from explicit capability implementations.
    pub fn with_parts(resolver: R, prober: P, options: VerifierOptions) -> Self {
        Self {
            resolver: Arc::new(resolver),
            prober: Arc::new(prober),
            options,
        }
    }

    /// Verify one address.
    ///
    /// Input without an `@` separator short-circuits to an all-failed report
    /// with no network I/O. Otherwise the four checks run concurrently and
    /// the merged report comes back regardless of what the network did.
    pub async fn verify_email(&self, email: &str) -> AddressReport {
        let Some(domain) = email_domain(email) else {
            return AddressReport::invalid_format(email);
        };

        let (dmarc, spf, mx, smtp) = tokio::join!(
            self.dmarc_check(domain),
            self.spf_check(domain),
            self.mx_check(domain),
            self.smtp_check(email),
        );

        AddressReport {
            email: email.to_string(),
            mx,
            spf,
            dmarc,
            smtp,
        }
    }

    /// Verify a whole batch concurrently, preserving input order.
    ///
    /// One task is spawned per address so a fault in one pipeline cannot
    /// corrupt its siblings; a task that dies rejects the whole batch as
    /// [`BatchError::Unexpected`] instead of returning partial output.
    pub async fn verify_batch(&self, emails: &[String]) -> Result<BatchReport, BatchError> {
        if emails.is_empty() {
            return Err(BatchError::EmptyInput);
        }

        let handles: Vec<_> = emails
            .iter()
            .map(|email| {
                let verifier = self.clone();
                let email = email.clone();
                tokio::spawn(async move { verifier.verify_email(&email).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for joined in join_all(handles).await {
            match joined {
                Ok(report) => results.push(report),
                Err(err) => {
                    warn!(error = %err, "verification task aborted");
                    return Err(BatchError::Unexpected(err.to_string()));
                }
            }
        }

        Ok(BatchReport::new(results))
    }

    async fn mx_check(&self, domain: &str) -> CheckResult<Vec<MxEntry>> {
        let lookup = mx::check_mx(self.resolver.as_ref(), domain);
        match tokio::time::timeout(self.options.check_timeout, lookup).await {
            Ok(Ok(entries)) => CheckResult::Passed(entries),
            Ok(Err(MxError::NoRecords { .. })) => CheckResult::failed("No MX records found"),
            Ok(Err(err)) => {
                warn!(domain, error = %err, "MX check failed");
                CheckResult::failed("Error checking MX records")
            }
            Err(_) => {
                warn!(domain, "MX check timed out");
                CheckResult::failed("Error checking MX records")
            }
        }
    }

    async fn spf_check(&self, domain: &str) -> CheckResult<String> {
        let lookup = auth::check_spf(self.resolver.as_ref(), domain);
        match tokio::time::timeout(self.options.check_timeout, lookup).await {
            Ok(Ok(RecordStatus::Found(record))) => CheckResult::Passed(record),
            Ok(Ok(RecordStatus::Missing)) => CheckResult::failed("No SPF records found"),
            Ok(Err(err)) => {
                warn!(domain, error = %err, "SPF check failed");
                CheckResult::failed("Error checking SPF records")
            }
            Err(_) => {
                warn!(domain, "SPF check timed out");
                CheckResult::failed("Error checking SPF records")
            }
        }
    }

    async fn dmarc_check(&self, domain: &str) -> CheckResult<String> {
        let lookup = auth::check_dmarc(self.resolver.as_ref(), domain);
        match tokio::time::timeout(self.options.check_timeout, lookup).await {
            Ok(Ok(RecordStatus::Found(record))) => CheckResult::Passed(record),
            Ok(Ok(RecordStatus::Missing)) => CheckResult::failed("No DMARC records found"),
            Ok(Err(err)) => {
                warn!(domain, error = %err, "DMARC check failed");
                CheckResult::failed("Error checking DMARC records")
            }
            Err(_) => {
                warn!(domain, "DMARC check timed out");
                CheckResult::failed("Error checking DMARC records")
            }
        }
    }

    async fn smtp_check(&self, email: &str) -> CheckResult<bool> {
        let probe = self.prober.probe_mailbox(email);
        match tokio::time::timeout(self.options.check_timeout, probe).await {
            Ok(Ok(true)) => CheckResult::Passed(true),
            Ok(Ok(false)) => CheckResult::failed("Mailbox does not exist"),
            Ok(Err(err)) => {
                warn!(email, error = %err, "mailbox probe failed");
                CheckResult::failed("Error verifying mailbox")
            }
            Err(_) => {
                warn!(email, "mailbox probe timed out");
                CheckResult::failed("Error verifying mailbox")
            }
        }
    }
}

/// The domain is everything after the first `@`; `None` when the separator
/// is absent and the address short-circuits to an invalid-format report.
fn email_domain(email: &str) -> Option<&str> {
    email.split_once('@').map(|(_, domain)| domain)
}
