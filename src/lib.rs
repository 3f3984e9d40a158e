#![forbid(unsafe_code)]
//! mailprobe: batch email deliverability verification.
//!
//! Four independent checks per address (MX records with per-exchange IP
//! resolution, SPF, DMARC, and a live SMTP mailbox probe) run concurrently
//! and merge into one report per address. [`EmailVerifier`] drives single
//! addresses and whole batches; [`api`] exposes the batch endpoint over
//! HTTP.

pub mod api;
pub mod auth;
pub mod mx;
pub mod smtp_verify;
pub mod verifier;

pub use mx::{MxEntry, MxError};
pub use smtp_verify::{ProbeMailbox, SmtpProbeError, SmtpProbeOptions, SmtpProber};
pub use verifier::{
    AddressReport, BatchError, BatchReport, CheckResult, EmailVerifier, Summary, VerifierOptions,
};
