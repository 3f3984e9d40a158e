//! Live SMTP mailbox probing.
//!
//! [`SmtpProber`] speaks a minimal SMTP dialogue (banner, `EHLO`,
//! `MAIL FROM`, `RCPT TO`) against the target domain's mail exchangers and
//! reports whether the recipient was accepted. No message body is ever sent.
//! This is the slowest and least reliable of the four checks, so every
//! socket operation is bounded by a timeout and every failure is contained
//! inside [`SmtpProbeError`].

mod dns;
mod error;
mod options;
mod session;

pub use error::SmtpProbeError;
pub use options::SmtpProbeOptions;

use async_trait::async_trait;
use tracing::debug;
use trust_dns_resolver::TokioAsyncResolver;

use crate::mx::{LookupHost, LookupMx};
use dns::{HostCandidate, resolve_hosts};
use session::{SmtpReply, SmtpSession};

/// Mailbox-existence capability consumed by the address verifier.
#[async_trait]
pub trait ProbeMailbox: Send + Sync {
    /// Returns whether the mailbox accepts mail. Transport and protocol
    /// failures surface as [`SmtpProbeError`]; nothing propagates past this
    /// boundary.
    async fn probe_mailbox(&self, email: &str) -> Result<bool, SmtpProbeError>;
}

/// Probes mailboxes by connecting to the domain's mail exchangers in
/// preference order and exercising the transfer handshake up to the
/// recipient-acceptance step.
#[derive(Debug, Clone)]
pub struct SmtpProber<R = TokioAsyncResolver> {
    resolver: R,
    options: SmtpProbeOptions,
}

impl<R> SmtpProber<R>
where
    R: LookupMx + LookupHost,
{
    pub fn new(resolver: R, options: SmtpProbeOptions) -> Self {
        Self { resolver, options }
    }
}

#[async_trait]
impl<R> ProbeMailbox for SmtpProber<R>
where
    R: LookupMx + LookupHost + Send + Sync,
{
    async fn probe_mailbox(&self, email: &str) -> Result<bool, SmtpProbeError> {
        let (local, domain) = split_address(email)?;
        let ascii = idna::domain_to_ascii(domain).map_err(SmtpProbeError::idna)?;
        let hosts = resolve_hosts(
            &self.resolver,
            &ascii,
            self.options.port,
            self.options.max_mx,
        )
        .await?;

        let mail_from = self.options.envelope_sender(&ascii);
        let helo = self.options.helo_name(&ascii).into_owned();

        let mut last_err = SmtpProbeError::NoSmtpServers;
        for candidate in hosts {
            match probe_host(&candidate, local, &ascii, &self.options, &mail_from, &helo).await {
                Ok(accepted) => return Ok(accepted),
                Err(err) => {
                    debug!(host = %candidate.host, error = %err, "mailbox probe attempt failed");
                    last_err = err;
                }
            }
        }
        Err(last_err)
    }
}

fn split_address(email: &str) -> Result<(&str, &str), SmtpProbeError> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok((local, domain)),
        _ => Err(SmtpProbeError::invalid_email("address must be local@domain")),
    }
}

async fn probe_host(
    candidate: &HostCandidate,
    local: &str,
    domain: &str,
    options: &SmtpProbeOptions,
    mail_from: &str,
    helo: &str,
) -> Result<bool, SmtpProbeError> {
    let mut session = SmtpSession::connect(
        &candidate.host,
        &candidate.addresses,
        options.connect_timeout,
        options.command_timeout,
    )
    .await?;

    let banner = session.read_reply().await?;
    if !banner.is_positive_completion() {
        session.quit().await;
        return Err(SmtpProbeError::Protocol(format!(
            "unexpected banner {}",
            banner.code
        )));
    }

    let ehlo = session.send_command(&format!("EHLO {helo}")).await?;
    if !ehlo.is_positive_completion() {
        // Some ancient servers only speak HELO.
        let helo_reply = session.send_command(&format!("HELO {helo}")).await?;
        if !helo_reply.is_positive_completion() {
            session.quit().await;
            return Err(SmtpProbeError::Protocol(format!(
                "greeting rejected with {}",
                helo_reply.code
            )));
        }
    }

    let mail = session.send_command(&format!("MAIL FROM:<{mail_from}>")).await?;
    if !mail.is_positive_completion() {
        session.quit().await;
        return Err(SmtpProbeError::Protocol(format!(
            "MAIL FROM rejected with {}",
            mail.code
        )));
    }

    let rcpt = session.send_command(&format!("RCPT TO:<{local}@{domain}>")).await?;
    let verdict = classify_rcpt(&rcpt);
    session.quit().await;

    match verdict {
        RcptVerdict::Accepted => Ok(true),
        RcptVerdict::NoMailbox => Ok(false),
        RcptVerdict::Inconclusive(reason) => Err(SmtpProbeError::Protocol(reason)),
    }
}

enum RcptVerdict {
    Accepted,
    NoMailbox,
    Inconclusive(String),
}

fn classify_rcpt(reply: &SmtpReply) -> RcptVerdict {
    if reply.is_positive_completion() {
        return RcptVerdict::Accepted;
    }
    if is_permanent_no_mailbox(reply) {
        return RcptVerdict::NoMailbox;
    }
    let text = reply.lines.join(" ");
    if reply.is_transient_failure() {
        return RcptVerdict::Inconclusive(format!("temporary failure {}: {text}", reply.code));
    }
    RcptVerdict::Inconclusive(format!("unexpected response {}: {text}", reply.code))
}

fn is_permanent_no_mailbox(reply: &SmtpReply) -> bool {
    matches!(reply.code, 550 | 551 | 553)
}

#[cfg(test)]
mod tests;
