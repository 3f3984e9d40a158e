use std::time::Duration;

use thiserror::Error;

/// Errors raised while probing a mailbox over SMTP. All of them are caught
/// at the verifier boundary and folded into the smtp check's failure shape.
#[derive(Debug, Error)]
pub enum SmtpProbeError {
    #[error("invalid email address: {reason}")]
    InvalidEmail { reason: String },
    #[error("domain normalisation failed: {0}")]
    Idna(String),
    #[error("DNS lookup failed: {source}")]
    Lookup {
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[error("no SMTP servers available for the domain")]
    NoSmtpServers,
    #[error("connection to {host} failed: {source}")]
    Connect {
        host: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SmtpProbeError {
    pub(crate) fn invalid_email(reason: impl Into<String>) -> Self {
        Self::InvalidEmail {
            reason: reason.into(),
        }
    }

    pub(crate) fn idna<T: std::fmt::Display>(err: T) -> Self {
        Self::Idna(err.to_string())
    }

    pub(crate) fn lookup(source: trust_dns_resolver::error::ResolveError) -> Self {
        Self::Lookup { source }
    }

    pub(crate) fn connect(host: impl Into<String>, source: std::io::Error) -> Self {
        Self::Connect {
            host: host.into(),
            source,
        }
    }

    pub(crate) fn io(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}
