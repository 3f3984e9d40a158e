use std::borrow::Cow;
use std::time::Duration;

/// Configuration knobs for the SMTP mailbox probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpProbeOptions {
    pub port: u16,
    pub helo_domain: Option<String>,
    pub mail_from: Option<String>,
    pub connect_timeout: Duration,
    pub command_timeout: Duration,
    pub max_mx: usize,
}

impl Default for SmtpProbeOptions {
    fn default() -> Self {
        Self {
            port: 25,
            helo_domain: None,
            mail_from: None,
            connect_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(5),
            max_mx: 3,
        }
    }
}

impl SmtpProbeOptions {
    /// Returns the hostname announced in the `EHLO` command. Defaults to the
    /// ASCII domain of the target mailbox when none is provided.
    pub fn helo_name<'a>(&'a self, ascii_domain: &'a str) -> Cow<'a, str> {
        self.helo_domain
            .as_deref()
            .filter(|value| !value.is_empty())
            .map(Cow::Borrowed)
            .unwrap_or(Cow::Borrowed(ascii_domain))
    }

    /// Returns the envelope sender used in the `MAIL FROM` command. When
    /// unspecified a `postmaster@domain` placeholder is synthesised.
    pub fn envelope_sender(&self, ascii_domain: &str) -> String {
        self.mail_from
            .as_ref()
            .filter(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| format!("postmaster@{ascii_domain}"))
    }
}
