use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

use crate::mx::MxEntry;

pub(crate) const INVALID_FORMAT: &str = "Invalid email format";

/// Outcome of one deliverability sub-check.
///
/// Serializes as `{"ok": true, "payload": …}` or `{"ok": false,
/// "reason": …}`; exactly one of the two bodies is present, gated by `ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult<T> {
    Passed(T),
    Failed(String),
}

impl<T> CheckResult<T> {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed(reason.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Passed(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match self {
            Self::Passed(payload) => Some(payload),
            Self::Failed(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Passed(_) => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

impl<T: Serialize> Serialize for CheckResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Passed(payload) => {
                map.serialize_entry("ok", &true)?;
                map.serialize_entry("payload", payload)?;
            }
            Self::Failed(reason) => {
                map.serialize_entry("ok", &false)?;
                map.serialize_entry("reason", reason)?;
            }
        }
        map.end()
    }
}

/// Per-address verdict: the original input plus the four check outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressReport {
    pub email: String,
    pub mx: CheckResult<Vec<MxEntry>>,
    pub spf: CheckResult<String>,
    pub dmarc: CheckResult<String>,
    pub smtp: CheckResult<bool>,
}

impl AddressReport {
    /// Report for input that failed the shape gate; no network was touched.
    pub(crate) fn invalid_format(email: &str) -> Self {
        Self {
            email: email.to_string(),
            mx: CheckResult::failed(INVALID_FORMAT),
            spf: CheckResult::failed(INVALID_FORMAT),
            dmarc: CheckResult::failed(INVALID_FORMAT),
            smtp: CheckResult::failed(INVALID_FORMAT),
        }
    }
}

/// Aggregate counters over one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_emails: usize,
    pub valid_emails: usize,
}

/// Response body for one verified batch; `results` keeps input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub results: Vec<AddressReport>,
    pub summary: Summary,
}

impl BatchReport {
    pub(crate) fn new(results: Vec<AddressReport>) -> Self {
        let summary = Summary {
            total_emails: results.len(),
            valid_emails: results.iter().filter(|report| report.smtp.is_ok()).count(),
        };
        Self {
            success: true,
            results,
            summary,
        }
    }
}
