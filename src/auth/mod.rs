//! SPF and DMARC record checks.
//!
//! Both are plain TXT lookups: SPF at the domain apex, DMARC at the
//! `_dmarc` subdomain. The [`LookupTxt`] seam flattens multi-segment TXT
//! records into one string per record; record selection and concatenation
//! live in the `spf`/`dmarc` submodules.

mod dmarc;
mod error;
mod resolver;
mod spf;

pub use error::AuthError;
pub use resolver::LookupTxt;

use resolver::{fqdn, normalize_domain};

/// Outcome of a single authentication-record lookup that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordStatus {
    /// The record was found; holds the full record text.
    Found(String),
    /// The lookup succeeded but no matching record exists.
    Missing,
}

/// Look up `domain`'s SPF record: the first TXT record containing the
/// `v=spf1` marker.
pub async fn check_spf<R>(resolver: &R, domain: &str) -> Result<RecordStatus, AuthError>
where
    R: LookupTxt,
{
    let ascii = normalize_domain(domain)?;
    let records = resolver.lookup_txt(&ascii).await?;
    Ok(match spf::select_record(&records) {
        Some(record) => RecordStatus::Found(record),
        None => RecordStatus::Missing,
    })
}

/// Look up `domain`'s DMARC record: every TXT segment published at
/// `_dmarc.<domain>` concatenated with no separator.
pub async fn check_dmarc<R>(resolver: &R, domain: &str) -> Result<RecordStatus, AuthError>
where
    R: LookupTxt,
{
    let ascii = normalize_domain(domain)?;
    let name = fqdn("_dmarc", &ascii);
    let records = resolver.lookup_txt(&name).await?;
    Ok(match dmarc::concat_records(&records) {
        Some(record) => RecordStatus::Found(record),
        None => RecordStatus::Missing,
    })
}
