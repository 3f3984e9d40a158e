//! DNS MX resolution with per-exchange address fan-out.
//!
//! The public entry point is [`check_mx`], which looks up a domain's mail
//! exchangers and resolves every exchange's addresses concurrently. A host
//! whose address resolution fails keeps an empty `ips` list; only the MX
//! lookup itself fails the whole check.

mod error;
mod resolver;
mod types;

pub use error::MxError;
pub use resolver::{LookupHost, LookupMx};
pub use types::{MxEntry, MxRecord};

use futures::future::join_all;
use tracing::debug;

use resolver::normalize_domain;

/// Resolve `domain`'s MX records and each exchange's IP addresses using the
/// supplied lookup capabilities.
///
/// The domain is normalized via IDNA before querying DNS. Entries keep the
/// order the resolver returned them in; preferences are not re-sorted here.
pub async fn check_mx<R>(resolver: &R, domain: &str) -> Result<Vec<MxEntry>, MxError>
where
    R: LookupMx + LookupHost,
{
    let ascii = normalize_domain(domain)?;
    let records = resolver.lookup_mx(&ascii).await.map_err(MxError::lookup)?;

    if records.is_empty() {
        return Err(MxError::no_records(ascii));
    }

    let entries = join_all(records.into_iter().map(|record| async move {
        let ips = match resolver.lookup_ips(&record.exchange).await {
            Ok(ips) => ips,
            Err(err) => {
                debug!(exchange = %record.exchange, error = %err, "address resolution failed for exchange");
                Vec::new()
            }
        };
        MxEntry::new(record.exchange, record.preference, ips)
    }))
    .await;

    Ok(entries)
}

#[cfg(test)]
mod tests;
