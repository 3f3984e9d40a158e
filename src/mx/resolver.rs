use std::net::IpAddr;

use async_trait::async_trait;
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};

use super::{MxError, MxRecord};

/// Mail-exchanger lookup capability. Implemented for the tokio resolver and
/// stubbed in tests.
#[async_trait]
pub trait LookupMx: Send + Sync {
    /// Returns the domain's MX records in resolver order. A name that exists
    /// but carries no MX records yields an empty list, not an error.
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError>;
}

/// Host address lookup capability, used for the per-exchange IP fan-out and
/// the prober's implicit-MX fallback.
#[async_trait]
pub trait LookupHost: Send + Sync {
    async fn lookup_ips(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

#[async_trait]
impl LookupMx for TokioAsyncResolver {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        let lookup = match self.mx_lookup(domain).await {
            Ok(lookup) => lookup,
            Err(err) if should_treat_as_empty(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut records = Vec::new();
        for mx in lookup.iter() {
            let exchange = normalize_exchange(mx.exchange().to_utf8());
            records.push(MxRecord::new(mx.preference(), exchange));
        }
        Ok(records)
    }
}

#[async_trait]
impl LookupHost for TokioAsyncResolver {
    async fn lookup_ips(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        let lookup = match self.lookup_ip(host).await {
            Ok(lookup) => lookup,
            Err(err) if should_treat_as_empty(&err) => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        Ok(lookup.iter().collect())
    }
}

fn should_treat_as_empty(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, MxError> {
    let trimmed = domain.trim();
    if trimmed.is_empty() {
        return Err(MxError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(MxError::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}
