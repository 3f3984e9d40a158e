use std::net::SocketAddr;

use tracing::debug;

use super::SmtpProbeError;
use crate::mx::{LookupHost, LookupMx};

/// A connectable mail host: the exchange name plus its resolved socket
/// addresses.
#[derive(Debug, Clone)]
pub(crate) struct HostCandidate {
    pub host: String,
    pub preference: u16,
    pub addresses: Vec<SocketAddr>,
}

/// Resolve the hosts to probe for `domain`, best preference first, capped at
/// `max_hosts`.
///
/// Falls back to the implicit MX (the domain's own address records) when no
/// usable MX host resolves.
pub(crate) async fn resolve_hosts<R>(
    resolver: &R,
    domain: &str,
    port: u16,
    max_hosts: usize,
) -> Result<Vec<HostCandidate>, SmtpProbeError>
where
    R: LookupMx + LookupHost,
{
    let records = resolver
        .lookup_mx(domain)
        .await
        .map_err(SmtpProbeError::lookup)?;

    let mut hosts = Vec::new();
    for record in records {
        let ips = match resolver.lookup_ips(&record.exchange).await {
            Ok(ips) => ips,
            Err(err) => {
                debug!(exchange = %record.exchange, error = %err, "skipping unresolvable exchange");
                continue;
            }
        };
        if ips.is_empty() {
            continue;
        }
        hosts.push(HostCandidate {
            host: record.exchange,
            preference: record.preference,
            addresses: ips.into_iter().map(|ip| SocketAddr::new(ip, port)).collect(),
        });
    }

    if hosts.is_empty() {
        let ips = resolver
            .lookup_ips(domain)
            .await
            .map_err(SmtpProbeError::lookup)?;
        if ips.is_empty() {
            return Err(SmtpProbeError::NoSmtpServers);
        }
        hosts.push(HostCandidate {
            host: domain.to_string(),
            preference: 0,
            addresses: ips.into_iter().map(|ip| SocketAddr::new(ip, port)).collect(),
        });
    }

    hosts.sort_by_key(|host| host.preference);
    hosts.truncate(max_hosts.max(1));
    Ok(hosts)
}
