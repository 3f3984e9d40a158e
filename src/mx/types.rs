use std::net::IpAddr;

use serde::Serialize;

/// Raw MX record as returned by the resolver, before the per-exchange
/// address fan-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: String,
}

impl MxRecord {
    pub fn new(preference: u16, exchange: impl Into<String>) -> Self {
        Self {
            preference,
            exchange: exchange.into(),
        }
    }
}

/// One mail exchanger with its resolved addresses.
///
/// `ips` stays empty when address resolution failed for that host; the MX
/// check as a whole still passes in that case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MxEntry {
    pub exchange: String,
    pub priority: u16,
    pub ips: Vec<IpAddr>,
}

impl MxEntry {
    pub fn new(exchange: impl Into<String>, priority: u16, ips: Vec<IpAddr>) -> Self {
        Self {
            exchange: exchange.into(),
            priority,
            ips,
        }
    }
}
