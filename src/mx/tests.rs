use std::collections::HashMap;
use std::net::IpAddr;

use async_trait::async_trait;
use trust_dns_resolver::error::ResolveError;

use super::resolver::{self, LookupHost, LookupMx};
use super::{MxError, MxRecord, check_mx};

#[derive(Default)]
struct StubDns {
    mx: HashMap<String, Vec<MxRecord>>,
    mx_error: Option<String>,
    ips: HashMap<String, Vec<IpAddr>>,
    failing_hosts: Vec<String>,
}

impl StubDns {
    fn with_mx(mut self, domain: &str, records: Vec<MxRecord>) -> Self {
        self.mx.insert(domain.to_string(), records);
        self
    }

    fn with_ips(mut self, host: &str, ips: Vec<&str>) -> Self {
        let parsed = ips.into_iter().map(|ip| ip.parse().expect("ip")).collect();
        self.ips.insert(host.to_string(), parsed);
        self
    }

    fn with_failing_host(mut self, host: &str) -> Self {
        self.failing_hosts.push(host.to_string());
        self
    }
}

#[async_trait]
impl LookupMx for StubDns {
    async fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        if let Some(message) = &self.mx_error {
            return Err(ResolveError::from(message.clone()));
        }
        Ok(self.mx.get(domain).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl LookupHost for StubDns {
    async fn lookup_ips(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        if self.failing_hosts.iter().any(|failing| failing == host) {
            return Err(ResolveError::from("address lookup failed"));
        }
        Ok(self.ips.get(host).cloned().unwrap_or_default())
    }
}

#[tokio::test]
async fn empty_domain_rejected_without_lookup() {
    let stub = StubDns::default();
    let err = check_mx(&stub, "  ").await.expect_err("empty domain should fail");
    assert!(matches!(err, MxError::EmptyDomain));
}

#[tokio::test]
async fn missing_records_reported_as_no_records() {
    let stub = StubDns::default();
    let err = check_mx(&stub, "example.com").await.expect_err("no records");
    assert!(matches!(err, MxError::NoRecords { .. }));
}

#[tokio::test]
async fn lookup_failure_reported_as_lookup_error() {
    let stub = StubDns {
        mx_error: Some("SERVFAIL".to_string()),
        ..StubDns::default()
    };
    let err = check_mx(&stub, "example.com").await.expect_err("lookup fails");
    assert!(matches!(err, MxError::Lookup { .. }));
}

#[tokio::test]
async fn resolver_order_preserved_with_ips_attached() {
    let stub = StubDns::default()
        .with_mx(
            "example.com",
            vec![
                MxRecord::new(20, "mx2.example.com"),
                MxRecord::new(10, "mx1.example.com"),
            ],
        )
        .with_ips("mx2.example.com", vec!["192.0.2.2"])
        .with_ips("mx1.example.com", vec!["192.0.2.1", "2001:db8::1"]);

    let entries = check_mx(&stub, "example.com").await.expect("lookup succeeds");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].exchange, "mx2.example.com");
    assert_eq!(entries[0].priority, 20);
    assert_eq!(entries[0].ips, vec!["192.0.2.2".parse::<IpAddr>().expect("ip")]);
    assert_eq!(entries[1].exchange, "mx1.example.com");
    assert_eq!(entries[1].ips.len(), 2);
}

#[tokio::test]
async fn unresolvable_exchange_degrades_to_empty_ips() {
    let stub = StubDns::default()
        .with_mx(
            "example.com",
            vec![
                MxRecord::new(10, "mx1.example.com"),
                MxRecord::new(20, "mx2.example.com"),
            ],
        )
        .with_ips("mx1.example.com", vec!["192.0.2.1"])
        .with_failing_host("mx2.example.com");

    let entries = check_mx(&stub, "example.com").await.expect("check still passes");

    assert_eq!(entries.len(), 2);
    assert!(!entries[0].ips.is_empty());
    assert!(entries[1].ips.is_empty());
}

#[tokio::test]
async fn domain_normalized_before_lookup() {
    let stub = StubDns::default()
        .with_mx(
            "xn--bcher-kva.example",
            vec![MxRecord::new(10, "mx.example.com")],
        )
        .with_ips("mx.example.com", vec!["192.0.2.1"]);

    let entries = check_mx(&stub, "bücher.example").await.expect("idna domain resolves");
    assert_eq!(entries[0].exchange, "mx.example.com");
}

#[test]
fn normalize_exchange_trims_dot_and_lowercases() {
    let out = resolver::normalize_exchange("Mail.EXAMPLE.com.".to_string());
    assert_eq!(out, "mail.example.com");
}
