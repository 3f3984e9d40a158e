use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use trust_dns_resolver::error::ResolveError;

use super::session::SmtpReply;
use super::{ProbeMailbox, SmtpProbeError, SmtpProbeOptions, SmtpProber, classify_rcpt, RcptVerdict};
use crate::mx::{LookupHost, LookupMx, MxRecord};

/// Resolves every domain to a single MX host and every host to `ip`.
struct StubDns {
    ip: IpAddr,
}

#[async_trait]
impl LookupMx for StubDns {
    async fn lookup_mx(&self, _domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        Ok(vec![MxRecord::new(10, "mx.test.invalid")])
    }
}

#[async_trait]
impl LookupHost for StubDns {
    async fn lookup_ips(&self, _host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        Ok(vec![self.ip])
    }
}

/// A resolver that knows nothing at all.
struct EmptyDns;

#[async_trait]
impl LookupMx for EmptyDns {
    async fn lookup_mx(&self, _domain: &str) -> Result<Vec<MxRecord>, ResolveError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl LookupHost for EmptyDns {
    async fn lookup_ips(&self, _host: &str) -> Result<Vec<IpAddr>, ResolveError> {
        Ok(Vec::new())
    }
}

fn prober_for(addr: SocketAddr) -> SmtpProber<StubDns> {
    let options = SmtpProbeOptions {
        port: addr.port(),
        connect_timeout: Duration::from_secs(2),
        command_timeout: Duration::from_secs(2),
        ..SmtpProbeOptions::default()
    };
    SmtpProber::new(StubDns { ip: addr.ip() }, options)
}

/// Serves one scripted SMTP dialogue, then hangs up.
async fn scripted_server(listener: TcpListener, banner: &'static str, rcpt_reply: &'static str) {
    let (mut socket, _) = listener.accept().await.expect("accept");
    socket
        .write_all(format!("{banner}\r\n").as_bytes())
        .await
        .expect("banner write");

    let mut pending = String::new();
    let mut buf = [0u8; 1024];
    loop {
        let read = match socket.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(read) => read,
        };
        pending.push_str(&String::from_utf8_lossy(&buf[..read]));
        while let Some(pos) = pending.find("\r\n") {
            let line: String = pending.drain(..pos + 2).collect();
            let reply = if line.starts_with("EHLO") {
                "250-mx.test.invalid\r\n250 PIPELINING\r\n".to_string()
            } else if line.starts_with("MAIL FROM") {
                "250 sender ok\r\n".to_string()
            } else if line.starts_with("RCPT TO") {
                format!("{rcpt_reply}\r\n")
            } else if line.starts_with("QUIT") {
                let _ = socket.write_all(b"221 bye\r\n").await;
                return;
            } else {
                "502 command not implemented\r\n".to_string()
            };
            socket.write_all(reply.as_bytes()).await.expect("reply write");
        }
    }
}

#[tokio::test]
async fn accepted_recipient_reported_as_existing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(scripted_server(listener, "220 mx.test.invalid ESMTP", "250 recipient ok"));

    let prober = prober_for(addr);
    let exists = prober.probe_mailbox("user@test.invalid").await.expect("probe succeeds");
    assert!(exists);
}

#[tokio::test]
async fn rejected_recipient_reported_as_missing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(scripted_server(
        listener,
        "220 mx.test.invalid ESMTP",
        "550 5.1.1 user unknown",
    ));

    let prober = prober_for(addr);
    let exists = prober.probe_mailbox("ghost@test.invalid").await.expect("probe succeeds");
    assert!(!exists);
}

#[tokio::test]
async fn transient_rcpt_failure_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(scripted_server(
        listener,
        "220 mx.test.invalid ESMTP",
        "451 greylisted, try again later",
    ));

    let prober = prober_for(addr);
    let err = prober
        .probe_mailbox("user@test.invalid")
        .await
        .expect_err("greylisting is inconclusive");
    assert!(matches!(err, SmtpProbeError::Protocol(_)));
}

#[tokio::test]
async fn rejecting_banner_is_an_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(scripted_server(listener, "554 no service", "250 unreachable"));

    let prober = prober_for(addr);
    let err = prober
        .probe_mailbox("user@test.invalid")
        .await
        .expect_err("banner rejection fails the probe");
    assert!(matches!(err, SmtpProbeError::Protocol(_)));
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let prober = prober_for(addr);
    let err = prober
        .probe_mailbox("user@test.invalid")
        .await
        .expect_err("nothing listens there");
    assert!(matches!(err, SmtpProbeError::Connect { .. }));
}

#[tokio::test]
async fn address_without_separator_rejected_before_any_lookup() {
    let prober = SmtpProber::new(EmptyDns, SmtpProbeOptions::default());
    let err = prober
        .probe_mailbox("not-an-email")
        .await
        .expect_err("shape gate");
    assert!(matches!(err, SmtpProbeError::InvalidEmail { .. }));
}

#[tokio::test]
async fn domain_without_any_servers_rejected() {
    let prober = SmtpProber::new(EmptyDns, SmtpProbeOptions::default());
    let err = prober
        .probe_mailbox("user@test.invalid")
        .await
        .expect_err("no MX, no implicit MX");
    assert!(matches!(err, SmtpProbeError::NoSmtpServers));
}

#[test]
fn rcpt_classification_covers_the_reply_space() {
    let reply = |code| SmtpReply { code, lines: vec![String::new()] };
    assert!(matches!(classify_rcpt(&reply(250)), RcptVerdict::Accepted));
    assert!(matches!(classify_rcpt(&reply(550)), RcptVerdict::NoMailbox));
    assert!(matches!(classify_rcpt(&reply(551)), RcptVerdict::NoMailbox));
    assert!(matches!(classify_rcpt(&reply(553)), RcptVerdict::NoMailbox));
    assert!(matches!(classify_rcpt(&reply(451)), RcptVerdict::Inconclusive(_)));
    assert!(matches!(classify_rcpt(&reply(552)), RcptVerdict::Inconclusive(_)));
}
