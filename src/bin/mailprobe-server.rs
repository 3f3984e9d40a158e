use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mailprobe::api::{AppState, create_router};
use mailprobe::{EmailVerifier, SmtpProbeOptions, VerifierOptions};

#[derive(Parser)]
#[command(name = "mailprobe-server", about = "HTTP batch email deliverability service")]
struct Args {
    /// socket address to listen on
    #[arg(long, default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// upper bound per sub-check, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    check_timeout_ms: u64,

    /// SMTP connect/command timeout, in milliseconds
    #[arg(long, default_value_t = 5_000)]
    smtp_timeout_ms: u64,

    /// hostname announced in EHLO (defaults to the target domain)
    #[arg(long)]
    helo: Option<String>,

    /// envelope sender for MAIL FROM (defaults to postmaster@<domain>)
    #[arg(long)]
    mail_from: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let options = VerifierOptions {
        check_timeout: Duration::from_millis(args.check_timeout_ms),
        smtp: SmtpProbeOptions {
            helo_domain: args.helo,
            mail_from: args.mail_from,
            connect_timeout: Duration::from_millis(args.smtp_timeout_ms),
            command_timeout: Duration::from_millis(args.smtp_timeout_ms),
            ..SmtpProbeOptions::default()
        },
    };

    let verifier = EmailVerifier::from_system_conf(options)
        .context("failed to initialize the system DNS resolver")?;
    let router = create_router(AppState::new(verifier)).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %args.bind, "mailprobe server listening");

    axum::serve(listener, router)
        .await
        .context("server terminated")?;
    Ok(())
}
