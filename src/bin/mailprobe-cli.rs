use std::io::{self, BufRead};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;

use mailprobe::{BatchReport, CheckResult, EmailVerifier, SmtpProbeOptions, VerifierOptions};

#[derive(Parser)]
#[command(name = "mailprobe-cli", about = "Check email deliverability from the command line")]
struct Cli {
    /// addresses to verify
    emails: Vec<String>,

    /// read addresses from stdin (one per line)
    #[arg(long)]
    stdin: bool,

    /// format: human|json
    #[arg(long, default_value = "human")]
    format: String,

    /// upper bound per sub-check, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    check_timeout_ms: u64,

    /// hostname announced in EHLO (defaults to the target domain)
    #[arg(long)]
    helo: Option<String>,

    /// envelope sender for MAIL FROM (defaults to postmaster@<domain>)
    #[arg(long)]
    mail_from: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut emails = cli.emails.clone();
    if cli.stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("failed to read stdin")?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                emails.push(trimmed.to_string());
            }
        }
    }
    if emails.is_empty() {
        bail!("no addresses given; pass them as arguments or use --stdin");
    }

    let options = VerifierOptions {
        check_timeout: Duration::from_millis(cli.check_timeout_ms),
        smtp: SmtpProbeOptions {
            helo_domain: cli.helo.clone(),
            mail_from: cli.mail_from.clone(),
            ..SmtpProbeOptions::default()
        },
    };

    let verifier = EmailVerifier::from_system_conf(options)
        .context("failed to initialize the system DNS resolver")?;
    let report = verifier.verify_batch(&emails).await?;

    match cli.format.as_str() {
        "human" => print_human(&report),
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        other => bail!("unknown --format '{other}'"),
    }
    Ok(())
}

fn print_human(report: &BatchReport) {
    for result in &report.results {
        println!("{}:", result.email);
        println!(
            "  mx:    {}",
            describe(&result.mx, |entries| format!("{} exchanger(s)", entries.len()))
        );
        println!("  spf:   {}", describe(&result.spf, |record| record.clone()));
        println!("  dmarc: {}", describe(&result.dmarc, |record| record.clone()));
        println!(
            "  smtp:  {}",
            describe(&result.smtp, |_| "mailbox exists".to_string())
        );
    }
    println!(
        "{} checked, {} deliverable",
        report.summary.total_emails, report.summary.valid_emails
    );
}

fn describe<T>(result: &CheckResult<T>, show: impl Fn(&T) -> String) -> String {
    match result {
        CheckResult::Passed(payload) => format!("ok ({})", show(payload)),
        CheckResult::Failed(reason) => format!("failed ({reason})"),
    }
}
