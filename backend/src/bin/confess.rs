//! Submit and read confessions from the terminal.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use mockable::{Clock, DefaultClock};
use reqwest::Url;
use tokio::runtime::Builder;

use confessions::client::{
    CharCountLevel, ConfessionStats, ConfessionsApi, FormController, HttpConfessionsClient,
    NotificationLevel, SubmitOutcome, category_badge, display_number, time_ago,
};
use confessions::wire::ListedConfession;

/// `confess` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "confess", about = "Send and read anonymous confessions", version)]
struct CliArgs {
    /// Base URL of the confessions server.
    #[arg(
        long = "server",
        value_name = "url",
        default_value = "http://localhost:3000"
    )]
    server: Url,
    /// Request timeout in seconds.
    #[arg(long = "timeout", value_name = "secs", default_value_t = 10)]
    timeout_secs: u64,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Send a confession.
    Submit {
        /// Confession text.
        text: String,
        /// Category label.
        #[arg(long, value_name = "name")]
        category: Option<String>,
    },
    /// Show recent confessions, newest first.
    List {
        /// Maximum number of confessions to show.
        #[arg(long, value_name = "n")]
        limit: Option<u32>,
    },
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let client = HttpConfessionsClient::new(&args.server, Duration::from_secs(args.timeout_secs))
        .map_err(|error| io::Error::other(format!("create client: {error}")))?;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let mut stdout = io::stdout().lock();

    match args.command {
        Command::Submit { text, category } => {
            if CharCountLevel::for_text(&text) == CharCountLevel::Limit {
                writeln!(stdout, "note: this confession is unusually long")?;
            }
            let form = FormController::new(Arc::new(client), clock.clone());
            let outcome = form.submit(&text, category.as_deref()).await;
            report_outcome(&mut stdout, outcome, clock.utc())
        }
        Command::List { limit } => {
            let confessions = client
                .list(limit)
                .await
                .map_err(|error| io::Error::other(format!("list confessions: {error}")))?;
            render_list(&mut stdout, &confessions, clock.utc())
        }
    }
}

fn report_outcome<W: Write>(
    out: &mut W,
    outcome: SubmitOutcome,
    now: DateTime<Utc>,
) -> io::Result<()> {
    match outcome {
        SubmitOutcome::Sent {
            confession,
            confessions,
            notification,
        } => {
            writeln!(
                out,
                "{} (#{})",
                notification.message,
                display_number(&confession.confession_id).unwrap_or("?")
            )?;
            render_list(out, &confessions, now)
        }
        SubmitOutcome::Blocked(notification) | SubmitOutcome::Failed(notification) => {
            let kind = match notification.level {
                NotificationLevel::Warning => io::ErrorKind::InvalidInput,
                NotificationLevel::Info | NotificationLevel::Error => io::ErrorKind::Other,
            };
            Err(io::Error::new(kind, notification.message))
        }
        SubmitOutcome::Busy => Err(io::Error::other("a submission is already in flight")),
    }
}

fn render_list<W: Write>(
    out: &mut W,
    confessions: &[ListedConfession],
    now: DateTime<Utc>,
) -> io::Result<()> {
    let now = now.with_timezone(&Local);
    let stats = ConfessionStats::collect(confessions, &now);
    writeln!(out, "{} confessions, {} today", stats.total, stats.today)?;
    if confessions.is_empty() {
        writeln!(out, "No confessions yet. Be the first to share your thoughts!")?;
        return Ok(());
    }
    for confession in confessions {
        let number = display_number(&confession.id).unwrap_or("?");
        let badge = category_badge(&confession.category)
            .map(|badge| format!(" [{badge}]"))
            .unwrap_or_default();
        writeln!(
            out,
            "#{number}{badge} · {}\n  {}",
            time_ago(confession.timestamp, &now),
            confession.confession
        )?;
    }
    Ok(())
}
