//! Unibergers command line.
//!
//! Runs searches against the bundled catalog (or a remote endpoint) and
//! prints the exact match and the visible window of results.
//! Build with: cargo build --features cli

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use unibergers::core::driver::{self, SessionEvent};
use unibergers::core::session::Snapshot;
use unibergers::services::remote::RemoteSearch;
use unibergers::{AddressState, Catalog, Config, MatchMode, SearchSession, SessionOptions, ViewFeed};

#[derive(Parser)]
#[command(name = "unibergers")]
#[command(about = "Search the emoji catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.config/unibergers/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Resolve searches through a remote endpoint instead of locally
    #[arg(long, global = true, value_name = "URL")]
    remote: Option<String>,

    /// Also match fields that occur inside the term
    #[arg(long, global = true)]
    symmetric: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Search once and print the visible window
    Search {
        term: String,

        /// First visible index to restore
        #[arg(long, default_value_t = 0)]
        position: usize,
    },

    /// Restore a session from an address-bar query string
    Url {
        /// e.g. "search=grin&position=3"
        query: String,
    },

    /// Read search box contents from stdin, one edit per line
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "unibergers=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path).with_context(|| format!("loading {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(url) = &cli.remote {
        config.remote.enabled = true;
        config.remote.endpoint = url.clone();
    }
    if cli.symmetric {
        config.search.match_mode = MatchMode::Symmetric;
    }

    let catalog = Catalog::embedded().context("bundled emoji catalog is invalid")?;
    let remote = RemoteSearch::from_config(&config.remote)?;

    match cli.command {
        Commands::Search { term, position } => {
            let mut address = AddressState::default();
            address.set_search(&term);
            address.set_position(position);
            restore_and_print(catalog, &config, &remote, &address).await
        }
        Commands::Url { query } => {
            let address = AddressState::parse(&query);
            restore_and_print(catalog, &config, &remote, &address).await
        }
        Commands::Interactive => interactive(catalog, &config, remote).await,
    }
}

async fn restore_and_print(
    catalog: Arc<Catalog>,
    config: &Config,
    remote: &RemoteSearch,
    address: &AddressState,
) -> anyhow::Result<()> {
    let (mut session, request) = SearchSession::restore(catalog, SessionOptions::from(config), address);

    if let Some(request) = request {
        let outcome = remote.search(&request.term).await;
        session.complete_remote(request.ticket, outcome);
    }

    let feed = session.feed(config.view.layout());
    let offset = session
        .take_initial_position()
        .map(|p| feed.scroll_offset_for_index(p))
        .unwrap_or(0);

    print_snapshot(&session, &feed, offset);

    let mut persisted = address.clone();
    if session.sync_address(&mut persisted, feed.first_visible_index(offset)) {
        println!("url: {}", persisted);
    }
    Ok(())
}

async fn interactive(catalog: Arc<Catalog>, config: &Config, remote: RemoteSearch) -> anyhow::Result<()> {
    let session = SearchSession::new(catalog, SessionOptions::from(config));
    let layout = config.view.layout();

    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.blocking_send(SessionEvent::Input(line)).is_err() {
                break;
            }
        }
    });

    let mut address = AddressState::default();
    let mut last: Option<Snapshot> = None;
    driver::drive(
        session,
        None,
        rx,
        move |term: String| {
            let remote = remote.clone();
            async move { remote.search(&term).await }
        },
        |session: &SearchSession| {
            let snapshot = session.snapshot();
            if last.as_ref() == Some(&snapshot) {
                return;
            }
            let feed = session.feed(layout);
            print_snapshot(session, &feed, 0);
            if session.sync_address(&mut address, 0) {
                println!("url: {}", address);
            }
            last = Some(snapshot);
        },
    )
    .await;

    Ok(())
}

fn print_snapshot(session: &SearchSession, feed: &ViewFeed, offset: u64) {
    let snapshot = session.snapshot();
    println!("-- {:?}", snapshot.state);

    if snapshot.loading {
        println!("Searching...");
    }
    if snapshot.no_results {
        println!("No Results");
    }
    if snapshot.failed {
        println!("Unknown Error");
    }
    if let Some(entry) = snapshot.exact_match.and_then(|i| session.catalog().get(i)) {
        println!("Exact Match: {}  {}  {}", entry.display_text, entry.label, entry.reference_url());
    }

    for row in feed.rows(feed.render_range(offset)) {
        println!(
            "{:>5}  {}  {}  [{}]  {}",
            row.index,
            row.entry.display_text,
            row.entry.label,
            row.entry.category,
            row.key
        );
    }
    println!("({} items)", feed.item_count());
}
