//! `tempo`: a UCI engine over stdin/stdout.
//!
//! Logs go to stderr (filtered by `RUST_LOG`, default `info`) so stdout
//! carries nothing but protocol traffic.

mod uci;

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tempo_engine::{EngineConfig, PreferenceDatabase, SearchEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::uci::{Flow, Session};

#[derive(Parser, Debug)]
#[command(name = "tempo", version, about = "UCI chess engine")]
struct Args {
    /// Engine configuration file (TOML). Missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Move-preference database (JSON).
    #[arg(long)]
    book: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = args
        .config
        .as_deref()
        .map(EngineConfig::load_or_default)
        .unwrap_or_default();
    let book = args
        .book
        .as_deref()
        .map(PreferenceDatabase::load_or_empty)
        .unwrap_or_default();
    info!(
        book_keys = book.len(),
        max_depth = config.max_depth,
        tt_capacity = config.tt_capacity,
        "engine ready"
    );

    let mut session = Session::new(SearchEngine::new(config, Arc::new(book)));
    let mut stdout = io::stdout().lock();
    for line in io::stdin().lock().lines() {
        if session.handle(&line?, &mut stdout)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}
