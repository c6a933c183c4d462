//! Replay key scripts through the composition controller.
//!
//! Usage:
//!   enput 'helo<wait><tab>'
//!   enput --json 'wrld<wait><down><enter>'
//!   echo 'siad<wait><tab>' | enput --words my_words.txt
//!
//! Logging goes to stderr; set RUST_LOG or pass --verbose.

use anyhow::Context as _;
use clap::Parser;
use enput_spelling::{Replay, Snapshot, SpellingConfig, SpellingEngine};
use serde::Serialize;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "enput")]
#[command(about = "Replay key scripts through the enput composition engine")]
struct Args {
    /// Word list to use instead of the built-in one
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Key scripts; read from stdin, one per line, when absent
    scripts: Vec<String>,
}

#[derive(Serialize)]
struct Report<'a> {
    script: &'a str,
    state: Snapshot,
    document: String,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(console_layer).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = match &args.config {
        Some(path) => SpellingConfig::load_toml(path)?,
        None => SpellingConfig::default(),
    };
    if let Some(words) = args.words.clone() {
        config.word_list = Some(words);
    }

    let engine = Rc::new(SpellingEngine::from_config(&config)?);

    let scripts = if args.scripts.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .collect::<Result<Vec<_>, _>>()
            .context("reading scripts from stdin")?
    } else {
        args.scripts.clone()
    };

    for script in scripts.iter().filter(|s| !s.trim().is_empty()) {
        let mut replay = Replay::new(engine.clone(), config.base());
        let state = replay
            .run_script(script)
            .with_context(|| format!("running script {:?}", script))?;
        let document = replay.finish().document;

        if args.json {
            let report = Report {
                script,
                state,
                document,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!("> {}", script);
            println!("{}", state);
            println!("= {:?}", document);
        }
    }

    let (hits, misses) = engine.cache_stats();
    tracing::debug!(hits, misses, "lookup cache");
    Ok(())
}
