//! CLI binary for marquee.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use marquee::{MarqueeConfig, SearchOrchestrator, SearchPhase, SearchSession, SearchState};
use marquee_api::{
    AppwriteStore, InMemoryStore, Movie, MovieSource, TmdbClient, TrendingEntry, TrendingStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Marquee: debounced movie discovery with trending searches.
#[derive(Parser)]
#[command(name = "marquee", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep trending counts in memory instead of the document store.
    #[arg(long)]
    memory_store: bool,

    /// Print results as JSON.
    #[arg(long)]
    json: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Type queries line by line; each line replaces the search box.
    Browse,

    /// Run one search and print the outcome.
    Search {
        /// Search text. Empty lists popular movies.
        #[arg(default_value = "")]
        query: String,
    },

    /// Print the trending searches.
    Trending,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee=info,marquee_api=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => MarqueeConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            let path = MarqueeConfig::default_config_path();
            if path.exists() {
                MarqueeConfig::from_file(&path)?
            } else {
                MarqueeConfig::default()
            }
        }
    };
    config.apply_process_env();
    config.validate()?;

    let command = cli.command.unwrap_or(Command::Browse);
    let source = Arc::new(TmdbClient::new(config.metadata.clone())?);

    if cli.memory_store {
        let store = Arc::new(InMemoryStore::new());
        run(command, config, source, store, cli.json).await
    } else {
        let store = Arc::new(AppwriteStore::new(config.store.clone())?);
        run(command, config, source, store, cli.json).await
    }
}

async fn run<M, S>(
    command: Command,
    config: MarqueeConfig,
    source: Arc<M>,
    store: Arc<S>,
    json: bool,
) -> anyhow::Result<()>
where
    M: MovieSource + 'static,
    S: TrendingStore + 'static,
{
    let (sink_tx, sink_rx) = mpsc::unbounded_channel();
    let orchestrator =
        SearchOrchestrator::from_config(source, store, &config).with_side_effect_sink(sink_tx);
    tokio::spawn(report_side_effects(sink_rx));

    match command {
        Command::Browse => run_browse(orchestrator, &config, json).await,
        Command::Search { query } => {
            let phase = orchestrator.search(&query).await;
            orchestrator.flush_side_effects().await;
            print_phase(&phase, json)
        }
        Command::Trending => {
            let entries = orchestrator.trending().load_trending().await;
            print_trending(&entries, json)
        }
    }
}

async fn run_browse<M, S>(
    orchestrator: SearchOrchestrator<M, S>,
    config: &MarqueeConfig,
    json: bool,
) -> anyhow::Result<()>
where
    M: MovieSource + 'static,
    S: TrendingStore + 'static,
{
    println!("Marquee v{}", env!("CARGO_PKG_VERSION"));
    println!("Type a query and press Enter. An empty line shows popular movies. Ctrl+D quits.\n");

    let session = SearchSession::start(orchestrator, config.search.quiet_period());

    let mut trending_rx = session.subscribe_trending();
    let trending_printer = tokio::spawn(async move {
        if trending_rx.changed().await.is_ok() {
            let entries = trending_rx.borrow_and_update().clone();
            if let Err(e) = print_trending(&entries, json) {
                warn!(error = %e, "failed to print trending searches");
            }
        }
    });

    let mut state_rx = session.subscribe_state();
    let state_printer = tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = state_rx.borrow_and_update().clone();
            if let Err(e) = print_state(&state, json) {
                warn!(error = %e, "failed to print search state");
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => session.set_raw_input(raw_input_from_line(&line)),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    session.shutdown().await;
    trending_printer.abort();
    state_printer.abort();
    Ok(())
}

async fn report_side_effects(mut rx: mpsc::UnboundedReceiver<marquee::SideEffectError>) {
    while let Some(err) = rx.recv().await {
        eprintln!("warning: {err}");
    }
}

fn print_state(state: &SearchState, json: bool) -> anyhow::Result<()> {
    if let SearchPhase::Loading { query } = &state.phase {
        if !json {
            println!("Searching {}...", display_query(query));
        }
        return Ok(());
    }
    print_phase(&state.phase, json)
}

fn print_phase(phase: &SearchPhase, json: bool) -> anyhow::Result<()> {
    if json {
        let value = serde_json::json!({
            "query": phase.query(),
            "movies": phase.movies(),
            "error": phase.error_message(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match phase {
        SearchPhase::Idle | SearchPhase::Loading { .. } => {}
        SearchPhase::Success { query, movies } => {
            println!("\n{}:", display_query(query));
            for movie in movies {
                println!("  {}", movie_card(movie));
            }
            println!();
        }
        SearchPhase::EmptyResults { query } => {
            println!("No movies found for {}.\n", display_query(query));
        }
        SearchPhase::DomainError { message, .. } | SearchPhase::TransportError { message, .. } => {
            println!("Error: {message}\n");
        }
    }
    Ok(())
}

fn print_trending(entries: &[TrendingEntry], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No trending searches yet.\n");
        return Ok(());
    }
    println!("Trending searches:");
    for (rank, entry) in entries.iter().enumerate() {
        println!("  {}. {} ({})", rank + 1, entry.search_term, entry.count);
    }
    println!();
    Ok(())
}

fn display_query(query: &str) -> String {
    if query.is_empty() {
        "popular movies".to_string()
    } else {
        format!("\"{query}\"")
    }
}

/// Search-box text for one stdin line. Only the line terminator is removed;
/// a whitespace-only line is still a search.
fn raw_input_from_line(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}

/// One line per movie: title, rating, language, year.
fn movie_card(movie: &Movie) -> String {
    let rating = movie
        .vote_average
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "N/A".into());
    let language = movie.original_language.as_deref().unwrap_or("N/A");
    let year = movie.release_year().unwrap_or("N/A");
    format!("{}  ★ {rating} · {language} · {year}", movie.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_terminators_are_stripped() {
        assert_eq!(raw_input_from_line("dune\r\n"), "dune");
        assert_eq!(raw_input_from_line("dune\n"), "dune");
        assert_eq!(raw_input_from_line(""), "");
    }

    #[test]
    fn whitespace_only_line_is_kept() {
        assert_eq!(raw_input_from_line("  "), "  ");
        assert_eq!(raw_input_from_line(" \t\r"), " \t");
        assert_eq!(raw_input_from_line("star wars  "), "star wars  ");
    }

    #[test]
    fn movie_card_shows_missing_fields_as_na() {
        let mut movie = Movie::new(1, "Dune");
        assert_eq!(movie_card(&movie), "Dune  ★ N/A · N/A · N/A");
        movie.vote_average = Some(7.84);
        movie.original_language = Some("en".into());
        movie.release_date = Some("2021-09-15".into());
        assert_eq!(movie_card(&movie), "Dune  ★ 7.8 · en · 2021");
    }
}
