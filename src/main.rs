use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use tweetrank::api::{create_router, AppState};
use tweetrank::{load_records, SearchEngine, SearchOptions, SearchResult};

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "TF-IDF search over a tweet corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one query and print the ranked results
    Search {
        /// Corpus file (.csv, .json, .jsonl or .ndjson, optionally .gz)
        #[arg(short, long)]
        corpus: PathBuf,

        /// Query terms; an empty query lists the whole corpus
        #[arg(default_value = "")]
        query: String,

        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Print the per-term TF-IDF breakdown of each result
        #[arg(long, default_value_t = false)]
        explain: bool,
    },
    /// Print index statistics
    Stats {
        #[arg(short, long)]
        corpus: PathBuf,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long)]
        corpus: PathBuf,

        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
}

fn load_engine(corpus: &Path) -> Result<SearchEngine> {
    let records = load_records(corpus)
        .with_context(|| format!("loading corpus from {}", corpus.display()))?;
    Ok(SearchEngine::new(records))
}

// Render results the way the results page lays them out
fn print_results(result: &SearchResult<'_>) {
    println!("Search Time Elapsed: {}ms", result.elapsed_millis());
    println!("Total Results: {}", result.total);
    println!();

    if result.results.is_empty() {
        println!("No results found.");
        return;
    }

    for scored in &result.results {
        let record = scored.record;
        println!("@ {}", record.username);
        println!("{}", record.text());
        println!(
            "likes {}  replies {}  retweets {}  [score {:.4}]",
            record.like_count, record.reply_count, record.retweet_count, scored.score
        );
        if let Some(breakdown) = &scored.breakdown {
            for (term, weight) in breakdown {
                println!("    {:<20} {:.4}", term, weight);
            }
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            corpus,
            query,
            limit,
            offset,
            explain,
        } => {
            let engine = load_engine(&corpus)?;
            let options = SearchOptions {
                limit,
                offset,
                explain,
            };
            let result = engine.search(&query, &options);
            print_results(&result);
        }
        Commands::Stats { corpus } => {
            let engine = load_engine(&corpus)?;
            let stats = engine.stats();
            println!("Total documents: {}", stats.total_documents);
            println!("Total unique terms: {}", stats.total_terms);
            println!("Average docs per term: {:.2}", stats.avg_docs_per_term);
        }
        Commands::Serve { corpus, host, port } => {
            let engine = load_engine(&corpus)?;
            let app = create_router(AppState::new(engine, Some(corpus)));

            let addr: SocketAddr = format!("{}:{}", host, port)
                .parse()
                .with_context(|| format!("invalid listen address {}:{}", host, port))?;
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "server listening");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
