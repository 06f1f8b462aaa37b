use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rag_indexer::RepoWatcher;
use rag_vector_store::EmbeddingClient;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use crate::client::{ApiClient, DEFAULT_API_URL};
use crate::server::Service;

mod api;
mod cleanup;
mod client;
mod server;

#[derive(Parser)]
#[command(name = "rr")]
#[command(about = "Rational-RAG: repository indexing and search for AI context", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Service address (falls back to RR_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the repository indexing HTTP service
    Serve(ServeArgs),

    /// Add a repository to the RAG system
    Add(AddArgs),

    /// Remove a repository from the RAG system
    Remove(RemoveArgs),

    /// List all repositories in the RAG system
    Show,

    /// Search a repository for code matching a query
    Search(SearchArgs),

    /// Rebuild a repository's index
    Reindex(ReindexArgs),

    /// Watch a directory of repositories and reindex on change
    Watch(WatchArgs),

    /// Interactively clean up the container runtime hosting the index services
    Cleanup,
}

#[derive(Args)]
struct ServeArgs {
    /// Bind address, e.g. 127.0.0.1:7779
    #[arg(long, default_value = "127.0.0.1:7779")]
    bind: String,
}

#[derive(Args)]
struct AddArgs {
    /// Repository directory
    repo_path: PathBuf,

    /// Name for the repository (defaults to the directory name)
    #[arg(long)]
    name: Option<String>,

    /// Programming language of the repository
    #[arg(long, value_parser = ["python", "typescript", "javascript", "rust"])]
    language: String,
}

#[derive(Args)]
struct RemoveArgs {
    /// Repository name
    repo_name: String,
}

#[derive(Args)]
struct SearchArgs {
    /// Search query
    text: String,

    /// Repository to search
    #[arg(long)]
    repo: String,

    /// Maximum number of results
    #[arg(long, short = 'n', default_value_t = api::DEFAULT_SEARCH_LIMIT)]
    limit: usize,
}

#[derive(Args)]
struct ReindexArgs {
    /// Repository name
    repo_name: String,
}

#[derive(Args)]
struct WatchArgs {
    /// Directory containing the repositories
    #[arg(default_value = ".")]
    path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let api_url = cli
        .api_url
        .clone()
        .or_else(|| env::var("RR_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Add(args) => run_add(args, &api_url).await,
        Commands::Remove(args) => run_remove(args, &api_url).await,
        Commands::Show => run_show(&api_url).await,
        Commands::Search(args) => run_search(args, &api_url).await,
        Commands::Reindex(args) => run_reindex(args, &api_url).await,
        Commands::Watch(args) => run_watch(args, &api_url).await,
        Commands::Cleanup => run_cleanup(),
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let embedder = EmbeddingClient::from_env();
    let service = Arc::new(Service::new(embedder));
    server::serve(&args.bind, service).await
}

async fn run_add(args: AddArgs, api_url: &str) -> Result<()> {
    let path = args
        .repo_path
        .canonicalize()
        .context("Invalid repository path")?;
    let name = args.name.unwrap_or_else(|| {
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "repository".to_string())
    });

    let client = ApiClient::new(api_url);
    match client.add_repository(&name, &path, &args.language).await {
        Ok(message) => println!("{message}"),
        Err(e) => {
            eprintln!("Failed to add repository: {e:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run_remove(args: RemoveArgs, api_url: &str) -> Result<()> {
    let client = ApiClient::new(api_url);
    match client.remove_repository(&args.repo_name).await {
        Ok(message) => println!("{message}"),
        Err(e) => {
            eprintln!("Failed to remove repository: {e:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run_show(api_url: &str) -> Result<()> {
    let client = ApiClient::new(api_url);
    match client.collections().await {
        Ok(collections) => {
            println!("Managed repositories:");
            for repo in collections {
                println!("- {repo}");
            }
        }
        Err(e) => {
            eprintln!("Failed to fetch repository list: {e:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run_search(args: SearchArgs, api_url: &str) -> Result<()> {
    let client = ApiClient::new(api_url);
    match client.search(&args.text, &args.repo, args.limit).await {
        Ok(results) => {
            for (i, result) in results.iter().enumerate() {
                println!(
                    "{}. {} [{}] (score: {:.3})",
                    i + 1,
                    result.file_path,
                    result.chunk_type,
                    result.similarity
                );
                println!("{}", result.code);
                println!();
            }
        }
        Err(e) => {
            eprintln!("Search failed: {e:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run_reindex(args: ReindexArgs, api_url: &str) -> Result<()> {
    let client = ApiClient::new(api_url);
    match client.reindex(&args.repo_name).await {
        Ok(message) => println!("{message}"),
        Err(e) => {
            eprintln!("Failed to reindex repository: {e:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn run_watch(args: WatchArgs, api_url: &str) -> Result<()> {
    let root = args.path.canonicalize().context("Invalid watch path")?;
    let client = ApiClient::new(api_url);
    let mut watcher = RepoWatcher::start(&root)?;

    loop {
        let repos = watcher.next_changed().await;
        if repos.is_empty() {
            log::warn!("Watcher shut down, exiting");
            return Ok(());
        }
        for repo in repos {
            log::info!("Changes detected in {repo}. Triggering reindex...");
            match client.reindex(&repo).await {
                Ok(message) => log::info!("{message}"),
                Err(e) => log::error!("Error triggering reindex for {repo}: {e:#}"),
            }
        }
    }
}

fn run_cleanup() -> Result<()> {
    cleanup::run().context("Cleanup run failed")?;
    Ok(())
}
