use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use catalog_graph::app::ingest_use_case::{merge_embeddings, read_embeddings, read_movie_nodes, IngestUseCase};
use catalog_graph::config::{AppConfig, NeptuneConfig};
use catalog_graph::constants::{NODE_MOVIE, PART_FILE};
use catalog_graph::ml::{training_job_name, MlClient, MlJobType, MlStatus};
use catalog_graph::pipeline::{Pipeline, PipelineResult};
use catalog_graph::search::OpenSearchClient;
use catalog_graph::{logging, metrics, server};

#[derive(Parser)]
#[command(name = "catalog_graph")]
#[command(about = "Movie catalog to property graph builder and similarity search")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to catalog_graph.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the node and edge tables from the raw catalog
    Build {
        #[arg(long)]
        raw_data_path: Option<PathBuf>,
        #[arg(long)]
        output_path: Option<PathBuf>,
        /// Also write the filtered catalog under <output>/staging
        #[arg(long)]
        write_staging: bool,
    },
    /// Check that the graph database's ML endpoint is reachable
    MlCheck {
        /// graph_notebook_config.json with host, port and auth_mode
        #[arg(long)]
        notebook_config: Option<PathBuf>,
    },
    /// Print a unique training job name
    MlJobName {
        #[arg(long)]
        prefix: String,
    },
    /// Print the output location of a completed ML job
    MlOutput {
        #[arg(long)]
        job_name: String,
        /// dataprocessing, modeltraining or modeltransform
        #[arg(long, default_value = "modeltraining")]
        job_type: String,
        #[arg(long)]
        notebook_config: Option<PathBuf>,
    },
    /// Merge embeddings with movie nodes and upload them to both search indices
    SearchIngest {
        #[arg(long)]
        embeddings: PathBuf,
        /// Movie node CSV (defaults to the build output)
        #[arg(long)]
        movies: Option<PathBuf>,
    },
    /// Run one similarity query and print the JSON response
    Search {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 3)]
        num_movies: usize,
        #[arg(long, default_value_t = 5)]
        num_recs: usize,
    },
    /// Serve the similarity-search HTTP API
    Serve {
        /// Overrides server.bind
        #[arg(long)]
        bind: Option<String>,
    },
}

fn neptune_config(config: &AppConfig, notebook_config: Option<PathBuf>) -> anyhow::Result<NeptuneConfig> {
    match notebook_config {
        Some(path) => Ok(NeptuneConfig::from_notebook_config(&path)?),
        None => Ok(config.neptune.clone()),
    }
}

fn print_summary(result: &PipelineResult) {
    println!("\n📊 Catalog graph build results:");
    println!("   Raw titles: {}", result.raw_titles);
    println!("   Raw names: {}", result.raw_names);
    println!("   # of Movie Titles: {}", result.movies);
    println!("   # of Movie People: {}", result.people);
    println!("   Titles with financials: {}", result.financial_titles);
    for table in &result.tables {
        println!("   {}/{}: {} rows", table.kind, table.name, table.rows);
    }
    if let Some(dir) = &result.staging_dir {
        println!("   Staging snapshot: {}", dir.display());
    }
    for (stage, secs) in &result.stage_seconds {
        println!("   {} took {:.2}s", stage, secs);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    logging::init_logging(&config.logging.directory, &config.logging.filter);
    metrics::init_metrics();

    match cli.command {
        Commands::Build {
            raw_data_path,
            output_path,
            write_staging,
        } => {
            if let Some(p) = raw_data_path {
                config.pipeline.raw_data_path = p;
            }
            if let Some(p) = output_path {
                config.pipeline.output_path = p;
            }
            config.pipeline.write_staging |= write_staging;
            config.validate()?;

            println!("🚀 Building catalog graph...");
            let pipeline = Pipeline::new(config.pipeline.clone());
            let result = tokio::task::spawn_blocking(move || pipeline.run())
                .await
                .context("graph build task panicked")?;
            match result {
                Ok(result) => {
                    print_summary(&result);
                    println!("✅ Graph written to {}", config.pipeline.output_path.display());
                }
                Err(e) => {
                    error!("Graph build failed: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::MlCheck { notebook_config } => {
            let client = MlClient::new(neptune_config(&config, notebook_config)?).await?;
            match client.check_ml_enabled().await? {
                MlStatus::Enabled => println!("✅ This Neptune cluster is configured to use Neptune ML"),
                MlStatus::NotConfigured { status, body } => {
                    println!("❌ This Neptune cluster is not configured to use Neptune ML (status {status})");
                    println!("   {body}");
                }
            }
        }
        Commands::MlJobName { prefix } => {
            println!("{}", training_job_name(&prefix));
        }
        Commands::MlOutput {
            job_name,
            job_type,
            notebook_config,
        } => {
            let job_type: MlJobType = job_type.parse()?;
            let client = MlClient::new(neptune_config(&config, notebook_config)?).await?;
            match client.job_output_location(&job_name, job_type).await? {
                Some(location) => println!("{location}"),
                None => {
                    warn!("No output location for {} job {}", job_type, job_name);
                    anyhow::bail!("{} job {} has not completed", job_type, job_name);
                }
            }
        }
        Commands::SearchIngest { embeddings, movies } => {
            let movies = movies.unwrap_or_else(|| {
                config
                    .pipeline
                    .output_path
                    .join("nodes")
                    .join(NODE_MOVIE)
                    .join(PART_FILE)
            });
            let search = &config.search;
            let docs = merge_embeddings(
                read_embeddings(&embeddings)?,
                &read_movie_nodes(&movies)?,
                search.dimension,
            );

            let client = Arc::new(OpenSearchClient::new(search).await?);
            let ingest = IngestUseCase::new(
                client,
                search.knn_index.clone(),
                search.text_index.clone(),
                search.dimension,
                search.batch_size,
            );
            let report = ingest.ingest(&docs).await?;
            info!("Search ingest finished: {:?}", report);
            println!("✅ Indexed {} documents into {} ({} rejected)", report.knn.indexed, search.knn_index, report.knn.failed);
            println!("✅ Indexed {} documents into {} ({} rejected)", report.text.indexed, search.text_index, report.text.failed);
        }
        Commands::Search {
            query,
            num_movies,
            num_recs,
        } => {
            let recommender = server::build_recommender(&config.search).await?;
            let response = recommender.get_movies(&query, num_movies, num_recs).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let addr: SocketAddr = bind
                .parse()
                .with_context(|| format!("invalid bind address '{}'", bind))?;
            let recommender = server::build_recommender(&config.search).await?;
            server::start_server(recommender, addr).await?;
        }
    }
    Ok(())
}
