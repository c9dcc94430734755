use crate::{
    commands::{Commands, DestinationKind},
    error::CliError,
};
use clap::Parser;
use connectors::dune::DuneClient;
use engine_core::{source::build_source, validation::validate_query_config};
use engine_runtime::{
    config::PipelineConfig,
    destination::{Destination, JsonlDestination, StdoutDestination},
    pipeline::Pipeline,
    state::SledCursorStore,
};
use std::sync::Arc;
use tracing::{Level, info};

mod commands;
mod env;
mod error;

#[derive(Parser)]
#[command(
    name = "dune-etl",
    version = "0.1.0",
    about = "Dune Analytics extract-and-load tool"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            destination,
            out_dir,
            state_dir,
        } => {
            let pipeline_config = PipelineConfig::from_file(&config)?;
            let api_key = env::resolve_api_key(&pipeline_config)?;

            let units = build_source(pipeline_config.query_configs()?, &api_key)?;
            info!(
                "Running pipeline {} with {} resource(s)",
                pipeline_config.pipeline_name,
                units.len()
            );

            let store = Arc::new(SledCursorStore::open(&state_dir)?);
            let dest: Arc<dyn Destination> = match destination {
                DestinationKind::Jsonl => Arc::new(JsonlDestination::new(out_dir)),
                DestinationKind::Stdout => Arc::new(StdoutDestination),
            };

            let pipeline = Pipeline::new(pipeline_config.pipeline_name.clone(), store, dest);
            let client = DuneClient::new();
            let summary = pipeline.run(&units, &client).await?;
            println!("{summary}");
        }
        Commands::Validate { config } => {
            let pipeline_config = PipelineConfig::from_file(&config)?;
            let mut checked = 0usize;
            for (name, mut query_config) in pipeline_config.query_configs()? {
                query_config.name = name;
                validate_query_config(&query_config)?;
                checked += 1;
            }
            println!("OK: {checked} query configuration(s) validated");
        }
    }

    Ok(())
}
