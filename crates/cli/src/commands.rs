use clap::{Subcommand, ValueEnum};

#[derive(Subcommand)]
pub enum Commands {
    /// Extract every configured query and load it into the destination
    Run {
        #[arg(long, help = "Config file path")]
        config: String,

        #[arg(
            long,
            value_enum,
            default_value_t = DestinationKind::Jsonl,
            help = "Destination to load records into"
        )]
        destination: DestinationKind,

        #[arg(long, default_value = "dune_data", help = "Directory for the jsonl destination")]
        out_dir: String,

        #[arg(
            long,
            default_value = ".dune_etl_state",
            help = "Directory for persisted cursor state"
        )]
        state_dir: String,
    },
    /// Validate every query configuration without extracting
    Validate {
        #[arg(long, help = "Config file path")]
        config: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DestinationKind {
    Jsonl,
    Stdout,
}
