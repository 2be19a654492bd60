use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tablewire")]
#[command(about = "Replay captured connector payloads offline", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten a captured webhook payload into per-field change records
    Normalize {
        /// Payload JSON file: a full webhook payload or a bare
        /// changedRecordsById map
        #[arg(long)]
        input: PathBuf,

        /// Field id to attach as context on every emitted change (repeatable)
        #[arg(long = "include", value_name = "FIELD_ID")]
        include: Vec<String>,

        /// Attach every unchanged field instead of an allow-list
        #[arg(long, conflicts_with = "include")]
        all_unchanged: bool,

        /// Also emit records created in the payload batch
        #[arg(long)]
        created: bool,

        /// Indented output instead of JSON lines
        #[arg(long)]
        pretty: bool,
    },

    /// List the connectors this package ships
    Connectors,
}
