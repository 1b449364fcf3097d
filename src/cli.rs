use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::Result;

use crate::core::{DepthSpec, Engine};

#[derive(Parser)]
#[command(name = "reportree")]
#[command(about = "Depth-driven HTML reports from nested data trees")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a full report directory from a JSON tree
    Generate {
        /// JSON file holding the report tree
        input: PathBuf,

        /// Output directory for the report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report title
        #[arg(short, long)]
        title: Option<String>,

        /// Menu depth: `2`, or per top-level key: `Products=3,default=1`
        #[arg(short, long, value_parser = parse_depth)]
        depth: Option<DepthSpec>,

        /// Report path shown when the index opens, e.g. `Products/Overview`
        #[arg(short, long)]
        active: Option<String>,
    },

    /// Render one JSON payload to a standalone HTML page
    Single {
        /// JSON file holding the payload
        input: PathBuf,

        /// Report name, also used for the filename
        #[arg(short, long)]
        name: String,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the linked menu for a JSON tree without rendering anything
    Menu {
        /// JSON file holding the report tree
        input: PathBuf,

        /// Menu depth: `2`, or per top-level key: `Products=3,default=1`
        #[arg(short, long, value_parser = parse_depth)]
        depth: Option<DepthSpec>,
    },

    /// Write a default configuration file
    Init {
        /// Target directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
}

fn parse_depth(input: &str) -> std::result::Result<DepthSpec, String> {
    DepthSpec::parse_cli(input).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn execute(self, engine: Engine) -> Result<()> {
        match self.command {
            Commands::Generate { input, output, title, depth, active } => {
                engine.generate(&input, output, title, depth, active).await
            }
            Commands::Single { input, name, output } => {
                engine.single(&input, &name, output).await
            }
            Commands::Menu { input, depth } => {
                println!("{}", engine.menu(&input, depth)?);
                Ok(())
            }
            Commands::Init { path, force } => {
                engine.init(path, force).map(|_| ())
            }
        }
    }
}
