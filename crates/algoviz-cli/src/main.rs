use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use algoviz_core::{Algorithm, AppConfig, GeneratorInput, Mood};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "algoviz")]
#[command(author, version, about = "Step-by-step algorithm visualizations in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available algorithms and moods
    List,
    /// Generate the step sequence and print it
    Generate {
        #[command(flatten)]
        input: InputArgs,
        /// Print steps as JSON
        #[arg(long)]
        json: bool,
        /// Write JSON steps to a file instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },
    /// Play the step sequence with timed playback
    Play {
        #[command(flatten)]
        input: InputArgs,
        /// Pace preset: chill, rush or grind (overrides --speed)
        #[arg(short = 'm', long)]
        mood: Option<Mood>,
        /// Speed multiplier (0.1 to 3.0)
        #[arg(long, allow_hyphen_values = true)]
        speed: Option<f64>,
    },
    /// Show the configuration file
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Algorithm: bubble, selection, insertion, two-pointer, sliding-window
    #[arg(short = 'a', long)]
    algorithm: Algorithm,
    /// Comma-separated input values, e.g. 5,2,4,6,1,3
    #[arg(short = 'v', long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    values: Vec<i64>,
    /// Target sum (two-pointer)
    #[arg(short = 't', long, allow_hyphen_values = true)]
    target: Option<i64>,
    /// Window size (sliding-window)
    #[arg(short = 'k', long)]
    window: Option<usize>,
}

impl InputArgs {
    fn to_input(&self) -> GeneratorInput {
        GeneratorInput {
            values: self.values.clone(),
            target: self.target,
            window: self.window,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Handle commands
    match cli.command {
        Some(Commands::List) | None => commands::list::run(),
        Some(Commands::Generate { input, json, output }) => commands::generate::run(
            input.algorithm,
            &input.to_input(),
            json,
            output.as_deref(),
            &config.display,
        ),
        Some(Commands::Play { input, mood, speed }) => {
            commands::play::run(input.algorithm, input.to_input(), &config, mood, speed).await
        }
        Some(Commands::Config { init }) => commands::config::run(&config, init),
    }
}
