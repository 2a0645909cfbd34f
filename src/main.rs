//! Stroke Outline CLI
//!
//! Command-line interface for the stroked outline pipeline.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stroke_outline::cli::{commands, Cli, Commands};
use stroke_outline::host::Frame;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Stroke Outline v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.config.as_deref();
    match cli.command {
        Some(Commands::Place {
            policy,
            x,
            y,
            width,
            height,
            pixel_width,
            pixel_height,
            stroke,
        }) => commands::place(
            config,
            &policy,
            Frame::new(x, y, width, height),
            (pixel_width, pixel_height),
            stroke,
        )?,
        Some(Commands::Demo {
            stroke,
            width,
            height,
        }) => commands::demo(config, stroke, width, height)?,
        Some(Commands::Config) => commands::show_config(config)?,
        None => {
            println!("Stroke Outline v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
        }
    }

    Ok(())
}
