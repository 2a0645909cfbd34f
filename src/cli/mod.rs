//! CLI Module
//!
//! Command-line interface for exercising the outline pipeline against an
//! in-memory document.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Stroked outline pipeline - selection to placed result layer
#[derive(Parser, Debug)]
#[command(name = "stroke-outline")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute result geometry for a frame and a processed image size
    #[command(name = "place")]
    Place {
        /// Placement policy (contain, overlay)
        #[arg(long, default_value = "contain")]
        policy: String,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,

        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Processed image width in pixels
        #[arg(long)]
        pixel_width: u32,

        /// Processed image height in pixels
        #[arg(long)]
        pixel_height: u32,

        /// Stroke width in canvas units
        #[arg(short, long, default_value_t = 10.0)]
        stroke: f64,
    },

    /// Run one full cycle on a generated image layer
    #[command(name = "demo")]
    Demo {
        /// Stroke width in canvas units
        #[arg(short, long, default_value_t = 10.0)]
        stroke: f64,

        /// Layer width in canvas units
        #[arg(long, default_value_t = 120.0)]
        width: f64,

        /// Layer height in canvas units
        #[arg(long, default_value_t = 80.0)]
        height: f64,
    },

    /// Print the effective configuration
    #[command(name = "config")]
    Config,
}
