use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_PREVIEW_ROWS;

#[derive(Parser)]
#[command(name = "energy-emissions")]
#[command(about = "French electricity production cleaning, CO₂ emissions and Power BI export")]
#[command(version)]
pub struct Cli {
    /// Defaults to `process` with every option at its default
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, help = "TOML settings file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Only log warnings and errors"
    )]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean, reshape, derive emissions, export CSV and render charts
    Process(ProcessArgs),

    /// Load and clean the input, print the cleaning report, write nothing
    Validate {
        #[arg(short, long, help = "Input production CSV")]
        input: Option<PathBuf>,
    },

    /// Run the transformation and print a summary of the final table
    Info {
        #[arg(short, long, help = "Input production CSV")]
        input: Option<PathBuf>,

        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProcessArgs {
    #[arg(short, long, help = "Input production CSV [default: production_and_emissions.csv]")]
    pub input: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Output CSV path [default: cleaned_data_for_power_bi.csv]"
    )]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Directory for the SVG charts [default: charts]")]
    pub charts_dir: Option<PathBuf>,

    #[arg(long, help = "Skip chart rendering")]
    pub no_charts: bool,

    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS, help = "Rows of the final table to print")]
    pub preview: usize,
}

impl Default for ProcessArgs {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            charts_dir: None,
            no_charts: false,
            preview: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Cli {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "warn"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
