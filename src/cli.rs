use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "datasheet2md",
    version,
    about = "Convert extracted datasheet page dumps to Markdown with table quality scoring"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a page dump into a Markdown document plus a quality report
    Convert(ConvertArgs),
    /// Score a standalone raw table grid and print the result as JSON
    Score(ScoreArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the page dump JSON produced by the extraction tool
    pub input: PathBuf,

    #[arg(long, short = 'o', default_value = "./output")]
    pub output_dir: PathBuf,

    /// Document title; defaults to the dump's title, then the file stem
    #[arg(long)]
    pub title: Option<String>,

    /// Prepend a table of contents built from detected headings
    #[arg(long, default_value_t = false)]
    pub toc: bool,

    /// Cells scoring strictly below this value (0-100) are marked uncertain
    #[arg(long, short = 'c', default_value_t = 50.0)]
    pub confidence_threshold: f64,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Path to a JSON file holding one raw grid (array of rows of nullable cells)
    pub input: PathBuf,

    #[arg(long, short = 'c', default_value_t = 50.0)]
    pub confidence_threshold: f64,

    /// Extraction-side accuracy signal (0-100); estimated from the grid's
    /// fill ratio when omitted
    #[arg(long)]
    pub accuracy: Option<f64>,
}
