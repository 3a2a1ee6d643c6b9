use std::fs;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::info;

use crate::cli::ScoreArgs;
use crate::model::{ScoreResult, TableComplexity};
use crate::table::{
    analyze_complexity, clean_table_grid, estimate_external_accuracy, needs_manual_check,
    score_table,
};

#[derive(Debug, Serialize)]
struct ScoreReport {
    rows: usize,
    cols: usize,
    accuracy: f64,
    needs_manual_check: bool,
    complexity: TableComplexity,
    score: ScoreResult,
}

pub fn run(args: ScoreArgs) -> Result<()> {
    if !(0.0..=100.0).contains(&args.confidence_threshold) {
        bail!(
            "confidence threshold must be within 0-100, got {}",
            args.confidence_threshold
        );
    }
    if let Some(accuracy) = args.accuracy {
        if !(0.0..=100.0).contains(&accuracy) {
            bail!("accuracy must be within 0-100, got {accuracy}");
        }
    }

    let data = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read grid file: {}", args.input.display()))?;
    let raw: Vec<Vec<Option<String>>> = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse grid file: {}", args.input.display()))?;

    let Some(grid) = clean_table_grid(&raw) else {
        bail!("grid contains no table content after cleaning");
    };

    let accuracy = args
        .accuracy
        .unwrap_or_else(|| estimate_external_accuracy(&grid));
    let score = score_table(&grid, accuracy, args.confidence_threshold);
    let complexity = analyze_complexity(&grid);

    let cell_count = grid.cell_count();
    let uncertain_ratio = if cell_count > 0 {
        score.uncertain_cells.len() as f64 / cell_count as f64
    } else {
        0.0
    };

    let report = ScoreReport {
        rows: grid.row_count(),
        cols: grid.col_count(),
        accuracy,
        needs_manual_check: needs_manual_check(&complexity, accuracy, uncertain_ratio),
        complexity,
        score,
    };

    info!(rows = report.rows, cols = report.cols, "scored grid");
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize score report")?
    );

    Ok(())
}
