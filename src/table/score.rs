use tracing::debug;

use crate::model::{ScoreResult, TableComplexity, TableGrid};

const EMPTY_CELL_SCORE: f64 = 0.0;
const TRUNCATED_CELL_SCORE: f64 = 20.0;
const FULL_CELL_SCORE: f64 = 100.0;

const TRUNCATION_INDICATORS: [&str; 3] = ["...", "(continued)", "(Continued)"];

/// A table with at least this many cells counts as maximally size-complex.
const COMPLEXITY_CELL_CAP: f64 = 200.0;

const MANUAL_CHECK_ROW_LIMIT: usize = 20;
const MANUAL_CHECK_COL_LIMIT: usize = 6;
const MANUAL_CHECK_ACCURACY_FLOOR: f64 = 80.0;
const MANUAL_CHECK_UNCERTAIN_RATIO_LIMIT: f64 = 0.5;

/// Score every cell of a cleaned grid and combine the mean with the
/// extraction-side accuracy signal (equal weight). Cells scoring strictly
/// below `threshold` are marked uncertain. A zero-cell grid scores 0 with
/// nothing uncertain. The caller validates the threshold.
pub fn score_table(grid: &TableGrid, external_accuracy: f64, threshold: f64) -> ScoreResult {
    if grid.cell_count() == 0 {
        return ScoreResult {
            overall_confidence: 0.0,
            cell_confidence: Vec::new(),
            uncertain_cells: Vec::new(),
            issues: Vec::new(),
        };
    }

    let mut cell_confidence = Vec::<Vec<f64>>::with_capacity(grid.row_count());
    let mut uncertain_cells = Vec::<(usize, usize)>::new();
    let mut issues = Vec::<String>::new();
    let mut score_sum = 0.0_f64;

    for (row_index, row) in grid.rows().iter().enumerate() {
        let mut row_scores = Vec::<f64>::with_capacity(row.len());
        for (col_index, cell) in row.iter().enumerate() {
            let score = score_cell(cell);
            score_sum += score;

            if score < threshold {
                uncertain_cells.push((row_index, col_index));
                issues.push(format!(
                    "low confidence ({score:.1}) at ({row_index},{col_index})"
                ));
            }

            row_scores.push(score);
        }
        cell_confidence.push(row_scores);
    }

    let cell_mean = score_sum / grid.cell_count() as f64;
    let overall_confidence = (cell_mean + external_accuracy) / 2.0;

    debug!(
        confidence = overall_confidence,
        uncertain = uncertain_cells.len(),
        "scored table"
    );

    ScoreResult {
        overall_confidence,
        cell_confidence,
        uncertain_cells,
        issues,
    }
}

fn score_cell(cell: &str) -> f64 {
    if cell.trim().is_empty() {
        return EMPTY_CELL_SCORE;
    }

    if is_truncated(cell) {
        return TRUNCATED_CELL_SCORE;
    }

    FULL_CELL_SCORE
}

fn is_truncated(text: &str) -> bool {
    if TRUNCATION_INDICATORS
        .iter()
        .any(|indicator| text.contains(indicator))
    {
        return true;
    }

    text.ends_with('<') || text.ends_with('>')
}

pub fn analyze_complexity(grid: &TableGrid) -> TableComplexity {
    let rows = grid.row_count();
    let cols = grid.col_count();
    let total_cells = rows * cols;

    let empty_cells = grid
        .rows()
        .iter()
        .flatten()
        .filter(|cell| cell.trim().is_empty())
        .count();

    let size_complexity = (total_cells as f64 / COMPLEXITY_CELL_CAP).min(1.0);
    let empty_complexity = if total_cells > 0 {
        (empty_cells as f64 / total_cells as f64).min(1.0)
    } else {
        0.0
    };

    TableComplexity {
        rows,
        cols,
        empty_cells,
        complexity_score: (size_complexity + empty_complexity) / 2.0,
    }
}

/// Any single trigger routes the table to human review: oversize grid, a
/// weak extraction-side accuracy signal, or too many uncertain cells.
/// Recall of extraction problems is worth more than reviewer workload.
pub fn needs_manual_check(
    complexity: &TableComplexity,
    external_accuracy: f64,
    uncertain_ratio: f64,
) -> bool {
    if complexity.rows > MANUAL_CHECK_ROW_LIMIT || complexity.cols > MANUAL_CHECK_COL_LIMIT {
        return true;
    }

    if external_accuracy < MANUAL_CHECK_ACCURACY_FLOOR {
        return true;
    }

    uncertain_ratio > MANUAL_CHECK_UNCERTAIN_RATIO_LIMIT
}

/// Substitute accuracy signal for dumps that carry none: the grid's
/// fill ratio on a 0-100 scale, 50 for a degenerate grid.
pub fn estimate_external_accuracy(grid: &TableGrid) -> f64 {
    let total_cells = grid.cell_count();
    if total_cells == 0 {
        return 50.0;
    }

    let filled = grid
        .rows()
        .iter()
        .flatten()
        .filter(|cell| !cell.trim().is_empty())
        .count();

    filled as f64 / total_cells as f64 * 100.0
}
