use crate::model::{QualityMetrics, TableOutcome};

/// Score bands for reporting a table's complexity as a word.
const HIGH_COMPLEXITY_FLOOR: f64 = 0.7;
const MEDIUM_COMPLEXITY_FLOOR: f64 = 0.4;

/// Uncertain cells are assumed to cost half their coverage weight.
const UNCERTAIN_COVERAGE_WEIGHT: f64 = 0.5;

const SUMMARY_TABLE_LIMIT: usize = 5;

/// Accumulates per-table scoring outcomes across one document conversion.
///
/// Explicit context object: the caller owns one ledger per document and
/// threads it through the page loop. Pages are processed sequentially; a
/// parallel caller would merge per-page ledgers afterwards, which is safe
/// because every accumulated quantity is a commutative sum.
#[derive(Debug, Default)]
pub struct QualityLedger {
    tables: Vec<TableOutcome>,
    accuracy_sum: f64,
    uncertain_cell_sum: usize,
    cell_sum: usize,
}

impl QualityLedger {
    pub fn new() -> QualityLedger {
        QualityLedger::default()
    }

    pub fn record(&mut self, outcome: TableOutcome) {
        self.accuracy_sum += outcome.accuracy;
        self.uncertain_cell_sum += outcome.uncertain_cell_count;
        self.cell_sum += outcome.cell_count;
        self.tables.push(outcome);
    }

    pub fn tables(&self) -> &[TableOutcome] {
        &self.tables
    }

    pub fn metrics(&self) -> QualityMetrics {
        let total_tables = self.tables.len();
        let manual_check_tables = self
            .tables
            .iter()
            .filter(|table| table.needs_manual_check)
            .count();

        let manual_check_ratio = if total_tables > 0 {
            manual_check_tables as f64 / total_tables as f64
        } else {
            0.0
        };
        let avg_accuracy = if total_tables > 0 {
            self.accuracy_sum / total_tables as f64
        } else {
            0.0
        };

        let uncertain_ratio = if self.cell_sum > 0 {
            self.uncertain_cell_sum as f64 / self.cell_sum as f64
        } else {
            0.0
        };
        let coverage =
            ((1.0 - uncertain_ratio * UNCERTAIN_COVERAGE_WEIGHT) * 100.0).clamp(0.0, 100.0);

        QualityMetrics {
            total_tables,
            manual_check_tables,
            manual_check_ratio,
            avg_accuracy,
            coverage,
        }
    }

    /// Human-facing conversion summary, written to stdout after the output
    /// files land.
    pub fn print_summary(&self) {
        let flagged = self
            .tables
            .iter()
            .filter(|table| table.needs_manual_check)
            .collect::<Vec<&TableOutcome>>();

        if !flagged.is_empty() {
            println!(
                "\nWarning: {} table(s) require manual verification\n",
                flagged.len()
            );

            for table in flagged.iter().take(SUMMARY_TABLE_LIMIT) {
                println!(
                    "  {} (page {}) - complexity: {}",
                    table.caption,
                    table.page,
                    complexity_level(table.complexity.complexity_score)
                );
            }
            if flagged.len() > SUMMARY_TABLE_LIMIT {
                println!(
                    "  ... and {} more table(s) need verification",
                    flagged.len() - SUMMARY_TABLE_LIMIT
                );
            }

            println!("\nSearch for [MANUAL_CHECK] in the generated Markdown to locate them\n");
        }

        let metrics = self.metrics();
        println!("Quality report:");
        println!("- total tables: {}", metrics.total_tables);
        println!(
            "- manual check required: {} ({:.1}%)",
            metrics.manual_check_tables,
            metrics.manual_check_ratio * 100.0
        );
        if metrics.avg_accuracy > 0.0 {
            println!("- average accuracy: {:.1}%", metrics.avg_accuracy);
        }
        println!("- coverage: {:.1}%", metrics.coverage);
    }
}

pub fn complexity_level(score: f64) -> &'static str {
    if score > HIGH_COMPLEXITY_FLOOR {
        "high"
    } else if score > MEDIUM_COMPLEXITY_FLOOR {
        "medium"
    } else {
        "low"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TableComplexity;

    fn outcome(
        accuracy: f64,
        needs_manual_check: bool,
        uncertain_cell_count: usize,
        cell_count: usize,
    ) -> TableOutcome {
        TableOutcome {
            page: 1,
            caption: "Table 1-0".to_string(),
            accuracy,
            overall_confidence: accuracy,
            needs_manual_check,
            complexity: TableComplexity::default(),
            uncertain_cell_count,
            cell_count,
        }
    }

    #[test]
    fn empty_ledger_reports_zeroes_and_full_coverage() {
        let metrics = QualityLedger::new().metrics();

        assert_eq!(metrics.total_tables, 0);
        assert_eq!(metrics.manual_check_tables, 0);
        assert_eq!(metrics.manual_check_ratio, 0.0);
        assert_eq!(metrics.avg_accuracy, 0.0);
        assert_eq!(metrics.coverage, 100.0);
    }

    #[test]
    fn metrics_accumulate_across_recorded_tables() {
        let mut ledger = QualityLedger::new();
        ledger.record(outcome(90.0, false, 0, 10));
        ledger.record(outcome(70.0, true, 5, 10));

        let metrics = ledger.metrics();
        assert_eq!(metrics.total_tables, 2);
        assert_eq!(metrics.manual_check_tables, 1);
        assert_eq!(metrics.manual_check_ratio, 0.5);
        assert_eq!(metrics.avg_accuracy, 80.0);
        // uncertain ratio 5/20 = 0.25 → coverage (1 - 0.125) * 100
        assert_eq!(metrics.coverage, 87.5);
    }

    #[test]
    fn fully_uncertain_document_still_covers_half() {
        let mut ledger = QualityLedger::new();
        ledger.record(outcome(10.0, true, 8, 8));

        assert_eq!(ledger.metrics().coverage, 50.0);
    }

    #[test]
    fn coverage_is_clamped_to_zero() {
        // Inconsistent counts can push the raw formula below zero; the
        // reported value is clamped into [0,100].
        let mut ledger = QualityLedger::new();
        ledger.record(outcome(10.0, true, 10, 2));

        assert_eq!(ledger.metrics().coverage, 0.0);
    }

    #[test]
    fn complexity_levels_band_as_expected() {
        assert_eq!(complexity_level(0.85), "high");
        assert_eq!(complexity_level(0.5), "medium");
        assert_eq!(complexity_level(0.2), "low");
    }
}
