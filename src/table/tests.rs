use super::*;
use crate::model::TableGrid;

fn raw(rows: &[&[Option<&str>]]) -> Vec<Vec<Option<String>>> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| cell.map(str::to_string))
                .collect::<Vec<Option<String>>>()
        })
        .collect()
}

fn grid(rows: &[&[&str]]) -> TableGrid {
    TableGrid::new(
        rows.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect(),
    )
}

#[test]
fn clean_normalizes_nulls_and_whitespace() {
    let cleaned = clean_table_grid(&raw(&[&[
        Some("VDD\nsupply"),
        None,
        Some("  3.3 \r\n V  "),
    ]]))
    .expect("grid survives");

    assert_eq!(cleaned.rows(), &[vec![
        "VDD supply".to_string(),
        String::new(),
        "3.3 V".to_string(),
    ]]);
}

#[test]
fn clean_drops_fully_empty_rows() {
    let cleaned = clean_table_grid(&raw(&[
        &[Some("Pin"), Some("Function")],
        &[Some("   "), None],
        &[Some("1"), Some("VDD")],
    ]))
    .expect("grid survives");

    assert_eq!(cleaned.row_count(), 2);
    assert_eq!(cleaned.rows()[1][1], "VDD");
}

#[test]
fn clean_pads_ragged_rows_to_max_length() {
    let cleaned = clean_table_grid(&raw(&[
        &[Some("Pin"), Some("Name"), Some("Type")],
        &[Some("1")],
    ]))
    .expect("grid survives");

    assert_eq!(cleaned.col_count(), 3);
    assert_eq!(cleaned.rows()[1], vec![
        "1".to_string(),
        String::new(),
        String::new()
    ]);
}

#[test]
fn clean_truncates_fully_empty_trailing_columns() {
    let cleaned = clean_table_grid(&raw(&[
        &[Some("Pin"), Some("Name"), None, None],
        &[Some("1"), Some("VDD"), Some("  "), None],
    ]))
    .expect("grid survives");

    assert_eq!(cleaned.col_count(), 2);
}

#[test]
fn clean_keeps_internal_empty_columns() {
    let cleaned = clean_table_grid(&raw(&[
        &[Some("Pin"), None, Some("Type")],
        &[Some("1"), None, Some("power")],
    ]))
    .expect("grid survives");

    assert_eq!(cleaned.col_count(), 3);
    assert_eq!(cleaned.rows()[0][1], "");
}

#[test]
fn clean_signals_absence_for_empty_input() {
    assert!(clean_table_grid(&[]).is_none());
    assert!(clean_table_grid(&raw(&[&[None, Some("  \n ")], &[Some(""), None]])).is_none());
}

#[test]
fn clean_is_idempotent() {
    let first = clean_table_grid(&raw(&[
        &[Some("Pin\nnumber"), Some("Name"), None],
        &[None, None, None],
        &[Some("1"), Some("VDD")],
    ]))
    .expect("grid survives");

    let reraw = first
        .rows()
        .iter()
        .map(|row| row.iter().map(|cell| Some(cell.clone())).collect())
        .collect::<Vec<Vec<Option<String>>>>();

    let second = clean_table_grid(&reraw).expect("grid survives again");
    assert_eq!(first, second);
}

#[test]
fn score_combines_cell_mean_with_external_accuracy() {
    // mean([100,100,100,0]) = 75, then (75 + 90) / 2 = 82.5
    let table = grid(&[&["H1", "H2"], &["D1", ""]]);
    let result = score_table(&table, 90.0, 50.0);

    assert_eq!(result.overall_confidence, 82.5);
    assert_eq!(result.uncertain_cells, vec![(1, 1)]);
    assert_eq!(result.cell_confidence[1], vec![100.0, 0.0]);
    assert_eq!(result.issues.len(), 1);
    assert!(result.issues[0].contains("(1,1)"));
}

#[test]
fn score_of_zero_cell_grid_is_zero_with_nothing_uncertain() {
    let table = TableGrid::new(Vec::new());
    let result = score_table(&table, 100.0, 50.0);

    assert_eq!(result.overall_confidence, 0.0);
    assert!(result.uncertain_cells.is_empty());
    assert!(result.cell_confidence.is_empty());
}

#[test]
fn truncation_indicators_score_twenty() {
    let table = grid(&[&["up to 5.5V...", "rising edge (continued)", "see (Continued)", "VOUT <"]]);
    let result = score_table(&table, 100.0, 50.0);

    assert_eq!(result.cell_confidence[0], vec![20.0, 20.0, 20.0, 20.0]);
    assert_eq!(result.uncertain_cells.len(), 4);
}

#[test]
fn overall_confidence_stays_within_bounds() {
    let tables = [
        grid(&[&["", ""], &["", ""]]),
        grid(&[&["a", "b"], &["c", "d"]]),
        grid(&[&["x..."]]),
    ];

    for table in &tables {
        for accuracy in [0.0, 50.0, 100.0] {
            let result = score_table(table, accuracy, 50.0);
            assert!((0.0..=100.0).contains(&result.overall_confidence));
        }
    }
}

#[test]
fn uncertain_count_is_monotone_in_threshold() {
    let table = grid(&[&["full", ""], &["cut...", "also full"]]);

    let mut previous = 0;
    for threshold in [0.0, 10.0, 30.0, 60.0, 100.0] {
        let count = score_table(&table, 90.0, threshold).uncertain_cells.len();
        assert!(count >= previous, "threshold {threshold}");
        previous = count;
    }
}

#[test]
fn complexity_averages_size_and_emptiness() {
    let table = grid(&[&["a", "", "c", ""], &["", "f", "", "h"]]);
    let complexity = analyze_complexity(&table);

    assert_eq!(complexity.rows, 2);
    assert_eq!(complexity.cols, 4);
    assert_eq!(complexity.empty_cells, 4);
    assert!(complexity.has_empty());
    // size = 8/200 = 0.04, empty = 4/8 = 0.5 → (0.04 + 0.5) / 2
    assert!((complexity.complexity_score - 0.27).abs() < 1e-9);
}

#[test]
fn complexity_size_term_caps_at_one() {
    let rows = vec![vec!["x".to_string(); 30]; 30];
    let complexity = analyze_complexity(&TableGrid::new(rows));

    assert!((complexity.complexity_score - 0.5).abs() < 1e-9);
}

#[test]
fn row_count_alone_forces_manual_check() {
    // 21 rows x 1 col, all filled, perfect accuracy: still flagged.
    let rows = vec![vec!["filled".to_string()]; 21];
    let table = TableGrid::new(rows);

    let complexity = analyze_complexity(&table);
    let result = score_table(&table, 100.0, 50.0);
    assert!(result.uncertain_cells.is_empty());
    assert!(needs_manual_check(&complexity, 100.0, 0.0));
}

#[test]
fn wide_fully_filled_grid_is_flagged_solely_for_rows() {
    let rows = vec![vec!["v".to_string(); 3]; 25];
    let table = TableGrid::new(rows);

    let complexity = analyze_complexity(&table);
    let result = score_table(&table, 100.0, 50.0);

    assert_eq!(result.uncertain_cells.len(), 0);
    assert!(needs_manual_check(&complexity, 100.0, 0.0));
}

#[test]
fn each_manual_check_trigger_is_individually_sufficient() {
    let small = analyze_complexity(&grid(&[&["a", "b"], &["c", "d"]]));
    assert!(!needs_manual_check(&small, 100.0, 0.0));

    let wide = analyze_complexity(&TableGrid::new(vec![vec!["x".to_string(); 7]; 2]));
    assert!(needs_manual_check(&wide, 100.0, 0.0));

    assert!(needs_manual_check(&small, 79.9, 0.0));
    assert!(needs_manual_check(&small, 100.0, 0.51));

    // Boundary values do not trigger.
    assert!(!needs_manual_check(&small, 80.0, 0.5));
}

#[test]
fn accuracy_estimate_is_fill_ratio() {
    let table = grid(&[&["a", "b"], &["c", ""]]);
    assert_eq!(estimate_external_accuracy(&table), 75.0);

    assert_eq!(estimate_external_accuracy(&TableGrid::new(Vec::new())), 50.0);
}
