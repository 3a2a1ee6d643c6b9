use crate::model::TableGrid;

/// Marker appended to low-confidence cells in rendered output. A cell
/// holding only this marker does not count as column data.
pub const UNCERTAIN_MARKER: &str = "[UNCERTAIN]";

/// Clean a raw extracted grid for scoring and rendering.
///
/// In order: nulls become empty strings, whitespace runs (including
/// embedded newlines) collapse to single spaces, fully-empty rows are
/// dropped, remaining rows are right-padded to the longest row, and
/// fully-empty trailing columns are cut. A grid with nothing left is "no
/// table", not an empty grid.
pub fn clean_table_grid(raw: &[Vec<Option<String>>]) -> Option<TableGrid> {
    let mut rows = Vec::<Vec<String>>::new();

    for raw_row in raw {
        let cleaned = raw_row
            .iter()
            .map(|cell| normalize_cell(cell.as_deref().unwrap_or("")))
            .collect::<Vec<String>>();

        if cleaned.iter().any(|cell| !cell.is_empty()) {
            rows.push(cleaned);
        }
    }

    if rows.is_empty() {
        return None;
    }

    let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(max_cols, String::new());
    }

    let mut last_data_col = None;
    for col in 0..max_cols {
        if rows.iter().any(|row| cell_has_data(&row[col])) {
            last_data_col = Some(col);
        }
    }
    let last_data_col = last_data_col?;

    for row in &mut rows {
        row.truncate(last_data_col + 1);
    }

    Some(TableGrid::new(rows))
}

fn normalize_cell(cell: &str) -> String {
    cell.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn cell_has_data(cell: &str) -> bool {
    !cell.is_empty() && cell != UNCERTAIN_MARKER
}
