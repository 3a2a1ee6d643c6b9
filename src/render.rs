//! Markdown assembly for classified content blocks.

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::TableGrid;
use crate::table::UNCERTAIN_MARKER;

const MANUAL_CHECK_MARKER: &str = "[MANUAL_CHECK]";

pub struct MarkdownBuilder {
    title: String,
    with_toc: bool,
    parts: Vec<String>,
    headings: Vec<(u8, String)>,
    item_prefix: Regex,
}

impl MarkdownBuilder {
    pub fn new(title: &str, with_toc: bool) -> Result<MarkdownBuilder> {
        let item_prefix = Regex::new(r"^\d+[.)]\s+(.+)$")
            .context("failed to compile list item prefix regex")?;

        Ok(MarkdownBuilder {
            title: title.to_string(),
            with_toc,
            parts: Vec::new(),
            headings: Vec::new(),
            item_prefix,
        })
    }

    pub fn push_heading(&mut self, text: &str, level: u8) {
        let level = level.clamp(1, 6);
        self.parts
            .push(format!("{} {}\n\n", "#".repeat(level as usize), text));
        self.headings.push((level, text.to_string()));
    }

    pub fn push_paragraph(&mut self, text: &str) {
        self.parts.push(format!("{text}\n\n"));
    }

    /// Items arrive with their source markers still attached; strip them
    /// so the rendered list does not double up.
    pub fn push_list(&mut self, items: &[String], ordered: bool) {
        if items.is_empty() {
            return;
        }

        let mut lines = Vec::<String>::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let body = self.strip_item_marker(item, ordered);
            if ordered {
                lines.push(format!("{}. {}", index + 1, body));
            } else {
                lines.push(format!("- {body}"));
            }
        }

        self.parts.push(format!("{}\n\n", lines.join("\n")));
    }

    fn strip_item_marker(&self, item: &str, ordered: bool) -> String {
        let mut body = item.trim();

        for marker in ['•', '-', '*', '·'] {
            if let Some(rest) = body.strip_prefix(marker) {
                body = rest.trim_start();
                break;
            }
        }

        if ordered {
            if let Some(captures) = self.item_prefix.captures(body) {
                if let Some(rest) = captures.get(1) {
                    body = rest.as_str();
                }
            }
        }

        body.to_string()
    }

    /// Render a cleaned grid. Uncertain cells get the `[UNCERTAIN]` marker
    /// appended (the bare marker when the cell is empty); a flagged table
    /// carries `[MANUAL_CHECK]` on its caption line.
    pub fn push_table(
        &mut self,
        grid: &TableGrid,
        caption: &str,
        manual_check: bool,
        uncertain_cells: &[(usize, usize)],
    ) {
        if grid.cell_count() == 0 {
            return;
        }

        let marked = mark_uncertain_cells(grid, uncertain_cells);

        let mut lines = Vec::<String>::with_capacity(marked.len() + 1);
        lines.push(format_row(&marked[0]));
        lines.push(format!(
            "| {} |",
            vec!["---"; grid.col_count()].join(" | ")
        ));
        for row in &marked[1..] {
            lines.push(format_row(row));
        }

        let check_suffix = if manual_check {
            format!(" {MANUAL_CHECK_MARKER}")
        } else {
            String::new()
        };

        self.parts.push(format!(
            "### {caption}{check_suffix}\n\n{}\n\n",
            lines.join("\n")
        ));
    }

    pub fn push_image(&mut self, path: &str, alt: &str) {
        self.parts.push(format!("![{alt}]({path})\n\n"));
    }

    pub fn build(&self) -> String {
        let mut document = format!("# {}\n\n", self.title);

        if self.with_toc && !self.headings.is_empty() {
            document.push_str(&self.build_toc());
        }

        for part in &self.parts {
            document.push_str(part);
        }

        document
    }

    fn build_toc(&self) -> String {
        let mut lines = vec!["## Table of Contents".to_string(), String::new()];

        for (level, text) in &self.headings {
            let indent = "  ".repeat((*level as usize).saturating_sub(1));
            lines.push(format!("{indent}- [{text}](#{})", heading_anchor(text)));
        }

        lines.push(String::new());
        lines.push(String::new());
        lines.join("\n")
    }
}

fn mark_uncertain_cells(grid: &TableGrid, uncertain_cells: &[(usize, usize)]) -> Vec<Vec<String>> {
    grid.rows()
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            row.iter()
                .enumerate()
                .map(|(col_index, cell)| {
                    if !uncertain_cells.contains(&(row_index, col_index)) {
                        cell.clone()
                    } else if cell.trim().is_empty() {
                        UNCERTAIN_MARKER.to_string()
                    } else {
                        format!("{cell} {UNCERTAIN_MARKER}")
                    }
                })
                .collect()
        })
        .collect()
}

fn format_row(row: &[String]) -> String {
    format!("| {} |", row.join(" | "))
}

fn heading_anchor(text: &str) -> String {
    text.to_lowercase().replace(' ', "-").replace('.', "")
}
