use std::collections::BTreeMap;

use serde::Serialize;

/// Rectangle in page coordinate space. The y axis grows downward from the
/// top of the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl BoundingBox {
    pub fn union(self, other: BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }
}

/// A single word as reported by the external extraction tool.
#[derive(Debug, Clone)]
pub struct PositionedWord {
    pub text: String,
    pub bbox: BoundingBox,
    pub font_size: Option<f64>,
}

/// Words sharing an approximate vertical coordinate, ordered left to right.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub words: Vec<PositionedWord>,
}

impl TextLine {
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|word| word.text.as_str())
            .collect::<Vec<&str>>()
            .join(" ")
            .trim()
            .to_string()
    }

    pub fn bbox(&self) -> Option<BoundingBox> {
        let mut boxes = self.words.iter().map(|word| word.bbox);
        let first = boxes.next()?;
        Some(boxes.fold(first, BoundingBox::union))
    }

    /// Mean font size over the words that carry one. None when the
    /// extraction tool reported no sizes for this line.
    pub fn mean_font_size(&self) -> Option<f64> {
        let sizes = self
            .words
            .iter()
            .filter_map(|word| word.font_size)
            .collect::<Vec<f64>>();
        if sizes.is_empty() {
            return None;
        }
        Some(sizes.iter().sum::<f64>() / sizes.len() as f64)
    }
}

/// One classified unit of page content.
#[derive(Debug, Clone)]
pub struct ContentBlock {
    pub page: u32,
    pub bbox: BoundingBox,
    pub metadata: BTreeMap<String, String>,
    pub kind: BlockKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockKind {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    List {
        ordered: bool,
        items: Vec<String>,
    },
    Table {
        rows: usize,
        cols: usize,
        accuracy: f64,
        needs_manual_check: bool,
        uncertain_cells: Vec<(usize, usize)>,
    },
    Image {
        path: String,
    },
    Footer {
        text: String,
    },
}

impl BlockKind {
    /// Text content for variants that carry any. The boilerplate filter
    /// only ever discards textual blocks.
    pub fn text(&self) -> Option<&str> {
        match self {
            BlockKind::Heading { text, .. }
            | BlockKind::Paragraph { text }
            | BlockKind::Footer { text } => Some(text),
            BlockKind::List { items, .. } => items.first().map(String::as_str),
            BlockKind::Table { .. } | BlockKind::Image { .. } => None,
        }
    }
}

/// Rectangular grid of cell strings. Constructed by the table
/// post-processor, which guarantees every row has the same column count.
#[derive(Debug, Clone, PartialEq)]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn new(rows: Vec<Vec<String>>) -> TableGrid {
        TableGrid { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }
}

/// Outcome of scoring one table.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub overall_confidence: f64,
    pub cell_confidence: Vec<Vec<f64>>,
    pub uncertain_cells: Vec<(usize, usize)>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct TableComplexity {
    pub rows: usize,
    pub cols: usize,
    pub empty_cells: usize,
    pub complexity_score: f64,
}

impl TableComplexity {
    pub fn has_empty(&self) -> bool {
        self.empty_cells > 0
    }
}

/// Per-table record accumulated by the quality ledger.
#[derive(Debug, Clone, Serialize)]
pub struct TableOutcome {
    pub page: u32,
    pub caption: String,
    pub accuracy: f64,
    pub overall_confidence: f64,
    pub needs_manual_check: bool,
    pub complexity: TableComplexity,
    pub uncertain_cell_count: usize,
    pub cell_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct QualityMetrics {
    pub total_tables: usize,
    pub manual_check_tables: usize,
    pub manual_check_ratio: f64,
    pub avg_accuracy: f64,
    pub coverage: f64,
}

#[derive(Debug, Serialize)]
pub struct QualityReportManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub confidence_threshold: f64,
    pub page_count: usize,
    pub metrics: QualityMetrics,
    pub tables: Vec<TableOutcome>,
}
