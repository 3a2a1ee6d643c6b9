//! Input model for the page dump produced by the external extraction tool.
//!
//! The dump carries, per page, the positioned words (with bounding boxes and
//! font sizes), the raw table grids, image bounding boxes, and the page
//! height. Missing collections deserialize as empty, matching the contract
//! that the extraction side never reports null where "nothing found" is
//! meant.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{BoundingBox, PositionedWord};

#[derive(Debug, Deserialize)]
pub struct DocumentDump {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub pages: Vec<PageDump>,
}

#[derive(Debug, Deserialize)]
pub struct PageDump {
    pub number: u32,
    pub height: f64,
    #[serde(default)]
    pub words: Vec<WordDump>,
    #[serde(default)]
    pub tables: Vec<TableDump>,
    #[serde(default)]
    pub images: Vec<ImageDump>,
}

impl PageDump {
    pub fn positioned_words(&self) -> Vec<PositionedWord> {
        self.words.iter().map(WordDump::to_positioned).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct WordDump {
    pub text: String,
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    #[serde(default)]
    pub size: Option<f64>,
}

impl WordDump {
    fn to_positioned(&self) -> PositionedWord {
        PositionedWord {
            text: self.text.clone(),
            bbox: BoundingBox {
                x0: self.x0,
                y0: self.top,
                x1: self.x1,
                y1: self.bottom,
            },
            font_size: self.size,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TableDump {
    #[serde(default)]
    pub rows: Vec<Vec<Option<String>>>,
    /// Extraction-side 0-100 reliability score for this grid, when the
    /// extraction tool computes one.
    #[serde(default)]
    pub accuracy: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct ImageDump {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl ImageDump {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox {
            x0: self.x0,
            y0: self.top,
            x1: self.x1,
            y1: self.bottom,
        }
    }
}

pub fn load_dump(path: &Path) -> Result<DocumentDump> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read page dump: {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse page dump: {}", path.display()))
}
