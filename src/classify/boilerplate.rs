use anyhow::{Context, Result};
use regex::Regex;

use crate::model::{BlockKind, ContentBlock};

/// Fraction of the page height at each edge where boilerplate may live.
const MARGIN_RATIO: f64 = 0.1;

/// All-caps text shorter than this inside a margin is assumed to be a
/// repeated running title rather than content.
const SHORT_CAPS_LIMIT: usize = 50;

pub struct BoilerplatePatterns {
    page_number: Regex,
    page_label: Regex,
    dashed_page_number: Regex,
}

impl BoilerplatePatterns {
    pub fn compile() -> Result<BoilerplatePatterns> {
        Ok(BoilerplatePatterns {
            page_number: Regex::new(r"^\s*\d+\s*$")
                .context("failed to compile page number regex")?,
            page_label: Regex::new(r"(?i)page\s*\d+")
                .context("failed to compile page label regex")?,
            dashed_page_number: Regex::new(r"^\s*-\s*\d+\s*-\s*$")
                .context("failed to compile dashed page number regex")?,
        })
    }
}

/// Decide whether a classified block is running header/footer noise.
///
/// The position gate runs first: only blocks whose top edge falls in the
/// top or bottom 10% of the page are candidates. This keeps genuine
/// all-caps headings that sit mid-page from being suppressed.
pub fn is_boilerplate(
    patterns: &BoilerplatePatterns,
    block: &ContentBlock,
    page_height: f64,
) -> bool {
    let y0 = block.bbox.y0;
    let in_margin = y0 < page_height * MARGIN_RATIO || y0 > page_height * (1.0 - MARGIN_RATIO);
    if !in_margin {
        return false;
    }

    let Some(text) = block.kind.text() else {
        return false;
    };
    let trimmed = text.trim();

    if patterns.page_number.is_match(trimmed) {
        return true;
    }

    if patterns.page_label.is_match(trimmed) {
        return true;
    }

    if patterns.dashed_page_number.is_match(trimmed) {
        return true;
    }

    let is_heading = matches!(block.kind, BlockKind::Heading { .. });
    if !is_heading && trimmed.chars().count() < SHORT_CAPS_LIMIT && is_all_uppercase(trimmed) {
        return true;
    }

    false
}

fn is_all_uppercase(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase)
}
