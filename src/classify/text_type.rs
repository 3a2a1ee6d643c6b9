use anyhow::{Context, Result};
use regex::Regex;

use crate::model::TextLine;

/// Body text is assumed to sit at this size or below; anything larger is
/// treated as a heading when no section pattern matches.
const HEADING_FONT_SIZE_FLOOR: f64 = 14.0;

const PATTERN_CONFIDENCE: f64 = 0.95;
const FONT_CONFIDENCE: f64 = 0.7;

const UNORDERED_MARKERS: [char; 4] = ['•', '-', '*', '·'];

/// One entry of the section-numbering rule table. Rules are evaluated in
/// order, first match wins, so the three-part form must come before the
/// two-part and one-part forms.
struct SectionPattern {
    regex: Regex,
    level: u8,
}

pub struct ClassifierPatterns {
    section: Vec<SectionPattern>,
    ordered_item: Regex,
}

impl ClassifierPatterns {
    pub fn compile() -> Result<ClassifierPatterns> {
        let rule_table: [(&str, u8); 4] = [
            (r"^(\d+)\.(\d+)\.(\d+)\s+(.+)$", 3), // "3.1.2 Pin Functions"
            (r"^(\d+)\.(\d+)\.\s+(.+)$", 2),      // "2.1. Description"
            (r"^(\d+)\.\s+(.+)$", 1),             // "1. Features"
            (r"^([A-Z][A-Z\s\d]+)$", 2),          // "PIN CONFIGURATION"
        ];

        let mut section = Vec::with_capacity(rule_table.len());
        for (pattern, level) in rule_table {
            let regex = Regex::new(pattern)
                .with_context(|| format!("failed to compile section pattern: {pattern}"))?;
            section.push(SectionPattern { regex, level });
        }

        let ordered_item =
            Regex::new(r"^\d+[.)]\s+").context("failed to compile ordered list item regex")?;

        Ok(ClassifierPatterns {
            section,
            ordered_item,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextClass {
    Heading { level: u8, confidence: f64 },
    List { ordered: bool },
    Paragraph,
}

/// Assign a text line to heading, list item, or paragraph.
///
/// Section-number patterns take priority over font size: datasheet
/// numbering is a stronger signal than font metrics, which vary across
/// producers. Heading checks run before list detection, so "1. Features"
/// is a level-1 heading, not an ordered list item.
pub fn classify_line(patterns: &ClassifierPatterns, line: &TextLine) -> TextClass {
    let text = line.text();
    let trimmed = text.trim();

    for rule in &patterns.section {
        if rule.regex.is_match(trimmed) {
            return TextClass::Heading {
                level: rule.level,
                confidence: PATTERN_CONFIDENCE,
            };
        }
    }

    if let Some(size) = line.mean_font_size() {
        if size > HEADING_FONT_SIZE_FLOOR {
            return TextClass::Heading {
                level: level_from_font_size(size),
                confidence: FONT_CONFIDENCE,
            };
        }
    }

    if is_list_item(patterns, trimmed) {
        let ordered = trimmed
            .chars()
            .next()
            .map(|ch| ch.is_ascii_digit())
            .unwrap_or(false);
        return TextClass::List { ordered };
    }

    TextClass::Paragraph
}

fn level_from_font_size(size: f64) -> u8 {
    if size >= 20.0 {
        1
    } else if size >= 16.0 {
        2
    } else if size >= 14.0 {
        3
    } else {
        4
    }
}

fn is_list_item(patterns: &ClassifierPatterns, trimmed: &str) -> bool {
    if let Some(first) = trimmed.chars().next() {
        if UNORDERED_MARKERS.contains(&first) {
            return true;
        }
    }

    patterns.ordered_item.is_match(trimmed)
}
