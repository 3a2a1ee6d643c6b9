use std::collections::BTreeMap;

use tracing::debug;

use crate::classify::boilerplate::{BoilerplatePatterns, is_boilerplate};
use crate::classify::text_type::{ClassifierPatterns, TextClass, classify_line};
use crate::model::{BlockKind, ContentBlock, TextLine};

/// Merge a page's classified text lines and image placeholders into one
/// ordered block sequence: stable sort top-of-page first, then drop
/// boilerplate. Filtering is the last step and never changes the order of
/// the survivors, so no re-sort happens afterwards.
pub fn assemble_blocks(
    patterns: &ClassifierPatterns,
    boilerplate: &BoilerplatePatterns,
    page: u32,
    page_height: f64,
    lines: Vec<TextLine>,
    image_blocks: Vec<ContentBlock>,
) -> Vec<ContentBlock> {
    let mut blocks = Vec::<ContentBlock>::new();

    for line in lines {
        let text = line.text();
        if text.is_empty() {
            continue;
        }
        let Some(bbox) = line.bbox() else {
            continue;
        };

        let mut metadata = BTreeMap::new();
        let kind = match classify_line(patterns, &line) {
            TextClass::Heading { level, confidence } => {
                metadata.insert("confidence".to_string(), format!("{confidence}"));
                BlockKind::Heading { level, text }
            }
            TextClass::List { ordered } => BlockKind::List {
                ordered,
                items: vec![text],
            },
            TextClass::Paragraph => BlockKind::Paragraph { text },
        };

        blocks.push(ContentBlock {
            page,
            bbox,
            metadata,
            kind,
        });
    }

    blocks.extend(image_blocks);

    // Stable sort: y ties keep the order the grouping step produced.
    blocks.sort_by(|left, right| left.bbox.y0.total_cmp(&right.bbox.y0));

    // Re-tag boilerplate as Footer, then drop it from the sequence. The
    // survivors keep their order, so no re-sort is needed.
    for block in &mut blocks {
        if is_boilerplate(boilerplate, block, page_height) {
            if let Some(text) = block.kind.text() {
                block.kind = BlockKind::Footer {
                    text: text.to_string(),
                };
            }
        }
    }
    let before = blocks.len();
    blocks.retain(|block| !matches!(block.kind, BlockKind::Footer { .. }));
    debug!(
        page,
        blocks = blocks.len(),
        filtered = before - blocks.len(),
        "assembled content blocks"
    );

    blocks
}
