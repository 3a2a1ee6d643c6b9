use crate::model::{PositionedWord, TextLine};

/// Words whose top coordinates differ by no more than this many layout
/// units belong to the same line.
const LINE_Y_TOLERANCE: f64 = 5.0;

/// Cluster a page's words into text lines, top to bottom, each line's words
/// ordered left to right. An empty word set yields an empty result.
pub fn group_words_into_lines(mut words: Vec<PositionedWord>) -> Vec<TextLine> {
    if words.is_empty() {
        return Vec::new();
    }

    words.sort_by(|left, right| left.bbox.y0.total_cmp(&right.bbox.y0));

    let mut lines = Vec::<TextLine>::new();
    let mut current = Vec::<PositionedWord>::new();
    let mut anchor_y = 0.0_f64;

    for word in words {
        if current.is_empty() {
            anchor_y = word.bbox.y0;
            current.push(word);
            continue;
        }

        if (word.bbox.y0 - anchor_y).abs() <= LINE_Y_TOLERANCE {
            current.push(word);
            continue;
        }

        anchor_y = word.bbox.y0;
        lines.push(finish_line(std::mem::take(&mut current)));
        current.push(word);
    }

    if !current.is_empty() {
        lines.push(finish_line(current));
    }

    lines
}

fn finish_line(mut words: Vec<PositionedWord>) -> TextLine {
    words.sort_by(|left, right| left.bbox.x0.total_cmp(&right.bbox.x0));
    TextLine { words }
}
