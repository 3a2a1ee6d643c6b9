use std::collections::BTreeMap;
use std::fs;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

use crate::classify::{
    BoilerplatePatterns, ClassifierPatterns, assemble_blocks, group_words_into_lines,
};
use crate::cli::ConvertArgs;
use crate::model::{BlockKind, ContentBlock, QualityReportManifest, TableOutcome};
use crate::page::{PageDump, load_dump};
use crate::quality::QualityLedger;
use crate::render::MarkdownBuilder;
use crate::table::{
    analyze_complexity, clean_table_grid, estimate_external_accuracy, needs_manual_check,
    score_table,
};
use crate::util::{ensure_directory, now_utc_string, sha256_file, write_json_pretty};

const REPORT_MANIFEST_VERSION: u32 = 1;

pub fn run(args: ConvertArgs) -> Result<()> {
    if !(0.0..=100.0).contains(&args.confidence_threshold) {
        bail!(
            "confidence threshold must be within 0-100, got {}",
            args.confidence_threshold
        );
    }

    let dump = load_dump(&args.input)?;
    let stem = args
        .input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "datasheet".to_string());
    let title = args
        .title
        .clone()
        .or_else(|| dump.title.clone())
        .unwrap_or_else(|| stem.clone());

    info!(
        input = %args.input.display(),
        pages = dump.pages.len(),
        threshold = args.confidence_threshold,
        "converting page dump"
    );

    let patterns = ClassifierPatterns::compile()?;
    let boilerplate = BoilerplatePatterns::compile()?;
    let mut builder = MarkdownBuilder::new(&title, args.toc)?;
    let mut ledger = QualityLedger::new();

    for page in &dump.pages {
        process_page(
            page,
            &patterns,
            &boilerplate,
            args.confidence_threshold,
            &mut builder,
            &mut ledger,
        );
    }

    ensure_directory(&args.output_dir)?;
    let output_file = args.output_dir.join(format!("{stem}.md"));
    fs::write(&output_file, builder.build())
        .with_context(|| format!("failed to write markdown: {}", output_file.display()))?;

    let report = QualityReportManifest {
        manifest_version: REPORT_MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source_path: args.input.display().to_string(),
        source_sha256: sha256_file(&args.input)?,
        confidence_threshold: args.confidence_threshold,
        page_count: dump.pages.len(),
        metrics: ledger.metrics(),
        tables: ledger.tables().to_vec(),
    };
    let report_path = args.output_dir.join("quality_report.json");
    write_json_pretty(&report_path, &report)?;

    info!(output = %output_file.display(), report = %report_path.display(), "conversion complete");
    ledger.print_summary();

    Ok(())
}

fn process_page(
    page: &PageDump,
    patterns: &ClassifierPatterns,
    boilerplate: &BoilerplatePatterns,
    threshold: f64,
    builder: &mut MarkdownBuilder,
    ledger: &mut QualityLedger,
) {
    let lines = group_words_into_lines(page.positioned_words());
    let image_blocks = image_placeholder_blocks(page);
    let blocks = assemble_blocks(
        patterns,
        boilerplate,
        page.number,
        page.height,
        lines,
        image_blocks,
    );

    render_blocks(&blocks, page.number, builder);

    for (index, raw_table) in page.tables.iter().enumerate() {
        let Some(grid) = clean_table_grid(&raw_table.rows) else {
            debug!(page = page.number, index, "raw table cleaned away to nothing");
            continue;
        };

        let accuracy = raw_table
            .accuracy
            .unwrap_or_else(|| estimate_external_accuracy(&grid));
        let score = score_table(&grid, accuracy, threshold);
        let complexity = analyze_complexity(&grid);

        let cell_count = grid.cell_count();
        let uncertain_ratio = if cell_count > 0 {
            score.uncertain_cells.len() as f64 / cell_count as f64
        } else {
            0.0
        };
        let manual_check = needs_manual_check(&complexity, accuracy, uncertain_ratio);

        let caption = format!("Table {}-{}", page.number, index);
        builder.push_table(&grid, &caption, manual_check, &score.uncertain_cells);

        debug!(
            page = page.number,
            index,
            rows = complexity.rows,
            cols = complexity.cols,
            sparse = complexity.has_empty(),
            accuracy,
            manual_check,
            "scored extracted table"
        );

        ledger.record(TableOutcome {
            page: page.number,
            caption,
            accuracy,
            overall_confidence: score.overall_confidence,
            needs_manual_check: manual_check,
            complexity,
            uncertain_cell_count: score.uncertain_cells.len(),
            cell_count,
        });
    }
}

/// Image blocks carry bounding boxes and an output path only; saving the
/// pixel data is the extraction tool's job.
fn image_placeholder_blocks(page: &PageDump) -> Vec<ContentBlock> {
    page.images
        .iter()
        .enumerate()
        .map(|(index, image)| ContentBlock {
            page: page.number,
            bbox: image.bbox(),
            metadata: BTreeMap::new(),
            kind: BlockKind::Image {
                path: format!("images/page{}_img{}.png", page.number, index),
            },
        })
        .collect()
}

/// Walk the assembled blocks in order, merging runs of adjacent list items
/// of the same kind into a single rendered list.
fn render_blocks(blocks: &[ContentBlock], page: u32, builder: &mut MarkdownBuilder) {
    let mut pending_items = Vec::<String>::new();
    let mut pending_ordered = false;

    let mut flush = |items: &mut Vec<String>, ordered: bool, builder: &mut MarkdownBuilder| {
        if !items.is_empty() {
            builder.push_list(items, ordered);
            items.clear();
        }
    };

    for block in blocks {
        match &block.kind {
            BlockKind::List { ordered, items } => {
                if !pending_items.is_empty() && pending_ordered != *ordered {
                    flush(&mut pending_items, pending_ordered, builder);
                }
                pending_ordered = *ordered;
                pending_items.extend(items.iter().cloned());
                continue;
            }
            BlockKind::Heading { level, text } => {
                flush(&mut pending_items, pending_ordered, builder);
                builder.push_heading(text, *level);
            }
            BlockKind::Paragraph { text } => {
                flush(&mut pending_items, pending_ordered, builder);
                builder.push_paragraph(text);
            }
            BlockKind::Image { path } => {
                flush(&mut pending_items, pending_ordered, builder);
                builder.push_image(path, &format!("Image on page {page}"));
            }
            BlockKind::Table { .. } | BlockKind::Footer { .. } => {
                flush(&mut pending_items, pending_ordered, builder);
            }
        }
    }

    flush(&mut pending_items, pending_ordered, builder);
}
