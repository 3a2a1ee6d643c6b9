//! Table grid post-processing and confidence scoring.

mod clean;
mod score;

#[cfg(test)]
mod tests;

pub use clean::{UNCERTAIN_MARKER, clean_table_grid};
pub use score::{
    analyze_complexity, estimate_external_accuracy, needs_manual_check, score_table,
};
