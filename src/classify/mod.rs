//! Per-page content classification: word grouping, text type decisions,
//! boilerplate filtering, and block assembly.

mod assemble;
mod boilerplate;
mod lines;
mod text_type;


pub use assemble::assemble_blocks;
pub use boilerplate::{BoilerplatePatterns, is_boilerplate};
pub use lines::group_words_into_lines;
pub use text_type::{ClassifierPatterns, TextClass, classify_line};
