pub mod convert;
pub mod score;
