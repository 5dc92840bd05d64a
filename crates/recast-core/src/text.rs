//! Text model primitives: sizes and ranges.

pub use text_size::{TextRange, TextSize};
