//! Core shared types for Recast.
//!
//! This crate is intentionally small: text positions, text edits and the
//! cooperative cancellation flag every long-running query checks.

mod cancel;
mod edit;
mod text;

pub use cancel::CancellationToken;
pub use edit::{apply_text_edits, normalize_text_edits, EditError, TextEdit};
pub use text::{TextRange, TextSize};
