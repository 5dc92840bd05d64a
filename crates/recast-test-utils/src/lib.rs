//! Utilities shared by Recast tests.
//!
//! Fixtures are plain source snippets with inline markers: `/*caret*/` for a
//! cursor position and `/*start*/` ... `/*end*/` for a selection. The helpers
//! strip the markers and return the clean text together with the position.

mod fixtures;

pub use fixtures::*;
