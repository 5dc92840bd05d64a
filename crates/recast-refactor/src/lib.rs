//! Refactoring engine for Recast.
//!
//! A [`RefactorDriver`] locates the node under the caret and asks each registered
//! [`RefactoringRule`] whether it applies. Probing is cheap and side-effect free;
//! the edit itself is built only when a [`PendingRefactoring`] is realized, and
//! applying it yields a new [`SyntaxTree`](recast_syntax::SyntaxTree) that shares
//! every untouched subtree with the old one.
//!
//! Today this crate ships one rule, [`MethodGroupToAnonymousMethod`].

mod builder;
mod catalog;
mod context;
mod driver;
mod edit;
mod error;
mod format;
mod method_group;
mod rule;

pub use builder::build_anonymous_method;
pub use catalog::TitleCatalog;
pub use context::{RefactorContext, WorkspaceKind};
pub use driver::{commit, Committed, PendingRefactoring, RefactorDriver};
pub use edit::RefactoringEdit;
pub use error::RefactorError;
pub use format::{FormatAnnotation, Formatter, IdentityFormatter};
pub use method_group::{MethodGroupToAnonymousMethod, METHOD_GROUP_TO_ANONYMOUS_METHOD};
pub use rule::{CodeActionKind, MatchData, RefactoringRule, RuleId, RuleMatch};
