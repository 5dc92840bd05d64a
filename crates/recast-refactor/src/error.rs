use recast_syntax::TreeError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefactorError {
    /// The edit's target is not part of the tree it was applied to.
    #[error("structural inconsistency: {0}")]
    StructuralInconsistency(#[from] TreeError),
    #[error("`{text}` is not valid type syntax")]
    InvalidTypeSyntax { text: String },
    #[error(transparent)]
    Edit(#[from] recast_core::EditError),
}
