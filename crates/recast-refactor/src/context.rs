use std::fmt;

use recast_core::CancellationToken;
use recast_types::TypeResolver;
use serde::{Deserialize, Serialize};

/// What kind of workspace the document belongs to.
///
/// Documents outside any project ("miscellaneous files") have no reliable
/// semantic model, so refactorings are not offered there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceKind {
    #[default]
    Project,
    Miscellaneous,
}

/// Everything a rule may consult besides the tree itself.
#[derive(Clone, Copy)]
pub struct RefactorContext<'a> {
    pub resolver: &'a dyn TypeResolver,
    pub cancel: &'a CancellationToken,
    pub workspace_kind: WorkspaceKind,
    /// Set by the host for designer or tool generated documents.
    pub is_generated_code: bool,
}

impl<'a> RefactorContext<'a> {
    pub fn new(resolver: &'a dyn TypeResolver, cancel: &'a CancellationToken) -> Self {
        Self {
            resolver,
            cancel,
            workspace_kind: WorkspaceKind::Project,
            is_generated_code: false,
        }
    }

    pub fn with_workspace_kind(mut self, workspace_kind: WorkspaceKind) -> Self {
        self.workspace_kind = workspace_kind;
        self
    }

    pub fn with_generated_code(mut self, is_generated_code: bool) -> Self {
        self.is_generated_code = is_generated_code;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl fmt::Debug for RefactorContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefactorContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .field("workspace_kind", &self.workspace_kind)
            .field("is_generated_code", &self.is_generated_code)
            .finish_non_exhaustive()
    }
}
