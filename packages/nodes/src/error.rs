use crate::key::NodeKey;
use thiserror::Error;

pub type TreeResult<T> = Result<T, TreeError>;

/// Attempt to break a structural invariant of the root node.
///
/// These are caller bugs against a checkable precondition, never transient
/// failures, so there is nothing to retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("remove: root nodes cannot be removed")]
    RemoveRoot,

    #[error("replace: root nodes cannot be replaced")]
    ReplaceRoot,

    #[error("insertBefore: cannot insert before root")]
    InsertBeforeRoot,

    #[error("insertAfter: cannot insert after root")]
    InsertAfterRoot,

    #[error("getTopLevelElementOrThrow: root nodes are not top level elements")]
    RootNotTopLevel,

    #[error("rootNode.append: only element or decorator nodes can be appended to root (got {kind} node {key})")]
    IllegalRootChild { key: NodeKey, kind: &'static str },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error("Node not found: {0}")]
    NodeNotFound(NodeKey),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeKey),

    #[error("Node is not text: {0}")]
    NotText(NodeKey),

    #[error("Would create cycle")]
    CycleDetected,

    #[error("Node is not attached to the root: {0}")]
    NotAttached(NodeKey),

    #[error("Unexpected node type: expected {expected}, found {found}")]
    UnexpectedNodeType {
        expected: &'static str,
        found: String,
    },
}

impl TreeError {
    pub fn unexpected_type(expected: &'static str, found: impl Into<String>) -> Self {
        Self::UnexpectedNodeType {
            expected,
            found: found.into(),
        }
    }

    /// The violation carried by this error, if any
    pub fn as_invariant(&self) -> Option<&InvariantViolation> {
        match self {
            TreeError::Invariant(v) => Some(v),
            _ => None,
        }
    }
}
