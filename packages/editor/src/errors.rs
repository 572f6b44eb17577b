//! Error types for the editor

use folio_nodes::TreeError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Editor is read-only")]
    ReadOnly,

    #[error("Invalid config: {0}")]
    Config(String),
}

impl From<folio_nodes::InvariantViolation> for EditorError {
    fn from(e: folio_nodes::InvariantViolation) -> Self {
        EditorError::Tree(TreeError::Invariant(e))
    }
}
