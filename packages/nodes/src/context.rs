//! Execution context handed to every read and mutation.
//!
//! The read-only flag and the dirty-tracking signal are owned by the editor
//! lifecycle. Nodes only read them, so they travel as a plain value instead
//! of living in process-wide state.

use serde::{Deserialize, Serialize};

/// Whether the current scope may mutate the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    ReadOnly,
    #[default]
    Mutating,
}

/// Pending changes since the last commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyState {
    #[default]
    NoDirtyNodes,
    HasDirtyNodes,
    FullReconcile,
}

impl DirtyState {
    pub fn is_clean(self) -> bool {
        self == DirtyState::NoDirtyNodes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Context {
    pub mode: Mode,
    pub dirty: DirtyState,
}

impl Context {
    pub fn new(mode: Mode, dirty: DirtyState) -> Self {
        Self { mode, dirty }
    }

    pub fn read_only(dirty: DirtyState) -> Self {
        Self::new(Mode::ReadOnly, dirty)
    }

    pub fn mutating(dirty: DirtyState) -> Self {
        Self::new(Mode::Mutating, dirty)
    }

    pub fn is_read_only(&self) -> bool {
        self.mode == Mode::ReadOnly
    }

    /// Cached projections may be served in this context
    pub fn allows_cached_reads(&self) -> bool {
        self.is_read_only() || self.dirty.is_clean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_reads_allowed() {
        assert!(Context::read_only(DirtyState::HasDirtyNodes).allows_cached_reads());
        assert!(Context::mutating(DirtyState::NoDirtyNodes).allows_cached_reads());
        assert!(!Context::mutating(DirtyState::HasDirtyNodes).allows_cached_reads());
        assert!(!Context::mutating(DirtyState::FullReconcile).allows_cached_reads());
    }
}
