//! # Commit Reconciliation
//!
//! Compares the pending tree against the last committed one and reports
//! which nodes the host has to create, update or destroy.
//!
//! ## Design
//!
//! - Only dirty keys are inspected, unless the dirty signal asks for a full
//!   reconcile
//! - A node needs a host update when its `update_view` says so against the
//!   previous version; the root has no host representation and is skipped
//! - Nodes that left the attached tree are reported as destroyed
//! - The root text cache is refreshed last, so reads after a commit are
//!   served without traversal

use folio_nodes::{DirtyState, Mode, NodeKey, TextFilter, Tree};
use std::collections::HashSet;

/// Outcome of one commit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    /// Editor version after the commit
    pub version: u64,

    /// Dirty signal that triggered the commit
    pub dirty: DirtyState,

    /// Attached nodes unknown to the previous tree
    pub created: Vec<NodeKey>,

    /// Nodes whose host representation must change
    pub updated: Vec<NodeKey>,

    /// Nodes attached before and detached now
    pub destroyed: Vec<NodeKey>,

    /// Nodes dropped by garbage collection
    pub collected: usize,

    /// Whether the flattened document text changed
    pub text_changed: bool,
}

pub(crate) fn reconcile(
    prev: &Tree,
    next: &mut Tree,
    collect_garbage: bool,
    version: u64,
) -> CommitReport {
    let (dirty, dirty_keys) = next.take_dirty();

    let collected = if collect_garbage {
        next.collect_garbage().len()
    } else {
        0
    };

    let next_attached = next.attached_keys();
    let candidates: Vec<NodeKey> = match dirty {
        DirtyState::FullReconcile => next_attached.clone(),
        _ => dirty_keys.into_iter().filter(|k| next.is_attached(k)).collect(),
    };

    let mut created = Vec::new();
    let mut updated = Vec::new();
    for key in candidates {
        if key.is_root() {
            continue;
        }
        let Some(node) = next.get(&key) else {
            continue;
        };
        match prev.get(&key) {
            Some(prev_node) if prev.is_attached(&key) => {
                if dirty == DirtyState::FullReconcile || node.update_view(prev_node) {
                    updated.push(key);
                }
            }
            _ => created.push(key),
        }
    }

    let still_attached: HashSet<&NodeKey> = next_attached.iter().collect();
    let destroyed: Vec<NodeKey> = prev
        .attached_keys()
        .into_iter()
        .filter(|k| !still_attached.contains(k))
        .collect();

    let filter = TextFilter::default();
    let previous_text = prev.text_content(Mode::ReadOnly, filter);
    next.refresh_text_cache();
    let text_changed = next.text_content(Mode::ReadOnly, filter) != previous_text;

    CommitReport {
        version,
        dirty,
        created,
        updated,
        destroyed,
        collected,
        text_changed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_nodes::ElementKind;

    fn committed_paragraph(text: &str) -> (Tree, NodeKey, NodeKey) {
        let mut tree = Tree::new("reconcile");
        let p = tree.create_element(ElementKind::Paragraph);
        let t = tree.create_text(text);
        tree.append(&p, &[t.clone()]).unwrap();
        tree.append(&NodeKey::root(), &[p.clone()]).unwrap();
        let base = Tree::new("reconcile");
        reconcile(&base, &mut tree, true, 1);
        (tree, p, t)
    }

    #[test]
    fn test_text_edit_reports_update() {
        let (prev, p, t) = committed_paragraph("hello");
        let mut next = prev.clone();
        next.set_text(&t, "goodbye").unwrap();

        let report = reconcile(&prev, &mut next, true, 2);

        assert_eq!(report.updated, vec![t]);
        assert!(report.created.is_empty());
        assert!(report.text_changed);
        assert!(!report.updated.contains(&p));
        assert!(!report.updated.contains(&NodeKey::root()));
    }

    #[test]
    fn test_removed_subtree_is_destroyed_and_collected() {
        let (prev, p, t) = committed_paragraph("hello");
        let mut next = prev.clone();
        next.remove(&p).unwrap();

        let report = reconcile(&prev, &mut next, true, 2);

        let mut destroyed = report.destroyed.clone();
        destroyed.sort();
        let mut expected = vec![p.clone(), t];
        expected.sort();
        assert_eq!(destroyed, expected);
        assert_eq!(report.collected, 2);
        assert!(!next.contains(&p));
        assert_eq!(next.root().cached_text().as_deref(), Some(""));
    }

    #[test]
    fn test_full_reconcile_visits_every_attached_node() {
        let (prev, _, _) = committed_paragraph("hello");
        let mut next = prev.clone();
        next.mark_full_reconcile();

        let report = reconcile(&prev, &mut next, true, 2);

        assert_eq!(report.dirty, DirtyState::FullReconcile);
        assert_eq!(report.updated.len(), 2);
        assert!(!report.updated.contains(&NodeKey::root()));
        assert!(!report.text_changed);
    }

    #[test]
    fn test_new_nodes_are_created() {
        let (prev, _, _) = committed_paragraph("hello");
        let mut next = prev.clone();
        let quote = next.create_element(ElementKind::Quote);
        next.append(&NodeKey::root(), &[quote.clone()]).unwrap();

        let report = reconcile(&prev, &mut next, false, 2);

        assert_eq!(report.created, vec![quote]);
        assert_eq!(report.collected, 0);
    }
}
