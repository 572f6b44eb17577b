//! # Root Node
//!
//! The single anchor of every document tree.
//!
//! - Structural guards: the root can never be removed, replaced, moved or
//!   used as an insertion anchor, and only element or decorator nodes may
//!   sit directly under it.
//! - Cached text projection: the flattened text of the whole document is
//!   kept between edits and served without traversal while the tree is
//!   clean or the caller is read-only.
//! - Serialization: export produces an attribute-only record; import
//!   rehydrates an existing root instead of constructing a second one.

use crate::context::Context;
use crate::element::{ElementBehavior, TextFilter};
use crate::error::InvariantViolation;
use crate::key::NodeKey;
use crate::node::Node;
use crate::serialization::{RawNodeSnapshot, SerializedElementNode, SerializedNode};
use crate::tree::Tree;
use std::cell::{Cell, RefCell};
use tracing::{debug, trace};

pub const ROOT_TYPE: &str = "root";
pub const ROOT_VERSION: u32 = 1;

#[derive(Debug, Default)]
pub struct RootNode {
    pub element: ElementBehavior,
    cached_text: RefCell<Option<String>>,
    recomputations: Cell<u64>,
}

impl RootNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::root()
    }

    pub fn children(&self) -> &[NodeKey] {
        self.element.children()
    }

    // Guards

    pub fn remove_self(&self) -> Result<(), InvariantViolation> {
        debug!("rejected remove on root");
        Err(InvariantViolation::RemoveRoot)
    }

    pub fn replace_self(&self, _replacement: &Node) -> Result<(), InvariantViolation> {
        debug!("rejected replace on root");
        Err(InvariantViolation::ReplaceRoot)
    }

    pub fn insert_before(&self, _node: &Node) -> Result<(), InvariantViolation> {
        debug!("rejected insert before root");
        Err(InvariantViolation::InsertBeforeRoot)
    }

    pub fn insert_after(&self, _node: &Node) -> Result<(), InvariantViolation> {
        debug!("rejected insert after root");
        Err(InvariantViolation::InsertAfterRoot)
    }

    /// Top-level elements are the root's children, never the root itself
    pub fn top_level_element_or_err(&self) -> Result<NodeKey, InvariantViolation> {
        Err(InvariantViolation::RootNotTopLevel)
    }

    /// Check every candidate before anything is appended.
    ///
    /// Keys missing from the tree are left for the generic append to report.
    pub fn ensure_can_append(&self, tree: &Tree, keys: &[NodeKey]) -> Result<(), InvariantViolation> {
        keys.iter()
            .filter_map(|key| tree.get(key))
            .try_for_each(ensure_root_child)
    }

    /// The root has no host representation of its own
    pub fn update_view(&self, _prev: &RootNode) -> bool {
        false
    }

    // Text projection

    /// Flattened text of the whole document.
    ///
    /// Served from the cache when the context is read-only or clean and the
    /// filter is not the inert-without-directionless combination. Otherwise
    /// the subtree is flattened and the result cached.
    pub fn text_content(&self, tree: &Tree, ctx: &Context, filter: TextFilter) -> String {
        if ctx.allows_cached_reads() && !filter.bypasses_cache() {
            if let Some(cached) = self.cached_text() {
                trace!(len = cached.len(), "root text cache hit");
                return cached;
            }
        }

        let text = self.element.text_content(tree, filter);
        self.recomputations.set(self.recomputations.get() + 1);
        trace!(
            mode = ?ctx.mode,
            dirty = ?ctx.dirty,
            len = text.len(),
            "root text recomputed"
        );

        // Only the default projection is cached
        if filter == TextFilter::default() {
            self.store_cached_text(text.clone());
        }
        text
    }

    pub fn cached_text(&self) -> Option<String> {
        self.cached_text.try_borrow().ok().and_then(|c| c.clone())
    }

    /// Number of full flattening passes performed by this root
    pub fn text_recomputations(&self) -> u64 {
        self.recomputations.get()
    }

    pub(crate) fn store_cached_text(&self, text: String) {
        if let Ok(mut slot) = self.cached_text.try_borrow_mut() {
            *slot = Some(text);
        }
    }

    pub(crate) fn clear_cached_text(&self) {
        if let Ok(mut slot) = self.cached_text.try_borrow_mut() {
            *slot = None;
        }
    }

    // Serialization

    /// Attribute-only record; descendants are written by the tree walker
    pub fn export_json(&self) -> SerializedNode {
        SerializedNode::Root(self.export_element())
    }

    pub(crate) fn export_element(&self) -> SerializedElementNode {
        SerializedElementNode {
            children: Vec::new(),
            direction: self.element.direction,
            format: self.element.format,
            indent: self.element.indent,
            version: ROOT_VERSION,
        }
    }

    /// Apply a serialized root onto an existing root and hand it back
    pub fn import_json<'a>(root: &'a mut RootNode, serialized: &SerializedElementNode) -> &'a mut RootNode {
        root.element.format = serialized.format;
        root.element.indent = serialized.indent;
        root.element.direction = serialized.direction;
        root
    }

    #[deprecated(note = "use export_json")]
    pub fn to_raw_snapshot(&self) -> RawNodeSnapshot {
        RawNodeSnapshot {
            dir: self.element.direction,
            first: self.element.first_child().cloned(),
            format: self.element.format.as_flag(),
            indent: self.element.indent,
            key: NodeKey::root(),
            last: self.element.last_child().cloned(),
            next: None,
            parent: None,
            prev: None,
            size: self.element.size(),
            node_type: ROOT_TYPE.to_string(),
        }
    }
}

impl Clone for RootNode {
    fn clone(&self) -> Self {
        Self {
            element: self.element.clone(),
            cached_text: RefCell::new(self.cached_text()),
            recomputations: Cell::new(self.recomputations.get()),
        }
    }
}

impl PartialEq for RootNode {
    fn eq(&self, other: &Self) -> bool {
        self.element == other.element
    }
}

/// Only element and decorator nodes may be direct children of the root
pub fn ensure_root_child(node: &Node) -> Result<(), InvariantViolation> {
    if node.is_decorator() || (node.is_element() && !node.is_root()) {
        return Ok(());
    }
    debug!(key = %node.key, kind = node.capability(), "rejected root child");
    Err(InvariantViolation::IllegalRootChild {
        key: node.key.clone(),
        kind: node.capability(),
    })
}
