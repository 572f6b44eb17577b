//! # Document Tree
//!
//! Arena of nodes keyed by [`NodeKey`] with the generic structural mutation
//! primitives.
//!
//! ## Mutation Semantics
//!
//! ### Append / Insert
//! - A node attached elsewhere is detached first (move semantics)
//! - Fails if it would create a cycle
//! - Under the root, only element or decorator nodes are accepted; the
//!   whole call is checked before anything moves
//!
//! ### Remove / Replace
//! - Detach the node; the subtree stays in the arena until garbage collection
//! - Never applicable to the root
//!
//! Every successful mutation marks the touched keys dirty.

use crate::context::{Context, DirtyState, Mode};
use crate::element::{Direction, ElementBehavior, ElementFormat, ElementKind, ElementNode, TextFilter};
use crate::error::{TreeError, TreeResult};
use crate::key::{KeyGenerator, NodeKey};
use crate::node::{DecoratorNode, Node, NodeData, TextMode, TextNode};
use crate::root::{ensure_root_child, RootNode};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Tree {
    /// Always holds `NodeData::Root`
    root: Node,
    nodes: HashMap<NodeKey, Node>,
    keys: KeyGenerator,
    dirty: DirtyState,
    dirty_keys: BTreeSet<NodeKey>,
}

impl Tree {
    /// Create a tree holding only an empty root
    pub fn new(namespace: &str) -> Self {
        Self {
            root: Node::new(NodeKey::root(), NodeData::Root(RootNode::new())),
            nodes: HashMap::new(),
            keys: KeyGenerator::new(namespace),
            dirty: DirtyState::NoDirtyNodes,
            dirty_keys: BTreeSet::new(),
        }
    }

    pub fn root(&self) -> &RootNode {
        match &self.root.data {
            NodeData::Root(root) => root,
            _ => unreachable!("tree root always holds root data"),
        }
    }

    pub(crate) fn root_mut(&mut self) -> &mut RootNode {
        match &mut self.root.data {
            NodeData::Root(root) => root,
            _ => unreachable!("tree root always holds root data"),
        }
    }

    pub fn get(&self, key: &NodeKey) -> Option<&Node> {
        if key.is_root() {
            return Some(&self.root);
        }
        self.nodes.get(key)
    }

    pub fn get_or_err(&self, key: &NodeKey) -> TreeResult<&Node> {
        self.get(key).ok_or_else(|| TreeError::NodeNotFound(key.clone()))
    }

    fn get_mut(&mut self, key: &NodeKey) -> Option<&mut Node> {
        if key.is_root() {
            return Some(&mut self.root);
        }
        self.nodes.get_mut(key)
    }

    fn get_mut_or_err(&mut self, key: &NodeKey) -> TreeResult<&mut Node> {
        self.get_mut(key).ok_or_else(|| TreeError::NodeNotFound(key.clone()))
    }

    pub fn contains(&self, key: &NodeKey) -> bool {
        key.is_root() || self.nodes.contains_key(key)
    }

    /// Number of nodes in the arena. Always counts the root, so a fresh tree
    /// reports 1.
    pub fn node_count(&self) -> usize {
        self.nodes.len() + 1
    }

    pub fn count_root_nodes(&self) -> usize {
        1 + self.nodes.values().filter(|n| n.is_root()).count()
    }

    // Creation

    pub fn create_element(&mut self, kind: ElementKind) -> NodeKey {
        self.insert_detached(NodeData::Element(ElementNode::new(kind)))
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeKey {
        self.insert_detached(NodeData::Text(TextNode::new(text)))
    }

    pub fn create_text_node(&mut self, node: TextNode) -> NodeKey {
        self.insert_detached(NodeData::Text(node))
    }

    pub fn create_decorator(&mut self, name: impl Into<String>, payload: serde_json::Value) -> NodeKey {
        self.insert_detached(NodeData::Decorator(DecoratorNode::new(name, payload)))
    }

    pub fn create_line_break(&mut self) -> NodeKey {
        self.insert_detached(NodeData::LineBreak)
    }

    pub(crate) fn insert_detached(&mut self, data: NodeData) -> NodeKey {
        let key = self.keys.next_key();
        self.nodes.insert(key.clone(), Node::new(key.clone(), data));
        self.mark_dirty(key.clone());
        key
    }

    /// Copy of a node's current state. The root copy carries no cached text.
    pub fn clone_node(&self, key: &NodeKey) -> TreeResult<Node> {
        let node = self.get_or_err(key)?;
        let copy = node.clone();
        if let NodeData::Root(root) = &copy.data {
            root.clear_cached_text();
        }
        Ok(copy)
    }

    // Navigation

    pub fn parent(&self, key: &NodeKey) -> Option<&NodeKey> {
        self.get(key).and_then(|n| n.parent.as_ref())
    }

    pub fn children(&self, key: &NodeKey) -> &[NodeKey] {
        self.get(key)
            .and_then(Node::element)
            .map(ElementBehavior::children)
            .unwrap_or(&[])
    }

    pub fn next_sibling(&self, key: &NodeKey) -> Option<&NodeKey> {
        let siblings = self.children(self.parent(key)?);
        let pos = siblings.iter().position(|k| k == key)?;
        siblings.get(pos + 1)
    }

    pub fn previous_sibling(&self, key: &NodeKey) -> Option<&NodeKey> {
        let siblings = self.children(self.parent(key)?);
        let pos = siblings.iter().position(|k| k == key)?;
        pos.checked_sub(1).and_then(|i| siblings.get(i))
    }

    /// Whether `ancestor` is `key` or lies on its parent chain
    pub fn is_self_or_ancestor(&self, ancestor: &NodeKey, key: &NodeKey) -> bool {
        let mut current = Some(key);
        while let Some(k) = current {
            if k == ancestor {
                return true;
            }
            current = self.parent(k);
        }
        false
    }

    pub fn is_attached(&self, key: &NodeKey) -> bool {
        self.contains(key) && self.is_self_or_ancestor(&NodeKey::root(), key)
    }

    /// The ancestor of `key` that is a direct child of the root
    pub fn top_level_element(&self, key: &NodeKey) -> TreeResult<NodeKey> {
        if key.is_root() {
            return Ok(self.root().top_level_element_or_err()?);
        }

        let mut current = self.get_or_err(key)?;
        loop {
            match &current.parent {
                Some(parent) if parent.is_root() => return Ok(current.key.clone()),
                Some(parent) => current = self.get_or_err(parent)?,
                None => return Err(TreeError::NotAttached(key.clone())),
            }
        }
    }

    // Mutation

    /// Append `children` to `parent` in order
    pub fn append(&mut self, parent: &NodeKey, children: &[NodeKey]) -> TreeResult<()> {
        let parent_node = self.get_or_err(parent)?;
        if !parent_node.is_element() {
            return Err(TreeError::NotAnElement(parent.clone()));
        }

        for child in children {
            self.ensure_movable(child)?;
            if self.is_self_or_ancestor(child, parent) {
                return Err(TreeError::CycleDetected);
            }
        }

        if parent.is_root() {
            self.root().ensure_can_append(self, children)?;
        }

        for child in children {
            self.detach(child)?;
            self.attach(parent, child, None)?;
        }

        Ok(())
    }

    pub fn insert_before(&mut self, target: &NodeKey, node: &NodeKey) -> TreeResult<()> {
        if target.is_root() {
            self.root().insert_before(self.get_or_err(node)?)?;
        }
        let parent = self.prepare_adjacent_insert(target, node)?;

        self.detach(node)?;
        let index = self.index_in_parent(&parent, target)?;
        self.attach(&parent, node, Some(index))
    }

    pub fn insert_after(&mut self, target: &NodeKey, node: &NodeKey) -> TreeResult<()> {
        if target.is_root() {
            self.root().insert_after(self.get_or_err(node)?)?;
        }
        let parent = self.prepare_adjacent_insert(target, node)?;

        self.detach(node)?;
        let index = self.index_in_parent(&parent, target)?;
        self.attach(&parent, node, Some(index + 1))
    }

    /// Detach a node from its parent
    pub fn remove(&mut self, key: &NodeKey) -> TreeResult<()> {
        if key.is_root() {
            self.root().remove_self()?;
        }
        self.get_or_err(key)?;
        self.detach(key)
    }

    /// Put `replacement` where `target` is and detach `target`
    pub fn replace(&mut self, target: &NodeKey, replacement: &NodeKey) -> TreeResult<()> {
        if target.is_root() {
            self.root().replace_self(self.get_or_err(replacement)?)?;
        }
        if target == replacement {
            self.get_or_err(target)?;
            return Ok(());
        }
        let parent = self.prepare_adjacent_insert(target, replacement)?;

        self.detach(replacement)?;
        let index = self.index_in_parent(&parent, target)?;
        self.detach(target)?;
        self.attach(&parent, replacement, Some(index))
    }

    pub fn set_text(&mut self, key: &NodeKey, text: impl Into<String>) -> TreeResult<()> {
        self.text_mut(key)?.text = text.into();
        self.mark_dirty(key.clone());
        Ok(())
    }

    pub fn set_text_mode(&mut self, key: &NodeKey, mode: TextMode) -> TreeResult<()> {
        self.text_mut(key)?.mode = mode;
        self.mark_dirty(key.clone());
        Ok(())
    }

    pub fn set_directionless(&mut self, key: &NodeKey, directionless: bool) -> TreeResult<()> {
        self.text_mut(key)?.directionless = directionless;
        self.mark_dirty(key.clone());
        Ok(())
    }

    pub fn set_direction(&mut self, key: &NodeKey, direction: Option<Direction>) -> TreeResult<()> {
        self.element_mut(key)?.direction = direction;
        self.mark_dirty(key.clone());
        Ok(())
    }

    pub fn set_format(&mut self, key: &NodeKey, format: ElementFormat) -> TreeResult<()> {
        self.element_mut(key)?.format = format;
        self.mark_dirty(key.clone());
        Ok(())
    }

    pub fn set_indent(&mut self, key: &NodeKey, indent: u32) -> TreeResult<()> {
        self.element_mut(key)?.indent = indent;
        self.mark_dirty(key.clone());
        Ok(())
    }

    fn text_mut(&mut self, key: &NodeKey) -> TreeResult<&mut TextNode> {
        match &mut self.get_mut_or_err(key)?.data {
            NodeData::Text(text) => Ok(text),
            _ => Err(TreeError::NotText(key.clone())),
        }
    }

    fn element_mut(&mut self, key: &NodeKey) -> TreeResult<&mut ElementBehavior> {
        self.get_mut_or_err(key)?
            .element_mut()
            .ok_or_else(|| TreeError::NotAnElement(key.clone()))
    }

    /// The root can never leave its place
    fn ensure_movable(&self, key: &NodeKey) -> TreeResult<()> {
        if key.is_root() {
            self.root().remove_self()?;
        }
        self.get_or_err(key)?;
        Ok(())
    }

    /// Shared checks for insert-before/after and replace. Returns the parent.
    fn prepare_adjacent_insert(&self, target: &NodeKey, node: &NodeKey) -> TreeResult<NodeKey> {
        let target_node = self.get_or_err(target)?;
        self.ensure_movable(node)?;

        let parent = target_node
            .parent
            .clone()
            .ok_or_else(|| TreeError::NotAttached(target.clone()))?;

        if self.is_self_or_ancestor(node, &parent) || node == target {
            return Err(TreeError::CycleDetected);
        }

        if parent.is_root() {
            ensure_root_child(self.get_or_err(node)?)?;
        }

        Ok(parent)
    }

    fn index_in_parent(&self, parent: &NodeKey, key: &NodeKey) -> TreeResult<usize> {
        self.get_or_err(parent)?
            .element()
            .and_then(|e| e.index_of(key))
            .ok_or_else(|| TreeError::NotAttached(key.clone()))
    }

    fn detach(&mut self, key: &NodeKey) -> TreeResult<()> {
        let Some(parent) = self.get_mut_or_err(key)?.parent.take() else {
            return Ok(());
        };

        if let Some(element) = self.get_mut(&parent).and_then(Node::element_mut) {
            element.remove_child(key);
        }
        self.mark_dirty(parent);
        self.mark_dirty(key.clone());
        Ok(())
    }

    /// Link a detached node under `parent`; `None` appends
    fn attach(&mut self, parent: &NodeKey, key: &NodeKey, index: Option<usize>) -> TreeResult<()> {
        let element = self
            .get_mut_or_err(parent)?
            .element_mut()
            .ok_or_else(|| TreeError::NotAnElement(parent.clone()))?;

        match index {
            Some(index) => element.insert_child(index, key.clone()),
            None => element.push_children(std::slice::from_ref(key)),
        }

        self.get_mut_or_err(key)?.parent = Some(parent.clone());
        self.mark_dirty(parent.clone());
        self.mark_dirty(key.clone());
        Ok(())
    }

    // Dirty tracking

    pub(crate) fn mark_dirty(&mut self, key: NodeKey) {
        if self.dirty == DirtyState::NoDirtyNodes {
            self.dirty = DirtyState::HasDirtyNodes;
        }
        self.dirty_keys.insert(key);
    }

    /// Force every attached node through reconciliation on the next commit
    pub fn mark_full_reconcile(&mut self) {
        self.dirty = DirtyState::FullReconcile;
    }

    pub fn dirty_state(&self) -> DirtyState {
        self.dirty
    }

    pub fn dirty_keys(&self) -> impl Iterator<Item = &NodeKey> {
        self.dirty_keys.iter()
    }

    /// Reset the dirty signal and hand back the keys touched since the last
    /// reset. A stale root projection is dropped with it.
    pub fn take_dirty(&mut self) -> (DirtyState, Vec<NodeKey>) {
        let state = std::mem::take(&mut self.dirty);
        if !state.is_clean() {
            self.root().clear_cached_text();
        }
        let keys = std::mem::take(&mut self.dirty_keys).into_iter().collect();
        (state, keys)
    }

    pub fn context(&self, mode: Mode) -> Context {
        Context::new(mode, self.dirty)
    }

    /// Flattened document text through the root cache
    pub fn text_content(&self, mode: Mode, filter: TextFilter) -> String {
        self.root().text_content(self, &self.context(mode), filter)
    }

    /// Store the current projection in the root cache
    pub fn refresh_text_cache(&self) {
        let root = self.root();
        root.clear_cached_text();
        root.text_content(self, &self.context(Mode::ReadOnly), TextFilter::default());
    }

    /// Keys of all nodes reachable from the root, root first
    pub fn attached_keys(&self) -> Vec<NodeKey> {
        let mut out = Vec::with_capacity(self.node_count());
        let mut stack = vec![NodeKey::root()];
        while let Some(key) = stack.pop() {
            stack.extend(self.children(&key).iter().rev().cloned());
            out.push(key);
        }
        out
    }

    /// Drop every node not reachable from the root
    pub fn collect_garbage(&mut self) -> Vec<NodeKey> {
        let reachable: HashSet<NodeKey> = self.attached_keys().into_iter().collect();
        let dead: Vec<NodeKey> = self
            .nodes
            .keys()
            .filter(|k| !reachable.contains(*k))
            .cloned()
            .collect();

        for key in &dead {
            self.nodes.remove(key);
            self.dirty_keys.remove(key);
        }
        if !dead.is_empty() {
            debug!(collected = dead.len(), "collected detached nodes");
        }
        dead
    }
}
