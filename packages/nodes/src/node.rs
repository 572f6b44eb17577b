//! Node kinds stored in the tree arena

use crate::element::{ElementBehavior, ElementNode, TextFilter};
use crate::key::NodeKey;
use crate::root::RootNode;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};

/// How a text node behaves under editing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMode {
    #[default]
    Normal,
    Token,
    Segmented,
    Inert,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextNode {
    pub text: String,
    pub mode: TextMode,
    pub directionless: bool,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mode: TextMode::Normal,
            directionless: false,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.mode == TextMode::Inert
    }

    pub fn text_content(&self, filter: TextFilter) -> &str {
        if (!filter.include_inert && self.is_inert())
            || (!filter.include_directionless && self.directionless)
        {
            return "";
        }
        &self.text
    }
}

/// Embedded unit rendered by the host (image, embed, mention card, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct DecoratorNode {
    pub name: String,
    pub payload: serde_json::Value,
}

impl DecoratorNode {
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Root(RootNode),
    Element(ElementNode),
    Text(TextNode),
    LineBreak,
    Decorator(DecoratorNode),
}

/// A node in the tree arena
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub key: NodeKey,
    pub parent: Option<NodeKey>,
    pub data: NodeData,
}

impl Node {
    pub(crate) fn new(key: NodeKey, data: NodeData) -> Self {
        Self {
            key,
            parent: None,
            data,
        }
    }

    /// Serialized type name
    pub fn type_name(&self) -> &str {
        match &self.data {
            NodeData::Root(_) => "root",
            NodeData::Element(e) => e.kind.type_name(),
            NodeData::Text(_) => "text",
            NodeData::LineBreak => "linebreak",
            NodeData::Decorator(d) => &d.name,
        }
    }

    /// Capability name used in error reports
    pub fn capability(&self) -> &'static str {
        match &self.data {
            NodeData::Root(_) => "root",
            NodeData::Element(_) => "element",
            NodeData::Text(_) => "text",
            NodeData::LineBreak => "linebreak",
            NodeData::Decorator(_) => "decorator",
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.data, NodeData::Root(_))
    }

    /// Root and plain elements both carry the element capability
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Root(_) | NodeData::Element(_))
    }

    pub fn is_decorator(&self) -> bool {
        matches!(self.data, NodeData::Decorator(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    pub fn element(&self) -> Option<&ElementBehavior> {
        match &self.data {
            NodeData::Root(r) => Some(&r.element),
            NodeData::Element(e) => Some(&e.element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self) -> Option<&mut ElementBehavior> {
        match &mut self.data {
            NodeData::Root(r) => Some(&mut r.element),
            NodeData::Element(e) => Some(&mut e.element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_root(&self) -> Option<&RootNode> {
        match &self.data {
            NodeData::Root(r) => Some(r),
            _ => None,
        }
    }

    /// Uncached text content of this node and its subtree
    pub fn text_content(&self, tree: &Tree, filter: TextFilter) -> String {
        match &self.data {
            NodeData::Root(r) => r.element.text_content(tree, filter),
            NodeData::Element(e) => e.element.text_content(tree, filter),
            NodeData::Text(t) => t.text_content(filter).to_string(),
            NodeData::LineBreak => "\n".to_string(),
            NodeData::Decorator(_) => String::new(),
        }
    }

    /// Whether the host representation must change relative to `prev`
    pub fn update_view(&self, prev: &Node) -> bool {
        match (&self.data, &prev.data) {
            (NodeData::Root(root), NodeData::Root(prev_root)) => root.update_view(prev_root),
            (NodeData::Element(e), NodeData::Element(p)) => e.update_view(p),
            (NodeData::Text(t), NodeData::Text(p)) => t != p,
            (NodeData::LineBreak, NodeData::LineBreak) => false,
            (NodeData::Decorator(d), NodeData::Decorator(p)) => d != p,
            _ => true,
        }
    }
}

/// Type check usable on optional lookups
pub fn is_root_node(node: Option<&Node>) -> bool {
    node.is_some_and(Node::is_root)
}
