//! # Element Behavior
//!
//! Shared capability of every node that owns children: ordered child keys,
//! block-level attributes (direction, format, indent) and the subtree text
//! flattening algorithm.
//!
//! Both [`ElementNode`] and [`crate::RootNode`] compose an
//! [`ElementBehavior`]; the root wraps it with guard functions instead of
//! overriding it.

use crate::key::NodeKey;
use crate::node::NodeData;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};

/// Separator emitted after a block element that is not the last child
pub const DOUBLE_LINE_BREAK: &str = "\n\n";

/// Text flow direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Block-level alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementFormat {
    #[default]
    #[serde(rename = "")]
    Unset,
    Left,
    Start,
    Center,
    Right,
    End,
    Justify,
}

impl ElementFormat {
    /// Numeric alignment flag used by the legacy raw snapshot
    pub fn as_flag(self) -> u8 {
        match self {
            ElementFormat::Unset => 0,
            ElementFormat::Left => 1,
            ElementFormat::Center => 2,
            ElementFormat::Right => 3,
            ElementFormat::Justify => 4,
            ElementFormat::Start => 5,
            ElementFormat::End => 6,
        }
    }
}

/// Concrete element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Paragraph,
    Heading,
    Quote,
    ListItem,
    Link,
}

impl ElementKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ElementKind::Paragraph => "paragraph",
            ElementKind::Heading => "heading",
            ElementKind::Quote => "quote",
            ElementKind::ListItem => "listitem",
            ElementKind::Link => "link",
        }
    }

    /// Inline elements flow with their siblings and get no separator
    pub fn is_inline(self) -> bool {
        matches!(self, ElementKind::Link)
    }
}

/// Filters applied while flattening text.
///
/// `include_directionless` defaults to `true`: only an explicit `false`
/// drops directionless text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFilter {
    pub include_inert: bool,
    pub include_directionless: bool,
}

impl Default for TextFilter {
    fn default() -> Self {
        Self {
            include_inert: false,
            include_directionless: true,
        }
    }
}

impl TextFilter {
    pub fn new(include_inert: bool, include_directionless: bool) -> Self {
        Self {
            include_inert,
            include_directionless,
        }
    }

    /// Inert content in, directionless content out. The root cache never
    /// answers this combination.
    pub fn bypasses_cache(&self) -> bool {
        self.include_inert && !self.include_directionless
    }
}

/// Children and block attributes shared by element-like nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementBehavior {
    pub(crate) children: Vec<NodeKey>,
    pub direction: Option<Direction>,
    pub format: ElementFormat,
    pub indent: u32,
}

impl ElementBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn size(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn first_child(&self) -> Option<&NodeKey> {
        self.children.first()
    }

    pub fn last_child(&self) -> Option<&NodeKey> {
        self.children.last()
    }

    pub fn index_of(&self, key: &NodeKey) -> Option<usize> {
        self.children.iter().position(|c| c == key)
    }

    pub(crate) fn push_children(&mut self, keys: &[NodeKey]) {
        self.children.extend_from_slice(keys);
    }

    pub(crate) fn insert_child(&mut self, index: usize, key: NodeKey) {
        let index = index.min(self.children.len());
        self.children.insert(index, key);
    }

    pub(crate) fn remove_child(&mut self, key: &NodeKey) -> Option<usize> {
        let pos = self.index_of(key)?;
        self.children.remove(pos);
        Some(pos)
    }

    /// Same block attributes, ignoring children
    pub fn same_attributes(&self, other: &ElementBehavior) -> bool {
        self.direction == other.direction && self.format == other.format && self.indent == other.indent
    }

    /// Depth-first concatenation of the children's text content
    pub fn text_content(&self, tree: &Tree, filter: TextFilter) -> String {
        let mut text = String::new();
        let len = self.children.len();

        for (i, key) in self.children.iter().enumerate() {
            let Some(child) = tree.get(key) else {
                continue;
            };

            text.push_str(&child.text_content(tree, filter));

            if let NodeData::Element(element) = &child.data {
                if i != len - 1 && !element.kind.is_inline() {
                    text.push_str(DOUBLE_LINE_BREAK);
                }
            }
        }

        text
    }
}

/// Generic element node (paragraph, heading, link, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub kind: ElementKind,
    pub element: ElementBehavior,
}

impl ElementNode {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            element: ElementBehavior::new(),
        }
    }

    pub fn paragraph() -> Self {
        Self::new(ElementKind::Paragraph)
    }

    pub fn is_inline(&self) -> bool {
        self.kind.is_inline()
    }

    /// A changed element type needs a fresh host element
    pub fn update_view(&self, prev: &ElementNode) -> bool {
        self.kind != prev.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_flags() {
        assert_eq!(ElementFormat::Unset.as_flag(), 0);
        assert_eq!(ElementFormat::Left.as_flag(), 1);
        assert_eq!(ElementFormat::Justify.as_flag(), 4);
        assert_eq!(ElementFormat::End.as_flag(), 6);
    }

    #[test]
    fn test_default_filter() {
        let filter = TextFilter::default();
        assert!(!filter.include_inert);
        assert!(filter.include_directionless);
        assert!(!filter.bypasses_cache());
    }

    #[test]
    fn test_only_one_filter_combination_bypasses_cache() {
        assert!(TextFilter::new(true, false).bypasses_cache());
        assert!(!TextFilter::new(true, true).bypasses_cache());
        assert!(!TextFilter::new(false, false).bypasses_cache());
        assert!(!TextFilter::new(false, true).bypasses_cache());
    }

    #[test]
    fn test_format_serializes_like_element_format_type() {
        assert_eq!(serde_json::to_string(&ElementFormat::Unset).unwrap(), "\"\"");
        assert_eq!(serde_json::to_string(&ElementFormat::Center).unwrap(), "\"center\"");
        let parsed: ElementFormat = serde_json::from_str("\"justify\"").unwrap();
        assert_eq!(parsed, ElementFormat::Justify);
    }

    #[test]
    fn test_child_bookkeeping() {
        let mut element = ElementBehavior::new();
        let a = NodeKey::from("a");
        let b = NodeKey::from("b");

        element.push_children(&[a.clone()]);
        element.insert_child(0, b.clone());

        assert_eq!(element.children(), &[b.clone(), a.clone()]);
        assert_eq!(element.first_child(), Some(&b));
        assert_eq!(element.last_child(), Some(&a));
        assert_eq!(element.remove_child(&b), Some(0));
        assert_eq!(element.size(), 1);
    }
}
