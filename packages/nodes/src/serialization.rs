//! # Serialized Node Records
//!
//! Typed interchange form of the tree, tagged by `type` the same way the
//! persisted documents are:
//!
//! ```text
//! {"type":"root","version":1,"children":[...],"direction":null,"format":"","indent":0}
//! ```
//!
//! The root's own record never embeds descendants. [`Tree::export_node`]
//! walks the tree and fills `children`; [`Tree::import_children`] rebuilds
//! descendants through the guarded mutation primitives.

use crate::element::{Direction, ElementFormat, ElementKind, ElementNode};
use crate::error::{TreeError, TreeResult};
use crate::key::NodeKey;
use crate::node::{DecoratorNode, NodeData, TextMode, TextNode};
use crate::root::RootNode;
use crate::tree::Tree;
use serde::{Deserialize, Serialize};

pub type SerializedRootNode = SerializedElementNode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SerializedNode {
    Root(SerializedElementNode),
    Paragraph(SerializedElementNode),
    Heading(SerializedElementNode),
    Quote(SerializedElementNode),
    ListItem(SerializedElementNode),
    Link(SerializedElementNode),
    Text(SerializedTextNode),
    LineBreak(SerializedLeafNode),
    Decorator(SerializedDecoratorNode),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedElementNode {
    pub children: Vec<SerializedNode>,
    pub direction: Option<Direction>,
    pub format: ElementFormat,
    pub indent: u32,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedTextNode {
    pub text: String,
    #[serde(default)]
    pub mode: TextMode,
    #[serde(default)]
    pub directionless: bool,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedLeafNode {
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedDecoratorNode {
    pub name: String,
    #[serde(default)]
    pub payload: serde_json::Value,
    pub version: u32,
}

/// Legacy full-field dump of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawNodeSnapshot {
    #[serde(rename = "__dir")]
    pub dir: Option<Direction>,
    #[serde(rename = "__first")]
    pub first: Option<NodeKey>,
    /// Alignment as its numeric flag, see [`ElementFormat::as_flag`]
    #[serde(rename = "__format")]
    pub format: u8,
    #[serde(rename = "__indent")]
    pub indent: u32,
    #[serde(rename = "__key")]
    pub key: NodeKey,
    #[serde(rename = "__last")]
    pub last: Option<NodeKey>,
    #[serde(rename = "__next")]
    pub next: Option<NodeKey>,
    #[serde(rename = "__parent")]
    pub parent: Option<NodeKey>,
    #[serde(rename = "__prev")]
    pub prev: Option<NodeKey>,
    #[serde(rename = "__size")]
    pub size: usize,
    #[serde(rename = "__type")]
    pub node_type: String,
}

const NODE_VERSION: u32 = 1;

impl SerializedNode {
    pub fn element(kind: ElementKind, element: SerializedElementNode) -> Self {
        match kind {
            ElementKind::Paragraph => SerializedNode::Paragraph(element),
            ElementKind::Heading => SerializedNode::Heading(element),
            ElementKind::Quote => SerializedNode::Quote(element),
            ElementKind::ListItem => SerializedNode::ListItem(element),
            ElementKind::Link => SerializedNode::Link(element),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            SerializedNode::Root(_) => "root",
            SerializedNode::Paragraph(_) => "paragraph",
            SerializedNode::Heading(_) => "heading",
            SerializedNode::Quote(_) => "quote",
            SerializedNode::ListItem(_) => "listitem",
            SerializedNode::Link(_) => "link",
            SerializedNode::Text(_) => "text",
            SerializedNode::LineBreak(_) => "linebreak",
            SerializedNode::Decorator(_) => "decorator",
        }
    }

    /// Element kind and record for element variants other than root
    pub fn as_element(&self) -> Option<(ElementKind, &SerializedElementNode)> {
        match self {
            SerializedNode::Paragraph(e) => Some((ElementKind::Paragraph, e)),
            SerializedNode::Heading(e) => Some((ElementKind::Heading, e)),
            SerializedNode::Quote(e) => Some((ElementKind::Quote, e)),
            SerializedNode::ListItem(e) => Some((ElementKind::ListItem, e)),
            SerializedNode::Link(e) => Some((ElementKind::Link, e)),
            _ => None,
        }
    }

    pub fn as_root(&self) -> Option<&SerializedRootNode> {
        match self {
            SerializedNode::Root(e) => Some(e),
            _ => None,
        }
    }

    pub fn children(&self) -> &[SerializedNode] {
        match self {
            SerializedNode::Root(e)
            | SerializedNode::Paragraph(e)
            | SerializedNode::Heading(e)
            | SerializedNode::Quote(e)
            | SerializedNode::ListItem(e)
            | SerializedNode::Link(e) => &e.children,
            _ => &[],
        }
    }
}

impl Tree {
    /// Serialize a node together with its whole subtree
    pub fn export_node(&self, key: &NodeKey) -> TreeResult<SerializedNode> {
        let node = self.get_or_err(key)?;

        let serialized = match &node.data {
            NodeData::Root(root) => {
                let mut record = root.export_element();
                record.children = self.export_children(root.children())?;
                SerializedNode::Root(record)
            }
            NodeData::Element(element) => {
                let behavior = &element.element;
                SerializedNode::element(
                    element.kind,
                    SerializedElementNode {
                        children: self.export_children(behavior.children())?,
                        direction: behavior.direction,
                        format: behavior.format,
                        indent: behavior.indent,
                        version: NODE_VERSION,
                    },
                )
            }
            NodeData::Text(text) => SerializedNode::Text(SerializedTextNode {
                text: text.text.clone(),
                mode: text.mode,
                directionless: text.directionless,
                version: NODE_VERSION,
            }),
            NodeData::LineBreak => SerializedNode::LineBreak(SerializedLeafNode { version: NODE_VERSION }),
            NodeData::Decorator(decorator) => SerializedNode::Decorator(SerializedDecoratorNode {
                name: decorator.name.clone(),
                payload: decorator.payload.clone(),
                version: NODE_VERSION,
            }),
        };

        Ok(serialized)
    }

    fn export_children(&self, keys: &[NodeKey]) -> TreeResult<Vec<SerializedNode>> {
        keys.iter().map(|key| self.export_node(key)).collect()
    }

    /// Rehydrate the tree's own root from a serialized root record
    pub fn import_root(&mut self, serialized: &SerializedNode) -> TreeResult<&mut RootNode> {
        let record = serialized
            .as_root()
            .ok_or_else(|| TreeError::unexpected_type("root", serialized.type_name()))?;
        self.mark_dirty(NodeKey::root());
        Ok(RootNode::import_json(self.root_mut(), record))
    }

    /// Recreate serialized descendants under `parent` with fresh keys
    pub fn import_children(&mut self, parent: &NodeKey, children: &[SerializedNode]) -> TreeResult<Vec<NodeKey>> {
        let mut keys = Vec::with_capacity(children.len());
        for child in children {
            keys.push(self.import_detached(child)?);
        }
        self.append(parent, &keys)?;
        Ok(keys)
    }

    fn import_detached(&mut self, serialized: &SerializedNode) -> TreeResult<NodeKey> {
        if let Some((kind, record)) = serialized.as_element() {
            let mut element = ElementNode::new(kind);
            element.element.direction = record.direction;
            element.element.format = record.format;
            element.element.indent = record.indent;
            let key = self.insert_detached(NodeData::Element(element));
            self.import_children(&key, &record.children)?;
            return Ok(key);
        }

        let data = match serialized {
            SerializedNode::Text(text) => NodeData::Text(TextNode {
                text: text.text.clone(),
                mode: text.mode,
                directionless: text.directionless,
            }),
            SerializedNode::LineBreak(_) => NodeData::LineBreak,
            SerializedNode::Decorator(decorator) => {
                NodeData::Decorator(DecoratorNode::new(decorator.name.clone(), decorator.payload.clone()))
            }
            other => return Err(TreeError::unexpected_type("non-root node", other.type_name())),
        };

        Ok(self.insert_detached(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvariantViolation;

    #[test]
    fn test_tagged_text_record() {
        let json = r#"{"type":"text","text":"hi","version":1}"#;
        let node: SerializedNode = serde_json::from_str(json).unwrap();

        match node {
            SerializedNode::Text(text) => {
                assert_eq!(text.text, "hi");
                assert_eq!(text.mode, TextMode::Normal);
                assert!(!text.directionless);
            }
            other => panic!("expected text, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_export_walks_subtree() {
        let mut tree = Tree::new("serialization");
        let p = tree.create_element(ElementKind::Paragraph);
        let t = tree.create_text("hello");
        tree.append(&p, &[t]).unwrap();
        tree.append(&NodeKey::root(), &[p]).unwrap();

        let exported = tree.export_node(&NodeKey::root()).unwrap();

        assert_eq!(exported.children().len(), 1);
        assert_eq!(exported.children()[0].type_name(), "paragraph");
        assert_eq!(exported.children()[0].children()[0].type_name(), "text");

        // The root's own record never carries children
        assert!(tree.root().export_json().children().is_empty());
    }

    #[test]
    fn test_import_rejects_text_under_root() {
        let mut tree = Tree::new("serialization");
        let children = vec![SerializedNode::Text(SerializedTextNode {
            text: "loose".to_string(),
            mode: TextMode::Normal,
            directionless: false,
            version: 1,
        })];

        let err = tree.import_children(&NodeKey::root(), &children).unwrap_err();

        assert!(matches!(
            err.as_invariant(),
            Some(InvariantViolation::IllegalRootChild { kind: "text", .. })
        ));
        assert!(tree.root().children().is_empty());
    }

    #[test]
    fn test_import_root_rejects_other_types() {
        let mut tree = Tree::new("serialization");
        let record = SerializedNode::LineBreak(SerializedLeafNode { version: 1 });

        let err = tree.import_root(&record).unwrap_err();
        assert!(matches!(err, TreeError::UnexpectedNodeType { expected: "root", .. }));
    }
}
