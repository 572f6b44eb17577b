//! # Folio Nodes
//!
//! Node model of the Folio rich-text document tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ tree: arena of nodes + mutation primitives  │
//! │  - append / insert / remove / replace       │
//! │  - dirty tracking per key                   │
//! └─────────────────────────────────────────────┘
//!                     ↓ composes
//! ┌─────────────────────────────────────────────┐
//! │ element: children, direction/format/indent, │
//! │          subtree text flattening            │
//! └─────────────────────────────────────────────┘
//!                     ↓ guarded by
//! ┌─────────────────────────────────────────────┐
//! │ root: single anchor, structural guards,     │
//! │       cached text projection                │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Exactly one root**: created with the tree, never removed or moved
//! 2. **Checked before applied**: a rejected mutation leaves the tree untouched
//! 3. **Explicit context**: read-only mode and the dirty signal are passed in
//!
//! ## Usage
//!
//! ```rust
//! use folio_nodes::{ElementKind, Mode, NodeKey, TextFilter, Tree};
//!
//! let mut tree = Tree::new("doc");
//! let paragraph = tree.create_element(ElementKind::Paragraph);
//! let text = tree.create_text("hello");
//! tree.append(&paragraph, &[text]).unwrap();
//! tree.append(&NodeKey::root(), &[paragraph]).unwrap();
//!
//! assert_eq!(tree.text_content(Mode::ReadOnly, TextFilter::default()), "hello");
//! assert!(tree.remove(&NodeKey::root()).is_err());
//! ```

mod context;
mod element;
mod error;
mod key;
mod node;
mod root;
mod serialization;
mod tree;

pub use context::{Context, DirtyState, Mode};
pub use element::{
    Direction, ElementBehavior, ElementFormat, ElementKind, ElementNode, TextFilter, DOUBLE_LINE_BREAK,
};
pub use error::{InvariantViolation, TreeError, TreeResult};
pub use key::{namespace_seed, KeyGenerator, NodeKey};
pub use node::{is_root_node, DecoratorNode, Node, NodeData, TextMode, TextNode};
pub use root::{ensure_root_child, RootNode, ROOT_TYPE, ROOT_VERSION};
pub use serialization::{
    RawNodeSnapshot, SerializedDecoratorNode, SerializedElementNode, SerializedLeafNode, SerializedNode,
    SerializedRootNode, SerializedTextNode,
};
pub use tree::Tree;
