//! # Folio Editor
//!
//! Update lifecycle around a Folio document tree.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ nodes: tree arena, element behavior, root   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: update / read scopes + commit       │
//! │  - Dirty signal raised by mutations         │
//! │  - Read-only scopes over the committed tree │
//! │  - Reconcile, garbage collect, refresh the  │
//! │    root text cache on commit                │
//! │  - JSON editor state import/export          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Single root**: every tree has exactly one root, guarded by its type
//! 2. **All-or-nothing updates**: a failing update leaves no trace
//! 3. **Lazy text projection**: reads recompute only when something changed
//!
//! ## Usage
//!
//! ```rust
//! use folio_editor::{Editor, EditorConfig};
//! use folio_nodes::{ElementKind, NodeKey};
//!
//! let mut editor = Editor::new(EditorConfig::default())?;
//!
//! editor.update(|tree| {
//!     let paragraph = tree.create_element(ElementKind::Paragraph);
//!     let text = tree.create_text("hello");
//!     tree.append(&paragraph, &[text])?;
//!     tree.append(&NodeKey::root(), &[paragraph])?;
//!     Ok(())
//! })?;
//!
//! assert_eq!(editor.text_content(), "hello");
//! # Ok::<(), folio_editor::EditorError>(())
//! ```

mod config;
mod editor;
mod errors;
mod listeners;
mod reconcile;
mod state;

pub use config::EditorConfig;
pub use editor::Editor;
pub use errors::{EditorError, EditorResult};
pub use listeners::ListenerId;
pub use reconcile::CommitReport;
pub use state::SerializedEditorState;

// Re-export node types for convenience
pub use folio_nodes::{Context, DirtyState, Mode, NodeKey, TextFilter, Tree};
