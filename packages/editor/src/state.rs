//! Editor state (de)serialization
//!
//! The persisted form is `{"root": <root record with children>}`. Loading a
//! state never builds a second root: attributes are applied to the editor's
//! existing root and descendants are rebuilt under it.

use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::errors::EditorResult;
use folio_nodes::{NodeKey, SerializedNode, TreeError};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedEditorState {
    pub root: SerializedNode,
}

impl Editor {
    pub fn export_state(&self) -> EditorResult<SerializedEditorState> {
        let root = self.tree().export_node(&NodeKey::root())?;
        Ok(SerializedEditorState { root })
    }

    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(&self.export_state()?)?)
    }

    /// Replace the document with a serialized state.
    ///
    /// Allowed on read-only editors. The whole tree is reconciled afterwards.
    pub fn set_state(&mut self, state: &SerializedEditorState) -> EditorResult<()> {
        if state.root.as_root().is_none() {
            return Err(TreeError::unexpected_type("root", state.root.type_name()).into());
        }

        self.apply_update(|tree| {
            let existing: Vec<NodeKey> = tree.root().children().to_vec();
            for key in &existing {
                tree.remove(key)?;
            }

            tree.import_root(&state.root)?;
            let imported = tree.import_children(&NodeKey::root(), state.root.children())?;
            tree.mark_full_reconcile();

            debug!(top_level = imported.len(), replaced = existing.len(), "editor state imported");
            Ok(())
        })
    }

    pub fn set_state_json(&mut self, json: &str) -> EditorResult<()> {
        let state: SerializedEditorState = serde_json::from_str(json)?;
        self.set_state(&state)
    }

    pub fn from_json(config: EditorConfig, json: &str) -> EditorResult<Self> {
        let mut editor = Editor::new(config)?;
        editor.set_state_json(json)?;
        Ok(editor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::EditorError;
    use folio_nodes::{Direction, ElementFormat, ElementKind, InvariantViolation};

    #[test]
    fn test_round_trip_keeps_text_and_root_attributes() {
        let mut editor = Editor::new(EditorConfig::default()).unwrap();
        editor
            .update(|tree| {
                let p = tree.create_element(ElementKind::Paragraph);
                let t = tree.create_text("hello");
                tree.append(&p, &[t])?;
                tree.append(&NodeKey::root(), &[p])?;
                tree.set_direction(&NodeKey::root(), Some(Direction::Ltr))?;
                tree.set_format(&NodeKey::root(), ElementFormat::Justify)?;
                Ok(())
            })
            .unwrap();

        let json = editor.to_json().unwrap();
        let restored = Editor::from_json(EditorConfig::new("restored"), &json).unwrap();

        assert_eq!(restored.text_content(), "hello");
        assert_eq!(restored.tree().count_root_nodes(), 1);
        let root = &restored.tree().root().element;
        assert_eq!(root.direction, Some(Direction::Ltr));
        assert_eq!(root.format, ElementFormat::Justify);
    }

    #[test]
    fn test_set_state_replaces_previous_content() {
        let mut editor = Editor::new(EditorConfig::default()).unwrap();
        editor
            .update(|tree| {
                let q = tree.create_element(ElementKind::Quote);
                tree.append(&NodeKey::root(), &[q])?;
                Ok(())
            })
            .unwrap();

        let json = r#"{"root":{"type":"root","version":1,"direction":null,"format":"","indent":0,
            "children":[{"type":"paragraph","version":1,"direction":null,"format":"","indent":0,
            "children":[{"type":"text","text":"fresh","version":1}]}]}}"#;
        editor.set_state_json(json).unwrap();

        assert_eq!(editor.tree().root().children().len(), 1);
        assert_eq!(editor.text_content(), "fresh");
        assert_eq!(editor.last_commit().map(|r| r.collected), Some(1));
    }

    #[test]
    fn test_illegal_state_is_rejected_atomically() {
        let mut editor = Editor::new(EditorConfig::default()).unwrap();
        let json = r#"{"root":{"type":"root","version":1,"direction":null,"format":"","indent":0,
            "children":[{"type":"text","text":"loose","version":1}]}}"#;

        let result = editor.set_state_json(json);

        assert!(matches!(
            result,
            Err(EditorError::Tree(TreeError::Invariant(InvariantViolation::IllegalRootChild { .. })))
        ));
        assert_eq!(editor.version(), 0);
    }

    #[test]
    fn test_non_root_state_is_rejected() {
        let mut editor = Editor::new(EditorConfig::default()).unwrap();
        let json = r#"{"root":{"type":"linebreak","version":1}}"#;

        assert!(matches!(
            editor.set_state_json(json),
            Err(EditorError::Tree(TreeError::UnexpectedNodeType { expected: "root", .. }))
        ));
    }
}
