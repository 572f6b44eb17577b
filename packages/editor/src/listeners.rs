//! # Commit Listeners
//!
//! Callbacks fired after a commit lands.
//!
//! - Update listeners receive every [`CommitReport`]
//! - Text content listeners receive the new document text, only when it
//!   changed; the text comes from the freshly refreshed root cache

use crate::reconcile::CommitReport;

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type UpdateListener = Box<dyn FnMut(&CommitReport)>;
type TextContentListener = Box<dyn FnMut(&str)>;

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    update: Vec<(ListenerId, UpdateListener)>,
    text_content: Vec<(ListenerId, TextContentListener)>,
}

impl Listeners {
    fn next_id(&mut self) -> ListenerId {
        self.next_id += 1;
        ListenerId(self.next_id)
    }

    pub(crate) fn add_update(&mut self, listener: UpdateListener) -> ListenerId {
        let id = self.next_id();
        self.update.push((id, listener));
        id
    }

    pub(crate) fn add_text_content(&mut self, listener: TextContentListener) -> ListenerId {
        let id = self.next_id();
        self.text_content.push((id, listener));
        id
    }

    /// Returns whether a listener was removed
    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.update.len() + self.text_content.len();
        self.update.retain(|(i, _)| *i != id);
        self.text_content.retain(|(i, _)| *i != id);
        before != self.update.len() + self.text_content.len()
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.update.len() + self.text_content.len()
    }

    pub(crate) fn notify(&mut self, report: &CommitReport, text: &str) {
        for (_, listener) in &mut self.update {
            listener(report);
        }
        if report.text_changed {
            for (_, listener) in &mut self.text_content {
                listener(text);
            }
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("update", &self.update.len())
            .field("text_content", &self.text_content.len())
            .finish()
    }
}
