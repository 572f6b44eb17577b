//! # Editor Handle
//!
//! Owns a document tree and the lifecycle around it.
//!
//! ## Lifecycle
//!
//! ```text
//! update → mutate pending tree → commit → listeners
//!   ↓            ↓                  ↓
//! clone     dirty signal set   reconcile, GC, refresh root text cache
//! ```
//!
//! Mutations only ever touch a pending copy of the committed tree. A failed
//! update drops the copy, so callers never observe a half-applied edit.

use crate::config::EditorConfig;
use crate::errors::{EditorError, EditorResult};
use crate::listeners::{ListenerId, Listeners};
use crate::reconcile::{reconcile, CommitReport};
use folio_nodes::{Context, Mode, TextFilter, Tree};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Editor {
    config: EditorConfig,

    /// Last committed state
    tree: Tree,

    /// Increments on every commit that carried changes
    version: u64,

    editable: bool,

    last_commit: Option<CommitReport>,

    listeners: Listeners,
}

impl Editor {
    /// Create an editor holding an empty document
    pub fn new(config: EditorConfig) -> EditorResult<Self> {
        config.validate()?;
        let tree = Tree::new(&config.namespace);

        Ok(Self {
            editable: config.editable,
            config,
            tree,
            version: 0,
            last_commit: None,
            listeners: Listeners::default(),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        debug!(editable, "editable state changed");
        self.editable = editable;
    }

    /// Last committed tree
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn last_commit(&self) -> Option<&CommitReport> {
        self.last_commit.as_ref()
    }

    /// Run a mutating scope and commit it.
    ///
    /// Inside the scope the tree reports a dirty signal as soon as anything
    /// changes, so root text reads recompute. On error nothing is committed.
    pub fn update<T, F>(&mut self, f: F) -> EditorResult<T>
    where
        F: FnOnce(&mut Tree) -> EditorResult<T>,
    {
        if !self.editable {
            return Err(EditorError::ReadOnly);
        }
        self.apply_update(f)
    }

    pub(crate) fn apply_update<T, F>(&mut self, f: F) -> EditorResult<T>
    where
        F: FnOnce(&mut Tree) -> EditorResult<T>,
    {
        let mut pending = self.tree.clone();
        debug!(version = self.version, "update started");

        match f(&mut pending) {
            Ok(value) => {
                self.commit(pending);
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, version = self.version, "update failed, pending state discarded");
                Err(e)
            }
        }
    }

    /// Run a read-only scope against the committed tree
    pub fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&Tree, &Context) -> T,
    {
        let ctx = self.tree.context(Mode::ReadOnly);
        f(&self.tree, &ctx)
    }

    /// Flattened document text, served from the root cache when possible
    pub fn text_content(&self) -> String {
        self.text_content_filtered(TextFilter::default())
    }

    pub fn text_content_filtered(&self, filter: TextFilter) -> String {
        self.read(|tree, ctx| tree.root().text_content(tree, ctx, filter))
    }

    fn commit(&mut self, mut pending: Tree) {
        if pending.dirty_state().is_clean() {
            self.tree = pending;
            return;
        }

        let version = self.version + 1;
        let report = reconcile(&self.tree, &mut pending, self.config.collect_garbage, version);

        self.tree = pending;
        self.version = version;

        info!(
            version,
            dirty = ?report.dirty,
            created = report.created.len(),
            updated = report.updated.len(),
            destroyed = report.destroyed.len(),
            collected = report.collected,
            "update committed"
        );

        let text = self.tree.root().cached_text().unwrap_or_default();
        self.listeners.notify(&report, &text);
        self.last_commit = Some(report);
    }

    /// Called with every commit report
    pub fn register_update_listener(&mut self, listener: impl FnMut(&CommitReport) + 'static) -> ListenerId {
        self.listeners.add_update(Box::new(listener))
    }

    /// Called with the new document text whenever a commit changed it
    pub fn register_text_content_listener(&mut self, listener: impl FnMut(&str) + 'static) -> ListenerId {
        self.listeners.add_text_content(Box::new(listener))
    }

    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}
