//! Single-editor session state
//!
//! Holds the current tree snapshot and mode, and applies user intents one at a
//! time by replacing the snapshot with the result of a domain operation.

use tracing::{debug, instrument};

use crate::application::ApplicationResult;
use crate::domain::{self, Document, Mode, Node, Violation};

/// Name given to the root of a fresh distribution.
pub const DEFAULT_QUESTION: &str = "What do you believe?";

/// An edit requested by a front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Rename { id: String, name: String },
    Reweight { id: String, probability: f64 },
    SetLocked { id: String, locked: bool },
    AddChild { parent_id: String },
    Remove { id: String },
    Toggle { id: String },
    Normalize { id: String },
    SwitchMode(Mode),
    Sort,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    root: Node,
    mode: Mode,
}

impl Session {
    /// Fresh distribution with an empty root.
    pub fn new(mode: Mode) -> Self {
        Self {
            root: Node::root(DEFAULT_QUESTION),
            mode,
        }
    }

    pub fn from_document(document: Document) -> Self {
        let mode = document.mode();
        Self {
            root: document.data.prune_empty_children(),
            mode,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Immutable copy for renderers; later edits do not affect it.
    pub fn snapshot(&self) -> (Node, Mode) {
        (self.root.clone(), self.mode)
    }

    /// Unrounded document of the current state.
    pub fn document(&self) -> Document {
        Document::new(self.root.clone(), self.mode)
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        domain::find(&self.root, id)
    }

    pub fn violations(&self) -> Vec<Violation> {
        domain::violations(&self.root, self.mode)
    }

    /// Apply one intent. Returns the id of the created node for `AddChild`.
    #[instrument(level = "debug", skip(self))]
    pub fn apply(&mut self, intent: Intent) -> Option<String> {
        let mut added = None;
        let next = match intent {
            Intent::Rename { id, name } => domain::rename(&self.root, &id, &name),
            Intent::Reweight { id, probability } => {
                domain::reweight(&self.root, &id, probability)
            }
            Intent::SetLocked { id, locked } => domain::set_locked(&self.root, &id, locked),
            Intent::AddChild { parent_id } => {
                let (next, id) = domain::add_child(&self.root, &parent_id);
                added = id;
                next
            }
            Intent::Remove { id } => domain::remove_node(&self.root, &id),
            Intent::Toggle { id } => domain::toggle(&self.root, &id),
            Intent::Normalize { id } => domain::normalize(&self.root, &id, self.mode),
            Intent::SwitchMode(to) => {
                let next = domain::switch_mode(&self.root, self.mode, to);
                self.mode = to;
                next
            }
            Intent::Sort => domain::sort(&self.root),
        };
        self.root = next;
        added
    }

    /// Replace tree and mode from an interchange document.
    ///
    /// On any validation failure the session is left untouched. A document
    /// without a boolean `isAbsolute` keeps the current mode.
    pub fn import_json(&mut self, json: &str) -> ApplicationResult<()> {
        let imported = Document::import(json)?;
        self.root = imported.root;
        if let Some(mode) = imported.mode {
            self.mode = mode;
        }
        debug!("session replaced by import, mode {}", self.mode);
        Ok(())
    }

    /// Rounded interchange document.
    pub fn export(&self) -> Document {
        Document::export(&self.root, self.mode)
    }

    pub fn export_json(&self) -> ApplicationResult<String> {
        Ok(self.export().to_json()?)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}
