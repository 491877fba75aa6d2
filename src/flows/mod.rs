pub mod datasources;
pub mod engine;
pub mod error;
pub mod playlists;
pub mod projects;
pub mod schema;
pub mod workspaces;

pub use datasources::DatasourceFlow;
pub use engine::{
    FlowContext, FlowController, FlowOutcome, FlowSpec, FlowState, Screen, Screens, Signal,
    Transition,
};
pub use error::FlowError;
pub use playlists::{PlaylistFlow, PlaylistKind};
pub use projects::ProjectFlow;
pub use workspaces::WorkspaceFlow;

use crate::ui::KeyBinding;

/// A resolved remote entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub name: String,
    pub id: i64,
}

impl Selection {
    pub fn new(name: impl Into<String>, id: i64) -> Self {
        Self {
            name: name.into(),
            id,
        }
    }
}

/// Bindings of the plain pick-or-add lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    Select,
    Add,
}

pub(crate) fn select_or_add_bindings(select_help: &str) -> Vec<(KeyBinding, ListAction)> {
    vec![
        (
            KeyBinding::new(&["enter"], "enter", select_help),
            ListAction::Select,
        ),
        (KeyBinding::new(&["a"], "a", "add new"), ListAction::Add),
    ]
}
