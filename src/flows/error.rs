use super::engine::FlowState;
use crate::remote::RemoteError;
use crate::ui::UiError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("could not {action}: {source}")]
    Remote {
        action: String,
        #[source]
        source: RemoteError,
    },
    #[error("could not encode datasource metadata: {0}")]
    Metadata(#[source] serde_json::Error),
    #[error(transparent)]
    Terminal(#[from] UiError),
    #[error("flow has no screen for state {0:?}")]
    MissingScreen(FlowState),
}

impl FlowError {
    pub fn remote(action: impl Into<String>) -> impl FnOnce(RemoteError) -> FlowError {
        let action = action.into();
        move |source| FlowError::Remote { action, source }
    }
}
