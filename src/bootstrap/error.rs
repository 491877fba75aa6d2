use crate::config::ConfigError;
use crate::flows::FlowError;
use std::fmt;

/// The configuration fields the bootstrap fills, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    Workspace,
    Project,
    TemplatePlaylist,
    AssetPlaylist,
}

impl ConfigField {
    pub const ORDER: [ConfigField; 4] = [
        ConfigField::Workspace,
        ConfigField::Project,
        ConfigField::TemplatePlaylist,
        ConfigField::AssetPlaylist,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ConfigField::Workspace => "workspace",
            ConfigField::Project => "project",
            ConfigField::TemplatePlaylist => "template playlist",
            ConfigField::AssetPlaylist => "asset playlist",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("{field} is required")]
    MissingField { field: ConfigField },
    #[error("{field} selection was cancelled")]
    Cancelled { field: ConfigField },
    #[error("could not resolve {field}: {source}")]
    Flow {
        field: ConfigField,
        #[source]
        source: FlowError,
    },
    #[error("{field} needs the {dependency} id; set `{dependency}-id` or clear `{dependency}`")]
    MissingDependency {
        field: ConfigField,
        dependency: ConfigField,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BootstrapError {
    pub fn field(&self) -> Option<ConfigField> {
        match self {
            BootstrapError::MissingField { field }
            | BootstrapError::Cancelled { field }
            | BootstrapError::Flow { field, .. }
            | BootstrapError::MissingDependency { field, .. } => Some(*field),
            BootstrapError::Config(_) => None,
        }
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(self, BootstrapError::Cancelled { .. })
    }
}
