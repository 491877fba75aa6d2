#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write file {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown config key `{0}`")]
    UnknownKey(String),
    #[error("invalid value `{value}` for `{key}`: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("`interactive` and `non-interactive` cannot both be set")]
    ConflictingModes,
    #[error("context needs both a workspace and a project")]
    IncompleteContext,
    #[error("invalid context {kind} `{value}`: {reason}")]
    InvalidContextName {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("context `{0}` does not exist")]
    MissingContext(String),
    #[error("failed to resolve home directory for scanprep state")]
    HomeDirectoryUnavailable,
}
