use super::{CloudConfig, ConfigError};
use std::fs;
use std::path::{Path, PathBuf};

/// One saved [`CloudConfig`] per workspace and project pair.
#[derive(Debug, Clone)]
pub struct Contexts {
    directory: PathBuf,
}

pub fn context_name(workspace: &str, project: &str) -> String {
    format!("{workspace}-{project}")
}

/// Checks that a workspace or project name stays one file name inside
/// the contexts directory.
pub fn validate_context_part(kind: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason| ConfigError::InvalidContextName {
        kind,
        value: value.to_string(),
        reason,
    };
    if value.trim().is_empty() {
        return Err(invalid("must be non-empty"));
    }
    if value.contains(['/', '\\']) {
        return Err(invalid("must not contain path separators"));
    }
    if value.contains("..") {
        return Err(invalid("must not contain `..`"));
    }
    if value.starts_with('.') {
        return Err(invalid("must not start with `.`"));
    }
    if value.chars().any(char::is_control) {
        return Err(invalid("must not contain control characters"));
    }
    Ok(())
}

impl Contexts {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, workspace: &str, project: &str) -> Result<PathBuf, ConfigError> {
        validate_context_part("workspace", workspace)?;
        validate_context_part("project", project)?;
        Ok(self.directory.join(context_name(workspace, project)))
    }

    /// Saves `config` under its workspace and project, replacing any
    /// earlier context with the same name.
    pub fn create(&self, config: &CloudConfig) -> Result<PathBuf, ConfigError> {
        if config.workspace.trim().is_empty() || config.project.trim().is_empty() {
            return Err(ConfigError::IncompleteContext);
        }
        let path = self.path_for(&config.workspace, &config.project)?;
        config.write_to(&path)?;
        Ok(path)
    }

    pub fn get(&self, workspace: &str, project: &str) -> Result<CloudConfig, ConfigError> {
        let path = self.path_for(workspace, project)?;
        if !path.exists() {
            return Err(ConfigError::MissingContext(context_name(workspace, project)));
        }
        CloudConfig::from_path(&path)
    }

    /// Sorted context names. An absent directory has none.
    pub fn list(&self) -> Result<Vec<String>, ConfigError> {
        if !self.directory.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.directory).map_err(|source| ConfigError::Read {
            path: self.directory.display().to_string(),
            source,
        })?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| ConfigError::Read {
                path: self.directory.display().to_string(),
                source,
            })?;
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }
}
