use super::ConfigError;
use crate::shared::atomic_write_json;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const ENV_API_KEY: &str = "SCANPREP_API_KEY";
pub const ENV_API_URL: &str = "SCANPREP_API_URL";

/// Identifiers matching the names in [`CloudConfig`]. Maintained by the
/// bootstrap, not meant for hand editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct InternalIds {
    pub workspace_id: i64,
    pub project_id: i64,
    pub template_playlist_ids: Vec<i64>,
    pub asset_playlist_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CloudConfig {
    pub interactive: bool,
    pub non_interactive: bool,
    pub api_key: String,
    pub api_url: String,
    pub workspace: String,
    pub project: String,
    pub template_playlists: Vec<String>,
    pub asset_playlists: Vec<String>,
    pub internal_ids: InternalIds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    Interactive,
    NonInteractive,
}

impl CloudConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ConfigError> {
        atomic_write_json(path, self).map_err(|source| ConfigError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Overlays every key present in the file. A missing file is not an
    /// error.
    pub fn populate_from_file(&mut self, path: &Path) -> Result<bool, ConfigError> {
        if !path.exists() {
            return Ok(false);
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let overlay: serde_json::Value =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        let mut merged = serde_json::to_value(&*self).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        merge_json(&mut merged, overlay);
        *self = serde_json::from_value(merged).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        Ok(true)
    }

    pub fn populate_from_env(&mut self) {
        self.populate_from_vars(|key| std::env::var(key).ok());
    }

    pub fn populate_from_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty()) {
            self.api_key = key;
        }
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
    }

    /// Applies `key=value` pairs. Entries without `=` are skipped.
    pub fn populate_from_flags<S: AsRef<str>>(&mut self, flags: &[S]) -> Result<(), ConfigError> {
        for flag in flags {
            let Some((key, value)) = flag.as_ref().split_once('=') else {
                continue;
            };
            self.set(key.trim(), value.trim())?;
        }
        Ok(())
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "interactive" => self.interactive = parse_bool(key, value)?,
            "non-interactive" => self.non_interactive = parse_bool(key, value)?,
            "api-key" => self.api_key = value.to_string(),
            "api-url" => self.api_url = value.to_string(),
            "workspace" => self.workspace = value.to_string(),
            "project" => self.project = value.to_string(),
            "template-playlists" => self.template_playlists = split_list(value),
            "asset-playlists" => self.asset_playlists = split_list(value),
            "workspace-id" => self.internal_ids.workspace_id = parse_id(key, value)?,
            "project-id" => self.internal_ids.project_id = parse_id(key, value)?,
            "template-playlist-ids" => {
                self.internal_ids.template_playlist_ids = parse_ids(key, value)?
            }
            "asset-playlist-ids" => self.internal_ids.asset_playlist_ids = parse_ids(key, value)?,
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    pub fn resolution_mode(&self, has_terminal: bool) -> Result<ResolutionMode, ConfigError> {
        match (self.interactive, self.non_interactive) {
            (true, true) => Err(ConfigError::ConflictingModes),
            (_, true) => Ok(ResolutionMode::NonInteractive),
            (true, _) => Ok(ResolutionMode::Interactive),
            _ if has_terminal => Ok(ResolutionMode::Interactive),
            _ => Ok(ResolutionMode::NonInteractive),
        }
    }

    pub fn set_workspace(&mut self, name: &str, id: i64) {
        self.workspace = name.to_string();
        self.internal_ids.workspace_id = id;
    }

    pub fn set_project(&mut self, name: &str, id: i64) {
        self.project = name.to_string();
        self.internal_ids.project_id = id;
    }

    pub fn push_template_playlist(&mut self, name: &str, id: i64) {
        self.template_playlists.push(name.to_string());
        self.internal_ids.template_playlist_ids.push(id);
    }

    pub fn push_asset_playlist(&mut self, name: &str, id: i64) {
        self.asset_playlists.push(name.to_string());
        self.internal_ids.asset_playlist_ids.push(id);
    }

    /// `key=value` lines for the resolved resources.
    pub fn summary(&self) -> String {
        [
            format!("workspace={}", self.workspace),
            format!("workspace_id={}", self.internal_ids.workspace_id),
            format!("project={}", self.project),
            format!("project_id={}", self.internal_ids.project_id),
            format!("template_playlists={}", self.template_playlists.join(",")),
            format!(
                "template_playlist_ids={}",
                join_ids(&self.internal_ids.template_playlist_ids)
            ),
            format!("asset_playlists={}", self.asset_playlists.join(",")),
            format!(
                "asset_playlist_ids={}",
                join_ids(&self.internal_ids.asset_playlist_ids)
            ),
        ]
        .join("\n")
    }
}

fn merge_json(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

fn parse_id(key: &str, value: &str) -> Result<i64, ConfigError> {
    value.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_ids(key: &str, value: &str) -> Result<Vec<i64>, ConfigError> {
    split_list(value)
        .iter()
        .map(|entry| parse_id(key, entry))
        .collect()
}
