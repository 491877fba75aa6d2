use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CLOUDLIST: &str = "cloudlist";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: i64,
    #[serde(default)]
    pub workspace_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkspace {
    pub workspace_name: String,
    pub organization_name: String,
    pub organization_url: String,
    pub team_size: String,
}

impl NewWorkspace {
    pub fn new(name: &str, team_size: &str, url: &str) -> Self {
        Self {
            workspace_name: name.to_string(),
            organization_name: name.to_string(),
            organization_url: url.to_string(),
            team_size: team_size.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePlaylist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub count: i64,
}

impl TemplatePlaylist {
    pub fn description(&self) -> String {
        format!("{} ({} templates)", self.tags, self.count)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub protocol: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub tags: String,
}

impl Template {
    pub fn description(&self) -> String {
        let mut out = self.title.clone();
        if !self.protocol.is_empty() {
            out.push_str(&format!(" ({})", self.protocol));
        }
        if !self.severity.is_empty() {
            out.push_str(&format!(" [{}]", self.severity));
        }
        if !self.tags.is_empty() {
            out.push(' ');
            out.push_str(&self.tags);
        }
        out.trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPlaylist {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub asset_count: Option<i64>,
}

impl AssetPlaylist {
    pub fn description(&self) -> String {
        let mut out = String::new();
        if let Some(tags) = self.tags.as_ref().filter(|tags| !tags.is_empty()) {
            out.push_str(&format!("[{}]", tags.join(", ")));
        }
        if let Some(count) = self.asset_count {
            out.push_str(&format!(" ({count} assets)"));
        }
        out.trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub asset_id: i64,
    pub asset_name: String,
    #[serde(default)]
    pub data_source_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub metadata: Value,
}

/// A datasource type the workspace can add, with its example configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableDatasource {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub template: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDatasource {
    #[serde(rename = "type")]
    pub kind: String,
    /// Serialized JSON configuration.
    pub metadata: String,
    pub sync: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Created {
    #[serde(default)]
    pub(crate) id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_description_omits_empty_parts() {
        let template = Template {
            id: 1,
            name: "cve-2021-1".to_string(),
            title: "Example RCE".to_string(),
            protocol: String::new(),
            severity: "high".to_string(),
            tags: "cve,rce".to_string(),
        };
        assert_eq!(template.description(), "Example RCE [high] cve,rce");
    }

    #[test]
    fn asset_playlist_description_handles_missing_parts() {
        let mut playlist = AssetPlaylist {
            id: 1,
            name: "prod".to_string(),
            tags: None,
            asset_count: Some(4),
        };
        assert_eq!(playlist.description(), "(4 assets)");
        playlist.tags = Some(vec!["web".to_string(), "edge".to_string()]);
        playlist.asset_count = None;
        assert_eq!(playlist.description(), "[web, edge]");
    }

    #[test]
    fn template_playlist_description_is_trimmed() {
        let playlist = TemplatePlaylist {
            id: 3,
            name: "default".to_string(),
            tags: String::new(),
            count: 12,
        };
        assert_eq!(playlist.description(), "(12 templates)");
    }

    #[test]
    fn datasource_decodes_type_field() {
        let decoded: Datasource = serde_json::from_str(
            r#"{"id":9,"type":"cloudlist","metadata":{"repo":"cloudlist"}}"#,
        )
        .expect("decode");
        assert_eq!(decoded.kind, CLOUDLIST);
        assert_eq!(decoded.metadata["repo"], "cloudlist");
    }
}
