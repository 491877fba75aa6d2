use super::types::{
    Asset, AssetPlaylist, AvailableDatasource, Created, Datasource, NewDatasource, NewWorkspace,
    Project, Template, TemplatePlaylist, Workspace,
};
use super::{RemoteClient, RemoteError};
use serde::{Deserialize, Serialize};
use serde_json::json;

const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, Clone)]
pub struct CloudApiClient {
    api_base: String,
    api_key: String,
}

impl CloudApiClient {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, RemoteError> {
        if api_key.trim().is_empty() {
            return Err(RemoteError::MissingCredential("API key"));
        }
        if api_url.trim().is_empty() {
            return Err(RemoteError::MissingCredential("API URL"));
        }
        Ok(Self {
            api_base: api_url.trim().to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn get<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let mut url = self.endpoint(path);
        if !query.is_empty() {
            let encoded = query
                .iter()
                .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{url}?{encoded}");
        }
        let response = ureq::get(&url)
            .set(API_KEY_HEADER, &self.api_key)
            .call()
            .map_err(|e| map_call_error(path, e))?;
        response.into_json::<T>().map_err(|e| RemoteError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<i64, RemoteError> {
        let url = self.endpoint(path);
        let payload = serde_json::to_value(body).map_err(|e| RemoteError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })?;
        let response = ureq::post(&url)
            .set(API_KEY_HEADER, &self.api_key)
            .send_json(payload)
            .map_err(|e| map_call_error(path, e))?;
        let body = response.into_string().map_err(|e| RemoteError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })?;
        if body.trim().is_empty() {
            return Ok(0);
        }
        let created: Created = serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(created.id)
    }
}

fn map_call_error(path: &str, err: ureq::Error) -> RemoteError {
    match err {
        ureq::Error::Status(code, response) => RemoteError::Status {
            endpoint: path.to_string(),
            code,
            body: response.into_string().unwrap_or_default(),
        },
        ureq::Error::Transport(transport) => RemoteError::Transport {
            endpoint: path.to_string(),
            message: transport.to_string(),
        },
    }
}

fn workspace_path(workspace_id: i64, rest: &str) -> String {
    format!("workspaces/{workspace_id}/{rest}")
}

impl RemoteClient for CloudApiClient {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, RemoteError> {
        self.get("organization/workspaces", &[])
    }

    fn create_workspace(&self, request: &NewWorkspace) -> Result<i64, RemoteError> {
        self.post("organization/workspaces", request)
    }

    fn list_projects(&self, workspace_id: i64) -> Result<Vec<Project>, RemoteError> {
        self.get(&workspace_path(workspace_id, "projects"), &[])
    }

    fn create_project(&self, workspace_id: i64, name: &str) -> Result<i64, RemoteError> {
        self.post(
            &workspace_path(workspace_id, "projects"),
            &json!({ "name": name }),
        )
    }

    fn list_template_playlists(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<TemplatePlaylist>, RemoteError> {
        self.get(&workspace_path(workspace_id, "template-playlists"), &[])
    }

    fn list_templates(&self, workspace_id: i64) -> Result<Vec<Template>, RemoteError> {
        self.get(&workspace_path(workspace_id, "templates"), &[])
    }

    fn create_template_playlist(
        &self,
        workspace_id: i64,
        name: &str,
        template_ids: &[i64],
    ) -> Result<i64, RemoteError> {
        self.post(
            &workspace_path(workspace_id, "template-playlists"),
            &json!({ "name": name, "templateIds": template_ids }),
        )
    }

    fn list_asset_playlists(&self, workspace_id: i64) -> Result<Vec<AssetPlaylist>, RemoteError> {
        self.get(&workspace_path(workspace_id, "asset-playlists"), &[])
    }

    fn list_assets(&self, workspace_id: i64, size: usize) -> Result<Vec<Asset>, RemoteError> {
        self.get(
            &workspace_path(workspace_id, "assets"),
            &[("size", size.to_string())],
        )
    }

    fn create_asset_playlist(
        &self,
        workspace_id: i64,
        name: &str,
        asset_ids: &[i64],
    ) -> Result<i64, RemoteError> {
        self.post(
            &workspace_path(workspace_id, "asset-playlists"),
            &json!({ "name": name, "assetIds": asset_ids }),
        )
    }

    fn list_datasources(&self, workspace_id: i64) -> Result<Vec<Datasource>, RemoteError> {
        self.get(&workspace_path(workspace_id, "datasources"), &[])
    }

    fn list_available_datasources(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<AvailableDatasource>, RemoteError> {
        self.get(
            &workspace_path(workspace_id, "integrations/datasources/available"),
            &[],
        )
    }

    fn create_datasource(
        &self,
        workspace_id: i64,
        request: &NewDatasource,
    ) -> Result<i64, RemoteError> {
        self.post(&workspace_path(workspace_id, "datasources"), request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructor_rejects_missing_credentials() {
        assert!(matches!(
            CloudApiClient::new("https://api.example.com", " "),
            Err(RemoteError::MissingCredential("API key"))
        ));
        assert!(matches!(
            CloudApiClient::new("", "secret"),
            Err(RemoteError::MissingCredential("API URL"))
        ));
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let client = CloudApiClient::new("https://api.example.com/v1/", "secret").expect("client");
        assert_eq!(
            client.endpoint("/organization/workspaces"),
            "https://api.example.com/v1/organization/workspaces"
        );
        assert_eq!(workspace_path(4, "templates"), "workspaces/4/templates");
    }

    #[test]
    fn unreachable_host_maps_to_transport_error() {
        let client = CloudApiClient::new("http://127.0.0.1:9", "secret").expect("client");
        match client.list_workspaces() {
            Err(RemoteError::Transport { endpoint, .. }) => {
                assert_eq!(endpoint, "organization/workspaces")
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
