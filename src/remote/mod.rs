pub mod http;
pub mod memory;
pub mod types;

pub use http::CloudApiClient;
pub use memory::InMemoryRemote;
pub use types::{
    Asset, AssetPlaylist, AvailableDatasource, Datasource, NewDatasource, NewWorkspace, Project,
    Template, TemplatePlaylist, Workspace, CLOUDLIST,
};

/// Page size used when listing assets.
pub const ASSET_PAGE_SIZE: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("{endpoint} returned status {code}: {body}")]
    Status {
        endpoint: String,
        code: u16,
        body: String,
    },
    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },
    #[error("failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{0} is required")]
    MissingCredential(&'static str),
    #[error("{call} failed: {message}")]
    Rejected { call: String, message: String },
}

/// Synchronous access to cloud resources. Every call blocks until the
/// remote side answers; there are no retries.
pub trait RemoteClient {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, RemoteError>;
    fn create_workspace(&self, request: &NewWorkspace) -> Result<i64, RemoteError>;

    fn list_projects(&self, workspace_id: i64) -> Result<Vec<Project>, RemoteError>;
    fn create_project(&self, workspace_id: i64, name: &str) -> Result<i64, RemoteError>;

    fn list_template_playlists(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<TemplatePlaylist>, RemoteError>;
    fn list_templates(&self, workspace_id: i64) -> Result<Vec<Template>, RemoteError>;
    fn create_template_playlist(
        &self,
        workspace_id: i64,
        name: &str,
        template_ids: &[i64],
    ) -> Result<i64, RemoteError>;

    fn list_asset_playlists(&self, workspace_id: i64) -> Result<Vec<AssetPlaylist>, RemoteError>;
    fn list_assets(&self, workspace_id: i64, size: usize) -> Result<Vec<Asset>, RemoteError>;
    fn create_asset_playlist(
        &self,
        workspace_id: i64,
        name: &str,
        asset_ids: &[i64],
    ) -> Result<i64, RemoteError>;

    fn list_datasources(&self, workspace_id: i64) -> Result<Vec<Datasource>, RemoteError>;
    fn list_available_datasources(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<AvailableDatasource>, RemoteError>;
    fn create_datasource(
        &self,
        workspace_id: i64,
        request: &NewDatasource,
    ) -> Result<i64, RemoteError>;
}
