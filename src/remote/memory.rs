use super::types::{
    Asset, AssetPlaylist, AvailableDatasource, Datasource, NewDatasource, NewWorkspace, Project,
    Template, TemplatePlaylist, Workspace, CLOUDLIST,
};
use super::{RemoteClient, RemoteError};
use serde_json::json;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    workspaces: Vec<Workspace>,
    projects: BTreeMap<i64, Vec<Project>>,
    template_playlists: BTreeMap<i64, Vec<TemplatePlaylist>>,
    templates: BTreeMap<i64, Vec<Template>>,
    asset_playlists: BTreeMap<i64, Vec<AssetPlaylist>>,
    assets: BTreeMap<i64, Vec<Asset>>,
    datasources: BTreeMap<i64, Vec<Datasource>>,
    available: Vec<AvailableDatasource>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process remote that records every call by name.
#[derive(Debug)]
pub struct InMemoryRemote {
    state: RefCell<MemoryState>,
    calls: RefCell<Vec<String>>,
    failing: RefCell<HashSet<String>>,
}

impl Default for InMemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(MemoryState {
                next_id: 1000,
                ..MemoryState::default()
            }),
            calls: RefCell::new(Vec::new()),
            failing: RefCell::new(HashSet::new()),
        }
    }

    /// A small organization used by `memory://` runs.
    pub fn demo() -> Self {
        let remote = Self::new()
            .with_workspace(1, "acme")
            .with_project(1, 11, "internal")
            .with_template(1, 101, "cves", "Known CVEs", "high")
            .with_template(1, 102, "exposures", "Exposed panels", "medium")
            .with_template_playlist(1, 21, "default", 2)
            .with_asset(1, 201, "app.acme.test", "cloudlist")
            .with_asset(1, 202, "api.acme.test", "cloudlist")
            .with_asset_playlist(1, 31, "production", 2)
            .with_available_datasource(
                "github",
                json!({"id": "", "token": "ghp_xxx", "org-name": "acme"}),
            );
        let providers = json!([
            {"provider": "aws", "id": "", "aws_access_key": "AKIA...", "aws_secret_key": "secret"},
            {"provider": "do", "id": "", "digitalocean_token": "dop_v1"},
        ]);
        remote.with_available_datasource(
            CLOUDLIST,
            json!({"config": providers.to_string(), "repo": "cloudlist"}),
        )
    }

    pub fn with_workspace(self, id: i64, name: &str) -> Self {
        self.state.borrow_mut().workspaces.push(Workspace {
            id,
            workspace_name: name.to_string(),
        });
        self
    }

    pub fn with_project(self, workspace_id: i64, id: i64, name: &str) -> Self {
        self.state
            .borrow_mut()
            .projects
            .entry(workspace_id)
            .or_default()
            .push(Project {
                id,
                name: name.to_string(),
            });
        self
    }

    pub fn with_template_playlist(
        self,
        workspace_id: i64,
        id: i64,
        name: &str,
        count: i64,
    ) -> Self {
        self.state
            .borrow_mut()
            .template_playlists
            .entry(workspace_id)
            .or_default()
            .push(TemplatePlaylist {
                id,
                name: name.to_string(),
                tags: String::new(),
                count,
            });
        self
    }

    pub fn with_template(
        self,
        workspace_id: i64,
        id: i64,
        name: &str,
        title: &str,
        severity: &str,
    ) -> Self {
        self.state
            .borrow_mut()
            .templates
            .entry(workspace_id)
            .or_default()
            .push(Template {
                id,
                name: name.to_string(),
                title: title.to_string(),
                protocol: "http".to_string(),
                severity: severity.to_string(),
                tags: String::new(),
            });
        self
    }

    pub fn with_asset_playlist(self, workspace_id: i64, id: i64, name: &str, count: i64) -> Self {
        self.state
            .borrow_mut()
            .asset_playlists
            .entry(workspace_id)
            .or_default()
            .push(AssetPlaylist {
                id,
                name: name.to_string(),
                tags: None,
                asset_count: Some(count),
            });
        self
    }

    pub fn with_asset(self, workspace_id: i64, id: i64, name: &str, datasource: &str) -> Self {
        self.state
            .borrow_mut()
            .assets
            .entry(workspace_id)
            .or_default()
            .push(Asset {
                asset_id: id,
                asset_name: name.to_string(),
                data_source_name: datasource.to_string(),
            });
        self
    }

    pub fn with_datasource(self, workspace_id: i64, datasource: Datasource) -> Self {
        self.state
            .borrow_mut()
            .datasources
            .entry(workspace_id)
            .or_default()
            .push(datasource);
        self
    }

    pub fn with_available_datasource(self, kind: &str, template: serde_json::Value) -> Self {
        self.state.borrow_mut().available.push(AvailableDatasource {
            kind: kind.to_string(),
            template,
        });
        self
    }

    /// Makes every later call named `call` fail.
    pub fn fail_on(&self, call: &str) {
        self.failing.borrow_mut().insert(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == call).count()
    }

    pub fn template_playlists(&self, workspace_id: i64) -> Vec<TemplatePlaylist> {
        self.state
            .borrow()
            .template_playlists
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn asset_playlists(&self, workspace_id: i64) -> Vec<AssetPlaylist> {
        self.state
            .borrow()
            .asset_playlists
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn datasources(&self, workspace_id: i64) -> Vec<Datasource> {
        self.state
            .borrow()
            .datasources
            .get(&workspace_id)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: &str) -> Result<(), RemoteError> {
        self.calls.borrow_mut().push(call.to_string());
        if self.failing.borrow().contains(call) {
            return Err(RemoteError::Rejected {
                call: call.to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }

    fn scoped<T: Clone>(
        &self,
        call: &str,
        pick: impl FnOnce(&MemoryState) -> Option<&Vec<T>>,
    ) -> Result<Vec<T>, RemoteError> {
        self.record(call)?;
        let state = self.state.borrow();
        Ok(pick(&state).cloned().unwrap_or_default())
    }
}

impl RemoteClient for InMemoryRemote {
    fn list_workspaces(&self) -> Result<Vec<Workspace>, RemoteError> {
        self.record("list_workspaces")?;
        Ok(self.state.borrow().workspaces.clone())
    }

    fn create_workspace(&self, request: &NewWorkspace) -> Result<i64, RemoteError> {
        self.record("create_workspace")?;
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state.workspaces.push(Workspace {
            id,
            workspace_name: request.workspace_name.clone(),
        });
        Ok(id)
    }

    fn list_projects(&self, workspace_id: i64) -> Result<Vec<Project>, RemoteError> {
        self.scoped("list_projects", |state| state.projects.get(&workspace_id))
    }

    fn create_project(&self, workspace_id: i64, name: &str) -> Result<i64, RemoteError> {
        self.record("create_project")?;
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state
            .projects
            .entry(workspace_id)
            .or_default()
            .push(Project {
                id,
                name: name.to_string(),
            });
        Ok(id)
    }

    fn list_template_playlists(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<TemplatePlaylist>, RemoteError> {
        self.scoped("list_template_playlists", |state| {
            state.template_playlists.get(&workspace_id)
        })
    }

    fn list_templates(&self, workspace_id: i64) -> Result<Vec<Template>, RemoteError> {
        self.scoped("list_templates", |state| state.templates.get(&workspace_id))
    }

    fn create_template_playlist(
        &self,
        workspace_id: i64,
        name: &str,
        template_ids: &[i64],
    ) -> Result<i64, RemoteError> {
        self.record("create_template_playlist")?;
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state
            .template_playlists
            .entry(workspace_id)
            .or_default()
            .push(TemplatePlaylist {
                id,
                name: name.to_string(),
                tags: String::new(),
                count: template_ids.len() as i64,
            });
        Ok(id)
    }

    fn list_asset_playlists(&self, workspace_id: i64) -> Result<Vec<AssetPlaylist>, RemoteError> {
        self.scoped("list_asset_playlists", |state| {
            state.asset_playlists.get(&workspace_id)
        })
    }

    fn list_assets(&self, workspace_id: i64, size: usize) -> Result<Vec<Asset>, RemoteError> {
        let mut assets = self.scoped("list_assets", |state| state.assets.get(&workspace_id))?;
        assets.truncate(size);
        Ok(assets)
    }

    fn create_asset_playlist(
        &self,
        workspace_id: i64,
        name: &str,
        asset_ids: &[i64],
    ) -> Result<i64, RemoteError> {
        self.record("create_asset_playlist")?;
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state
            .asset_playlists
            .entry(workspace_id)
            .or_default()
            .push(AssetPlaylist {
                id,
                name: name.to_string(),
                tags: None,
                asset_count: Some(asset_ids.len() as i64),
            });
        Ok(id)
    }

    fn list_datasources(&self, workspace_id: i64) -> Result<Vec<Datasource>, RemoteError> {
        self.scoped("list_datasources", |state| state.datasources.get(&workspace_id))
    }

    fn list_available_datasources(
        &self,
        _workspace_id: i64,
    ) -> Result<Vec<AvailableDatasource>, RemoteError> {
        self.record("list_available_datasources")?;
        Ok(self.state.borrow().available.clone())
    }

    fn create_datasource(
        &self,
        workspace_id: i64,
        request: &NewDatasource,
    ) -> Result<i64, RemoteError> {
        self.record("create_datasource")?;
        let metadata = serde_json::from_str(&request.metadata).map_err(|e| {
            RemoteError::Rejected {
                call: "create_datasource".to_string(),
                message: format!("metadata is not valid json: {e}"),
            }
        })?;
        let mut state = self.state.borrow_mut();
        let id = state.allocate_id();
        state
            .datasources
            .entry(workspace_id)
            .or_default()
            .push(Datasource {
                id,
                kind: request.kind.clone(),
                metadata,
            });
        Ok(id)
    }
}
