//! Fills the workspace, project and playlist fields of a [`CloudConfig`]
//! in order, prompting for the ones that are missing.

pub mod error;

pub use error::{BootstrapError, ConfigField};

use crate::config::{CloudConfig, ResolutionMode};
use crate::flows::{
    FlowController, FlowError, FlowOutcome, PlaylistFlow, PlaylistKind, ProjectFlow, Selection,
    WorkspaceFlow,
};
use crate::remote::RemoteClient;
use crate::shared::EventLog;
use crate::ui::FlowTerminal;

/// Starts the interactive flow for one field and blocks until it ends.
pub trait FlowLauncher {
    fn workspace(&mut self) -> Result<FlowOutcome<Selection>, FlowError>;
    fn project(&mut self, workspace_id: i64) -> Result<FlowOutcome<Selection>, FlowError>;
    fn playlists(
        &mut self,
        kind: PlaylistKind,
        workspace_id: i64,
    ) -> Result<FlowOutcome<Vec<Selection>>, FlowError>;
}

/// Runs each flow against a remote client on one terminal.
pub struct TerminalFlows<'a> {
    remote: &'a dyn RemoteClient,
    log: &'a EventLog,
    terminal: &'a mut dyn FlowTerminal,
}

impl<'a> TerminalFlows<'a> {
    pub fn new(
        remote: &'a dyn RemoteClient,
        log: &'a EventLog,
        terminal: &'a mut dyn FlowTerminal,
    ) -> Self {
        Self {
            remote,
            log,
            terminal,
        }
    }
}

impl FlowLauncher for TerminalFlows<'_> {
    fn workspace(&mut self) -> Result<FlowOutcome<Selection>, FlowError> {
        FlowController::new(WorkspaceFlow::new(self.remote, self.log))?.run(self.terminal)
    }

    fn project(&mut self, workspace_id: i64) -> Result<FlowOutcome<Selection>, FlowError> {
        FlowController::new(ProjectFlow::new(self.remote, self.log, workspace_id))?
            .run(self.terminal)
    }

    fn playlists(
        &mut self,
        kind: PlaylistKind,
        workspace_id: i64,
    ) -> Result<FlowOutcome<Vec<Selection>>, FlowError> {
        FlowController::new(PlaylistFlow::new(kind, self.remote, self.log, workspace_id))?
            .run(self.terminal)
    }
}

fn is_set(config: &CloudConfig, field: ConfigField) -> bool {
    match field {
        ConfigField::Workspace => !config.workspace.trim().is_empty(),
        ConfigField::Project => !config.project.trim().is_empty(),
        ConfigField::TemplatePlaylist => !config.template_playlists.is_empty(),
        ConfigField::AssetPlaylist => !config.asset_playlists.is_empty(),
    }
}

fn describe(config: &CloudConfig, field: ConfigField) -> String {
    let ids = &config.internal_ids;
    match field {
        ConfigField::Workspace => format!("{} [{}]", config.workspace, ids.workspace_id),
        ConfigField::Project => format!("{} [{}]", config.project, ids.project_id),
        ConfigField::TemplatePlaylist => format!(
            "{:?} {:?}",
            config.template_playlists, ids.template_playlist_ids
        ),
        ConfigField::AssetPlaylist => {
            format!("{:?} {:?}", config.asset_playlists, ids.asset_playlist_ids)
        }
    }
}

/// Checks every field in order without prompting.
pub fn validate(config: &CloudConfig) -> Result<(), BootstrapError> {
    match ConfigField::ORDER
        .into_iter()
        .find(|field| !is_set(config, *field))
    {
        Some(field) => Err(BootstrapError::MissingField { field }),
        None => Ok(()),
    }
}

/// Resolves every field in order. Stops at the first error or
/// cancellation; fields resolved before that stay written.
pub fn resolve(
    config: &mut CloudConfig,
    mode: ResolutionMode,
    launcher: &mut dyn FlowLauncher,
    log: &EventLog,
) -> Result<(), BootstrapError> {
    for field in ConfigField::ORDER {
        resolve_field(config, field, mode, launcher, log)?;
    }
    Ok(())
}

pub fn resolve_field(
    config: &mut CloudConfig,
    field: ConfigField,
    mode: ResolutionMode,
    launcher: &mut dyn FlowLauncher,
    log: &EventLog,
) -> Result<(), BootstrapError> {
    if mode == ResolutionMode::NonInteractive {
        if !is_set(config, field) {
            return Err(BootstrapError::MissingField { field });
        }
        return Ok(());
    }

    if !is_set(config, field) {
        log.info(
            "field.loading",
            &format!("No {field} specified, loading {field}s..."),
        );
        run_flow(config, field, launcher, log)?;
        if !is_set(config, field) {
            return Err(BootstrapError::MissingField { field });
        }
    }
    log.info(
        "field.resolved",
        &format!("Using {field}: {}", describe(config, field)),
    );
    Ok(())
}

fn run_flow(
    config: &mut CloudConfig,
    field: ConfigField,
    launcher: &mut dyn FlowLauncher,
    log: &EventLog,
) -> Result<(), BootstrapError> {
    let flow_err = |source| BootstrapError::Flow { field, source };
    let cancelled = || {
        log.warn("field.cancelled", &format!("{field} selection was cancelled"));
        BootstrapError::Cancelled { field }
    };

    if field != ConfigField::Workspace && config.internal_ids.workspace_id == 0 {
        return Err(BootstrapError::MissingDependency {
            field,
            dependency: ConfigField::Workspace,
        });
    }
    let workspace_id = config.internal_ids.workspace_id;

    match field {
        ConfigField::Workspace => match launcher.workspace().map_err(flow_err)? {
            FlowOutcome::Completed(selection) => {
                config.set_workspace(&selection.name, selection.id)
            }
            FlowOutcome::Cancelled => return Err(cancelled()),
        },
        ConfigField::Project => match launcher.project(workspace_id).map_err(flow_err)? {
            FlowOutcome::Completed(selection) => config.set_project(&selection.name, selection.id),
            FlowOutcome::Cancelled => return Err(cancelled()),
        },
        ConfigField::TemplatePlaylist | ConfigField::AssetPlaylist => {
            let kind = if field == ConfigField::TemplatePlaylist {
                PlaylistKind::Templates
            } else {
                PlaylistKind::Assets
            };
            let selections = match launcher.playlists(kind, workspace_id).map_err(flow_err)? {
                FlowOutcome::Completed(selections) => selections,
                FlowOutcome::Cancelled => return Err(cancelled()),
            };
            for selection in selections {
                match kind {
                    PlaylistKind::Templates => {
                        config.push_template_playlist(&selection.name, selection.id)
                    }
                    PlaylistKind::Assets => {
                        config.push_asset_playlist(&selection.name, selection.id)
                    }
                }
            }
        }
    }
    Ok(())
}
