use super::engine::{FlowContext, FlowSpec, FlowState, Screen, Screens, Signal, Transition};
use super::{FlowError, Selection};
use crate::remote::{RemoteClient, ASSET_PAGE_SIZE};
use crate::shared::EventLog;
use crate::ui::list_selector::ids_of;
use crate::ui::{Form, FormField, KeyBinding, ListItem, ListSelector, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistKind {
    Templates,
    Assets,
}

impl PlaylistKind {
    pub fn label(self) -> &'static str {
        match self {
            PlaylistKind::Templates => "template playlist",
            PlaylistKind::Assets => "asset playlist",
        }
    }

    fn members(self) -> &'static str {
        match self {
            PlaylistKind::Templates => "templates",
            PlaylistKind::Assets => "assets",
        }
    }

    fn theme(self) -> Theme {
        match self {
            PlaylistKind::Templates => Theme::template_playlist(),
            PlaylistKind::Assets => Theme::asset_playlist(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistAction {
    Pick,
    Done,
    Add,
    Take,
    Commit,
}

/// Picks one or more playlists, building new ones from templates or
/// assets on the way.
pub struct PlaylistFlow<'a> {
    kind: PlaylistKind,
    remote: &'a dyn RemoteClient,
    log: &'a EventLog,
    workspace_id: i64,
    theme: Theme,
    picked: Vec<Selection>,
    pending_name: String,
    accumulated: Vec<ListItem>,
}

impl<'a> PlaylistFlow<'a> {
    pub fn new(
        kind: PlaylistKind,
        remote: &'a dyn RemoteClient,
        log: &'a EventLog,
        workspace_id: i64,
    ) -> Self {
        Self {
            kind,
            remote,
            log,
            workspace_id,
            theme: kind.theme(),
            picked: Vec::new(),
            pending_name: String::new(),
            accumulated: Vec::new(),
        }
    }

    pub fn kind(&self) -> PlaylistKind {
        self.kind
    }

    /// Entries moved into the playlist being built.
    pub fn accumulated(&self) -> &[ListItem] {
        &self.accumulated
    }

    pub fn picked(&self) -> &[Selection] {
        &self.picked
    }

    fn fetch_playlists(&self) -> Result<Vec<ListItem>, FlowError> {
        let items: Vec<ListItem> = match self.kind {
            PlaylistKind::Templates => self
                .remote
                .list_template_playlists(self.workspace_id)
                .map_err(FlowError::remote("list template playlists"))?
                .into_iter()
                .map(|playlist| {
                    ListItem::new(playlist.id, playlist.name.clone(), playlist.description())
                })
                .collect(),
            PlaylistKind::Assets => self
                .remote
                .list_asset_playlists(self.workspace_id)
                .map_err(FlowError::remote("list asset playlists"))?
                .into_iter()
                .map(|playlist| {
                    ListItem::new(playlist.id, playlist.name.clone(), playlist.description())
                })
                .collect(),
        };
        Ok(items
            .into_iter()
            .filter(|item| !self.picked.iter().any(|picked| picked.id == item.id))
            .collect())
    }

    fn fetch_candidates(&self) -> Result<Vec<ListItem>, FlowError> {
        Ok(match self.kind {
            PlaylistKind::Templates => self
                .remote
                .list_templates(self.workspace_id)
                .map_err(FlowError::remote("list templates"))?
                .into_iter()
                .map(|template| {
                    ListItem::new(template.id, template.name.clone(), template.description())
                })
                .collect(),
            PlaylistKind::Assets => self
                .remote
                .list_assets(self.workspace_id, ASSET_PAGE_SIZE)
                .map_err(FlowError::remote("list assets"))?
                .into_iter()
                .map(|asset| {
                    ListItem::new(asset.asset_id, asset.asset_name, asset.data_source_name)
                })
                .collect(),
        })
    }

    fn create_playlist(&self, ids: &[i64]) -> Result<i64, FlowError> {
        match self.kind {
            PlaylistKind::Templates => self
                .remote
                .create_template_playlist(self.workspace_id, &self.pending_name, ids)
                .map_err(FlowError::remote("create template playlist")),
            PlaylistKind::Assets => self
                .remote
                .create_asset_playlist(self.workspace_id, &self.pending_name, ids)
                .map_err(FlowError::remote("create asset playlist")),
        }
    }

    fn on_list(
        &mut self,
        action: PlaylistAction,
        selected: Option<ListItem>,
        ctx: &mut FlowContext<'_, PlaylistAction>,
    ) -> Result<Transition<Vec<Selection>>, FlowError> {
        match action {
            PlaylistAction::Add => Ok(Transition::Goto(FlowState::Add)),
            PlaylistAction::Done if self.picked.is_empty() => {
                ctx.set_status(format!("Select at least one {}", self.kind.label()));
                Ok(Transition::Stay)
            }
            PlaylistAction::Done => Ok(Transition::Finish(self.picked.clone())),
            PlaylistAction::Pick => {
                let Some(item) = selected else {
                    return Ok(Transition::Stay);
                };
                let list = ctx.screens.list_mut(FlowState::List)?;
                list.remove_selected();
                let remaining = list.len();
                self.picked.push(Selection::new(item.title.clone(), item.id));
                if remaining == 0 {
                    return Ok(Transition::Finish(self.picked.clone()));
                }
                ctx.set_status(format!("Selected {}", item.title));
                Ok(Transition::Stay)
            }
            PlaylistAction::Take | PlaylistAction::Commit => Ok(Transition::Stay),
        }
    }

    fn on_detail(
        &mut self,
        action: PlaylistAction,
        selected: Option<ListItem>,
        ctx: &mut FlowContext<'_, PlaylistAction>,
    ) -> Result<Transition<Vec<Selection>>, FlowError> {
        match action {
            PlaylistAction::Take => {
                let Some(item) = selected else {
                    return Ok(Transition::Stay);
                };
                ctx.screens.list_mut(FlowState::Detail)?.remove_selected();
                ctx.set_status(format!("Selected {}", item.title));
                self.accumulated.push(item);
                Ok(Transition::Stay)
            }
            PlaylistAction::Commit if self.accumulated.is_empty() => {
                ctx.set_status(format!("Select at least one of the {}", self.kind.members()));
                Ok(Transition::Stay)
            }
            PlaylistAction::Commit => {
                let ids = ids_of(&self.accumulated);
                let id = self.create_playlist(&ids)?;
                self.log.info(
                    "playlist.created",
                    &format!(
                        "Added {} {} with {} {} [{id}]",
                        self.kind.label(),
                        self.pending_name,
                        ids.len(),
                        self.kind.members()
                    ),
                );
                let items = self.fetch_playlists()?;
                ctx.screens.list_mut(FlowState::List)?.replace(items);
                ctx.set_status(format!("Added {}", self.pending_name));
                self.accumulated.clear();
                self.pending_name.clear();
                Ok(Transition::Goto(FlowState::List))
            }
            _ => Ok(Transition::Stay),
        }
    }
}

impl FlowSpec for PlaylistFlow<'_> {
    type Action = PlaylistAction;
    type Output = Vec<Selection>;

    fn build(&mut self, screens: &mut Screens<PlaylistAction>) -> Result<FlowState, FlowError> {
        let items = self.fetch_playlists()?;
        let start = if items.is_empty() {
            FlowState::Add
        } else {
            FlowState::List
        };
        screens.insert(
            FlowState::List,
            Screen::List(ListSelector::new(
                format!("Select {}s", self.kind.label()),
                items,
                vec![
                    (KeyBinding::new(&["enter"], "enter", "choose"), PlaylistAction::Pick),
                    (KeyBinding::new(&["d"], "d", "done"), PlaylistAction::Done),
                    (KeyBinding::new(&["a"], "a", "add new"), PlaylistAction::Add),
                ],
                self.theme,
            )),
        );
        screens.insert(
            FlowState::Detail,
            Screen::List(ListSelector::new(
                format!("{} to add to playlist", self.kind.members()),
                Vec::new(),
                vec![
                    (KeyBinding::new(&["enter"], "enter", "select"), PlaylistAction::Take),
                    (KeyBinding::new(&["c"], "c", "create"), PlaylistAction::Commit),
                ],
                self.theme,
            )),
        );
        Ok(start)
    }

    fn on_enter(
        &mut self,
        state: FlowState,
        ctx: &mut FlowContext<'_, PlaylistAction>,
    ) -> Result<(), FlowError> {
        match state {
            FlowState::Add => {
                let label = format!("{} Name", capitalize(self.kind.label()));
                let form = Form::new(
                    vec![FormField::new(label, "my-new-playlist")
                        .with_limits(30, 30)
                        .with_key("name")],
                    self.theme,
                )
                .with_prompt("Enter the details for the playlist");
                ctx.screens.insert(FlowState::Add, Screen::Form(form));
            }
            FlowState::Detail => {
                let candidates = self.fetch_candidates()?;
                self.accumulated.clear();
                let detail = ctx.screens.list_mut(FlowState::Detail)?;
                detail.set_title(format!(
                    "{} to add to {}",
                    capitalize(self.kind.members()),
                    self.pending_name
                ));
                detail.replace(candidates);
            }
            FlowState::List | FlowState::Choose => {}
        }
        Ok(())
    }

    fn on_signal(
        &mut self,
        state: FlowState,
        signal: Signal<PlaylistAction>,
        ctx: &mut FlowContext<'_, PlaylistAction>,
    ) -> Result<Transition<Vec<Selection>>, FlowError> {
        match (state, signal) {
            (FlowState::List, Signal::Action { action, selected }) => {
                self.on_list(action, selected, ctx)
            }
            (FlowState::Detail, Signal::Action { action, selected }) => {
                self.on_detail(action, selected, ctx)
            }
            (FlowState::Add, Signal::Submitted(values)) => {
                let name = values.first().map(|v| v.trim()).unwrap_or_default();
                if name.is_empty() {
                    ctx.set_status("Playlist name is required");
                    return Ok(Transition::Stay);
                }
                self.pending_name = name.to_string();
                Ok(Transition::Goto(FlowState::Detail))
            }
            _ => Ok(Transition::Stay),
        }
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
