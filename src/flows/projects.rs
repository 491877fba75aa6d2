use super::engine::{FlowContext, FlowSpec, FlowState, Screen, Screens, Signal, Transition};
use super::{select_or_add_bindings, FlowError, ListAction, Selection};
use crate::remote::RemoteClient;
use crate::shared::EventLog;
use crate::ui::{Form, FormField, ListItem, ListSelector, Theme};

/// Projects of one workspace.
pub struct ProjectFlow<'a> {
    remote: &'a dyn RemoteClient,
    log: &'a EventLog,
    workspace_id: i64,
    theme: Theme,
}

impl<'a> ProjectFlow<'a> {
    pub fn new(remote: &'a dyn RemoteClient, log: &'a EventLog, workspace_id: i64) -> Self {
        Self {
            remote,
            log,
            workspace_id,
            theme: Theme::project(),
        }
    }

    fn fetch(&self) -> Result<Vec<ListItem>, FlowError> {
        let projects = self
            .remote
            .list_projects(self.workspace_id)
            .map_err(FlowError::remote("list projects"))?;
        Ok(projects
            .into_iter()
            .filter(|project| !project.name.is_empty())
            .map(|project| ListItem::new(project.id, project.name, ""))
            .collect())
    }
}

impl FlowSpec for ProjectFlow<'_> {
    type Action = ListAction;
    type Output = Selection;

    fn build(&mut self, screens: &mut Screens<ListAction>) -> Result<FlowState, FlowError> {
        let items = self.fetch()?;
        let start = if items.is_empty() {
            FlowState::Add
        } else {
            FlowState::List
        };
        screens.insert(
            FlowState::List,
            Screen::List(ListSelector::new(
                "Select a project",
                items,
                select_or_add_bindings("choose"),
                self.theme,
            )),
        );
        Ok(start)
    }

    fn on_enter(
        &mut self,
        state: FlowState,
        ctx: &mut FlowContext<'_, ListAction>,
    ) -> Result<(), FlowError> {
        if state == FlowState::Add {
            let form = Form::new(
                vec![FormField::new("Project Name", "internal").with_key("name")],
                self.theme,
            )
            .with_prompt("Enter the details for the project");
            ctx.screens.insert(FlowState::Add, Screen::Form(form));
        }
        Ok(())
    }

    fn on_signal(
        &mut self,
        state: FlowState,
        signal: Signal<ListAction>,
        ctx: &mut FlowContext<'_, ListAction>,
    ) -> Result<Transition<Selection>, FlowError> {
        match (state, signal) {
            (
                FlowState::List,
                Signal::Action {
                    action: ListAction::Select,
                    selected: Some(item),
                },
            ) => Ok(Transition::Finish(Selection::new(item.title, item.id))),
            (
                FlowState::List,
                Signal::Action {
                    action: ListAction::Add,
                    ..
                },
            ) => Ok(Transition::Goto(FlowState::Add)),
            (FlowState::Add, Signal::Submitted(values)) => {
                let name = values.first().map(|v| v.trim()).unwrap_or_default();
                if name.is_empty() {
                    ctx.set_status("Project name is required");
                    return Ok(Transition::Stay);
                }
                let id = self
                    .remote
                    .create_project(self.workspace_id, name)
                    .map_err(FlowError::remote("create project"))?;
                self.log.info(
                    "project.created",
                    &format!("Adding new project {name} [{id}]"),
                );
                let items = self.fetch()?;
                ctx.screens.list_mut(FlowState::List)?.replace(items);
                ctx.set_status(format!("Added project {name}"));
                Ok(Transition::Goto(FlowState::List))
            }
            _ => Ok(Transition::Stay),
        }
    }
}
