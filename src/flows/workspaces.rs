use super::engine::{FlowContext, FlowSpec, FlowState, Screen, Screens, Signal, Transition};
use super::{select_or_add_bindings, FlowError, ListAction, Selection};
use crate::remote::{NewWorkspace, RemoteClient};
use crate::shared::EventLog;
use crate::ui::{Form, FormField, ListItem, ListSelector, Theme};

pub struct WorkspaceFlow<'a> {
    remote: &'a dyn RemoteClient,
    log: &'a EventLog,
    theme: Theme,
}

impl<'a> WorkspaceFlow<'a> {
    pub fn new(remote: &'a dyn RemoteClient, log: &'a EventLog) -> Self {
        Self {
            remote,
            log,
            theme: Theme::workspace(),
        }
    }

    fn fetch(&self) -> Result<Vec<ListItem>, FlowError> {
        let workspaces = self
            .remote
            .list_workspaces()
            .map_err(FlowError::remote("list workspaces"))?;
        Ok(workspaces
            .into_iter()
            .filter(|workspace| !workspace.workspace_name.is_empty())
            .map(|workspace| ListItem::new(workspace.id, workspace.workspace_name, ""))
            .collect())
    }

    fn add_form(&self) -> Form {
        Form::new(
            vec![
                FormField::new("Workspace Name", "new-glorious-workspace").with_key("name"),
                FormField::new("Team Size", "1-10").with_key("team-size"),
                FormField::new("Org URL", "www.example.com").with_key("url"),
            ],
            self.theme,
        )
        .with_prompt("Enter the details for the workspace")
    }
}

impl FlowSpec for WorkspaceFlow<'_> {
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
                "Select a workspace",
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
            ctx.screens
                .insert(FlowState::Add, Screen::Form(self.add_form()));
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
                let field = |idx: usize| values.get(idx).map(|v| v.trim()).unwrap_or_default();
                let name = field(0);
                if name.is_empty() {
                    ctx.set_status("Workspace name is required");
                    return Ok(Transition::Stay);
                }
                let request = NewWorkspace::new(name, field(1), field(2));
                let id = self
                    .remote
                    .create_workspace(&request)
                    .map_err(FlowError::remote("create workspace"))?;
                self.log.info(
                    "workspace.created",
                    &format!(
                        "Adding new workspace {name} with {} team members {} url [{id}]",
                        field(1),
                        field(2)
                    ),
                );
                let items = self.fetch()?;
                ctx.screens.list_mut(FlowState::List)?.replace(items);
                ctx.set_status(format!("Added workspace {name}"));
                Ok(Transition::Goto(FlowState::List))
            }
            _ => Ok(Transition::Stay),
        }
    }
}
