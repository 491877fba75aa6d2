use super::engine::{FlowContext, FlowSpec, FlowState, Screen, Screens, Signal, Transition};
use super::schema::{
    build_metadata, title_case_key, DatasourceSchema, SchemaCatalog, CLOUDLIST_CHOICE,
};
use super::{select_or_add_bindings, FlowError, ListAction, Selection};
use crate::remote::{Datasource, NewDatasource, RemoteClient, CLOUDLIST};
use crate::shared::EventLog;
use crate::ui::{ChoicePrompt, ChoiceSelector, Form, ListItem, ListSelector, Theme};
use serde_json::Value;

/// Lists the workspace's datasources and adds new ones from the
/// advertised templates.
pub struct DatasourceFlow<'a> {
    remote: &'a dyn RemoteClient,
    log: &'a EventLog,
    workspace_id: i64,
    theme: Theme,
    catalog: SchemaCatalog,
    chosen: Option<DatasourceSchema>,
    warnings: Vec<String>,
}

impl<'a> DatasourceFlow<'a> {
    pub fn new(remote: &'a dyn RemoteClient, log: &'a EventLog, workspace_id: i64) -> Self {
        Self {
            remote,
            log,
            workspace_id,
            theme: Theme::datasource(),
            catalog: SchemaCatalog::default(),
            chosen: None,
            warnings: Vec::new(),
        }
    }

    /// Entries that were skipped while reading remote data.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn catalog(&self) -> &SchemaCatalog {
        &self.catalog
    }

    fn warn(&mut self, message: String) {
        self.log.warn("datasource.skipped", &message);
        self.warnings.push(message);
    }

    fn fetch(&mut self) -> Result<Vec<ListItem>, FlowError> {
        let datasources = self
            .remote
            .list_datasources(self.workspace_id)
            .map_err(FlowError::remote("list datasources"))?;
        let mut items = Vec::with_capacity(datasources.len());
        for datasource in datasources {
            match datasource_item(&datasource) {
                Ok(item) => items.push(item),
                Err(reason) => self.warn(format!(
                    "Could not parse datasource {} metadata: {reason}",
                    datasource.id
                )),
            }
        }
        Ok(items)
    }

    fn choice_selector(&self) -> ChoiceSelector {
        let root = ChoicePrompt::new(
            "Select a datasource type to create",
            self.catalog.root_choices(),
        );
        let mut selector = ChoiceSelector::new(root, self.theme);
        if !self.catalog.cloudlist.is_empty() {
            selector = selector.with_sub_prompt(
                CLOUDLIST_CHOICE,
                ChoicePrompt::new(
                    "Select a cloudlist provider",
                    self.catalog.provider_choices(),
                ),
            );
        }
        selector
    }
}

fn datasource_item(datasource: &Datasource) -> Result<ListItem, String> {
    let repo = datasource
        .metadata
        .get("repo")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if !datasource.kind.eq_ignore_ascii_case(CLOUDLIST) {
        return Ok(ListItem::new(
            datasource.id,
            repo,
            title_case_key(&datasource.kind, " "),
        ));
    }
    let config = datasource
        .metadata
        .get("config")
        .and_then(Value::as_str)
        .ok_or_else(|| "missing cloudlist config".to_string())?;
    let providers: Vec<Value> = serde_json::from_str(config).map_err(|e| e.to_string())?;
    let first = providers
        .first()
        .ok_or_else(|| "no providers found".to_string())?;
    Ok(ListItem::new(
        datasource.id,
        repo,
        format!(
            "{} {}",
            title_case_key(str_field(first, "provider"), " "),
            str_field(first, "id")
        )
        .trim()
        .to_string(),
    ))
}

fn str_field<'v>(value: &'v Value, key: &str) -> &'v str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

impl FlowSpec for DatasourceFlow<'_> {
    type Action = ListAction;
    type Output = Selection;

    fn build(&mut self, screens: &mut Screens<ListAction>) -> Result<FlowState, FlowError> {
        let items = self.fetch()?;
        let available = self
            .remote
            .list_available_datasources(self.workspace_id)
            .map_err(FlowError::remote("list available datasources"))?;
        self.catalog = SchemaCatalog::parse(&available);
        let schema_warnings: Vec<String> = self
            .catalog
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect();
        for warning in schema_warnings {
            self.warn(warning);
        }

        let start = if items.is_empty() {
            FlowState::Choose
        } else {
            FlowState::List
        };
        screens.insert(
            FlowState::List,
            Screen::List(ListSelector::new(
                "Datasources list",
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
        match state {
            FlowState::Choose => {
                self.chosen = None;
                ctx.screens
                    .insert(FlowState::Choose, Screen::Choice(self.choice_selector()));
            }
            FlowState::Add => {
                let fields = self
                    .chosen
                    .as_ref()
                    .map(|schema| schema.fields.clone())
                    .unwrap_or_default();
                let form = Form::new(fields, self.theme)
                    .with_prompt("Enter the details for the datasource");
                ctx.screens.insert(FlowState::Add, Screen::Form(form));
            }
            FlowState::List | FlowState::Detail => {}
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
            ) => Ok(Transition::Goto(FlowState::Choose)),
            (FlowState::Choose, Signal::Chosen(path)) => {
                match self.catalog.schema_for(&path) {
                    Some(schema) if schema.fields.is_empty() => {
                        ctx.screens.choice_mut(FlowState::Choose)?.reset();
                        ctx.set_status(format!("No editable fields for {}", path.join(" / ")));
                        Ok(Transition::Stay)
                    }
                    Some(schema) => {
                        self.chosen = Some(schema.clone());
                        Ok(Transition::Goto(FlowState::Add))
                    }
                    None => {
                        ctx.screens.choice_mut(FlowState::Choose)?.reset();
                        ctx.set_status(format!("No template for {}", path.join(" / ")));
                        Ok(Transition::Stay)
                    }
                }
            }
            (FlowState::Add, Signal::Submitted(values)) => {
                let Some(schema) = self.chosen.clone() else {
                    return Ok(Transition::Goto(FlowState::Choose));
                };
                let metadata = build_metadata(&schema, &values).map_err(FlowError::Metadata)?;
                let request = NewDatasource {
                    kind: schema.kind.clone(),
                    metadata,
                    sync: false,
                };
                let id = self
                    .remote
                    .create_datasource(self.workspace_id, &request)
                    .map_err(FlowError::remote("add datasource"))?;
                self.log.info(
                    "datasource.created",
                    &format!("Datasource added with ID: {id}"),
                );
                let items = self.fetch()?;
                ctx.screens.list_mut(FlowState::List)?.replace(items);
                ctx.set_status(format!(
                    "Added {} datasource",
                    title_case_key(&schema.kind, " ")
                ));
                Ok(Transition::Goto(FlowState::List))
            }
            _ => Ok(Transition::Stay),
        }
    }
}
