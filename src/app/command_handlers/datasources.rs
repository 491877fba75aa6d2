use crate::app::command_support::{
    connect, event_log, load_config, state_paths, with_flow_terminal, CommandOptions,
};
use crate::flows::{DatasourceFlow, FlowController, FlowError, FlowOutcome};

pub fn cmd_datasources(args: &[String]) -> Result<String, String> {
    let options = CommandOptions::parse(args)?;
    let paths = state_paths()?;
    let (config, _) = load_config(&options, &paths)?;
    let workspace_id = config.internal_ids.workspace_id;
    if workspace_id == 0 {
        return Err("workspace-id is required; run `scanprep bootstrap` first".to_string());
    }

    let mut log = event_log(&paths);
    let remote = connect(&config)?;
    let outcome = with_flow_terminal(|terminal| -> Result<_, FlowError> {
        FlowController::new(DatasourceFlow::new(remote.as_ref(), &log, workspace_id))?
            .run(terminal)
    })?;

    log.set_echo(true);
    match outcome.map_err(|e| e.to_string())? {
        FlowOutcome::Completed(selection) => Ok(format!(
            "datasource={}\ndatasource_id={}",
            selection.name, selection.id
        )),
        FlowOutcome::Cancelled => {
            log.warn("datasource.cancelled", "datasource selection was cancelled");
            Err("datasource selection was cancelled".to_string())
        }
    }
}
