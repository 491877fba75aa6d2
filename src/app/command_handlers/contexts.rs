use crate::app::command_support::{map_config_err, state_paths};
use crate::config::Contexts;

pub fn cmd_contexts(args: &[String]) -> Result<String, String> {
    let paths = state_paths()?;
    let contexts = Contexts::new(paths.contexts_dir());
    match args {
        [] => {
            let names = contexts.list().map_err(map_config_err)?;
            if names.is_empty() {
                return Ok("no contexts saved".to_string());
            }
            Ok(names.join("\n"))
        }
        [verb, workspace, project] if verb == "show" => {
            let config = contexts.get(workspace, project).map_err(map_config_err)?;
            Ok(config.summary())
        }
        _ => Err("usage: scanprep contexts [show <workspace> <project>]".to_string()),
    }
}
