use crate::app::command_support::{
    connect, event_log, has_terminal, load_config, map_config_err, state_paths,
    with_flow_terminal, CommandOptions,
};
use crate::bootstrap::{self, TerminalFlows};
use crate::config::{Contexts, ResolutionMode};

pub fn cmd_bootstrap(args: &[String]) -> Result<String, String> {
    let options = CommandOptions::parse(args)?;
    let paths = state_paths()?;
    let (mut config, config_path) = load_config(&options, &paths)?;
    let mut log = event_log(&paths);
    let mode = config
        .resolution_mode(has_terminal())
        .map_err(map_config_err)?;

    let resolved = match bootstrap::validate(&config) {
        Ok(()) => Ok(()),
        Err(err) if mode == ResolutionMode::NonInteractive => Err(err),
        Err(_) => {
            let remote = connect(&config)?;
            with_flow_terminal(|terminal| {
                let mut flows = TerminalFlows::new(remote.as_ref(), &log, terminal);
                bootstrap::resolve(&mut config, mode, &mut flows, &log)
            })?
        }
    };

    // The flow screen is gone by now.
    log.set_echo(true);
    if let Err(err) = resolved {
        log.error("bootstrap.failed", &err.to_string());
        return Err(err.to_string());
    }

    let context = Contexts::new(paths.contexts_dir())
        .create(&config)
        .map_err(map_config_err)?;
    config.write_to(&config_path).map_err(map_config_err)?;
    log.info(
        "bootstrap.completed",
        &format!("Saved context {}", context.display()),
    );

    Ok(format!(
        "bootstrap complete\nconfig={}\ncontext={}\n{}",
        config_path.display(),
        context.display(),
        config.summary()
    ))
}
