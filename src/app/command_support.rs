use crate::config::{CloudConfig, ConfigError, StatePaths};
use crate::remote::{CloudApiClient, InMemoryRemote, RemoteClient};
use crate::shared::EventLog;
use crate::ui::{parse_scripted_keys, FlowTerminal, ScriptedTerminal, TerminalSession};
use crossterm::event::KeyEvent;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

pub const SCRIPT_KEYS_ENV: &str = "SCANPREP_SCRIPT_KEYS";
/// `api-url` value that swaps the HTTP client for the seeded in-memory one.
pub const MEMORY_API_URL: &str = "memory://";

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

/// Options shared by the commands that load a [`CloudConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOptions {
    pub config_path: Option<PathBuf>,
    pub interactive: bool,
    pub non_interactive: bool,
    pub assignments: Vec<String>,
}

impl CommandOptions {
    pub fn parse(args: &[String]) -> Result<Self, String> {
        let mut options = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    let Some(path) = iter.next() else {
                        return Err("--config requires a path".to_string());
                    };
                    options.config_path = Some(PathBuf::from(path));
                }
                "--interactive" => options.interactive = true,
                "--non-interactive" => options.non_interactive = true,
                other if other.starts_with("--") => {
                    return Err(format!("unknown option `{other}`"));
                }
                _ => options.assignments.push(arg.clone()),
            }
        }
        Ok(options)
    }
}

pub fn state_paths() -> Result<StatePaths, String> {
    StatePaths::from_home().map_err(map_config_err)
}

pub fn event_log(paths: &StatePaths) -> EventLog {
    EventLog::to_file(paths.log_file())
}

/// File, then environment, then `key=value` assignments and mode flags.
/// Returns the config and the file it should be written back to.
pub fn load_config(
    options: &CommandOptions,
    paths: &StatePaths,
) -> Result<(CloudConfig, PathBuf), String> {
    let path = options
        .config_path
        .clone()
        .unwrap_or_else(|| paths.config_file());
    let mut config = CloudConfig::default();
    config.populate_from_file(&path).map_err(map_config_err)?;
    config.populate_from_env();
    config
        .populate_from_flags(&options.assignments)
        .map_err(map_config_err)?;
    if options.interactive {
        config.interactive = true;
    }
    if options.non_interactive {
        config.non_interactive = true;
    }
    Ok((config, path))
}

pub fn connect(config: &CloudConfig) -> Result<Box<dyn RemoteClient>, String> {
    if config.api_url.trim() == MEMORY_API_URL {
        return Ok(Box::new(InMemoryRemote::demo()));
    }
    let client = CloudApiClient::new(&config.api_url, &config.api_key).map_err(|e| e.to_string())?;
    Ok(Box::new(client))
}

fn load_scripted_keys() -> Result<Option<Vec<KeyEvent>>, String> {
    let Ok(raw) = std::env::var(SCRIPT_KEYS_ENV) else {
        return Ok(None);
    };
    parse_scripted_keys(&raw).map(Some)
}

/// A scripted key list counts as a terminal.
pub fn has_terminal() -> bool {
    std::env::var_os(SCRIPT_KEYS_ENV).is_some()
        || (io::stdin().is_terminal() && io::stdout().is_terminal())
}

/// Runs `body` against scripted keys when `SCANPREP_SCRIPT_KEYS` is set,
/// otherwise on the real terminal.
pub fn with_flow_terminal<T>(body: impl FnOnce(&mut dyn FlowTerminal) -> T) -> Result<T, String> {
    if let Some(keys) = load_scripted_keys()? {
        let mut terminal = ScriptedTerminal::new(keys);
        return Ok(body(&mut terminal));
    }
    TerminalSession::run(|session| body(session)).map_err(|e| e.to_string())
}
