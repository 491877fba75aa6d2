#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Bootstrap,
    Datasources,
    Contexts,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "bootstrap" => CliVerb::Bootstrap,
        "datasources" => CliVerb::Datasources,
        "contexts" => CliVerb::Contexts,
        "help" | "-h" | "--help" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  bootstrap [options] [key=value ...]  Resolve workspace, project and playlists"
            .to_string(),
        "  datasources [options] [key=value ...] Pick or create a datasource".to_string(),
        "  contexts                             List saved contexts".to_string(),
        "  contexts show <workspace> <project>  Print one saved context".to_string(),
        "  help                                 Show this help".to_string(),
    ]
}

pub fn option_help_lines() -> Vec<String> {
    vec![
        "Options:".to_string(),
        "  --config <path>                      Config file (default ~/.scanprep/config.json)"
            .to_string(),
        "  --interactive                        Prompt even without a terminal".to_string(),
        "  --non-interactive                    Never prompt; fail on missing fields".to_string(),
        String::new(),
        "Keys: api-key, api-url, workspace, project, template-playlists, asset-playlists,"
            .to_string(),
        "      workspace-id, project-id, template-playlist-ids, asset-playlist-ids".to_string(),
        "Environment: SCANPREP_API_KEY, SCANPREP_API_URL, SCANPREP_SCRIPT_KEYS".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    let mut lines = cli_help_lines();
    lines.push(String::new());
    lines.extend(option_help_lines());
    lines.join("\n")
}
