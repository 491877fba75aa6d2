use crate::app::cli::{help_text, parse_cli_verb, CliVerb};

pub mod bootstrap;
pub mod contexts;
pub mod datasources;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Bootstrap => bootstrap::cmd_bootstrap(&args[1..]),
        CliVerb::Datasources => datasources::cmd_datasources(&args[1..]),
        CliVerb::Contexts => contexts::cmd_contexts(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}
