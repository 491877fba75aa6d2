use scanprep::app::command_handlers::run_cli;
use scanprep::config::CloudConfig;
use std::path::Path;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

const ENV_VARS: [&str; 4] = [
    "HOME",
    "SCANPREP_API_KEY",
    "SCANPREP_API_URL",
    "SCANPREP_SCRIPT_KEYS",
];

fn with_home<T>(body: impl FnOnce(&Path) -> T) -> T {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let dir = tempfile::tempdir().expect("tempdir");
    let previous: Vec<_> = ENV_VARS.iter().map(|key| std::env::var_os(key)).collect();
    for key in ENV_VARS {
        std::env::remove_var(key);
    }
    std::env::set_var("HOME", dir.path());

    let result = body(dir.path());

    for (key, value) in ENV_VARS.iter().zip(previous) {
        match value {
            Some(value) => std::env::set_var(key, value),
            None => std::env::remove_var(key),
        }
    }
    result
}

fn args(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|arg| arg.to_string()).collect()
}

#[test]
fn no_arguments_prints_help_and_unknown_verbs_fail() {
    let help = run_cli(Vec::new()).expect("help");
    assert!(help.contains("bootstrap"));
    assert_eq!(run_cli(args(&["help"])).expect("help"), help);
    assert_eq!(
        run_cli(args(&["launch"])),
        Err("unknown command `launch`".to_string())
    );
}

#[test]
fn non_interactive_bootstrap_saves_config_and_context() {
    with_home(|home| {
        let output = run_cli(args(&[
            "bootstrap",
            "--non-interactive",
            "workspace=acme",
            "project=internal",
            "template-playlists=default",
            "asset-playlists=production",
            "workspace-id=1",
        ]))
        .expect("bootstrap");
        assert!(output.contains("workspace=acme"));
        assert!(output.contains("workspace_id=1"));

        let saved =
            CloudConfig::from_path(&home.join(".scanprep/config.json")).expect("saved config");
        assert_eq!(saved.project, "internal");
        assert!(saved.non_interactive);
        assert!(home.join(".scanprep/contexts/acme-internal").exists());

        assert_eq!(run_cli(args(&["contexts"])).expect("list"), "acme-internal");
        let shown = run_cli(args(&["contexts", "show", "acme", "internal"])).expect("show");
        assert!(shown.contains("asset_playlists=production"));
    });
}

#[test]
fn non_interactive_bootstrap_reports_the_missing_field() {
    with_home(|home| {
        let err = run_cli(args(&["bootstrap", "--non-interactive", "workspace=acme"]))
            .expect_err("project missing");
        assert_eq!(err, "project is required");
        assert!(!home.join(".scanprep/config.json").exists());
        assert!(home.join(".scanprep/logs/bootstrap.log").exists());
    });
}

#[test]
fn unsafe_workspace_names_save_nothing() {
    with_home(|home| {
        let err = run_cli(args(&[
            "bootstrap",
            "--non-interactive",
            "workspace=../../escaped",
            "project=x",
            "template-playlists=default",
            "asset-playlists=production",
        ]))
        .expect_err("unsafe name");
        assert!(err.contains("invalid context workspace"));
        assert!(!home.join(".scanprep/config.json").exists());
        assert!(!home.join("escaped-x").exists());
    });
}

#[test]
fn scripted_bootstrap_against_the_memory_remote() {
    with_home(|home| {
        std::env::set_var("SCANPREP_SCRIPT_KEYS", "enter,enter,enter,enter");
        std::env::set_var("SCANPREP_API_URL", "memory://");
        let output = run_cli(args(&["bootstrap"])).expect("bootstrap");
        assert!(output.contains("project=internal"));
        assert!(output.contains("template_playlist_ids=21"));
        assert!(output.contains("asset_playlists=production"));
        assert!(home.join(".scanprep/contexts/acme-internal").exists());
    });
}

#[test]
fn interactive_bootstrap_with_every_field_set_needs_no_remote() {
    with_home(|home| {
        std::env::set_var("SCANPREP_SCRIPT_KEYS", "q");
        let output = run_cli(args(&[
            "bootstrap",
            "--interactive",
            "api-url=https://cloud.example.com",
            "workspace=acme",
            "project=internal",
            "template-playlists=default",
            "asset-playlists=production",
        ]))
        .expect("bootstrap without api key");
        assert!(output.contains("workspace=acme"));
        assert!(home.join(".scanprep/contexts/acme-internal").exists());
    });
}

#[test]
fn config_file_is_overridden_by_assignments() {
    with_home(|home| {
        let path = home.join("custom.json");
        std::fs::write(
            &path,
            concat!(
                r#"{"workspace": "old", "project": "internal", "#,
                r#""template-playlists": ["t"], "asset-playlists": ["a"]}"#
            ),
        )
        .expect("write");
        let output = run_cli(args(&[
            "bootstrap",
            "--config",
            path.to_str().expect("utf8 path"),
            "--non-interactive",
            "workspace=new",
        ]))
        .expect("bootstrap");
        assert!(output.contains("workspace=new"));
        let saved = CloudConfig::from_path(&path).expect("rewritten");
        assert_eq!(saved.workspace, "new");
    });
}

#[test]
fn conflicting_modes_and_bad_keys_are_rejected() {
    with_home(|_| {
        assert!(run_cli(args(&["bootstrap", "--interactive", "--non-interactive"])).is_err());
        let err = run_cli(args(&["bootstrap", "colour=blue"])).expect_err("unknown key");
        assert!(err.contains("colour"));
    });
}

#[test]
fn datasources_requires_a_resolved_workspace() {
    with_home(|_| {
        let err = run_cli(args(&["datasources"])).expect_err("no workspace");
        assert!(err.contains("workspace-id"));
    });
}

#[test]
fn datasources_runs_the_flow_with_scripted_keys() {
    with_home(|_| {
        std::env::set_var(
            "SCANPREP_SCRIPT_KEYS",
            "down,enter,enter,type:ak,enter,type:sk,enter,enter",
        );
        let output = run_cli(args(&["datasources", "api-url=memory://", "workspace-id=1"]))
            .expect("datasource");
        assert!(output.contains("datasource=cloudlist"));
    });
}
