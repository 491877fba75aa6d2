use crossterm::event::KeyEvent;
use scanprep::flows::{
    FlowController, FlowOutcome, FlowSpec, FlowState, ProjectFlow, Selection, WorkspaceFlow,
};
use scanprep::remote::InMemoryRemote;
use scanprep::shared::EventLog;
use scanprep::ui::{parse_scripted_keys, ScriptedTerminal};

fn keys(raw: &str) -> Vec<KeyEvent> {
    parse_scripted_keys(raw).expect("keys")
}

fn drive<S: FlowSpec>(
    controller: &mut FlowController<S>,
    raw: &str,
) -> Option<FlowOutcome<S::Output>> {
    for key in keys(raw) {
        if let Some(outcome) = controller.handle_key(key).expect("step") {
            return Some(outcome);
        }
    }
    None
}

fn two_workspaces() -> InMemoryRemote {
    InMemoryRemote::new()
        .with_workspace(1, "acme")
        .with_workspace(2, "beta")
        .with_workspace(3, "")
}

#[test]
fn selecting_a_listed_workspace_returns_its_name_and_id() {
    let remote = two_workspaces();
    let log = EventLog::disabled();
    let mut terminal = ScriptedTerminal::new(keys("down,enter"));
    let outcome = FlowController::new(WorkspaceFlow::new(&remote, &log))
        .expect("build")
        .run(&mut terminal)
        .expect("run");
    assert_eq!(outcome, FlowOutcome::Completed(Selection::new("beta", 2)));
    assert_eq!(terminal.remaining_keys(), 0);
}

#[test]
fn workspaces_without_a_name_are_not_listed() {
    let remote = two_workspaces();
    let log = EventLog::disabled();
    let controller = FlowController::new(WorkspaceFlow::new(&remote, &log)).expect("build");
    let titles: Vec<String> = controller
        .screens()
        .list(FlowState::List)
        .expect("list")
        .items()
        .iter()
        .map(|item| item.title.clone())
        .collect();
    assert_eq!(titles, vec!["acme", "beta"]);
}

#[test]
fn adding_a_workspace_refreshes_the_list_and_allows_selecting_it() {
    let remote = two_workspaces();
    let log = EventLog::disabled();
    let mut controller = FlowController::new(WorkspaceFlow::new(&remote, &log)).expect("build");

    assert_eq!(drive(&mut controller, "a,type:newco,enter,type:5,enter,enter"), None);
    assert_eq!(controller.state(), FlowState::List);
    assert_eq!(controller.status(), Some("Added workspace newco"));
    assert_eq!(remote.call_count("create_workspace"), 1);
    assert_eq!(remote.call_count("list_workspaces"), 2);

    let outcome = drive(&mut controller, "end,enter").expect("outcome");
    assert_eq!(outcome, FlowOutcome::Completed(Selection::new("newco", 1001)));
}

#[test]
fn empty_workspace_name_keeps_the_form_open() {
    let remote = two_workspaces();
    let log = EventLog::disabled();
    let mut controller = FlowController::new(WorkspaceFlow::new(&remote, &log)).expect("build");

    assert_eq!(drive(&mut controller, "a,enter,enter,enter"), None);
    assert_eq!(controller.state(), FlowState::Add);
    assert_eq!(controller.status(), Some("Workspace name is required"));
    assert_eq!(remote.call_count("create_workspace"), 0);
}

#[test]
fn empty_organization_starts_on_the_add_form() {
    let remote = InMemoryRemote::new();
    let log = EventLog::disabled();
    let controller = FlowController::new(WorkspaceFlow::new(&remote, &log)).expect("build");
    assert_eq!(controller.state(), FlowState::Add);
    assert!(controller
        .view()
        .plain_lines()
        .iter()
        .any(|line| line.contains("Workspace Name")));
}

#[test]
fn escape_and_ctrl_c_cancel_the_run() {
    let remote = two_workspaces();
    let log = EventLog::disabled();
    let mut controller = FlowController::new(WorkspaceFlow::new(&remote, &log)).expect("build");
    assert_eq!(drive(&mut controller, "esc"), Some(FlowOutcome::Cancelled));

    let mut controller = FlowController::new(WorkspaceFlow::new(&remote, &log)).expect("build");
    assert_eq!(
        drive(&mut controller, "a,type:half,ctrl-c"),
        Some(FlowOutcome::Cancelled)
    );
    assert_eq!(remote.call_count("create_workspace"), 0);
}

#[test]
fn remote_failures_abort_the_flow() {
    let remote = two_workspaces();
    remote.fail_on("list_workspaces");
    let log = EventLog::disabled();
    let err = FlowController::new(WorkspaceFlow::new(&remote, &log))
        .err()
        .expect("listing fails");
    assert!(err.to_string().contains("list workspaces"));
}

#[test]
fn projects_are_scoped_to_the_workspace() {
    let remote = InMemoryRemote::new()
        .with_workspace(5, "w1")
        .with_project(5, 51, "internal")
        .with_project(6, 61, "elsewhere");
    let log = EventLog::disabled();
    let mut controller =
        FlowController::new(ProjectFlow::new(&remote, &log, 5)).expect("build");
    assert_eq!(
        controller.screens().list(FlowState::List).expect("list").len(),
        1
    );

    assert_eq!(drive(&mut controller, "a,type:external,enter"), None);
    assert_eq!(controller.status(), Some("Added project external"));
    let outcome = drive(&mut controller, "down,enter").expect("outcome");
    assert_eq!(outcome, FlowOutcome::Completed(Selection::new("external", 1001)));
}
