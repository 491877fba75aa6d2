use crossterm::event::KeyEvent;
use scanprep::flows::{DatasourceFlow, FlowController, FlowOutcome, FlowState, Selection};
use scanprep::remote::{Datasource, InMemoryRemote, CLOUDLIST};
use scanprep::shared::EventLog;
use scanprep::ui::parse_scripted_keys;
use serde_json::{json, Value};

fn keys(raw: &str) -> Vec<KeyEvent> {
    parse_scripted_keys(raw).expect("keys")
}

fn drive(
    controller: &mut FlowController<DatasourceFlow<'_>>,
    raw: &str,
) -> Option<FlowOutcome<Selection>> {
    for key in keys(raw) {
        if let Some(outcome) = controller.handle_key(key).expect("step") {
            return Some(outcome);
        }
    }
    None
}

#[test]
fn empty_workspace_opens_the_type_prompt_with_cloudlist_last() {
    let remote = InMemoryRemote::demo();
    let log = EventLog::disabled();
    let controller = FlowController::new(DatasourceFlow::new(&remote, &log, 1)).expect("build");
    assert_eq!(controller.state(), FlowState::Choose);
    assert_eq!(
        controller.spec().catalog().root_choices(),
        vec!["Github", "Cloudlist"]
    );
    assert_eq!(
        controller.spec().catalog().provider_choices(),
        vec!["Aws", "Do"]
    );
    let screen = controller.view().plain_lines().join("\n");
    assert!(screen.contains("Select a datasource type to create"));
}

#[test]
fn cloudlist_provider_submission_creates_a_wrapped_config() {
    let remote = InMemoryRemote::demo();
    let log = EventLog::disabled();
    let mut controller =
        FlowController::new(DatasourceFlow::new(&remote, &log, 1)).expect("build");

    assert_eq!(drive(&mut controller, "down,enter,enter"), None);
    assert_eq!(controller.state(), FlowState::Add);
    let form = controller.view().plain_lines().join("\n");
    assert!(form.contains("Aws Access Key"));
    assert!(form.contains("Aws Secret Key"));

    assert_eq!(drive(&mut controller, "type:ak,enter,type:sk,enter"), None);
    assert_eq!(controller.state(), FlowState::List);
    assert_eq!(controller.status(), Some("Added Cloudlist datasource"));

    let created = remote.datasources(1);
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].kind, CLOUDLIST);
    assert_eq!(created[0].metadata["repo"], "cloudlist");
    let config: Vec<Value> = serde_json::from_str(
        created[0].metadata["config"]
            .as_str()
            .expect("config string"),
    )
    .expect("config json");
    assert_eq!(
        config,
        vec![json!({"aws_access_key": "ak", "aws_secret_key": "sk", "provider": "aws"})]
    );

    let outcome = drive(&mut controller, "enter").expect("selected");
    assert_eq!(
        outcome,
        FlowOutcome::Completed(Selection::new("cloudlist", created[0].id))
    );
}

#[test]
fn plain_types_submit_a_flat_object() {
    let remote = InMemoryRemote::demo();
    let log = EventLog::disabled();
    let mut controller =
        FlowController::new(DatasourceFlow::new(&remote, &log, 1)).expect("build");
    assert_eq!(
        drive(&mut controller, "enter,type:acme,enter,type:ghp_1,enter"),
        None
    );
    let created = remote.datasources(1);
    assert_eq!(created[0].kind, "github");
    assert_eq!(
        created[0].metadata,
        json!({"org-name": "acme", "token": "ghp_1"})
    );
}

#[test]
fn existing_datasources_are_listed_and_broken_ones_skipped() {
    let remote = InMemoryRemote::new()
        .with_datasource(
            1,
            Datasource {
                id: 7,
                kind: CLOUDLIST.to_string(),
                metadata: json!({
                    "repo": "cloudlist",
                    "config": "[{\"provider\":\"gcp\",\"id\":\"main\"}]"
                }),
            },
        )
        .with_datasource(
            1,
            Datasource {
                id: 8,
                kind: CLOUDLIST.to_string(),
                metadata: json!({"repo": "cloudlist", "config": "not json"}),
            },
        )
        .with_available_datasource("github", json!({"token": "x", "retries": 3}));
    let log = EventLog::disabled();
    let mut controller =
        FlowController::new(DatasourceFlow::new(&remote, &log, 1)).expect("build");

    assert_eq!(controller.state(), FlowState::List);
    let list = controller.screens().list(FlowState::List).expect("list");
    assert_eq!(list.len(), 1);
    assert_eq!(list.items()[0].description, "Gcp main");

    let warnings = controller.spec().warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("datasource 8"));
    assert!(warnings[1].contains("retries"));

    let outcome = drive(&mut controller, "enter").expect("selected");
    assert_eq!(outcome, FlowOutcome::Completed(Selection::new("cloudlist", 7)));
}

#[test]
fn adding_from_the_list_goes_through_the_type_prompt() {
    let remote = InMemoryRemote::demo().with_datasource(
        1,
        Datasource {
            id: 9,
            kind: "github".to_string(),
            metadata: json!({"repo": "acme/app"}),
        },
    );
    let log = EventLog::disabled();
    let mut controller =
        FlowController::new(DatasourceFlow::new(&remote, &log, 1)).expect("build");
    assert_eq!(controller.state(), FlowState::List);
    assert_eq!(drive(&mut controller, "a"), None);
    assert_eq!(controller.state(), FlowState::Choose);
    assert_eq!(drive(&mut controller, "q"), Some(FlowOutcome::Cancelled));
    assert_eq!(remote.call_count("create_datasource"), 0);
}

#[test]
fn types_without_editable_fields_stay_on_the_type_prompt() {
    let remote = InMemoryRemote::new()
        .with_available_datasource("s3", json!({"id": "", "provider": "aws"}));
    let log = EventLog::disabled();
    let mut controller =
        FlowController::new(DatasourceFlow::new(&remote, &log, 1)).expect("build");
    assert_eq!(controller.state(), FlowState::Choose);

    assert_eq!(drive(&mut controller, "enter"), None);
    assert_eq!(controller.state(), FlowState::Choose);
    assert_eq!(controller.status(), Some("No editable fields for S3"));
    assert_eq!(remote.call_count("create_datasource"), 0);
}
