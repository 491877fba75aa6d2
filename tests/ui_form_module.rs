use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use scanprep::ui::{Form, FormEvent, FormField, Theme};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(form: &mut Form, text: &str) {
    for ch in text.chars() {
        form.handle_key(key(KeyCode::Char(ch)));
    }
}

fn workspace_form() -> Form {
    Form::new(
        vec![
            FormField::new("Workspace Name", "new-glorious-workspace").with_key("name"),
            FormField::new("Team Size", "1-10").with_key("team-size"),
            FormField::new("Org URL", "www.example.com").with_key("url"),
        ],
        Theme::workspace(),
    )
}

#[test]
fn enter_walks_the_fields_then_submits_every_value() {
    let mut form = workspace_form();
    type_text(&mut form, "acme");
    assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::FocusMoved(1));
    type_text(&mut form, "5");
    assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::FocusMoved(2));
    let values = match form.handle_key(key(KeyCode::Enter)) {
        FormEvent::Submitted(values) => values,
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(values, vec!["acme", "5", ""]);

    let payload = form.payload(&values);
    assert_eq!(payload.get("name").map(String::as_str), Some("acme"));
    assert_eq!(payload.get("team-size").map(String::as_str), Some("5"));
}

#[test]
fn focus_wraps_in_both_directions() {
    let mut form = workspace_form();
    assert_eq!(
        form.handle_key(KeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT)),
        FormEvent::FocusMoved(2)
    );
    assert_eq!(form.handle_key(key(KeyCode::Tab)), FormEvent::FocusMoved(0));
    assert_eq!(
        form.handle_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)),
        FormEvent::FocusMoved(1)
    );
}

#[test]
fn input_respects_the_char_limit_and_backspace() {
    let mut form = Form::new(
        vec![FormField::new("Name", "x").with_limits(3, 3)],
        Theme::default(),
    );
    type_text(&mut form, "abcd");
    assert_eq!(form.values(), ["abc".to_string()]);
    assert_eq!(form.handle_key(key(KeyCode::Backspace)), FormEvent::Edited);
    assert_eq!(form.values(), ["ab".to_string()]);
}

#[test]
fn empty_fields_show_placeholders_and_the_cursor() {
    let form = workspace_form().with_prompt("Enter the details for the workspace");
    assert_eq!(form.view().title, "Enter the details for the workspace");
    let rendered = form.render();
    assert!(rendered.contains("> w-glorious-workspace_"));
    assert!(rendered.contains("  www.example.com"));
    assert!(rendered.trim_end().ends_with("Continue ->"));
}

#[test]
fn escape_cancels() {
    let mut form = workspace_form();
    type_text(&mut form, "half");
    assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Cancelled);
}
