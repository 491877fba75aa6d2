use super::FlowError;
use crate::ui::keys::{is_interrupt, is_release};
use crate::ui::{
    ChoiceEvent, ChoicePath, ChoiceSelector, FlowTerminal, Form, FormEvent, ListEvent, ListItem,
    ListSelector, View,
};
use crossterm::event::KeyEvent;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    List,
    Choose,
    Add,
    Detail,
}

/// The primitive driving one state.
#[derive(Debug, Clone)]
pub enum Screen<A> {
    List(ListSelector<ListItem, A>),
    Choice(ChoiceSelector),
    Form(Form),
}

impl<A: Copy> Screen<A> {
    pub fn view(&self) -> View {
        match self {
            Screen::List(list) => list.view(),
            Screen::Choice(choice) => choice.view(),
            Screen::Form(form) => form.view(),
        }
    }
}

/// State-to-screen table. Inserting for a state replaces its screen.
#[derive(Debug, Clone)]
pub struct Screens<A> {
    table: Vec<(FlowState, Screen<A>)>,
}

impl<A> Default for Screens<A> {
    fn default() -> Self {
        Self { table: Vec::new() }
    }
}

impl<A: Copy> Screens<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: FlowState, screen: Screen<A>) {
        match self.table.iter_mut().find(|(s, _)| *s == state) {
            Some(slot) => slot.1 = screen,
            None => self.table.push((state, screen)),
        }
    }

    pub fn get(&self, state: FlowState) -> Option<&Screen<A>> {
        self.table
            .iter()
            .find(|(s, _)| *s == state)
            .map(|(_, screen)| screen)
    }

    pub fn get_mut(&mut self, state: FlowState) -> Option<&mut Screen<A>> {
        self.table
            .iter_mut()
            .find(|(s, _)| *s == state)
            .map(|(_, screen)| screen)
    }

    pub fn list(&self, state: FlowState) -> Result<&ListSelector<ListItem, A>, FlowError> {
        match self.get(state) {
            Some(Screen::List(list)) => Ok(list),
            _ => Err(FlowError::MissingScreen(state)),
        }
    }

    pub fn list_mut(
        &mut self,
        state: FlowState,
    ) -> Result<&mut ListSelector<ListItem, A>, FlowError> {
        match self.get_mut(state) {
            Some(Screen::List(list)) => Ok(list),
            _ => Err(FlowError::MissingScreen(state)),
        }
    }

    pub fn form_mut(&mut self, state: FlowState) -> Result<&mut Form, FlowError> {
        match self.get_mut(state) {
            Some(Screen::Form(form)) => Ok(form),
            _ => Err(FlowError::MissingScreen(state)),
        }
    }

    pub fn choice_mut(&mut self, state: FlowState) -> Result<&mut ChoiceSelector, FlowError> {
        match self.get_mut(state) {
            Some(Screen::Choice(choice)) => Ok(choice),
            _ => Err(FlowError::MissingScreen(state)),
        }
    }
}

/// What the active primitive reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<A> {
    Action {
        action: A,
        selected: Option<ListItem>,
    },
    Chosen(ChoicePath),
    Submitted(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<T> {
    Stay,
    Goto(FlowState),
    Finish(T),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome<T> {
    Completed(T),
    Cancelled,
}

/// Mutable view of the controller handed to a spec while it reacts.
pub struct FlowContext<'a, A> {
    pub screens: &'a mut Screens<A>,
    status: &'a mut Option<String>,
}

impl<A> FlowContext<'_, A> {
    pub fn set_status(&mut self, status: impl Into<String>) {
        *self.status = Some(status.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// Per-resource behavior plugged into [`FlowController`].
pub trait FlowSpec {
    type Action: Copy + fmt::Debug;
    type Output;

    /// Registers the screens and returns the starting state.
    fn build(&mut self, screens: &mut Screens<Self::Action>) -> Result<FlowState, FlowError>;

    fn on_enter(
        &mut self,
        _state: FlowState,
        _ctx: &mut FlowContext<'_, Self::Action>,
    ) -> Result<(), FlowError> {
        Ok(())
    }

    fn on_signal(
        &mut self,
        state: FlowState,
        signal: Signal<Self::Action>,
        ctx: &mut FlowContext<'_, Self::Action>,
    ) -> Result<Transition<Self::Output>, FlowError>;
}

pub struct FlowController<S: FlowSpec> {
    spec: S,
    screens: Screens<S::Action>,
    state: FlowState,
    status: Option<String>,
}

impl<S: FlowSpec> FlowController<S> {
    pub fn new(mut spec: S) -> Result<Self, FlowError> {
        let mut screens = Screens::new();
        let initial = spec.build(&mut screens)?;
        let mut controller = Self {
            spec,
            screens,
            state: initial,
            status: None,
        };
        controller.enter(initial)?;
        Ok(controller)
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn spec(&self) -> &S {
        &self.spec
    }

    pub fn screens(&self) -> &Screens<S::Action> {
        &self.screens
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn enter(&mut self, state: FlowState) -> Result<(), FlowError> {
        self.state = state;
        let mut ctx = FlowContext {
            screens: &mut self.screens,
            status: &mut self.status,
        };
        self.spec.on_enter(state, &mut ctx)?;
        if self.screens.get(state).is_none() {
            return Err(FlowError::MissingScreen(state));
        }
        Ok(())
    }

    pub fn view(&self) -> View {
        self.screens
            .get(self.state)
            .map(Screen::view)
            .unwrap_or_default()
    }

    /// One synchronous step. Returns the outcome once the flow is over.
    pub fn handle_key(
        &mut self,
        key: KeyEvent,
    ) -> Result<Option<FlowOutcome<S::Output>>, FlowError> {
        if is_release(&key) {
            return Ok(None);
        }
        if is_interrupt(&key) {
            return Ok(Some(FlowOutcome::Cancelled));
        }
        let state = self.state;
        let screen = self
            .screens
            .get_mut(state)
            .ok_or(FlowError::MissingScreen(state))?;
        let signal = match screen {
            Screen::List(list) => match list.handle_key(key) {
                ListEvent::Action { action, selected } => Signal::Action { action, selected },
                ListEvent::Cancelled => return Ok(Some(FlowOutcome::Cancelled)),
                ListEvent::Handled | ListEvent::Ignored => return Ok(None),
            },
            Screen::Choice(choice) => match choice.handle_key(key) {
                ChoiceEvent::Completed(path) => Signal::Chosen(path),
                ChoiceEvent::Cancelled => return Ok(Some(FlowOutcome::Cancelled)),
                _ => return Ok(None),
            },
            Screen::Form(form) => match form.handle_key(key) {
                FormEvent::Submitted(values) => Signal::Submitted(values),
                FormEvent::Cancelled => return Ok(Some(FlowOutcome::Cancelled)),
                _ => return Ok(None),
            },
        };

        self.status = None;
        let mut ctx = FlowContext {
            screens: &mut self.screens,
            status: &mut self.status,
        };
        match self.spec.on_signal(state, signal, &mut ctx)? {
            Transition::Stay => Ok(None),
            Transition::Goto(next) => {
                self.enter(next)?;
                Ok(None)
            }
            Transition::Finish(output) => Ok(Some(FlowOutcome::Completed(output))),
        }
    }

    /// Draws and steps until the flow completes or is cancelled.
    pub fn run(
        &mut self,
        terminal: &mut dyn FlowTerminal,
    ) -> Result<FlowOutcome<S::Output>, FlowError> {
        loop {
            terminal.draw(&self.view(), self.status())?;
            let key = terminal.next_key()?;
            if let Some(outcome) = self.handle_key(key)? {
                return Ok(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::keys::key_event;
    use crate::ui::{FormField, KeyBinding, ScriptedTerminal, Theme};
    use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Act {
        Pick,
        Add,
    }

    /// Picks from a list or adds a name through a one-field form.
    struct Names {
        names: Vec<String>,
    }

    impl Names {
        fn items(&self) -> Vec<ListItem> {
            self.names
                .iter()
                .enumerate()
                .map(|(idx, name)| ListItem::new(idx as i64 + 1, name.clone(), ""))
                .collect()
        }
    }

    impl FlowSpec for Names {
        type Action = Act;
        type Output = String;

        fn build(&mut self, screens: &mut Screens<Act>) -> Result<FlowState, FlowError> {
            screens.insert(
                FlowState::List,
                Screen::List(ListSelector::new(
                    "Names",
                    self.items(),
                    vec![
                        (KeyBinding::new(&["enter"], "enter", "choose"), Act::Pick),
                        (KeyBinding::new(&["a"], "a", "add new"), Act::Add),
                    ],
                    Theme::default(),
                )),
            );
            Ok(if self.names.is_empty() {
                FlowState::Add
            } else {
                FlowState::List
            })
        }

        fn on_enter(
            &mut self,
            state: FlowState,
            ctx: &mut FlowContext<'_, Act>,
        ) -> Result<(), FlowError> {
            if state == FlowState::Add {
                ctx.screens.insert(
                    FlowState::Add,
                    Screen::Form(Form::new(
                        vec![FormField::new("Name", "name")],
                        Theme::default(),
                    )),
                );
            }
            Ok(())
        }

        fn on_signal(
            &mut self,
            _state: FlowState,
            signal: Signal<Act>,
            ctx: &mut FlowContext<'_, Act>,
        ) -> Result<Transition<String>, FlowError> {
            match signal {
                Signal::Action {
                    action: Act::Pick,
                    selected: Some(item),
                } => Ok(Transition::Finish(item.title)),
                Signal::Action {
                    action: Act::Add, ..
                } => Ok(Transition::Goto(FlowState::Add)),
                Signal::Submitted(values) => {
                    self.names.push(values[0].clone());
                    let items = self.items();
                    ctx.screens.list_mut(FlowState::List)?.replace(items);
                    ctx.set_status(format!("Added {}", values[0]));
                    Ok(Transition::Goto(FlowState::List))
                }
                _ => Ok(Transition::Stay),
            }
        }
    }

    #[test]
    fn empty_listing_starts_in_add_state() {
        let controller = FlowController::new(Names { names: Vec::new() }).expect("controller");
        assert_eq!(controller.state(), FlowState::Add);
    }

    #[test]
    fn add_then_pick_returns_the_new_entry() {
        let mut controller =
            FlowController::new(Names { names: vec!["one".to_string()] }).expect("controller");
        let keys = [
            KeyCode::Char('a'),
            KeyCode::Char('t'),
            KeyCode::Char('w'),
            KeyCode::Char('o'),
            KeyCode::Enter,
            KeyCode::Down,
        ];
        for code in keys {
            assert_eq!(controller.handle_key(key_event(code)).expect("step"), None);
        }
        assert_eq!(controller.state(), FlowState::List);
        assert_eq!(controller.status(), Some("Added two"));
        let outcome = controller.handle_key(key_event(KeyCode::Enter)).expect("pick");
        assert_eq!(outcome, Some(FlowOutcome::Completed("two".to_string())));
    }

    #[test]
    fn interrupt_cancels_from_any_state() {
        let mut controller =
            FlowController::new(Names { names: vec!["one".to_string()] }).expect("controller");
        controller.handle_key(key_event(KeyCode::Char('a'))).expect("add");
        let outcome = controller
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .expect("cancel");
        assert_eq!(outcome, Some(FlowOutcome::Cancelled));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut controller =
            FlowController::new(Names { names: vec!["one".to_string()] }).expect("controller");
        let mut release = key_event(KeyCode::Enter);
        release.kind = KeyEventKind::Release;
        assert_eq!(controller.handle_key(release).expect("release"), None);
    }

    #[test]
    fn run_draws_until_an_outcome() {
        let mut controller =
            FlowController::new(Names { names: vec!["one".to_string()] }).expect("controller");
        let mut terminal = ScriptedTerminal::new(vec![key_event(KeyCode::Enter)]);
        let outcome = controller.run(&mut terminal).expect("run");
        assert_eq!(outcome, FlowOutcome::Completed("one".to_string()));
        assert!(terminal.last_frame().contains("> one"));
    }

    #[test]
    fn exhausted_script_is_a_terminal_error() {
        let mut controller =
            FlowController::new(Names { names: vec!["one".to_string()] }).expect("controller");
        let mut terminal = ScriptedTerminal::new(vec![key_event(KeyCode::Down)]);
        assert!(matches!(
            controller.run(&mut terminal),
            Err(FlowError::Terminal(_))
        ));
    }
}
