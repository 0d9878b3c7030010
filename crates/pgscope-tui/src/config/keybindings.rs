use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use pgscope_types::QueryMode;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    /// Main inspection table
    Sessions,
    /// Selection screens
    ListNavigation,
    /// Connection form input
    FormInput,
    /// Command line input
    CommandLine,
    /// Custom SQL input
    SqlEditor,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyContext::Global, global);

        // Main table bindings
        let mut sessions = HashMap::new();
        for mode in QueryMode::ALL {
            sessions.insert(
                KeyBinding::new(KeyCode::Char(mode.key())),
                Action::SetMode(mode),
            );
        }
        sessions.insert(KeyBinding::new(KeyCode::Char(':')), Action::OpenCommandLine);
        sessions.insert(KeyBinding::new(KeyCode::Char('r')), Action::Refresh);
        sessions.insert(KeyBinding::new(KeyCode::Char('j')), Action::ListDown);
        sessions.insert(KeyBinding::new(KeyCode::Down), Action::ListDown);
        sessions.insert(KeyBinding::new(KeyCode::Char('k')), Action::ListUp);
        sessions.insert(KeyBinding::new(KeyCode::Up), Action::ListUp);
        bindings.insert(KeyContext::Sessions, sessions);

        // List navigation bindings
        let mut list_nav = HashMap::new();
        list_nav.insert(KeyBinding::new(KeyCode::Char('j')), Action::ListDown);
        list_nav.insert(KeyBinding::new(KeyCode::Down), Action::ListDown);
        list_nav.insert(KeyBinding::new(KeyCode::Char('k')), Action::ListUp);
        list_nav.insert(KeyBinding::new(KeyCode::Up), Action::ListUp);
        list_nav.insert(KeyBinding::new(KeyCode::Enter), Action::ListSelect);
        bindings.insert(KeyContext::ListNavigation, list_nav);

        // Connection form bindings
        let mut form = HashMap::new();
        form.insert(KeyBinding::new(KeyCode::Tab), Action::FormNextField);
        form.insert(KeyBinding::new(KeyCode::Down), Action::FormNextField);
        form.insert(KeyBinding::new(KeyCode::BackTab), Action::FormPrevField);
        form.insert(KeyBinding::new(KeyCode::Up), Action::FormPrevField);
        form.insert(KeyBinding::new(KeyCode::Enter), Action::FormSubmit);
        form.insert(KeyBinding::new(KeyCode::Backspace), Action::FormBackspace);
        form.insert(KeyBinding::ctrl(KeyCode::Char('p')), Action::FormToggleMask);
        form.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        form.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.insert(KeyContext::FormInput, form);

        // Command line bindings
        let mut command = HashMap::new();
        command.insert(KeyBinding::new(KeyCode::Enter), Action::CommandSubmit);
        command.insert(KeyBinding::new(KeyCode::Esc), Action::CommandCancel);
        command.insert(KeyBinding::new(KeyCode::Backspace), Action::CommandBackspace);
        command.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::CommandCancel);
        bindings.insert(KeyContext::CommandLine, command);

        // SQL editor bindings
        let mut sql = HashMap::new();
        sql.insert(KeyBinding::new(KeyCode::Enter), Action::SqlSubmit);
        sql.insert(KeyBinding::new(KeyCode::Backspace), Action::SqlBackspace);
        sql.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::SqlClear);
        sql.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        sql.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.insert(KeyContext::SqlEditor, sql);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(context_bindings) = self.bindings.get(&context) {
            if let Some(action) = context_bindings.get(&binding) {
                return Some(action.clone());
            }
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    fn input_action(
        &self,
        context: KeyContext,
        key: &KeyEvent,
        make_input: fn(char) -> Action,
    ) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        if let Some(context_bindings) = self.bindings.get(&context) {
            if let Some(action) = context_bindings.get(&binding) {
                return Some(action.clone());
            }
        }

        // Regular characters feed the input buffer
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                return Some(make_input(c));
            }
        }

        None
    }

    /// Handle key event while the connection form has focus
    pub fn get_form_input_action(&self, key: &KeyEvent) -> Option<Action> {
        self.input_action(KeyContext::FormInput, key, Action::FormInput)
    }

    /// Handle key event while the command line is open
    pub fn get_command_input_action(&self, key: &KeyEvent) -> Option<Action> {
        self.input_action(KeyContext::CommandLine, key, Action::CommandInput)
    }

    /// Handle key event while the SQL editor has focus
    pub fn get_sql_input_action(&self, key: &KeyEvent) -> Option<Action> {
        self.input_action(KeyContext::SqlEditor, key, Action::SqlInput)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn digit_keys_select_modes() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_action(KeyContext::Sessions, &key('3')),
            Some(Action::SetMode(QueryMode::Blocked))
        ));
        assert!(matches!(
            bindings.get_action(KeyContext::Sessions, &key('5')),
            Some(Action::SetMode(QueryMode::Custom))
        ));
    }

    #[test]
    fn global_fallback_applies() {
        let bindings = KeyBindings::new();
        assert!(matches!(
            bindings.get_action(KeyContext::ListNavigation, &key('q')),
            Some(Action::Quit)
        ));
    }

    #[test]
    fn text_contexts_capture_characters() {
        let bindings = KeyBindings::new();
        // 'q' must type, not quit, while an input has focus
        assert!(matches!(
            bindings.get_form_input_action(&key('q')),
            Some(Action::FormInput('q'))
        ));
        assert!(matches!(
            bindings.get_command_input_action(&key('\\')),
            Some(Action::CommandInput('\\'))
        ));
        assert!(matches!(
            bindings.get_sql_input_action(&key('s')),
            Some(Action::SqlInput('s'))
        ));
    }

    #[test]
    fn command_line_special_keys() {
        let bindings = KeyBindings::new();
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(
            bindings.get_command_input_action(&enter),
            Some(Action::CommandSubmit)
        ));
        assert!(matches!(
            bindings.get_command_input_action(&esc),
            Some(Action::CommandCancel)
        ));
    }
}
