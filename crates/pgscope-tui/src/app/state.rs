use ratatui::widgets::{ListState, TableState};
use tokio::sync::mpsc;

use pgscope_k8s::TopologySelection;
use pgscope_types::{
    ConnectionProfile, NamespaceInfo, ProfileValidationError, QueryMode, TableData,
};

use super::Action;

/// Screen enumeration
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Main inspection table
    Sessions,
    /// Connection profile form
    ConfigForm,
    // Kubernetes setup cascade
    NamespaceSelect,
    PodSelect,
    ContainerSelect,
    SecretSelect,
    SecretKeySelect,
    /// Picker for `\c` without an argument
    DatabaseSelect,
    /// Custom SQL input
    SqlEditor,
}

/// Connection state as the UI sees it; the live handle stays with the
/// event loop
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ConnStatus {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Failed(String),
}

impl ConnStatus {
    pub fn label(&self) -> &str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting => "Connecting...",
            Self::Connected => "Connected",
            Self::Failed(reason) => reason,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Fields of the connection form, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Host,
    Port,
    Username,
    Password,
    Database,
    SslMode,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        Self::Host,
        Self::Port,
        Self::Username,
        Self::Password,
        Self::Database,
        Self::SslMode,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Host => "Host",
            Self::Port => "Port",
            Self::Username => "Username",
            Self::Password => "Password",
            Self::Database => "Database",
            Self::SslMode => "SSL Mode",
        }
    }
}

/// Editable connection form state.
///
/// Each field remembers whether the operator touched it. Values seeded from
/// the stored profile are fair game for the credential resolver; values the
/// operator typed or explicitly picked are not.
pub struct FormState {
    values: [String; 6],
    edited: [bool; 6],
    pub focus: usize,
    pub mask_password: bool,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            values: Default::default(),
            edited: [false; 6],
            focus: 0,
            mask_password: true,
        }
    }
}

impl FormState {
    /// Populate the form from a profile. All fields count as seeded again.
    pub fn load(&mut self, profile: &ConnectionProfile) {
        self.values = [
            profile.host.clone(),
            profile.port.clone(),
            profile.username.clone(),
            profile.password.clone(),
            profile.database.clone(),
            profile.sslmode.clone(),
        ];
        self.edited = [false; 6];
        self.focus = 0;
    }

    /// Write the form back into a profile after validating
    pub fn apply(&self, profile: &mut ConnectionProfile) -> Result<(), ProfileValidationError> {
        let mut candidate = profile.clone();
        candidate.host = self.values[0].clone();
        candidate.port = self.values[1].clone();
        candidate.username = self.values[2].clone();
        candidate.password = self.values[3].clone();
        candidate.database = self.values[4].clone();
        candidate.sslmode = self.values[5].clone();
        candidate.validate()?;
        *profile = candidate;
        Ok(())
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.values[Self::index(field)]
    }

    /// Value of a field as shown on screen, masking the password
    pub fn display_value(&self, field: FormField) -> String {
        let value = self.value(field);
        if field == FormField::Password && self.mask_password {
            "*".repeat(value.chars().count())
        } else {
            value.to_string()
        }
    }

    pub fn focused_field(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    pub fn input_char(&mut self, c: char) {
        self.values[self.focus].push(c);
        self.edited[self.focus] = true;
    }

    pub fn backspace(&mut self) {
        self.values[self.focus].pop();
        self.edited[self.focus] = true;
    }

    /// Seed a field from the topology (host, port). Counts as not edited,
    /// so a later resolution may still replace it.
    pub fn set(&mut self, field: FormField, value: String) {
        let idx = Self::index(field);
        self.values[idx] = value;
        self.edited[idx] = false;
    }

    /// Set a field as if the operator typed it; resolution will not touch it
    pub fn set_manual(&mut self, field: FormField, value: String) {
        let idx = Self::index(field);
        self.values[idx] = value;
        self.edited[idx] = true;
    }

    /// Write a resolved credential. Non-empty resolutions replace seeded
    /// text, but never anything typed or picked by the operator.
    pub fn fill_resolved(&mut self, field: FormField, value: &str) {
        let idx = Self::index(field);
        if !self.edited[idx] && !value.is_empty() {
            self.values[idx] = value.to_string();
        }
    }

    fn index(field: FormField) -> usize {
        FormField::ALL.iter().position(|f| *f == field).unwrap_or(0)
    }
}

/// Command line input state
#[derive(Default)]
pub struct CommandLineState {
    pub active: bool,
    pub input: String,
}

impl CommandLineState {
    pub fn open(&mut self) {
        self.active = true;
        self.input.clear();
    }

    pub fn cancel(&mut self) {
        self.active = false;
        self.input.clear();
    }

    pub fn input_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Close the command line and hand back what was typed
    pub fn take(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.input)
    }
}

/// UI-specific transient state
#[derive(Default)]
pub struct UiState {
    /// List state for selection screens
    pub list_state: ListState,

    /// Table state for the results view, kept in step with `list_state`
    pub table_state: TableState,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Error message to display (if any)
    pub error_message: Option<String>,
}

/// Global application state
pub struct AppState {
    /// Current screen being displayed
    pub current_screen: Screen,

    /// Navigation stack for back navigation
    pub screen_stack: Vec<Screen>,

    /// Active connection profile
    pub profile: ConnectionProfile,

    /// Connection state mirror for display
    pub conn: ConnStatus,

    /// Server version of the live connection
    pub server_version: Option<String>,

    /// Database the live connection points at
    pub current_database: Option<String>,

    /// Databases available for `\c`
    pub databases: Vec<String>,

    /// Active inspection mode
    pub mode: QueryMode,

    /// Current result table
    pub table: TableData,

    /// Kubeconfig context name; None disables Kubernetes features
    pub k8s_context: Option<String>,

    /// Namespaces for the setup cascade
    pub namespaces: Vec<NamespaceInfo>,

    /// Topology selection state machine
    pub topology: TopologySelection,

    /// Connection form
    pub form: FormState,

    /// Command line
    pub command: CommandLineState,

    /// Custom SQL buffer
    pub sql_input: String,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Channel sender for async actions
    pub action_tx: mpsc::UnboundedSender<Action>,

    // Background task generations; completions tagged with an older value
    // are discarded on arrival
    connect_generation: u64,
    query_generation: u64,
    topology_generation: u64,
}

impl AppState {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>) -> Self {
        let mut ui_state = UiState::default();
        ui_state.list_state.select(Some(0));

        Self {
            current_screen: Screen::Sessions,
            screen_stack: Vec::new(),
            profile: ConnectionProfile::default(),
            conn: ConnStatus::Disconnected,
            server_version: None,
            current_database: None,
            databases: Vec::new(),
            mode: QueryMode::default(),
            table: TableData::default(),
            k8s_context: None,
            namespaces: Vec::new(),
            topology: TopologySelection::new(),
            form: FormState::default(),
            command: CommandLineState::default(),
            sql_input: String::new(),
            ui_state,
            should_quit: false,
            action_tx,
            connect_generation: 0,
            query_generation: 0,
            topology_generation: 0,
        }
    }

    /// Navigate to a new screen, pushing current to stack
    pub fn navigate_to(&mut self, screen: Screen) {
        self.screen_stack.push(self.current_screen.clone());
        self.current_screen = screen;
        self.ui_state.list_state.select(Some(0));
    }

    /// Go back to previous screen
    pub fn go_back(&mut self) -> bool {
        if let Some(prev_screen) = self.screen_stack.pop() {
            self.current_screen = prev_screen;
            self.ui_state.list_state.select(Some(0));
            true
        } else {
            false
        }
    }

    /// Get the current list length based on screen
    pub fn current_list_len(&self) -> usize {
        match self.current_screen {
            Screen::Sessions => self.table.rows.len(),
            Screen::NamespaceSelect => self.namespaces.len(),
            Screen::PodSelect => self.topology.pods().len(),
            Screen::ContainerSelect => self
                .topology
                .selected_pod()
                .map(|p| p.containers.len())
                .unwrap_or(0),
            Screen::SecretSelect => self.topology.secrets().len(),
            Screen::SecretKeySelect => self
                .topology
                .selected_secret()
                .map(|s| s.data.len())
                .unwrap_or(0),
            Screen::DatabaseSelect => self.databases.len(),
            Screen::ConfigForm | Screen::SqlEditor => 0,
        }
    }

    /// Move selection up
    pub fn list_up(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.ui_state.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.ui_state.list_state.select(Some(i));
    }

    /// Move selection down
    pub fn list_down(&mut self) {
        let len = self.current_list_len();
        if len == 0 {
            return;
        }

        let i = match self.ui_state.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.ui_state.list_state.select(Some(i));
    }

    /// Get currently selected index
    pub fn selected_index(&self) -> Option<usize> {
        self.ui_state.list_state.selected()
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.error_message = Some(msg);
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
    }

    pub fn bump_connect_generation(&mut self) -> u64 {
        self.connect_generation += 1;
        self.connect_generation
    }

    pub fn connect_generation(&self) -> u64 {
        self.connect_generation
    }

    pub fn bump_query_generation(&mut self) -> u64 {
        self.query_generation += 1;
        self.query_generation
    }

    pub fn query_generation(&self) -> u64 {
        self.query_generation
    }

    pub fn bump_topology_generation(&mut self) -> u64 {
        self.topology_generation += 1;
        self.topology_generation
    }

    pub fn topology_generation(&self) -> u64 {
        self.topology_generation
    }

    /// Keys of the selected secret, in display order
    pub fn secret_keys(&self) -> Vec<String> {
        self.topology
            .selected_secret()
            .map(|s| s.data.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        let (tx, _rx) = mpsc::unbounded_channel();
        AppState::new(tx)
    }

    #[test]
    fn navigation_stack_round_trip() {
        let mut state = state();
        state.navigate_to(Screen::ConfigForm);
        state.navigate_to(Screen::NamespaceSelect);
        assert_eq!(state.current_screen, Screen::NamespaceSelect);

        assert!(state.go_back());
        assert_eq!(state.current_screen, Screen::ConfigForm);
        assert!(state.go_back());
        assert_eq!(state.current_screen, Screen::Sessions);
        assert!(!state.go_back());
    }

    #[test]
    fn list_navigation_wraps() {
        let mut state = state();
        state.databases = vec!["a".into(), "b".into(), "c".into()];
        state.current_screen = Screen::DatabaseSelect;

        state.list_up();
        assert_eq!(state.selected_index(), Some(2));
        state.list_down();
        assert_eq!(state.selected_index(), Some(0));
    }

    #[test]
    fn generations_are_monotonic() {
        let mut state = state();
        let g1 = state.bump_query_generation();
        let g2 = state.bump_query_generation();
        assert!(g2 > g1);
        assert_eq!(state.query_generation(), g2);
    }

    #[test]
    fn form_apply_validates() {
        let mut state = state();
        state.form.load(&state.profile.clone());
        state.form.set(FormField::Database, String::new());

        let mut profile = state.profile.clone();
        assert!(state.form.apply(&mut profile).is_err());
        // A failed apply leaves the profile untouched
        assert_eq!(profile, state.profile);
    }

    #[test]
    fn form_masks_password_display() {
        let mut form = FormState::default();
        form.set(FormField::Password, "secret".into());
        assert_eq!(form.display_value(FormField::Password), "******");
        form.mask_password = false;
        assert_eq!(form.display_value(FormField::Password), "secret");
    }

    #[test]
    fn resolution_replaces_seeded_values() {
        let mut form = FormState::default();
        form.load(&ConnectionProfile::default());
        assert_eq!(form.value(FormField::Username), "postgres");

        form.fill_resolved(FormField::Username, "discovered");
        assert_eq!(form.value(FormField::Username), "discovered");

        // An empty resolution never erases anything
        form.fill_resolved(FormField::Password, "");
        assert_eq!(form.value(FormField::Password), "password");
    }

    #[test]
    fn resolution_never_replaces_typed_values() {
        let mut form = FormState::default();
        form.load(&ConnectionProfile::default());

        form.focus = 2; // Username
        for _ in 0.."postgres".len() {
            form.backspace();
        }
        for c in "typed-user".chars() {
            form.input_char(c);
        }

        form.fill_resolved(FormField::Username, "discovered");
        assert_eq!(form.value(FormField::Username), "typed-user");
    }

    #[test]
    fn picked_value_outranks_resolution() {
        let mut form = FormState::default();
        form.load(&ConnectionProfile::default());

        form.set_manual(FormField::Password, "from-secret-pick".into());
        form.fill_resolved(FormField::Password, "from-scan");
        assert_eq!(form.value(FormField::Password), "from-secret-pick");

        // Host/port seeding stays open to later writes
        form.set(FormField::Host, "10.1.2.3".into());
        form.fill_resolved(FormField::Host, "10.9.9.9");
        assert_eq!(form.value(FormField::Host), "10.9.9.9");
    }

    #[test]
    fn command_line_take_closes_and_clears() {
        let mut command = CommandLineState::default();
        command.open();
        for c in "\\config".chars() {
            command.input_char(c);
        }
        assert_eq!(command.take(), "\\config");
        assert!(!command.active);
        assert!(command.input.is_empty());
    }
}
