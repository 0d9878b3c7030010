use pgscope_types::QueryMode;

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // Inspection modes
    SetMode(QueryMode),
    Refresh,

    // List navigation
    ListUp,
    ListDown,
    ListSelect,

    // Command line
    OpenCommandLine,
    CommandInput(char),
    CommandBackspace,
    CommandCancel,
    CommandSubmit,

    // Connection form
    FormNextField,
    FormPrevField,
    FormInput(char),
    FormBackspace,
    FormToggleMask,
    FormSubmit,

    // Custom SQL editor
    SqlInput(char),
    SqlBackspace,
    SqlClear,
    SqlSubmit,

    ToggleHelp,

    // Render request
    Render,
}
