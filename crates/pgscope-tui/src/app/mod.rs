mod action;
mod command;
mod state;

pub use action::Action;
pub use command::{K8sCommand, ParsedCommand, k8s_usage, parse_command};
pub use state::{AppState, CommandLineState, ConnStatus, FormField, FormState, Screen, UiState};
