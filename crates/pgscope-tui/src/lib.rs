//! TUI components for pgscope
//!
//! This crate provides the terminal user interface for pgscope, including
//! state management, keybindings, command parsing, event handling, and UI
//! components.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{
    Action, AppState, CommandLineState, ConnStatus, FormField, FormState, K8sCommand,
    ParsedCommand, Screen, UiState, k8s_usage, parse_command,
};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{CommandLine, HelpOverlay, ListSelector, StatusBar, list_nav_hints};
pub use ui::screens::{
    ConfigFormScreen, ContainerSelectScreen, DatabaseSelectScreen, NamespaceSelectScreen,
    PodSelectScreen, SecretKeySelectScreen, SecretSelectScreen, SessionsScreen, SqlEditorScreen,
};
pub use ui::{Layout, Theme};
