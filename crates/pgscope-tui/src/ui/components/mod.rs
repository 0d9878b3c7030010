mod command_line;
mod help_overlay;
mod list_selector;
mod status_bar;

pub use command_line::CommandLine;
pub use help_overlay::HelpOverlay;
pub use list_selector::ListSelector;
pub use status_bar::{StatusBar, list_nav_hints};
