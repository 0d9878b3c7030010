mod config_form;
mod container_select;
mod database_select;
mod namespace_select;
mod pod_select;
mod secret_select;
mod sessions;
mod sql_editor;

pub use config_form::ConfigFormScreen;
pub use container_select::ContainerSelectScreen;
pub use database_select::DatabaseSelectScreen;
pub use namespace_select::NamespaceSelectScreen;
pub use pod_select::PodSelectScreen;
pub use secret_select::{SecretKeySelectScreen, SecretSelectScreen};
pub use sessions::SessionsScreen;
pub use sql_editor::SqlEditorScreen;
