use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use pgscope_db::{ConnectError, ConnectionController, Database, custom, dispatch};
use pgscope_k8s::{KubeClient, is_username_key, pod_secret_names, resolve_pod_credentials};
use pgscope_tui::{
    Action, AppState, CommandLine, ConfigFormScreen, ConnStatus, ContainerSelectScreen,
    DatabaseSelectScreen, Event, EventHandler, FormField, HelpOverlay, K8sCommand, KeyBindings,
    KeyContext, Layout, NamespaceSelectScreen, ParsedCommand, PodSelectScreen, Screen,
    SecretKeySelectScreen, SecretSelectScreen, SessionsScreen, SqlEditorScreen, Theme, Tui,
    k8s_usage, parse_command,
};
use pgscope_types::{NamespaceInfo, PodInfo, ProfileStore, QueryMode, SecretInfo, TableData};

/// pgscope - A terminal UI for inspecting PostgreSQL activity in Kubernetes
#[derive(Parser, Debug)]
#[command(name = "pgscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Database host, overriding the stored profile
    #[arg(long)]
    host: Option<String>,

    /// Database port, overriding the stored profile
    #[arg(long)]
    port: Option<String>,

    /// Database name, overriding the stored profile
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing for debugging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Run the application
    let result = run_app(args).await;

    // Handle any errors
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }

    result
}

/// Internal actions for async operations. Each completion carries the
/// generation that started it; results from a superseded generation are
/// dropped on arrival.
enum InternalAction {
    ConnectFinished {
        generation: u64,
        result: Result<Database, ConnectError>,
    },
    InstanceInfoLoaded {
        generation: u64,
        version: Option<String>,
        database: Option<String>,
        databases: Vec<String>,
    },
    QueryFinished {
        generation: u64,
        table: TableData,
    },
    NamespacesLoaded {
        generation: u64,
        namespaces: Vec<NamespaceInfo>,
    },
    PodsLoaded {
        generation: u64,
        pods: Vec<PodInfo>,
    },
    SecretsLoaded {
        generation: u64,
        secrets: Vec<SecretInfo>,
    },
    Error(String),
}

async fn run_app(args: Args) -> Result<()> {
    // Create action channels
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (internal_tx, mut internal_rx) = mpsc::unbounded_channel::<InternalAction>();

    // Initialize state from the stored profile
    let mut state = AppState::new(action_tx.clone());
    let store = ProfileStore::new()?;
    state.profile = store.load_or_default();

    // CLI overrides apply for this run only
    if let Some(host) = args.host {
        state.profile.host = host;
    }
    if let Some(port) = args.port {
        state.profile.port = port;
    }
    if let Some(database) = args.database {
        state.profile.database = database;
    }

    // Kubernetes is optional; without a kubeconfig the database side still works
    let kube = match KubeClient::connect().await {
        Ok(client) => {
            state.k8s_context = Some(client.context().to_string());
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("kubernetes unavailable: {e}");
            None
        }
    };

    // The one live connection lives here, next to the event loop
    let mut controller = ConnectionController::new();

    // Initialize TUI
    let mut tui = Tui::new()?;

    // Initialize event handler
    let mut events = EventHandler::new();

    // Initialize keybindings
    let keybindings = KeyBindings::new();

    // Connect right away when the stored profile is usable
    if state.profile.validate().is_ok() {
        start_connect(&mut state, &mut controller, &internal_tx);
    }

    // Initial render
    render(&mut tui, &mut state)?;

    // Main event loop
    loop {
        tokio::select! {
            // Handle terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let action = if state.command.active {
                            keybindings.get_command_input_action(&key)
                        } else if state.ui_state.help_visible || state.ui_state.error_message.is_some() {
                            keybindings.get_action(KeyContext::Global, &key)
                        } else {
                            match state.current_screen {
                                Screen::Sessions => keybindings.get_action(KeyContext::Sessions, &key),
                                Screen::ConfigForm => keybindings.get_form_input_action(&key),
                                Screen::SqlEditor => keybindings.get_sql_input_action(&key),
                                _ => keybindings.get_action(KeyContext::ListNavigation, &key),
                            }
                        };
                        if let Some(action) = action {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        state.show_error(e);
                    }
                }
            }

            // Handle user actions
            Some(action) = action_rx.recv() => {
                handle_action(&mut state, &mut controller, &store, kube.as_ref(), &internal_tx, action);
            }

            // Handle completions of background work
            Some(internal) = internal_rx.recv() => {
                handle_internal(&mut state, &mut controller, kube.as_ref(), &internal_tx, internal);
            }
        }

        if state.should_quit {
            break;
        }

        render(&mut tui, &mut state)?;
    }

    // Cleanup
    if let Some(db) = controller.disconnect() {
        db.close().await;
    }
    events.shutdown();
    tui.restore()?;

    Ok(())
}

fn handle_action(
    state: &mut AppState,
    controller: &mut ConnectionController,
    store: &ProfileStore,
    kube: Option<&Arc<KubeClient>>,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    action: Action,
) {
    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::GoBack => {
            if state.ui_state.error_message.is_some() {
                state.dismiss_error();
            } else if state.ui_state.help_visible {
                state.ui_state.help_visible = false;
            } else {
                state.go_back();
            }
        }
        Action::ListUp => {
            state.list_up();
        }
        Action::ListDown => {
            state.list_down();
        }
        Action::ListSelect => {
            handle_list_select(state, controller, kube, internal_tx);
        }

        Action::SetMode(mode) => {
            state.mode = mode;
            if mode == QueryMode::Custom {
                state.navigate_to(Screen::SqlEditor);
            } else {
                start_query(state, controller, internal_tx);
            }
        }
        Action::Refresh => {
            start_query(state, controller, internal_tx);
        }

        // Command line
        Action::OpenCommandLine => {
            state.command.open();
        }
        Action::CommandInput(c) => {
            state.command.input_char(c);
        }
        Action::CommandBackspace => {
            state.command.backspace();
        }
        Action::CommandCancel => {
            state.command.cancel();
        }
        Action::CommandSubmit => {
            let input = state.command.take();
            handle_command(state, controller, kube, internal_tx, &input);
        }

        // Connection form
        Action::FormNextField => {
            state.form.next_field();
        }
        Action::FormPrevField => {
            state.form.prev_field();
        }
        Action::FormInput(c) => {
            state.form.input_char(c);
        }
        Action::FormBackspace => {
            state.form.backspace();
        }
        Action::FormToggleMask => {
            state.form.mask_password = !state.form.mask_password;
        }
        Action::FormSubmit => {
            submit_form(state, controller, store, internal_tx);
        }

        // Custom SQL editor
        Action::SqlInput(c) => {
            state.sql_input.push(c);
        }
        Action::SqlBackspace => {
            state.sql_input.pop();
        }
        Action::SqlClear => {
            state.sql_input.clear();
        }
        Action::SqlSubmit => {
            if state.sql_input.trim().is_empty() {
                state.show_error("enter a query first".to_string());
            } else {
                state.mode = QueryMode::Custom;
                state.go_back();
                start_query(state, controller, internal_tx);
            }
        }

        Action::ToggleHelp => {
            state.ui_state.help_visible = !state.ui_state.help_visible;
        }

        Action::Render => {}
    }
}

/// Enter selection on whichever list screen is showing
fn handle_list_select(
    state: &mut AppState,
    controller: &mut ConnectionController,
    kube: Option<&Arc<KubeClient>>,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
) {
    let Some(idx) = state.selected_index() else {
        return;
    };

    match state.current_screen {
        Screen::NamespaceSelect => {
            let Some(namespace) = state.namespaces.get(idx).map(|ns| ns.name.clone()) else {
                return;
            };
            state.topology.select_namespace(namespace.clone());

            let Some(kube) = kube else { return };
            let generation = state.bump_topology_generation();
            let kube = kube.clone();
            let tx = internal_tx.clone();
            tokio::spawn(async move {
                match kube.list_pods(&namespace).await {
                    Ok(pods) => {
                        let _ = tx.send(InternalAction::PodsLoaded { generation, pods });
                    }
                    Err(e) => {
                        let _ = tx.send(InternalAction::Error(format!(
                            "failed to load pods in {namespace}: {e}"
                        )));
                    }
                }
            });
        }
        Screen::PodSelect => {
            if let Err(e) = state.topology.select_pod(idx) {
                state.show_error(e.to_string());
                return;
            }
            after_pod_selected(state, kube, internal_tx);
        }
        Screen::ContainerSelect => {
            if let Err(e) = state.topology.select_container(idx) {
                state.show_error(e.to_string());
                return;
            }
            proceed_to_secrets(state, kube, internal_tx);
        }
        Screen::SecretSelect => {
            if let Err(e) = state.topology.select_secret(idx) {
                state.show_error(e.to_string());
                return;
            }
            state.navigate_to(Screen::SecretKeySelect);
        }
        Screen::SecretKeySelect => {
            let Some(key) = state.secret_keys().get(idx).cloned() else {
                return;
            };
            if let Err(e) = state.topology.select_secret_key(&key) {
                state.show_error(e.to_string());
                return;
            }
            finish_topology_setup(state, &key);
        }
        Screen::DatabaseSelect => {
            let Some(database) = state.databases.get(idx).cloned() else {
                return;
            };
            state.profile = state.profile.with_database(&database);
            state.go_back();
            start_connect(state, controller, internal_tx);
        }
        Screen::Sessions | Screen::ConfigForm | Screen::SqlEditor => {}
    }
}

/// After a pod is chosen: go through container selection only when there is
/// an actual choice to make
fn after_pod_selected(
    state: &mut AppState,
    kube: Option<&Arc<KubeClient>>,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
) {
    let container_count = state
        .topology
        .selected_pod()
        .map(|p| p.containers.len())
        .unwrap_or(0);

    if container_count > 1 {
        state.navigate_to(Screen::ContainerSelect);
    } else {
        proceed_to_secrets(state, kube, internal_tx);
    }
}

/// Seed host and port from the selected endpoint, then fetch the secrets
/// the pod references. The rest of the form keeps whatever is in it; text
/// the operator already typed must survive pod selection.
fn proceed_to_secrets(
    state: &mut AppState,
    kube: Option<&Arc<KubeClient>>,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
) {
    if let Some(host) = state.topology.host().map(str::to_string) {
        state.form.set(FormField::Host, host);
    }
    if let Some(port) = state.topology.default_port().map(|p| p.port) {
        state.form.set(FormField::Port, port.to_string());
    }

    let (Some(kube), Some(namespace)) = (kube, state.topology.namespace().map(str::to_string))
    else {
        apply_resolved_credentials(state);
        state.navigate_to(Screen::ConfigForm);
        return;
    };

    let generation = state.topology_generation();
    let kube = kube.clone();
    let tx = internal_tx.clone();
    tokio::spawn(async move {
        match kube.list_secrets(&namespace).await {
            Ok(secrets) => {
                let _ = tx.send(InternalAction::SecretsLoaded { generation, secrets });
            }
            Err(e) => {
                let _ = tx.send(InternalAction::Error(format!(
                    "failed to load secrets in {namespace}: {e}"
                )));
            }
        }
    });
}

/// Scan the pod for credentials. Discovered values replace whatever the
/// form was seeded with from the stored profile, but never text the
/// operator typed or a secret key they picked.
fn apply_resolved_credentials(state: &mut AppState) {
    let Some(pod) = state.topology.selected_pod() else {
        return;
    };
    let creds = resolve_pod_credentials(pod, state.topology.secrets());
    if let Some(username) = &creds.username {
        state.form.fill_resolved(FormField::Username, username);
    }
    if let Some(password) = &creds.password {
        state.form.fill_resolved(FormField::Password, password);
    }
}

/// An explicit secret key pick lands in the matching credential field and
/// outranks everything the scan found
fn finish_topology_setup(state: &mut AppState, picked_key: &str) {
    if let Some(value) = state
        .topology
        .selected_secret_entry()
        .map(|(_, v)| v.to_string())
    {
        let field = if is_username_key(picked_key) {
            FormField::Username
        } else {
            FormField::Password
        };
        state.form.set_manual(field, value);
    }

    state.navigate_to(Screen::ConfigForm);
}

fn handle_command(
    state: &mut AppState,
    controller: &mut ConnectionController,
    kube: Option<&Arc<KubeClient>>,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    input: &str,
) {
    match parse_command(input) {
        ParsedCommand::SwitchDatabase(Some(database)) => {
            state.profile = state.profile.with_database(&database);
            start_connect(state, controller, internal_tx);
        }
        ParsedCommand::SwitchDatabase(None) => {
            if state.databases.is_empty() {
                state.show_error("no database list available; connect first".to_string());
            } else {
                state.navigate_to(Screen::DatabaseSelect);
            }
        }
        ParsedCommand::OpenConfig => {
            // The plain form edits the profile directly; a cascade left over
            // from an abandoned \configk8s run must not bleed into it
            state.topology.reset();
            let profile = state.profile.clone();
            state.form.load(&profile);
            state.navigate_to(Screen::ConfigForm);
        }
        ParsedCommand::OpenK8sConfig => {
            let Some(kube) = kube else {
                state.show_error("kubernetes is unavailable; no kubeconfig loaded".to_string());
                return;
            };
            // The form is loaded once, up front; the cascade only ever
            // layers host, port, and discovered credentials on top
            let profile = state.profile.clone();
            state.form.load(&profile);
            state.topology.reset();
            let generation = state.bump_topology_generation();
            let kube = kube.clone();
            let tx = internal_tx.clone();
            tokio::spawn(async move {
                match kube.list_namespaces().await {
                    Ok(namespaces) => {
                        let _ = tx.send(InternalAction::NamespacesLoaded {
                            generation,
                            namespaces,
                        });
                    }
                    Err(e) => {
                        let _ = tx.send(InternalAction::Error(format!(
                            "failed to load namespaces: {e}"
                        )));
                    }
                }
            });
        }
        ParsedCommand::K8s(command) => {
            handle_k8s_command(state, kube, internal_tx, command);
        }
        ParsedCommand::Unknown(msg) => {
            state.show_error(msg);
        }
    }
}

/// `\k8s` output lands in the main table like any query result
fn handle_k8s_command(
    state: &mut AppState,
    kube: Option<&Arc<KubeClient>>,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    command: K8sCommand,
) {
    if let K8sCommand::Help = command {
        state.table = TableData::message("\\k8s usage", k8s_usage());
        state.ui_state.list_state.select(Some(0));
        return;
    }

    let Some(kube) = kube else {
        state.show_error("kubernetes is unavailable; no kubeconfig loaded".to_string());
        return;
    };

    if let K8sCommand::Context = command {
        state.table = TableData::message("Kubernetes Context", vec![kube.context().to_string()]);
        state.ui_state.list_state.select(Some(0));
        return;
    }

    let generation = state.bump_query_generation();
    let kube = kube.clone();
    let tx = internal_tx.clone();
    tokio::spawn(async move {
        let table = match command {
            K8sCommand::Namespaces => match kube.list_namespaces().await {
                Ok(namespaces) => namespaces_table(&namespaces),
                Err(e) => TableData::error(e.to_string()),
            },
            K8sCommand::Secrets(namespace) => match kube.list_secrets(&namespace).await {
                Ok(secrets) => secrets_table(&secrets),
                Err(e) => TableData::error(e.to_string()),
            },
            K8sCommand::Secret(namespace, name) => match kube.get_secret(&namespace, &name).await {
                Ok(secret) => secret_table(&secret),
                Err(e) => TableData::error(e.to_string()),
            },
            K8sCommand::Context | K8sCommand::Help => return,
        };
        let _ = tx.send(InternalAction::QueryFinished { generation, table });
    });
}

fn submit_form(
    state: &mut AppState,
    controller: &mut ConnectionController,
    store: &ProfileStore,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
) {
    // A profile built through the cascade needs the walk finished first; a
    // pod with no containers or no exposed port must not be saved
    if state.topology.namespace().is_some() {
        if let Err(e) = state.topology.endpoint_complete() {
            state.show_error(e.to_string());
            return;
        }
    }

    if let Err(e) = state.form.apply(&mut state.profile) {
        state.show_error(e.to_string());
        return;
    }

    // Remember where the endpoint came from so the next setup run can start
    // from the same place
    if let Some(namespace) = state.topology.namespace().map(str::to_string) {
        state.profile.namespace = namespace;
        state.profile.pod = state
            .topology
            .selected_pod()
            .map(|p| p.name.clone())
            .unwrap_or_default();
        state.profile.container = state
            .topology
            .selected_container()
            .map(|c| c.name.clone())
            .unwrap_or_default();
        state.profile.port_name = state
            .topology
            .default_port()
            .and_then(|p| p.name.clone())
            .unwrap_or_default();
        state.profile.secret = state
            .topology
            .selected_secret()
            .map(|s| s.name.clone())
            .unwrap_or_default();
        state.profile.secret_key = state
            .topology
            .selected_secret_key()
            .unwrap_or_default()
            .to_string();
    }

    if let Err(e) = store.save(&state.profile) {
        state.show_error(format!("failed to save profile: {e}"));
        return;
    }

    // Back to the main view, then connect
    state.screen_stack.clear();
    state.current_screen = Screen::Sessions;
    start_connect(state, controller, internal_tx);
}

/// Kick off a connect for the current profile. The previous handle (if any)
/// is closed in the same task before the new pool opens.
fn start_connect(
    state: &mut AppState,
    controller: &mut ConnectionController,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
) {
    let generation = state.bump_connect_generation();
    state.conn = ConnStatus::Connecting;
    state.server_version = None;
    state.current_database = None;

    let previous = controller.begin_connect();
    let profile = state.profile.clone();
    let tx = internal_tx.clone();
    tokio::spawn(async move {
        if let Some(db) = previous {
            db.close().await;
        }
        let result = Database::connect(&profile).await;
        let _ = tx.send(InternalAction::ConnectFinished { generation, result });
    });
}

/// Run the current mode's query in the background
fn start_query(
    state: &mut AppState,
    controller: &ConnectionController,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
) {
    let Some(db) = controller.database().cloned() else {
        state.table = TableData::error("Not connected. Use \\config or \\configk8s to connect.");
        return;
    };

    let generation = state.bump_query_generation();
    let mode = state.mode;
    let sql = state.sql_input.clone();
    let tx = internal_tx.clone();
    tokio::spawn(async move {
        let result = if mode == QueryMode::Custom && !sql.trim().is_empty() {
            custom::run_custom(&db, &sql).await
        } else {
            dispatch::dispatch(&db, mode).await
        };
        let table = match result {
            Ok(table) => table,
            Err(e) => TableData::error(e.to_string()),
        };
        let _ = tx.send(InternalAction::QueryFinished { generation, table });
    });
}

fn handle_internal(
    state: &mut AppState,
    controller: &mut ConnectionController,
    kube: Option<&Arc<KubeClient>>,
    internal_tx: &mpsc::UnboundedSender<InternalAction>,
    internal: InternalAction,
) {
    match internal {
        InternalAction::ConnectFinished { generation, result } => {
            if generation != state.connect_generation() {
                debug!(generation, "discarding stale connect result");
                // A stale success still opened a pool; close it off-loop
                if let Ok(db) = result {
                    tokio::spawn(async move { db.close().await });
                }
                return;
            }

            state.conn = match &result {
                Ok(_) => ConnStatus::Connected,
                Err(e) => ConnStatus::Failed(e.to_string()),
            };
            controller.complete(result);

            if let Some(db) = controller.database().cloned() {
                let tx = internal_tx.clone();
                tokio::spawn(async move {
                    let version = db.version().await.ok();
                    let database = db.current_database().await.ok();
                    let databases = db.databases().await.unwrap_or_default();
                    let _ = tx.send(InternalAction::InstanceInfoLoaded {
                        generation,
                        version,
                        database,
                        databases,
                    });
                });
                start_query(state, controller, internal_tx);
            }
        }

        InternalAction::InstanceInfoLoaded {
            generation,
            version,
            database,
            databases,
        } => {
            if generation != state.connect_generation() {
                debug!(generation, "discarding stale instance info");
                return;
            }
            state.server_version = version.as_deref().map(short_version);
            state.current_database = database;
            state.databases = databases;
        }

        InternalAction::QueryFinished { generation, table } => {
            if generation != state.query_generation() {
                debug!(generation, "discarding stale query result");
                return;
            }
            state.table = table;
            state.ui_state.list_state.select(Some(0));
        }

        InternalAction::NamespacesLoaded {
            generation,
            namespaces,
        } => {
            if generation != state.topology_generation() {
                debug!(generation, "discarding stale namespace list");
                return;
            }
            state.namespaces = namespaces;
            state.navigate_to(Screen::NamespaceSelect);
        }

        InternalAction::PodsLoaded { generation, pods } => {
            if generation != state.topology_generation() {
                debug!(generation, "discarding stale pod list");
                return;
            }
            state.topology.set_pods(pods);
            if state.topology.selected_pod().is_some() {
                // A sole pod was auto-selected; skip the pod picker
                after_pod_selected(state, kube, internal_tx);
            } else {
                state.navigate_to(Screen::PodSelect);
            }
        }

        InternalAction::SecretsLoaded { generation, secrets } => {
            if generation != state.topology_generation() {
                debug!(generation, "discarding stale secret list");
                return;
            }

            // Only secrets the pod actually references are offered
            let referenced = state
                .topology
                .selected_pod()
                .map(pod_secret_names)
                .unwrap_or_default();
            let filtered: Vec<SecretInfo> = secrets
                .into_iter()
                .filter(|s| referenced.iter().any(|name| name == &s.name))
                .collect();

            let any_referenced = !filtered.is_empty();
            state.topology.set_secrets(filtered);
            apply_resolved_credentials(state);
            if any_referenced {
                state.navigate_to(Screen::SecretSelect);
            } else {
                state.navigate_to(Screen::ConfigForm);
            }
        }

        InternalAction::Error(msg) => {
            state.show_error(msg);
        }
    }
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.draw(|frame| {
        match state.current_screen {
            Screen::Sessions => SessionsScreen::render(frame, state),
            Screen::ConfigForm => ConfigFormScreen::render(frame, state),
            Screen::NamespaceSelect => NamespaceSelectScreen::render(frame, state),
            Screen::PodSelect => PodSelectScreen::render(frame, state),
            Screen::ContainerSelect => ContainerSelectScreen::render(frame, state),
            Screen::SecretSelect => SecretSelectScreen::render(frame, state),
            Screen::SecretKeySelect => SecretKeySelectScreen::render(frame, state),
            Screen::DatabaseSelect => DatabaseSelectScreen::render(frame, state),
            Screen::SqlEditor => SqlEditorScreen::render(frame, state),
        }

        // Command line replaces the status bar while open
        if state.command.active {
            let area = frame.area();
            let line = ratatui::layout::Rect::new(
                area.x,
                area.y + area.height.saturating_sub(1),
                area.width,
                1,
            );
            frame.render_widget(CommandLine::new(&state.command.input), line);
        }

        // Render error popup if present
        if let Some(msg) = state.ui_state.error_message.clone() {
            render_error(frame, &msg);
        }

        // Render help overlay if visible
        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    })?;

    Ok(())
}

fn render_error(frame: &mut ratatui::Frame, msg: &str) {
    use ratatui::text::Line;
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let area = frame.area();
    let popup = Layout::centered_popup(area, 60, 6);

    frame.render_widget(Clear, popup);
    let widget = Paragraph::new(vec![
        Line::from(msg.to_string()),
        Line::from(""),
        Line::styled("press Esc to dismiss", Theme::text_dim()),
    ])
    .wrap(Wrap { trim: false })
    .style(Theme::text())
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::error())
            .title(" Error "),
    );
    frame.render_widget(widget, popup);
}

/// "PostgreSQL 16.4 on x86_64..." trimmed to product and version
fn short_version(version: &str) -> String {
    version
        .split_whitespace()
        .take(2)
        .collect::<Vec<_>>()
        .join(" ")
}

fn namespaces_table(namespaces: &[NamespaceInfo]) -> TableData {
    let mut table = TableData::new(vec!["Name".to_string(), "Status".to_string()]);
    for ns in namespaces {
        table.push_row(vec![ns.name.clone(), ns.status.clone()]);
    }
    table
}

fn secrets_table(secrets: &[SecretInfo]) -> TableData {
    let mut table = TableData::new(vec![
        "Name".to_string(),
        "Type".to_string(),
        "Keys".to_string(),
        "Created".to_string(),
    ]);
    for secret in secrets {
        let created = secret
            .created
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        table.push_row(vec![
            secret.name.clone(),
            secret.kind.clone(),
            secret.data.len().to_string(),
            created,
        ]);
    }
    table
}

fn secret_table(secret: &SecretInfo) -> TableData {
    let mut table = TableData::new(vec!["Key".to_string(), "Value".to_string()]);
    for (key, value) in &secret.data {
        table.push_row(vec![key.clone(), value.clone()]);
    }
    table
}
