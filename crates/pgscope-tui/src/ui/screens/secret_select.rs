use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        Layout, Theme,
        components::{ListSelector, StatusBar, list_nav_hints},
    },
};

fn render_header(frame: &mut Frame, area: Rect, context: &str, step: &str) {
    let title = Line::from(vec![
        Span::styled("pgscope", Theme::title()),
        Span::styled(" │ ", Theme::text_dim()),
        Span::styled(context.to_string(), Theme::text_highlight()),
        Span::styled(" │ ", Theme::text_dim()),
        Span::styled(step.to_string(), Theme::text()),
    ]);

    let header = Paragraph::new(title).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    frame.render_widget(header, area);
}

/// Secret selection screen
pub struct SecretSelectScreen;

impl SecretSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        let pod_name = state
            .topology
            .selected_pod()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        render_header(frame, header_area, &pod_name, "Select Secret");

        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        let items: Vec<(String, bool)> = state
            .topology
            .secrets()
            .iter()
            .map(|s| {
                let display = format!("{}  [{}]  {} keys", s.name, s.kind, s.data.len());
                (display, false)
            })
            .collect();

        let selector = ListSelector::new(" Secrets ").items(items);

        frame.render_stateful_widget(selector, list_area, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let count = format!("{} secrets", state.topology.secrets().len());

        let status = StatusBar::new().hints(list_nav_hints()).right(count);

        frame.render_widget(status, area);
    }
}

/// Secret key selection screen
pub struct SecretKeySelectScreen;

impl SecretKeySelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        let secret_name = state
            .topology
            .selected_secret()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "unknown".to_string());
        render_header(frame, header_area, &secret_name, "Select Password Key");

        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        // Values stay hidden here; only key names and lengths show
        let items: Vec<(String, bool)> = state
            .topology
            .selected_secret()
            .map(|s| {
                s.data
                    .iter()
                    .map(|(key, value)| {
                        (format!("{}  ({} chars)", key, value.chars().count()), false)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let selector = ListSelector::new(" Secret Keys ").items(items);

        frame.render_stateful_widget(selector, list_area, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let count = format!("{} keys", state.secret_keys().len());

        let status = StatusBar::new().hints(list_nav_hints()).right(count);

        frame.render_widget(status, area);
    }
}
