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

/// Container selection screen
pub struct ContainerSelectScreen;

impl ContainerSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        Self::render_header(frame, header_area, state);
        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let pod_name = state
            .topology
            .selected_pod()
            .map(|p| p.name.as_str())
            .unwrap_or("unknown");

        let title = Line::from(vec![
            Span::styled("pgscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(pod_name, Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Select Container", Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 80);

        let containers = state
            .topology
            .selected_pod()
            .map(|p| p.containers.as_slice())
            .unwrap_or(&[]);

        let items: Vec<(String, bool)> = containers
            .iter()
            .map(|c| {
                let ports: Vec<String> = c.ports.iter().map(|p| p.label()).collect();
                let display = if ports.is_empty() {
                    format!("{}  (no exposed ports)", c.name)
                } else {
                    format!("{}  [{}]", c.name, ports.join(", "))
                };
                (display, false)
            })
            .collect();

        let selector = ListSelector::new(" Containers ").items(items);

        frame.render_stateful_widget(selector, list_area, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let count = state
            .topology
            .selected_pod()
            .map(|p| p.containers.len())
            .unwrap_or(0);

        let status = StatusBar::new()
            .hints(list_nav_hints())
            .right(format!("{} containers", count));

        frame.render_widget(status, area);
    }
}
