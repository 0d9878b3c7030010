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

/// Pod selection screen
pub struct PodSelectScreen;

impl PodSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        Self::render_header(frame, header_area, state);
        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let namespace = state.topology.namespace().unwrap_or("unknown");

        let title = Line::from(vec![
            Span::styled("pgscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(namespace, Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Select Pod", Theme::text()),
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

        let items: Vec<(String, bool)> = state
            .topology
            .pods()
            .iter()
            .map(|pod| {
                let ip = pod.pod_ip.as_deref().unwrap_or("no IP");
                let display = format!("{}  [{}]  {}", pod.name, pod.status.label(), ip);
                (display, false)
            })
            .collect();

        let selector = ListSelector::new(" Pods ").items(items);

        frame.render_stateful_widget(selector, list_area, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let pod_count = format!("{} pods", state.topology.pods().len());

        let status = StatusBar::new().hints(list_nav_hints()).right(pod_count);

        frame.render_widget(status, area);
    }
}
