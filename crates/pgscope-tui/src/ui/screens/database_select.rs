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

/// Database picker for `\c` without an argument
pub struct DatabaseSelectScreen;

impl DatabaseSelectScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        Self::render_header(frame, header_area, state);
        Self::render_list(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let host = format!("{}:{}", state.profile.host, state.profile.port);

        let title = Line::from(vec![
            Span::styled("pgscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(host, Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Select Database", Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let list_area = Layout::centered_list(area, 60);

        let current = state.current_database.as_deref();
        let items: Vec<(String, bool)> = state
            .databases
            .iter()
            .map(|db| (db.clone(), Some(db.as_str()) == current))
            .collect();

        let selector = ListSelector::new(" Databases ").items(items);

        frame.render_stateful_widget(selector, list_area, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let count = format!("{} databases", state.databases.len());

        let status = StatusBar::new().hints(list_nav_hints()).right(count);

        frame.render_widget(status, area);
    }
}
