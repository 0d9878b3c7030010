use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{Layout, Theme, components::StatusBar},
};

/// Custom SQL input screen
pub struct SqlEditorScreen;

impl SqlEditorScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        Self::render_header(frame, header_area, state);
        Self::render_editor(frame, content_area, state);
        Self::render_status_bar(frame, status_area);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let database = state.current_database.as_deref().unwrap_or("not connected");

        let title = Line::from(vec![
            Span::styled("pgscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(database, Theme::text_highlight()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Custom SQL", Theme::text()),
        ]);

        let header = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_editor(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut text = state.sql_input.clone();
        text.push('█');

        let editor = Paragraph::new(text)
            .style(Theme::text())
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(" SQL ", Theme::title())),
            );

        frame.render_widget(editor, area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect) {
        let status = StatusBar::new().hints(vec![
            ("Enter", "Run"),
            ("Ctrl+u", "Clear"),
            ("Esc", "Back"),
        ]);

        frame.render_widget(status, area);
    }
}
