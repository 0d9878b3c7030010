use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use crate::ui::Theme;

/// Single-line command prompt rendered over the status bar
pub struct CommandLine<'a> {
    input: &'a str,
}

impl<'a> CommandLine<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }
}

impl Widget for CommandLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::status_bar());

        let line = Line::from(vec![
            Span::styled(":", Theme::status_bar_key()),
            Span::styled(self.input, Theme::text()),
            // Block cursor at the insertion point
            Span::styled("█", Theme::text_highlight()),
        ]);

        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));
    }
}
