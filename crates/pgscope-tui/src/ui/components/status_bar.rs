use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::Theme;

/// One-line bar of key hints with an optional right-aligned summary,
/// typically a row or item count
pub struct StatusBar {
    hints: Vec<(&'static str, &'static str)>,
    right: Option<String>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            right: None,
        }
    }

    /// Keyboard hints as (key, description) pairs
    pub fn hints(mut self, hints: Vec<(&'static str, &'static str)>) -> Self {
        self.hints = hints;
        self
    }

    /// Summary text shown flush right
    pub fn right(mut self, text: impl Into<String>) -> Self {
        self.right = Some(text.into());
        self
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::status_bar());

        let mut spans = Vec::new();
        for (key, desc) in &self.hints {
            if !spans.is_empty() {
                spans.push(Span::styled("  ", Theme::status_bar()));
            }
            spans.push(Span::styled(format!("[{key}]"), Theme::status_bar_key()));
            spans.push(Span::styled(format!(" {desc}"), Theme::status_bar()));
        }

        let line = Line::from(spans);
        let hint_width = line.width() as u16;
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));

        if let Some(right) = self.right {
            // Display width, not byte length; counts may carry arrows later
            let width = right.width() as u16;
            let x = area.right().saturating_sub(width + 1);
            if x > area.x + hint_width + 2 {
                let span = Span::styled(right.as_str(), Theme::status_bar());
                buf.set_span(x, area.y, &span, width);
            }
        }
    }
}

/// Default hints for list navigation screens
pub fn list_nav_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("↑/k", "Up"),
        ("↓/j", "Down"),
        ("Enter", "Select"),
        ("Esc", "Back"),
        ("q", "Quit"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Position;

    fn row_text(buf: &Buffer, area: Rect) -> String {
        (area.x..area.right())
            .map(|x| {
                buf.cell(Position::new(x, area.y))
                    .map(|c| c.symbol())
                    .unwrap_or(" ")
            })
            .collect()
    }

    #[test]
    fn hints_render_left_and_summary_flush_right() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints(vec![("q", "Quit")])
            .right("12 rows")
            .render(area, &mut buf);

        let row = row_text(&buf, area);
        assert!(row.contains("[q] Quit"));
        assert!(row.trim_end().ends_with("12 rows"));
    }

    #[test]
    fn summary_is_dropped_when_it_would_collide() {
        let area = Rect::new(0, 0, 16, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints(vec![("Enter", "Select")])
            .right("999 databases")
            .render(area, &mut buf);

        let row = row_text(&buf, area);
        assert!(!row.contains("databases"));
    }
}
