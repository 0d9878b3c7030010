use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Help overlay showing keybindings
pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame) {
        let area = frame.area();

        // Center the help popup
        let popup_width = 56.min(area.width.saturating_sub(4));
        let popup_height = 26.min(area.height.saturating_sub(4));

        let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
        let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
        let popup_area = Rect::new(x, y, popup_width, popup_height);

        // Clear the background
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "Keybindings",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Views",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("1", "All sessions"),
            Self::key_line("2", "Active sessions"),
            Self::key_line("3", "Blocked sessions"),
            Self::key_line("4", "Table statistics"),
            Self::key_line("5", "Custom SQL"),
            Self::key_line("r", "Refresh current view"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Commands",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line(":", "Open command line"),
            Self::key_line("\\c [db]", "Switch database"),
            Self::key_line("\\config", "Edit connection settings"),
            Self::key_line("\\configk8s", "Kubernetes-assisted setup"),
            Self::key_line("\\k8s ...", "Inspect cluster resources"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Navigation",
                Style::default().fg(Color::Yellow),
            )]),
            Self::key_line("j/↓", "Down"),
            Self::key_line("k/↑", "Up"),
            Self::key_line("Enter", "Select"),
            Self::key_line("?", "Toggle this help"),
            Self::key_line("Esc", "Go back"),
            Self::key_line("q", "Quit"),
        ];

        let help_widget = Paragraph::new(help_text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(
                    " Help ",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
        );

        frame.render_widget(help_widget, popup_area);
    }

    fn key_line<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
        Line::from(vec![
            Span::styled(format!("  {:>10}", key), Style::default().fg(Color::Green)),
            Span::styled(format!("  {}", desc), Style::default().fg(Color::White)),
        ])
    }
}
