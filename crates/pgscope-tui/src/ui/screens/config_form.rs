use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, FormField},
    ui::{Layout, Theme, components::StatusBar},
};

/// Connection settings form
pub struct ConfigFormScreen;

impl ConfigFormScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        Self::render_header(frame, header_area, state);
        Self::render_form(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![
            Span::styled("pgscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled("Connection Settings", Theme::text()),
        ];

        // Show provenance when the form was prefilled from a pod
        if let Some(pod) = state.topology.selected_pod() {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(
                format!("{}/{}", pod.namespace, pod.name),
                Theme::text_highlight(),
            ));
        }

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_form(frame: &mut Frame, area: Rect, state: &AppState) {
        // One line per field plus borders and a blank line of padding
        let height = FormField::ALL.len() as u16 + 4;
        let popup_area = Layout::centered_popup(area, 60, height);

        frame.render_widget(Clear, popup_area);

        let mut lines = vec![Line::from("")];
        for field in FormField::ALL {
            let focused = state.form.focused_field() == field;

            let marker = if focused { "▶ " } else { "  " };
            let label_style = if focused {
                Theme::text_highlight()
            } else {
                Theme::text_dim()
            };

            let mut value = state.form.display_value(field);
            if focused {
                value.push('█');
            }

            lines.push(Line::from(vec![
                Span::styled(marker, label_style),
                Span::styled(format!("{:>9}: ", field.label()), label_style),
                Span::styled(value, Theme::text()),
            ]));
        }

        let form = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border_focused())
                .title(Span::styled(" Connection ", Theme::title())),
        );

        frame.render_widget(form, popup_area);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let mask_hint = if state.form.mask_password {
            "Show password"
        } else {
            "Hide password"
        };

        let status = StatusBar::new().hints(vec![
            ("Tab/↓", "Next"),
            ("S-Tab/↑", "Prev"),
            ("Ctrl+p", mask_hint),
            ("Enter", "Save & connect"),
            ("Esc", "Back"),
        ]);

        frame.render_widget(status, area);
    }
}
