use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use pgscope_types::QueryMode;

use crate::{
    app::AppState,
    ui::{Layout, Theme, components::StatusBar},
};

/// Widest a single column may grow before its cells get truncated
const MAX_COLUMN_WIDTH: usize = 48;

/// Main inspection table
pub struct SessionsScreen;

impl SessionsScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        Self::render_header(frame, header_area, state);
        Self::render_table(frame, content_area, state);
        Self::render_status_bar(frame, status_area, state);
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
        let mut spans = vec![
            Span::styled("pgscope", Theme::title()),
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(state.conn.label().to_string(), Theme::conn_status(&state.conn)),
        ];

        if let Some(db) = &state.current_database {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(db.clone(), Theme::text_highlight()));
        }

        if let Some(version) = &state.server_version {
            spans.push(Span::styled(" │ ", Theme::text_dim()));
            spans.push(Span::styled(version.clone(), Theme::text_dim()));
        }

        spans.push(Span::styled(" │ ", Theme::text_dim()));
        spans.push(Span::styled(state.mode.label(), Theme::text()));

        let header = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        );

        frame.render_widget(header, area);
    }

    fn render_table(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let table = &state.table;

        if table.headers.is_empty() {
            let hint = match state.mode {
                QueryMode::Custom => "No query has been run yet. Press 5 to open the SQL editor.",
                _ => "No data. Connect with \\config or \\configk8s, then press r.",
            };
            let placeholder = Paragraph::new(Line::from(Span::styled(hint, Theme::text_dim())))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Theme::border()),
                );
            frame.render_widget(placeholder, area);
            return;
        }

        let widths = column_widths(&table.headers, &table.rows, MAX_COLUMN_WIDTH);

        let header_row = Row::new(
            table
                .headers
                .iter()
                .zip(&widths)
                .map(|(h, w)| Cell::from(fit_cell(h, *w)).style(Theme::table_header())),
        );

        let rows = table.rows.iter().map(|row| {
            Row::new(
                row.iter()
                    .zip(&widths)
                    .map(|(cell, w)| Cell::from(fit_cell(cell, *w)).style(Theme::table_row())),
            )
        });

        let constraints: Vec<Constraint> = widths
            .iter()
            .map(|w| Constraint::Length(*w as u16))
            .collect();

        let widget = Table::new(rows, constraints)
            .header(header_row)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border_focused())
                    .title(Span::styled(
                        format!(" {} ", state.mode.label()),
                        Theme::title(),
                    )),
            )
            .row_highlight_style(Theme::table_row_selected())
            .column_spacing(1);

        // The shared selection index drives the table cursor
        let selected = state.ui_state.list_state.selected();
        state.ui_state.table_state.select(selected);
        frame.render_stateful_widget(widget, area, &mut state.ui_state.table_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        let row_count = format!("{} rows", state.table.rows.len());

        let status = StatusBar::new()
            .hints(vec![
                ("1-5", "View"),
                ("r", "Refresh"),
                (":", "Command"),
                ("?", "Help"),
                ("q", "Quit"),
            ])
            .right(row_count);

        frame.render_widget(status, area);
    }
}

/// Compute one display width per column: wide enough for the header and
/// the widest cell, capped at `max`
fn column_widths(headers: &[String], rows: &[Vec<String>], max: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.width()).collect();

    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.width());
            }
        }
    }

    for w in &mut widths {
        *w = (*w).min(max).max(1);
    }
    widths
}

/// Truncate a cell to `max` display columns, ending in an ellipsis when
/// anything was cut
fn fit_cell(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max.saturating_sub(1) {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_cover_header_and_cells() {
        let headers = vec!["PID".to_string(), "Query".to_string()];
        let rows = vec![
            vec!["12345".to_string(), "SELECT 1".to_string()],
            vec!["7".to_string(), "SELECT pg_sleep(10)".to_string()],
        ];

        let widths = column_widths(&headers, &rows, 48);
        assert_eq!(widths, vec![5, 19]);
    }

    #[test]
    fn widths_are_capped() {
        let headers = vec!["Query".to_string()];
        let rows = vec![vec!["x".repeat(200)]];

        assert_eq!(column_widths(&headers, &rows, 48), vec![48]);
    }

    #[test]
    fn fit_cell_passes_short_text_through() {
        assert_eq!(fit_cell("SELECT 1", 20), "SELECT 1");
    }

    #[test]
    fn fit_cell_truncates_with_ellipsis() {
        let out = fit_cell("SELECT * FROM pg_stat_activity", 10);
        assert_eq!(out.width(), 10);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn fit_cell_respects_wide_characters() {
        // Each ideograph occupies two columns
        let out = fit_cell("数据库查询语句", 7);
        assert!(out.width() <= 7);
        assert!(out.ends_with('…'));
    }
}
