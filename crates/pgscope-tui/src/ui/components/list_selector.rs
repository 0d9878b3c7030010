use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget},
};

use crate::ui::Theme;

/// Bordered selection list used by every picker in the setup cascade
pub struct ListSelector {
    title: String,
    entries: Vec<Entry>,
}

struct Entry {
    text: String,
    current: bool,
}

impl ListSelector {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Entries as (display text, marks the active item) pairs. The database
    /// picker flags the database the live connection points at; the other
    /// pickers have no active item.
    pub fn items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        self.entries = items
            .into_iter()
            .map(|(text, current)| Entry {
                text: text.into(),
                current,
            })
            .collect();
        self
    }
}

impl StatefulWidget for ListSelector {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let items: Vec<ListItem> = self
            .entries
            .into_iter()
            .map(|entry| {
                let line = if entry.current {
                    Line::from(vec![
                        Span::styled(entry.text, Theme::list_item_current()),
                        Span::styled(" (current)", Theme::list_item_current()),
                    ])
                } else {
                    Line::from(Span::styled(entry.text, Theme::list_item()))
                };
                ListItem::new(line)
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border_focused())
            .title(Span::styled(self.title, Theme::title()));

        let list = List::new(items)
            .block(block)
            .highlight_style(Theme::list_item_selected())
            .highlight_symbol("▶ ");

        StatefulWidget::render(list, area, buf, state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Position;

    #[test]
    fn only_the_active_entry_carries_the_marker() {
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default();

        let selector = ListSelector::new(" Databases ")
            .items(vec![("postgres".to_string(), false), ("app".to_string(), true)]);
        StatefulWidget::render(selector, area, &mut buf, &mut state);

        let rows: Vec<String> = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| {
                        buf.cell(Position::new(x, y))
                            .map(|c| c.symbol())
                            .unwrap_or(" ")
                    })
                    .collect()
            })
            .collect();

        assert!(rows.iter().any(|r| r.contains("app (current)")));
        assert!(!rows.iter().any(|r| r.contains("postgres (current)")));
    }
}
