use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;

const PLACEHOLDER: &str = "Enter city";

/// City input field. The text being typed is local to the component; the
/// store only hears about it once it is submitted.
#[derive(Debug, Default)]
pub struct SearchInput {
    value: String,
}

pub struct SearchInputProps {
    pub is_focused: bool,
    /// Called with the trimmed city on submit
    pub on_search: fn(String) -> Action,
}

impl SearchInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Hand the trimmed text to `on_search` and clear the field.
    /// Blank input is ignored and left as typed.
    pub fn submit(&mut self, on_search: fn(String) -> Action) -> Option<Action> {
        let city = self.value.trim();
        if city.is_empty() {
            return None;
        }
        let action = on_search(city.to_string());
        self.value.clear();
        Some(action)
    }
}

impl Component<Action> for SearchInput {
    type Props<'a> = SearchInputProps;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        match key.code {
            KeyCode::Enter => self.submit(props.on_search),
            KeyCode::Backspace => self.value.pop().map(|_| Action::Render),
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.value.push(ch);
                Some(Action::Render)
            }
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let border = if props.is_focused {
            Color::Indexed(63)
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Search ");

        let line = if self.value.is_empty() {
            Line::from(Span::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray)))
        } else {
            Line::from(self.value.as_str())
        };
        frame.render_widget(Paragraph::new(line).block(block), area);

        if props.is_focused {
            let typed = u16::try_from(self.value.chars().count()).unwrap_or(u16::MAX);
            let cursor_x = area.x.saturating_add(1).saturating_add(typed);
            let max_x = area.x.saturating_add(area.width.saturating_sub(2));
            frame.set_cursor_position((cursor_x.min(max_x), area.y.saturating_add(1)));
        }
    }
}
