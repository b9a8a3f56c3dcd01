use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::format;
use crate::state::RecentSearches;

/// Chip row of recently searched cities
pub struct RecentSearchesBar;

pub struct RecentSearchesProps<'a> {
    pub recent: &'a RecentSearches,
    pub selected: usize,
    pub is_focused: bool,
    pub on_select: fn(usize) -> Action,
    pub on_confirm: Action,
}

pub const BAR_HEIGHT: u16 = 3;

impl Component<Action> for RecentSearchesBar {
    type Props<'a> = RecentSearchesProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.recent.is_empty() {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        let last = props.recent.len() - 1;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                Some((props.on_select)(props.selected.saturating_sub(1)))
            }
            KeyCode::Right | KeyCode::Char('l') => {
                Some((props.on_select)((props.selected + 1).min(last)))
            }
            KeyCode::Enter => Some(props.on_confirm),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.recent.is_empty() {
            return;
        }

        let chip = Style::default().fg(Color::Indexed(63)).bg(Color::Indexed(189));
        let mut spans = Vec::with_capacity(props.recent.len() * 2);
        for (index, city) in props.recent.as_slice().iter().enumerate() {
            let style = if props.is_focused && index == props.selected {
                chip.add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                chip
            };
            spans.push(Span::styled(format!(" {} ", format::sanitize(city)), style));
            spans.push(Span::raw(" "));
        }

        let border = if props.is_focused {
            Color::Indexed(63)
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Recent Searches ");

        frame.render_widget(
            Paragraph::new(Line::from(spans).centered())
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyModifiers};
    use tui_dispatch::testing::*;

    fn recent() -> RecentSearches {
        RecentSearches::from_cities(["Tokyo", "Paris", "Lima"].map(String::from))
    }

    fn press(recent: &RecentSearches, selected: usize, code: KeyCode) -> Vec<Action> {
        let mut bar = RecentSearchesBar;
        let event = EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE));
        bar.handle_event(
            &event,
            RecentSearchesProps {
                recent,
                selected,
                is_focused: true,
                on_select: Action::RecentSelect,
                on_confirm: Action::RecentConfirm,
            },
        )
        .into_iter()
        .collect()
    }

    #[test]
    fn test_arrows_move_selection_within_bounds() {
        let recent = recent();
        press(&recent, 0, KeyCode::Right).assert_first(Action::RecentSelect(1));
        press(&recent, 2, KeyCode::Right).assert_first(Action::RecentSelect(2));
        press(&recent, 0, KeyCode::Left).assert_first(Action::RecentSelect(0));
    }

    #[test]
    fn test_enter_confirms() {
        press(&recent(), 1, KeyCode::Enter).assert_first(Action::RecentConfirm);
    }

    #[test]
    fn test_render_chips() {
        let recent = recent();
        let mut render = RenderHarness::new(50, BAR_HEIGHT);
        let mut bar = RecentSearchesBar;

        let output = render.render_to_string_plain(|frame| {
            bar.render(
                frame,
                frame.area(),
                RecentSearchesProps {
                    recent: &recent,
                    selected: 0,
                    is_focused: false,
                    on_select: Action::RecentSelect,
                    on_confirm: Action::RecentConfirm,
                },
            );
        });

        assert!(output.contains("Recent Searches"));
        assert!(output.contains("Tokyo"));
        assert!(output.contains("Lima"));
    }
}
