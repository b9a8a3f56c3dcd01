use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::current_conditions::CARD_HEIGHT;
use super::recent_searches::BAR_HEIGHT;
use super::{
    Component, CurrentConditions, CurrentConditionsProps, ForecastGrid, ForecastGridProps,
    RecentSearchesBar, RecentSearchesProps, SearchInput, SearchInputProps,
};
use crate::action::Action;
use crate::state::{AppState, FetchStatus, Focus};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
pub const TITLE: &str = "Weather Dashboard";

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Props for Dashboard - read-only view of state
pub struct DashboardProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole screen: search field, unit toggle, results and history
#[derive(Debug, Default)]
pub struct Dashboard {
    search: SearchInput,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_input(&self) -> &SearchInput {
        &self.search
    }

    fn handle_search_keys(&mut self, event: &EventKind) -> Vec<Action> {
        if let EventKind::Key(key) = event {
            match key.code {
                KeyCode::Esc => return vec![Action::Quit],
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return vec![Action::Quit];
                }
                KeyCode::Tab | KeyCode::Down => return vec![Action::UiFocusRecent],
                KeyCode::F(2) => return vec![Action::UiToggleUnits],
                _ => {}
            }
        }

        self.search
            .handle_event(
                event,
                SearchInputProps {
                    is_focused: true,
                    on_search: Action::SearchSubmit,
                },
            )
            .into_iter()
            .collect()
    }

    fn handle_recent_keys(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        if let EventKind::Key(key) = event {
            match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Esc => {
                    return vec![Action::UiFocusSearch];
                }
                KeyCode::Char('u') | KeyCode::F(2) => return vec![Action::UiToggleUnits],
                KeyCode::Char('q') => return vec![Action::Quit],
                _ => {}
            }
        }

        RecentSearchesBar
            .handle_event(event, recent_props(state, true))
            .into_iter()
            .collect()
    }
}

fn recent_props(state: &AppState, is_focused: bool) -> RecentSearchesProps<'_> {
    RecentSearchesProps {
        recent: &state.recent,
        selected: state.recent_selected,
        is_focused,
        on_select: Action::RecentSelect,
        on_confirm: Action::RecentConfirm,
    }
}

impl Component<Action> for Dashboard {
    type Props<'a> = DashboardProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match props.state.focus {
            Focus::Search => self.handle_search_keys(event),
            Focus::Recent => self.handle_recent_keys(event, props.state),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: DashboardProps<'_>) {
        let state = props.state;
        let recent_height = if state.recent.is_empty() { 0 } else { BAR_HEIGHT };

        let chunks = Layout::vertical([
            Constraint::Length(1),             // Title
            Constraint::Length(3),             // Search input
            Constraint::Length(1),             // Unit toggle
            Constraint::Length(1),             // Error
            Constraint::Min(1),                // Results
            Constraint::Length(recent_height), // Recent searches
            Constraint::Length(1),             // Help bar
        ])
        .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(TITLE.bold()).centered()),
            chunks[0],
        );

        let search_focused = props.is_focused && state.focus == Focus::Search;
        self.search.render(
            frame,
            chunks[1],
            SearchInputProps {
                is_focused: search_focused,
                on_search: Action::SearchSubmit,
            },
        );

        render_unit_toggle(frame, chunks[2], state);

        if let Some(error) = state.status.error() {
            render_error(frame, chunks[3], error);
        }

        render_results(frame, chunks[4], state);

        RecentSearchesBar.render(
            frame,
            chunks[5],
            recent_props(state, props.is_focused && state.focus == Focus::Recent),
        );

        render_status_bar(frame, chunks[6], state.focus);
    }
}

fn render_unit_toggle(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = Line::from(vec![
        Span::styled("F2", Style::default().fg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(
            format!(" {} ", state.unit.toggle_label()),
            Style::default().fg(Color::White).bg(Color::Indexed(63)),
        ),
    ])
    .centered();
    frame.render_widget(Paragraph::new(line), area);
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let line = Line::from(vec![
        Span::raw(ERROR_ICON),
        Span::raw(" "),
        Span::styled(
            crate::format::sanitize(error),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
    ])
    .centered();
    frame.render_widget(Paragraph::new(line), area);
}

fn render_results(frame: &mut Frame, area: Rect, state: &AppState) {
    match &state.status {
        FetchStatus::Idle => {
            let hint = Line::from(vec![
                Span::styled("Type a city and press ", Style::default().fg(Color::DarkGray)),
                Span::styled("Enter", Style::default().fg(Color::Cyan).bold()),
            ])
            .centered();
            render_centered_line(frame, area, hint);
        }
        FetchStatus::Loading => {
            let frame_index = state.tick_count as usize % SPINNER_FRAMES.len();
            let spinner = Line::from(vec![
                Span::styled(SPINNER_FRAMES[frame_index], Style::default().fg(Color::Indexed(63))),
                Span::styled(" Loading...", Style::default().fg(Color::DarkGray)),
            ])
            .centered();
            render_centered_line(frame, area, spinner);
        }
        FetchStatus::Failed(_) => {}
        FetchStatus::Ready { weather, forecast } => {
            let grid_height = ForecastGrid::height_for(forecast.daily().len(), area.width);
            let chunks = Layout::vertical([
                Constraint::Length(CARD_HEIGHT),
                Constraint::Length(grid_height),
            ])
            .split(area);
            CurrentConditions.render(
                frame,
                chunks[0],
                CurrentConditionsProps {
                    weather,
                    unit: state.unit,
                },
            );
            ForecastGrid.render(
                frame,
                chunks[1],
                ForecastGridProps {
                    forecast,
                    unit: state.unit,
                },
            );
        }
        FetchStatus::Partial { weather, .. } => {
            let chunks = Layout::vertical([Constraint::Length(CARD_HEIGHT)]).split(area);
            CurrentConditions.render(
                frame,
                chunks[0],
                CurrentConditionsProps {
                    weather,
                    unit: state.unit,
                },
            );
        }
    }
}

fn render_centered_line(frame: &mut Frame, area: Rect, line: Line<'_>) {
    let chunks = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area);
    frame.render_widget(Paragraph::new(line), chunks[0]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, focus: Focus) {
    let hints = match focus {
        Focus::Search => vec![
            StatusBarHint::new("enter", "search"),
            StatusBarHint::new("tab", "recent"),
            StatusBarHint::new("F2", "units"),
            StatusBarHint::new("esc", "quit"),
        ],
        Focus::Recent => vec![
            StatusBarHint::new("←/→", "select"),
            StatusBarHint::new("enter", "search"),
            StatusBarHint::new("u", "units"),
            StatusBarHint::new("tab", "input"),
            StatusBarHint::new("q", "quit"),
        ],
    };

    let mut status_bar = StatusBar::new();
    <StatusBar as Component<Action>>::render(
        &mut status_bar,
        frame,
        area,
        StatusBarProps {
            left: StatusBarSection::empty(),
            center: StatusBarSection::hints(hints.as_slice()),
            right: StatusBarSection::empty(),
            style: StatusBarStyle::default(),
            is_focused: false,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use tui_dispatch::testing::*;

    fn key_event(code: KeyCode) -> EventKind {
        EventKind::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_search_focus_routes_text_to_input() {
        let mut dashboard = Dashboard::new();
        let state = AppState::default();

        for ch in "Oslo".chars() {
            let props = DashboardProps {
                state: &state,
                is_focused: true,
            };
            let actions: Vec<_> = dashboard
                .handle_event(&key_event(KeyCode::Char(ch)), props)
                .into_iter()
                .collect();
            actions.assert_first(Action::Render);
        }
        assert_eq!(dashboard.search_input().value(), "Oslo");

        let props = DashboardProps {
            state: &state,
            is_focused: true,
        };
        let actions: Vec<_> = dashboard
            .handle_event(&key_event(KeyCode::Enter), props)
            .into_iter()
            .collect();
        actions.assert_first(Action::SearchSubmit("Oslo".into()));
    }

    #[test]
    fn test_recent_focus_keys() {
        let mut dashboard = Dashboard::new();
        let state = AppState {
            focus: Focus::Recent,
            recent: crate::state::RecentSearches::from_cities(["Oslo".to_string()]),
            ..Default::default()
        };

        let actions: Vec<_> = dashboard
            .handle_event(
                &key_event(KeyCode::Char('u')),
                DashboardProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::UiToggleUnits);

        let actions: Vec<_> = dashboard
            .handle_event(
                &key_event(KeyCode::Tab),
                DashboardProps {
                    state: &state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        actions.assert_first(Action::UiFocusSearch);
        assert_eq!(dashboard.search_input().value(), "");
    }

    #[test]
    fn test_unfocused_ignores() {
        let mut dashboard = Dashboard::new();
        let state = AppState::default();
        let actions: Vec<_> = dashboard
            .handle_event(
                &key_event(KeyCode::F(2)),
                DashboardProps {
                    state: &state,
                    is_focused: false,
                },
            )
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_loading() {
        let mut render = RenderHarness::new(60, 24);
        let mut dashboard = Dashboard::new();
        let state = AppState {
            status: FetchStatus::Loading,
            ..Default::default()
        };

        let output = render.render_to_string_plain(|frame| {
            let props = DashboardProps {
                state: &state,
                is_focused: true,
            };
            dashboard.render(frame, frame.area(), props);
        });

        assert!(output.contains("Loading..."));
        assert!(output.contains("Weather Dashboard"));
    }
}
