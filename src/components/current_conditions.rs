use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::Component;
use crate::action::Action;
use crate::format::{self, IconSize};
use crate::state::{Units, WeatherSnapshot};

/// Card with the current conditions for the searched city
pub struct CurrentConditions;

pub struct CurrentConditionsProps<'a> {
    pub weather: &'a WeatherSnapshot,
    pub unit: Units,
}

/// Rows the card needs: borders plus five text lines.
pub const CARD_HEIGHT: u16 = 7;

impl Component<Action> for CurrentConditions {
    type Props<'a> = CurrentConditionsProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let weather = props.weather;
        let muted = Style::default().fg(Color::Gray);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                format!(" {} ", format::sanitize(&weather.display_name())),
                Style::default().add_modifier(Modifier::BOLD),
            ));

        let lines = vec![
            Line::from(vec![
                Span::raw(format::icon_glyph(&weather.icon)),
                Span::raw("  "),
                Span::styled(
                    props.unit.format_temp(weather.temperature),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(format::title_case(&format::sanitize(&weather.description))),
            Line::styled(format!("Humidity: {}%", weather.humidity), muted),
            Line::styled(
                format!(
                    "Wind speed: {} {}",
                    weather.wind_speed,
                    props.unit.speed_label()
                ),
                muted,
            ),
            Line::styled(
                format::icon_url(&weather.icon, IconSize::Large),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: true }),
            area,
        );
    }
}
