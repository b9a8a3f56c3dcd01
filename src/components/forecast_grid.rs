use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::Component;
use crate::action::Action;
use crate::format::{self, IconSize};
use crate::state::{Forecast, ForecastEntry, Units};

/// One tile per day, built from the midday forecast slots
pub struct ForecastGrid;

pub struct ForecastGridProps<'a> {
    pub forecast: &'a Forecast,
    pub unit: Units,
}

/// Rows a tile needs: borders plus four text lines.
pub const TILE_HEIGHT: u16 = 6;

const MIN_TILE_WIDTH: u16 = 14;

fn tiles_per_row(days: usize, width: u16) -> usize {
    usize::from(width / MIN_TILE_WIDTH).clamp(1, days.max(1))
}

impl ForecastGrid {
    /// Height needed to show `days` tiles in `width` columns
    pub fn height_for(days: usize, width: u16) -> u16 {
        if days == 0 {
            return 0;
        }
        let rows = days.div_ceil(tiles_per_row(days, width));
        TILE_HEIGHT.saturating_mul(rows as u16)
    }
}

impl Component<Action> for ForecastGrid {
    type Props<'a> = ForecastGridProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let days = props.forecast.daily();
        if days.is_empty() || area.height == 0 {
            return;
        }

        let per_row = tiles_per_row(days.len(), area.width);
        let rows: Vec<_> = days.chunks(per_row).collect();
        let row_areas = Layout::vertical(vec![Constraint::Length(TILE_HEIGHT); rows.len()])
            .split(area);

        for (row, row_area) in rows.iter().zip(row_areas.iter()) {
            let tile_areas =
                Layout::horizontal(vec![Constraint::Ratio(1, per_row as u32); per_row])
                    .split(*row_area);
            for (entry, tile_area) in row.iter().zip(tile_areas.iter()) {
                render_tile(frame, *tile_area, entry, props.unit);
            }
        }
    }
}

fn render_tile(frame: &mut Frame, area: Rect, entry: &ForecastEntry, unit: Units) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            format!(" {} ", entry.date_label()),
            Style::default()
                .fg(Color::Indexed(63))
                .add_modifier(Modifier::BOLD),
        ));

    let lines = vec![
        Line::from(format::icon_glyph(&entry.icon)).centered(),
        Line::from(Span::styled(
            format!(
                "{} / {}",
                unit.format_temp(entry.temp_min),
                unit.format_temp(entry.temp_max)
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::styled(
            format::title_case(&format::sanitize(&entry.description)),
            Style::default().fg(Color::Gray),
        )
        .centered(),
        Line::styled(
            format::icon_url(&entry.icon, IconSize::Small),
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
