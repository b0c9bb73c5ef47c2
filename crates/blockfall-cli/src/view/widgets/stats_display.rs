use std::{iter, time::Duration};

use blockfall_engine::GameStats;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::style;
use crate::util;

/// Score, level, lines, play time and line clear counts.
pub struct StatsDisplay<'a> {
    stats: &'a GameStats,
    elapsed: Duration,
    block: Option<BlockWidget<'a>>,
}

impl<'a> StatsDisplay<'a> {
    pub fn new(stats: &'a GameStats, elapsed: Duration) -> Self {
        Self {
            stats,
            elapsed,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

type Value = fn(&GameStats, Duration) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(|stats, _| stats.score().to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(|_, elapsed| util::format_duration(elapsed)),
    Row::Empty,
    Row::LabelValue("LEVEL:", |stats, _| stats.level().to_string()),
    Row::LabelValue("LINES:", |stats, _| stats.lines().to_string()),
    Row::Empty,
    Row::LabelValue("PIECES:", |stats, _| stats.locked_pieces().to_string()),
    Row::LabelValue("SINGLES:", |stats, _| stats.line_clear_counter()[1].to_string()),
    Row::LabelValue("DOUBLES:", |stats, _| stats.line_clear_counter()[2].to_string()),
    Row::LabelValue("TRIPLES:", |stats, _| stats.line_clear_counter()[3].to_string()),
    Row::LabelValue("TETRIS:", |stats, _| stats.line_clear_counter()[4].to_string()),
];

impl Widget for StatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;
        let value = |f: Value| f(self.stats, self.elapsed);

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas.iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(f) => {
                    Line::styled(value(f), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, f) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(f), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
