use std::time::Duration;

use blockfall_engine::{GameStatus, RenderView};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{BoardDisplay, PieceDisplay, PieceStackDisplay, StatsDisplay, color, style};

/// Full game screen: hold and stats on the left, the board, and the queue on the right.
#[derive(Debug)]
pub struct GameDisplay<'a> {
    view: &'a RenderView,
    elapsed: Duration,
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> GameDisplay<'a> {
    pub fn new(view: &'a RenderView, elapsed: Duration) -> Self {
        Self {
            view,
            elapsed,
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }
}

impl Widget for GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GameDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = match self.view.status {
            GameStatus::Playing => color::WHITE,
            GameStatus::Paused => color::YELLOW,
            GameStatus::GameOver => color::RED,
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let game_board = BoardDisplay::new(&self.view.cells)
            .block(Block::bordered().border_style(border_style).style(style::DEFAULT));
        let hold_panel = {
            let title = if self.view.hold_available {
                "HOLD"
            } else {
                "HOLD -"
            };
            let panel = PieceDisplay::new().block(panel(title));
            match &self.view.held {
                Some(shape) => panel.shape(shape),
                None => panel,
            }
        };
        let piece_stack = PieceStackDisplay::new(&self.view.next).block(panel("NEXT"));
        let stats = StatsDisplay::new(&self.view.stats, self.elapsed).block(panel("STATS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(u16::max(hold_panel.width(), stats.width())),
            Constraint::Length(game_board.width()),
            Constraint::Length(piece_stack.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [hold_area, stats_area] = Layout::vertical([
            Constraint::Length(hold_panel.height()),
            Constraint::Length(stats.height()),
        ])
        .spacing(1)
        .areas(left_column);
        let hold_area = hold_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(hold_panel.width())]).flex(Flex::End),
        )[0];
        let stats_area = stats_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(stats.width())]).flex(Flex::End),
        )[0];

        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [piece_stack_area] =
            Layout::vertical([Constraint::Length(piece_stack.height())]).areas(right_column);

        let game_board_width = game_board.width();
        if self.view.held.is_some() || self.view.hold_available {
            hold_panel.render(hold_area, buf);
        }
        stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        if !self.view.next.is_empty() {
            piece_stack.render(piece_stack_area, buf);
        }

        let popup = match self.view.status {
            GameStatus::Playing => None,
            GameStatus::Paused => Some(("PAUSED", Style::new().fg(color::BLACK).bg(color::YELLOW))),
            GameStatus::GameOver => {
                Some(("GAME OVER!!", Style::new().fg(color::WHITE).bg(color::RED)))
            }
        };

        if let Some((text, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::styled(text, style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(1)), buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::{Command, Game, GameConfig, PieceSeed};

    use super::*;

    fn render(view: &RenderView) -> Buffer {
        let area = Rect::new(0, 0, 80, 26);
        let mut buf = Buffer::empty(area);
        GameDisplay::new(view, Duration::from_secs(75)).render(area, &mut buf);
        buf
    }

    fn contains(buf: &Buffer, text: &str) -> bool {
        let width = usize::from(buf.area.width);
        let symbols: Vec<_> = buf.content.iter().map(|cell| cell.symbol().to_owned()).collect();
        symbols.chunks(width).any(|row| row.concat().contains(text))
    }

    #[test]
    fn test_panels_are_drawn() {
        let game = Game::new(GameConfig::default().with_seed(PieceSeed::from_u128(3))).unwrap();
        let buf = render(&game.render());
        for text in ["HOLD", "NEXT", "STATS", "SCORE:", "1:15.00"] {
            assert!(contains(&buf, text), "{text} missing");
        }
        assert!(!contains(&buf, "PAUSED"));
    }

    #[test]
    fn test_paused_popup() {
        let game = Game::new(GameConfig::default())
            .unwrap()
            .apply(Command::TogglePause);
        assert!(contains(&render(&game.render()), "PAUSED"));
    }

    #[test]
    fn test_classic_has_no_side_previews() {
        let game = Game::new(GameConfig::classic()).unwrap();
        let buf = render(&game.render());
        assert!(!contains(&buf, "HOLD"));
        assert!(!contains(&buf, "NEXT"));
    }
}
