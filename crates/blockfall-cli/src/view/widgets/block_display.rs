use blockfall_engine::{Cell, Color};
use ratatui::{
    prelude::{Buffer, Rect},
    style::Style,
    widgets::{Paragraph, Widget},
};

use super::style;

/// One grid cell, two terminal columns wide.
#[derive(Debug)]
pub struct BlockDisplay {
    style: Style,
    symbol: &'static str,
}

impl BlockDisplay {
    pub const fn new(style: Style, symbol: &'static str) -> Self {
        Self { style, symbol }
    }

    pub fn width() -> u16 {
        2
    }

    pub fn height() -> u16 {
        1
    }

    pub fn from_cell(cell: Cell, show_dots: bool) -> Self {
        match cell.color() {
            None if show_dots => Self::new(style::EMPTY_DOT, "."),
            None => Self::new(style::EMPTY, ""),
            Some(color) => Self::new(color_style(color), ""),
        }
    }
}

/// Maps an engine color tag to a terminal style.
pub fn color_style(color: Color) -> Style {
    match color {
        Color::Cyan => style::CYAN_BLOCK,
        Color::Blue => style::BLUE_BLOCK,
        Color::Orange => style::ORANGE_BLOCK,
        Color::Yellow => style::YELLOW_BLOCK,
        Color::Green => style::GREEN_BLOCK,
        Color::Purple => style::PURPLE_BLOCK,
        Color::Red => style::RED_BLOCK,
    }
}

impl Widget for BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BlockDisplay {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        // Use a Paragraph to fill the whole area, not just the cells with the symbol
        Paragraph::new(self.symbol)
            .style(self.style)
            .centered()
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use blockfall_engine::PieceKind;

    use super::*;

    #[test]
    fn test_every_kind_has_its_own_style() {
        let styles: Vec<_> = PieceKind::ALL
            .iter()
            .map(|kind| BlockDisplay::from_cell(Cell::Filled(*kind), true).style)
            .collect();
        for (i, a) in styles.iter().enumerate() {
            for b in &styles[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_empty_cell() {
        assert_eq!(BlockDisplay::from_cell(Cell::Empty, true).symbol, ".");
        assert_eq!(BlockDisplay::from_cell(Cell::Empty, false).symbol, "");
    }
}
