use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

use crate::input::Command;
use crate::session::Snapshot;
use crate::{Coord, Direction};

/// On/off bitmap of the board, used for Braille output.
#[derive(Debug, Clone)]
pub struct Raster2D {
    pub width: Coord,
    pub height: Coord,
    pub cells: Vec<bool>,
}

impl Raster2D {
    pub fn new(width: Coord, height: Coord) -> Self {
        let size = (width.max(0) as usize).saturating_mul(height.max(0) as usize);
        Self {
            width,
            height,
            cells: vec![false; size],
        }
    }

    #[inline]
    fn idx(&self, x: Coord, y: Coord) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some(y as usize * self.width as usize + x as usize)
        }
    }

    pub fn set(&mut self, x: Coord, y: Coord, on: bool) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = on;
        }
    }

    /// Off for anything outside the raster.
    pub fn get(&self, x: Coord, y: Coord) -> bool {
        self.idx(x, y).is_some_and(|i| self.cells[i])
    }
}

/// Rasterizes snake and food, padding the size up to whole Braille glyphs
/// (2 dots wide, 4 dots tall).
pub fn rasterize(snap: &Snapshot) -> Raster2D {
    let w = round_up(snap.dimension, 2);
    let h = round_up(snap.dimension, 4);
    let mut r = Raster2D::new(w, h);
    for seg in &snap.segments {
        r.set(seg.cell.x, seg.cell.y, true);
    }
    if let Some(food) = snap.food {
        r.set(food.x, food.y, true);
    }
    r
}

fn round_up(v: Coord, to: Coord) -> Coord {
    (v + to - 1) / to * to
}

/// Dot bit for position (row, column) inside one Braille glyph.
const BRAILLE_DOTS: [[u32; 2]; 4] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// Print raster in braille, one glyph per 2x4 block of cells.
pub fn render_braille(raster: &Raster2D) -> String {
    let cols = (raster.width + 1) / 2;
    let rows = (raster.height + 3) / 4;

    (0..rows)
        .map(|row| {
            (0..cols)
                .map(|col| {
                    let mut bits = 0u32;
                    for (dy, dots) in BRAILLE_DOTS.iter().enumerate() {
                        for (dx, bit) in dots.iter().enumerate() {
                            if raster.get(col * 2 + dx as Coord, row * 4 + dy as Coord) {
                                bits |= bit;
                            }
                        }
                    }
                    char::from_u32(0x2800 + bits).unwrap_or(' ')
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardStyle {
    /// Two terminal columns per cell, head and food in colour.
    #[default]
    Blocks,
    /// Dense monochrome Braille dots.
    Braille,
}

impl BoardStyle {
    /// Terminal size (columns, rows) needed for a board.
    pub fn size(self, dimension: Coord) -> (u16, u16) {
        let d = u16::try_from(dimension.max(0)).unwrap_or(u16::MAX);
        match self {
            Self::Blocks => (d.saturating_mul(2), d),
            Self::Braille => (d.div_ceil(2), d.div_ceil(4)),
        }
    }
}

/// Draws a snapshot's board into a ratatui buffer.
pub struct BoardView<'a> {
    snap: &'a Snapshot,
    style: BoardStyle,
}

impl<'a> BoardView<'a> {
    pub fn new(snap: &'a Snapshot, style: BoardStyle) -> Self {
        Self { snap, style }
    }

    fn render_blocks(&self, area: Rect, buf: &mut Buffer) {
        let grid_style = Style::default().fg(Color::DarkGray);
        let put = |buf: &mut Buffer, x: Coord, y: Coord, sym: &str, style: Style| {
            let col = area.x as i32 + x * 2;
            let row = area.y as i32 + y;
            if x < 0 || y < 0 || col + 1 >= area.right() as i32 || row >= area.bottom() as i32 {
                return;
            }
            buf.set_string(col as u16, row as u16, sym, style);
        };

        for y in 0..self.snap.dimension {
            for x in 0..self.snap.dimension {
                put(buf, x, y, "· ", grid_style);
            }
        }

        if let Some(food) = self.snap.food {
            put(buf, food.x, food.y, "()", Style::default().fg(Color::Red));
        }

        // Tail first so the head always ends up on top.
        for seg in self.snap.segments.iter().rev() {
            if seg.head {
                let colour = if self.snap.grew {
                    Color::Yellow
                } else {
                    Color::LightGreen
                };
                let sym = match self.snap.direction {
                    Some(Direction::Up) => "▀▀",
                    Some(Direction::Down) => "▄▄",
                    Some(Direction::Left) => "◀█",
                    Some(Direction::Right) => "█▶",
                    None => "██",
                };
                let style = Style::default().fg(colour).add_modifier(Modifier::BOLD);
                put(buf, seg.cell.x, seg.cell.y, sym, style);
            } else {
                put(buf, seg.cell.x, seg.cell.y, "██", Style::default().fg(Color::Green));
            }
        }
    }

    fn render_braille(&self, area: Rect, buf: &mut Buffer) {
        let text = render_braille(&rasterize(self.snap));
        for (i, line) in text.lines().enumerate() {
            let row = area.y + i as u16;
            if row >= area.bottom() {
                break;
            }
            buf.set_stringn(area.x, row, line, area.width as usize, Style::default());
        }
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.style {
            BoardStyle::Blocks => self.render_blocks(area, buf),
            BoardStyle::Braille => self.render_braille(area, buf),
        }
    }
}

/// Row of clickable buttons mirroring the keyboard commands.
#[derive(Debug, Clone)]
pub struct ButtonBar {
    buttons: Vec<(Rect, &'static str, Command)>,
}

impl ButtonBar {
    pub const HEIGHT: u16 = 1;

    /// Lays the buttons out left to right from the start of `area`.
    pub fn new(area: Rect, with_pause: bool) -> Self {
        let mut specs: Vec<(&'static str, Command)> = vec![
            ("[ ↑ ]", Command::Turn(Direction::Up)),
            ("[ ↓ ]", Command::Turn(Direction::Down)),
            ("[ ← ]", Command::Turn(Direction::Left)),
            ("[ → ]", Command::Turn(Direction::Right)),
        ];
        if with_pause {
            specs.push(("[ pause ]", Command::TogglePause));
        }
        specs.push(("[ restart ]", Command::Restart));

        let mut x = area.x;
        let mut buttons = Vec::with_capacity(specs.len());
        for (label, cmd) in specs {
            let w = label.chars().count() as u16;
            if x + w > area.right() {
                break;
            }
            buttons.push((Rect::new(x, area.y, w, Self::HEIGHT), label, cmd));
            x += w + 1;
        }
        Self { buttons }
    }

    pub fn command_at(&self, column: u16, row: u16) -> Option<Command> {
        self.buttons
            .iter()
            .find(|(r, _, _)| {
                column >= r.x && column < r.right() && row >= r.y && row < r.bottom()
            })
            .map(|(_, _, cmd)| *cmd)
    }
}

impl Widget for &ButtonBar {
    fn render(self, _area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::Cyan);
        for (r, label, _) in &self.buttons {
            buf.set_string(r.x, r.y, *label, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{GameState, Segment};
    use crate::Cell;
    use std::time::Duration;

    fn snap(segments: &[Cell], food: Option<Cell>) -> Snapshot {
        Snapshot {
            dimension: 4,
            segments: segments
                .iter()
                .enumerate()
                .map(|(i, &cell)| Segment { cell, head: i == 0 })
                .collect(),
            food,
            score: 0,
            high_score: 0,
            grew: false,
            state: GameState::Running,
            direction: Some(Direction::Right),
            interval: Duration::from_millis(120),
            supports_pause: false,
        }
    }

    #[test]
    fn raster_bounds() {
        let mut r = Raster2D::new(2, 2);
        r.set(1, 1, true);
        r.set(2, 0, true);
        assert!(r.get(1, 1));
        assert!(!r.get(2, 0));
        assert!(!r.get(-1, 0));
    }

    #[test]
    fn braille_glyphs() {
        let mut r = Raster2D::new(2, 4);
        assert_eq!(render_braille(&r), "\u{2800}");
        r.set(0, 0, true);
        assert_eq!(render_braille(&r), "\u{2801}");
        r.set(1, 3, true);
        assert_eq!(render_braille(&r), "\u{2881}");
    }

    #[test]
    fn rasterize_pads_and_marks() {
        let s = Snapshot {
            dimension: 5,
            ..snap(&[Cell::new(0, 0), Cell::new(1, 0)], Some(Cell::new(4, 4)))
        };
        let r = rasterize(&s);
        assert_eq!((r.width, r.height), (6, 8));
        assert!(r.get(0, 0) && r.get(1, 0) && r.get(4, 4));
        assert_eq!(r.cells.iter().filter(|&&on| on).count(), 3);
        assert_eq!(render_braille(&r).lines().count(), 2);
    }

    #[test]
    fn blocks_draw_head_and_food() {
        let s = snap(&[Cell::new(1, 1), Cell::new(0, 1)], Some(Cell::new(3, 2)));
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        BoardView::new(&s, BoardStyle::Blocks).render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..8u16)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert_eq!(row(1), "███▶· · ");
        assert_eq!(row(2), "· · · ()");
    }

    #[test]
    fn style_sizes() {
        assert_eq!(BoardStyle::Blocks.size(20), (40, 20));
        assert_eq!(BoardStyle::Braille.size(20), (10, 5));
        assert_eq!(BoardStyle::Blocks.size(70_000), (u16::MAX, u16::MAX));
        assert_eq!(BoardStyle::Braille.size(-3), (0, 0));
    }

    #[test]
    fn raster_indexes_wide_boards() {
        let mut r = Raster2D::new(1024, 1024);
        assert_eq!(r.cells.len(), 1024 * 1024);
        r.set(1023, 1023, true);
        assert!(r.get(1023, 1023));
        assert!(!r.get(1024, 0));
        assert_eq!(Raster2D::new(-5, 10).cells.len(), 0);
    }

    #[test]
    fn buttons_hit_test() {
        let bar = ButtonBar::new(Rect::new(0, 10, 80, 1), true);
        assert_eq!(bar.command_at(0, 10), Some(Command::Turn(Direction::Up)));
        assert_eq!(bar.command_at(4, 10), Some(Command::Turn(Direction::Up)));
        assert_eq!(bar.command_at(5, 10), None);
        assert_eq!(bar.command_at(6, 10), Some(Command::Turn(Direction::Down)));
        assert_eq!(bar.command_at(24, 10), Some(Command::TogglePause));
        assert_eq!(bar.command_at(0, 11), None);

        let bar = ButtonBar::new(Rect::new(0, 0, 80, 1), false);
        assert_eq!(bar.command_at(24, 0), Some(Command::Restart));
    }
}
