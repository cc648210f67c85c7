use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Block;

use crate::config::GridSize;
use crate::game::{BoardView, DisplayView};
use crate::snake::Position;
use crate::ui::hud::render_hud;

/// Terminal columns per grid cell, so cells come out roughly square.
const CELL_WIDTH: u16 = 2;

const GLYPH_CELL: &str = "██";
const GLYPH_BONUS: &str = "◆◆";

const COLOR_SNAKE_HEAD: Color = Color::LightGreen;
const COLOR_SNAKE_BODY: Color = Color::Green;
const COLOR_FOOD: Color = Color::Red;
const COLOR_BONUS: Color = Color::Blue;
const COLOR_BORDER: Color = Color::DarkGray;

/// Renders the full game frame from immutable snapshots.
pub fn render(frame: &mut Frame<'_>, board: &BoardView, display: &DisplayView) {
    let area = centered_board_area(frame.area(), board.bounds);
    let play_area = render_hud(frame, area, display);

    let block = Block::bordered().border_style(Style::new().fg(COLOR_BORDER));
    let inner = block.inner(play_area);
    frame.render_widget(block, play_area);

    render_cell(frame, inner, board.bounds, board.food, GLYPH_CELL, COLOR_FOOD);
    if board.bonus_visible {
        render_cell(
            frame,
            inner,
            board.bounds,
            board.bonus,
            GLYPH_BONUS,
            COLOR_BONUS,
        );
    }
    render_snake(frame, inner, board);
}

fn render_snake(frame: &mut Frame<'_>, inner: Rect, board: &BoardView) {
    for segment in &board.body {
        render_cell(
            frame,
            inner,
            board.bounds,
            *segment,
            GLYPH_CELL,
            COLOR_SNAKE_BODY,
        );
    }

    let Some((x, y)) = logical_to_terminal(inner, board.bounds, board.head) else {
        return;
    };
    frame.buffer_mut().set_string(
        x,
        y,
        GLYPH_CELL,
        Style::new()
            .fg(COLOR_SNAKE_HEAD)
            .add_modifier(Modifier::BOLD),
    );
}

fn render_cell(
    frame: &mut Frame<'_>,
    inner: Rect,
    bounds: GridSize,
    position: Position,
    glyph: &str,
    color: Color,
) {
    let Some((x, y)) = logical_to_terminal(inner, bounds, position) else {
        return;
    };

    frame
        .buffer_mut()
        .set_string(x, y, glyph, Style::new().fg(color));
}

/// Centers the board plus its HUD row inside the terminal.
fn centered_board_area(area: Rect, bounds: GridSize) -> Rect {
    let width = bounds.width.saturating_mul(CELL_WIDTH).saturating_add(2);
    let height = bounds.height.saturating_add(3);

    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [board] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    board
}

fn logical_to_terminal(inner: Rect, bounds: GridSize, position: Position) -> Option<(u16, u16)> {
    if !position.is_within_bounds(bounds) {
        return None;
    }

    let x_offset = u16::try_from(position.x).ok()?.checked_mul(CELL_WIDTH)?;
    let y_offset = u16::try_from(position.y).ok()?;

    let x = inner.x.saturating_add(x_offset);
    let y = inner.y.saturating_add(y_offset);
    if x.saturating_add(CELL_WIDTH) > inner.right() || y >= inner.bottom() {
        return None;
    }

    Some((x, y))
}
