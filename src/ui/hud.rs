use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::game::DisplayView;

const SCORE_LABEL: &str = "Score: ";
const TIME_LABEL: &str = "Time: ";
const BONUS_LABEL: &str = "  Bonus ";

/// Renders the score/time row and returns the remaining area below it.
#[must_use]
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, display: &DisplayView) -> Rect {
    let [hud_area, play_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);

    let time_line = time_line(&display.elapsed);
    let [score_area, time_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(line_width(&time_line)),
    ])
    .areas(hud_area);

    frame.render_widget(
        Paragraph::new(score_line(display.score, display.bonus_remaining))
            .alignment(Alignment::Left),
        score_area,
    );
    frame.render_widget(
        Paragraph::new(time_line).alignment(Alignment::Right),
        time_area,
    );

    play_area
}

fn score_line(score: u32, bonus_remaining: Option<u32>) -> Line<'static> {
    let mut spans = vec![
        Span::styled(SCORE_LABEL, Style::default().fg(Color::DarkGray)),
        Span::styled(
            score.to_string(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(secs) = bonus_remaining {
        spans.push(Span::styled(
            BONUS_LABEL,
            Style::default().fg(Color::DarkGray),
        ));
        spans.push(Span::styled(
            format!("{secs}s"),
            Style::default().fg(Color::Blue),
        ));
    }

    Line::from(spans)
}

fn time_line(elapsed: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(TIME_LABEL, Style::default().fg(Color::DarkGray)),
        Span::styled(elapsed.to_owned(), Style::default().fg(Color::White)),
    ])
}

fn line_width(line: &Line<'_>) -> u16 {
    let width: usize = line
        .spans
        .iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum();
    u16::try_from(width).unwrap_or(u16::MAX)
}
