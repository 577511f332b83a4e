// TUI widget modules, one per screen plus the shared bars and overlays.

pub mod auth;
pub mod career;
pub mod compatibility;
pub mod dashboard;
pub mod help_bar;
pub mod home;
pub mod notice;
pub mod profile;
pub mod quit_confirm;
pub mod report;
pub mod result;
pub mod share;
pub mod status_bar;
pub mod test;

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use mindmbti_api::models::{Percentages, ReportBody};
use mindmbti_app::protocol::RequestSlot;
use mindmbti_core::mbti::Dimension;

use super::form::FormState;
use super::ViewState;

/// Shown under a request that has been pending for a while.
pub const SLOW_HINT: &str = "서버가 준비 중일 수 있습니다. (무료 서버는 15분 비활성 시 Sleep 됩니다)";

/// Bordered block with a bold title.
pub fn panel(title: &str) -> Block<'_> {
    Block::default().borders(Borders::ALL).title(Span::styled(
        format!(" {title} "),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

pub fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Lines describing the state of `slot`: loading, slow, or failed.
/// Empty when the slot is idle and healthy.
pub fn request_lines(state: &ViewState, slot: RequestSlot, busy: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if state.is_loading(slot) {
        lines.push(Line::from(Span::styled(
            busy.to_string(),
            Style::default().fg(Color::Yellow),
        )));
        if state.is_slow(slot) {
            lines.push(Line::from(Span::styled(
                SLOW_HINT,
                Style::default().fg(Color::DarkGray),
            )));
        }
    }
    if let Some(message) = state.error(slot) {
        lines.push(Line::from(Span::styled(
            format!("오류: {message}  (r: 다시 시도)"),
            Style::default().fg(Color::Red),
        )));
    }
    lines
}

/// One line per field; the focused one is highlighted.
pub fn form_lines(form: &FormState) -> Vec<Line<'static>> {
    form.fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let focused = idx == form.focus;
            let marker = if focused { "> " } else { "  " };
            let value_style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
            } else {
                Style::default().fg(Color::White)
            };
            let mut value = field.display();
            if focused && field.is_editable() {
                value.push('_');
            }
            Line::from(vec![
                Span::styled(marker, Style::default().fg(Color::Yellow)),
                Span::styled(
                    format!("{}: ", field.label),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect()
}

/// Render a form with its title into `area`.
pub fn render_form(frame: &mut Frame, area: Rect, title: &str, form: &FormState) {
    let paragraph = Paragraph::new(form_lines(form)).block(panel(title));
    frame.render_widget(paragraph, area);
}

/// Render scrollable text into a titled panel.
pub fn render_body(frame: &mut Frame, area: Rect, title: &str, lines: Vec<Line<'static>>, scroll: u16) {
    let paragraph = Paragraph::new(lines)
        .block(panel(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// `E 62% ████████░░░░░ 38% I`
pub fn split_line(dimension: Dimension, percentages: &Percentages) -> Line<'static> {
    const WIDTH: usize = 20;
    let (a, b) = dimension.poles();
    let Some((pa, pb)) = percentages.split(dimension) else {
        return Line::from(format!("{a} ?{}? {b}", " ".repeat(WIDTH)));
    };
    let filled = ((pa / 100.0) * WIDTH as f64).round().clamp(0.0, WIDTH as f64) as usize;
    let (lead, trail) = if pa >= pb {
        (Color::Green, Color::DarkGray)
    } else {
        (Color::DarkGray, Color::Green)
    };
    Line::from(vec![
        Span::styled(format!("{a} {pa:>3.0}% "), Style::default().fg(lead)),
        Span::styled("█".repeat(filled), Style::default().fg(lead)),
        Span::styled("░".repeat(WIDTH - filled), Style::default().fg(trail)),
        Span::styled(format!(" {pb:>3.0}% {b}"), Style::default().fg(trail)),
    ])
}

pub fn percentage_lines(percentages: &Percentages) -> Vec<Line<'static>> {
    Dimension::ALL
        .into_iter()
        .map(|d| split_line(d, percentages))
        .collect()
}

/// The common report sections shared by the report and share screens.
pub fn report_body_lines(body: &ReportBody) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if !body.keywords.is_empty() {
        lines.push(Line::from(format!("키워드: {}", body.keywords.join(", "))));
    }
    for (label, text) in [
        ("강점", &body.strengths),
        ("약점", &body.weaknesses),
        ("스트레스 반응", &body.stress_reaction),
        ("의사결정 스타일", &body.decision_style),
    ] {
        if text.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(
            format!("{label}:"),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(text.clone()));
    }
    lines
}

pub fn bullet_lines(items: &[String]) -> Vec<Line<'static>> {
    items.iter().map(|item| Line::from(format!("  • {item}"))).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
