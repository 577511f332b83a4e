// Status bar widget: server reachability, backend address, login state and
// the current screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::{ServerStatus, ViewState};

/// Render the status bar into the given area.
///
/// Layout: [server dot] MindMBTI | [screen] | [base url] | [auth]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let (dot, dot_color) = server_indicator(state.server);
    let separator = || Span::styled(" | ", Style::default().fg(Color::Gray));

    let mut spans = vec![
        Span::styled(format!(" {dot} "), Style::default().fg(dot_color)),
        Span::styled(
            "MindMBTI",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(
            state.screen().title(),
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        separator(),
        Span::styled(state.base_url.clone(), Style::default().fg(Color::DarkGray)),
        separator(),
    ];
    spans.push(auth_span(state.authenticated));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Return the server dot character and its color.
pub fn server_indicator(status: ServerStatus) -> (&'static str, Color) {
    match status {
        ServerStatus::Unknown => ("○", Color::DarkGray),
        ServerStatus::Reachable => ("●", Color::Green),
        ServerStatus::Unreachable => ("●", Color::Red),
    }
}

fn auth_span(authenticated: bool) -> Span<'static> {
    if authenticated {
        Span::styled("로그인됨", Style::default().fg(Color::Green))
    } else {
        Span::styled("비로그인", Style::default().fg(Color::DarkGray))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_indicator_colors() {
        assert_eq!(server_indicator(ServerStatus::Unknown).1, Color::DarkGray);
        assert_eq!(server_indicator(ServerStatus::Reachable).1, Color::Green);
        assert_eq!(server_indicator(ServerStatus::Unreachable).1, Color::Red);
    }

    #[test]
    fn shows_base_url() {
        let state = ViewState::new("http://127.0.0.1:8000/api");
        let backend = ratatui::backend::TestBackend::new(100, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("MindMBTI"));
        assert!(text.contains("http://127.0.0.1:8000/api"));
    }
}
