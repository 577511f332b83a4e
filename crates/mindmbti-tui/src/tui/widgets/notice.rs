// One-line notice from the orchestrator, cleared on the next key press.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(text) = state.notice.as_deref() else {
        return;
    };
    let paragraph = Paragraph::new(Span::styled(
        format!(" {text}"),
        Style::default().fg(Color::Black).bg(Color::Yellow),
    ))
    .style(Style::default().bg(Color::Yellow));
    frame.render_widget(paragraph, area);
}
