// Result screen: the computed type, per-dimension splits, and the outcome of
// the share / save / PDF actions.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{heading, percentage_lines, render_body, request_lines};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut lines = request_lines(state, RequestSlot::Result, "결과를 불러오는 중...");

    if let Some(result) = &state.result {
        lines.push(heading("MBTI 결과"));
        lines.push(Line::from(Span::styled(
            result.mbti_type.to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.extend(percentage_lines(&result.percentages));
        lines.push(Line::from(""));
        lines.extend(action_lines(state));
    }

    render_body(frame, area, "검사 결과", lines, state.scroll);
}

fn action_lines(state: &ViewState) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.extend(request_lines(state, RequestSlot::Pdf, "PDF 다운로드 중..."));
    lines.extend(request_lines(state, RequestSlot::CreateShare, "공유 링크 만드는 중..."));
    lines.extend(request_lines(state, RequestSlot::SaveHistory, "저장 중..."));

    if let Some(link) = &state.share_link {
        lines.push(Line::from(vec![
            Span::raw("공유 링크: "),
            Span::styled(link.clone(), Style::default().fg(Color::Cyan)),
        ]));
    }
    if state.saved_to_history {
        lines.push(Line::from(Span::styled(
            "기록에 저장됨",
            Style::default().fg(Color::Green),
        )));
    }
    if let Some(path) = &state.pdf_path {
        lines.push(Line::from(format!("PDF: {}", path.display())));
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
