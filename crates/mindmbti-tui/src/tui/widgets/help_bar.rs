// Help bar: key hints for the current screen.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use mindmbti_app::protocol::Screen;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();
    for (key, action) in hints(state.screen(), state.is_typing()) {
        spans.push(Span::styled(
            format!(" {key}"),
            Style::default().fg(Color::Yellow),
        ));
        spans.push(Span::styled(
            format!(" {action} "),
            Style::default().fg(Color::Gray),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// `(key, action)` pairs for `screen`. While typing, letter shortcuts are
/// unavailable so only the non-printable keys are listed.
pub fn hints(screen: Screen, typing: bool) -> Vec<(&'static str, &'static str)> {
    let mut hints: Vec<(&'static str, &'static str)> = match screen {
        Screen::Home => vec![("↑↓", "이동"), ("Enter", "열기")],
        Screen::Login | Screen::Register => vec![("Tab", "다음 칸"), ("Enter", "제출")],
        Screen::Test => vec![
            ("1-5", "응답"),
            ("←→", "이전/다음"),
            ("s", "제출"),
        ],
        Screen::Result => vec![
            ("p", "PDF"),
            ("s", "공유 링크"),
            ("h", "기록에 저장"),
            ("d", "리포트"),
            ("c", "직무"),
            ("t", "다시 검사"),
        ],
        Screen::Report => vec![("←→", "유형"), ("Tab", "다음 칸"), ("Enter", "AI 해석")],
        Screen::Compatibility => vec![("Tab", "A/B"), ("←→", "유형"), ("Enter", "궁합 보기")],
        Screen::Career => vec![("←→", "유형"), ("Tab", "다음 칸"), ("Enter", "조회/조언")],
        Screen::Dashboard => vec![
            ("↑↓", "이동"),
            ("Enter", "보기"),
            ("a/b", "비교 선택"),
            ("c", "비교"),
        ],
        Screen::Profile => vec![("Tab", "다음 칸"), ("←→", "선택"), ("Enter", "저장")],
        Screen::Share => vec![("Enter", "열기"), ("Ctrl-P", "PDF")],
    };
    if typing {
        hints.retain(|(key, _)| key.chars().count() > 1 || !key.is_ascii());
        hints.push(("F5", "재시도"));
    } else {
        hints.push(("r", "재시도"));
        hints.push(("q", "종료"));
    }
    if screen != Screen::Home {
        hints.push(("Esc", "홈"));
    }
    hints
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
