// Questionnaire screen: one question at a time with a progress gauge.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph, Wrap};
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{panel, request_lines};
use crate::tui::ViewState;

const LIKERT_HINT: &str = "전혀 아님(1) ←→ 매우 그렇다(5)";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let [progress_area, question_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(7),
        Constraint::Length(4),
    ])
    .areas(area);

    let total = state.questions.len();
    let answered = state.answers.len();
    let ratio = if total == 0 {
        0.0
    } else {
        (answered as f64 / total as f64).clamp(0.0, 1.0)
    };
    let gauge = Gauge::default()
        .block(panel("진행률"))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(ratio)
        .label(format!("{answered}/{total}"));
    frame.render_widget(gauge, progress_area);

    let mut status = request_lines(state, RequestSlot::Questions, "문항을 불러오는 중...");
    status.extend(request_lines(state, RequestSlot::Submit, "제출 중..."));
    frame.render_widget(Paragraph::new(status), status_area);

    let Some(question) = state.questions.get(state.question_index) else {
        frame.render_widget(Paragraph::new("").block(panel("MBTI 검사")), question_area);
        return;
    };

    let current = state.answers.get(&question.id).copied();
    let mut lines = vec![
        Line::from(Span::styled(
            format!("Q{} / {}", state.question_index + 1, total),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            question.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        likert_line(current),
        Line::from(Span::styled(LIKERT_HINT, Style::default().fg(Color::Gray))),
    ];
    if state.question_index + 1 == total {
        lines.push(Line::from(""));
        let label = if answered == total {
            "모든 문항에 답했습니다. Enter로 결과 보기"
        } else {
            "마지막 문항입니다. Enter로 제출"
        };
        lines.push(Line::from(Span::styled(label, Style::default().fg(Color::Green))));
    }

    frame.render_widget(
        Paragraph::new(lines)
            .block(panel("MBTI 검사"))
            .wrap(Wrap { trim: false }),
        question_area,
    );
}

/// `[1] [2] [3] [4] [5]` with the recorded answer highlighted.
fn likert_line(current: Option<u8>) -> Line<'static> {
    let spans = (1..=5u8)
        .flat_map(|value| {
            let style = if current == Some(value) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            [Span::styled(format!("[{value}]"), style), Span::raw(" ")]
        })
        .collect::<Vec<_>>();
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::{draw, sample_questions};
    use crate::tui::apply_ui_update;
    use mindmbti_app::protocol::{Route, UiUpdate};

    fn test_screen() -> ViewState {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Navigated(Route::Test));
        state
    }

    #[test]
    fn likert_highlights_current_answer() {
        let line = likert_line(Some(3));
        assert_eq!(line.spans.len(), 10);
        assert!(line.spans[4].style.add_modifier.contains(Modifier::BOLD));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn shows_progress_and_position() {
        let mut state = test_screen();
        apply_ui_update(&mut state, UiUpdate::Questions(sample_questions(48)));
        apply_ui_update(
            &mut state,
            UiUpdate::AnswerRecorded {
                question_id: 1,
                value: 5,
                answered: 1,
            },
        );
        state.question_index = 1;
        let screen = draw(&state);
        assert!(screen.contains("1/48"));
        assert!(screen.contains("Q2 / 48"));
    }

    #[test]
    fn slow_load_shows_hint() {
        let mut state = test_screen();
        apply_ui_update(&mut state, UiUpdate::Loading(RequestSlot::Questions));
        apply_ui_update(&mut state, UiUpdate::SlowHint(RequestSlot::Questions));
        let screen = draw(&state);
        assert!(screen.contains("Sleep"));
    }
}
