// Career screen: recommended careers for a type, and advice for the user's
// current job.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{bullet_lines, heading, render_body, render_form, request_lines};
use crate::tui::layout::form_and_output;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.career_form;
    let (form_area, output_area) = form_and_output(area, form.fields.len() as u16 + 2);
    render_form(frame, form_area, "직무 매칭", form);

    let mut lines = request_lines(state, RequestSlot::CareerMatch, "불러오는 중...");
    if let Some(matched) = &state.career_match {
        lines.push(heading(format!("{} 추천 직무", matched.mbti_type)));
        lines.extend(bullet_lines(&matched.recommended_careers));
        lines.push(Line::from(""));
    }

    lines.extend(request_lines(state, RequestSlot::CareerAdvice, "생성 중..."));
    if let Some(advice) = &state.career_advice {
        lines.push(heading("커리어 조언"));
        lines.extend(advice.career_advice.lines().map(|l| Line::from(l.to_string())));
        if !advice.strength_strategy.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "강점 활용 전략:",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.extend(
                advice
                    .strength_strategy
                    .lines()
                    .map(|l| Line::from(l.to_string())),
            );
        }
    }

    render_body(frame, output_area, "결과", lines, state.scroll);
}
