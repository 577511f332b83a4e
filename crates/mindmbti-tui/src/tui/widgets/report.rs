// Report screen: the basic report for the selected type plus an optional
// AI interpretation driven by the form's free-text fields.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{heading, render_body, render_form, report_body_lines, request_lines};
use crate::tui::layout::form_and_output;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.report_form;
    let (form_area, output_area) = form_and_output(area, form.fields.len() as u16 + 2);
    render_form(frame, form_area, "리포트", form);

    let mut lines = request_lines(state, RequestSlot::BasicReport, "리포트를 불러오는 중...");
    if let Some(report) = &state.basic_report {
        lines.push(heading(format!("{} 기본 리포트", report.mbti_type)));
        lines.extend(report_body_lines(&report.body));
        lines.push(Line::from(""));
    }

    lines.extend(request_lines(state, RequestSlot::AiReport, "AI 해석 생성 중..."));
    if let Some(ai) = &state.ai_report {
        lines.push(heading("AI 맞춤 해석"));
        lines.extend(ai.ai_interpretation.lines().map(|l| Line::from(l.to_string())));
    }

    render_body(frame, output_area, "결과", lines, state.scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::tests::draw;
    use crate::tui::{apply_ui_update, default_report_type};
    use mindmbti_api::models::{AiReport, BasicReport};
    use mindmbti_app::protocol::{Route, UiUpdate};
    use serde_json::json;

    #[test]
    fn shows_basic_and_ai_report() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Navigated(Route::Report {
                mbti_type: default_report_type(),
            }),
        );
        let basic: BasicReport = serde_json::from_value(json!({
            "mbti_type": "ENFP",
            "keywords": ["creative", "warm"],
            "strengths": "Big picture",
            "weaknesses": "Follow-through",
            "stress_reaction": "Withdraws",
            "decision_style": "Values first"
        }))
        .unwrap();
        apply_ui_update(&mut state, UiUpdate::BasicReport(basic));
        apply_ui_update(
            &mut state,
            UiUpdate::AiReport(AiReport {
                mbti_type: default_report_type(),
                ai_interpretation: "Keep a short daily plan.".into(),
            }),
        );

        let screen = draw(&state);
        assert!(screen.contains("creative, warm"));
        assert!(screen.contains("Follow-through"));
        assert!(screen.contains("Keep a short daily plan."));
    }
}
