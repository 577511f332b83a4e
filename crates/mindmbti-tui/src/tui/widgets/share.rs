// Share screen: open a shared result by its id.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{heading, percentage_lines, render_body, render_form, report_body_lines, request_lines};
use crate::tui::layout::form_and_output;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.share_form;
    let (form_area, output_area) = form_and_output(area, form.fields.len() as u16 + 2);
    render_form(frame, form_area, "공유된 MBTI 결과", form);

    let mut lines = request_lines(state, RequestSlot::SharedResult, "불러오는 중...");
    lines.extend(request_lines(state, RequestSlot::Pdf, "PDF 다운로드 중..."));
    if let Some(shared) = &state.shared {
        lines.push(Line::from(Span::styled(
            shared.mbti_type.to_string(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.extend(percentage_lines(&shared.percentages));
        lines.push(Line::from(""));
        lines.push(heading("리포트"));
        lines.extend(report_body_lines(&shared.report));
    }

    render_body(frame, output_area, "결과", lines, state.scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::apply_ui_update;
    use crate::tui::tests::draw;
    use mindmbti_api::models::SharedResult;
    use mindmbti_app::protocol::{Route, UiUpdate};
    use serde_json::json;

    #[test]
    fn shows_shared_type_and_report() {
        let mut state = ViewState::default();
        apply_ui_update(
            &mut state,
            UiUpdate::Navigated(Route::Share {
                share_id: Some("abc".into()),
            }),
        );
        let shared: SharedResult = serde_json::from_value(json!({
            "type": "ISTJ",
            "percentages": {"E/I": {"E": 20.0, "I": 80.0}},
            "report": {"keywords": ["steady"], "strengths": "Reliable"}
        }))
        .unwrap();
        apply_ui_update(&mut state, UiUpdate::SharedResult(shared));
        let screen = draw(&state);
        assert!(screen.contains("ISTJ"));
        assert!(screen.contains(" 80% I"));
        assert!(screen.contains("Reliable"));
        assert!(screen.contains("abc"));
    }
}
