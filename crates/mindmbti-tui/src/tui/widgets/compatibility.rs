// Compatibility screen: pick two types, see how they get along.

use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{bullet_lines, heading, render_body, render_form, request_lines};
use crate::tui::layout::form_and_output;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.compat_form;
    let (form_area, output_area) = form_and_output(area, form.fields.len() as u16 + 2);
    render_form(frame, form_area, "궁합 분석", form);

    let mut lines = request_lines(state, RequestSlot::Compatibility, "분석 중...");
    if let Some(compat) = &state.compatibility {
        lines.push(heading(format!("{} × {}", compat.type_a, compat.type_b)));
        lines.push(Line::from(format!("관계 유형: {}", compat.relationship_type)));
        for (title, items) in [
            ("갈등 포인트", &compat.conflict_points),
            ("의사소통 전략", &compat.communication_strategy),
            ("장기 관계 유지 팁", &compat.long_term_tips),
        ] {
            if items.is_empty() {
                continue;
            }
            lines.push(Line::from(""));
            lines.push(heading(title));
            lines.extend(bullet_lines(items));
        }
    }

    render_body(frame, output_area, "결과", lines, state.scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::apply_ui_update;
    use crate::tui::tests::draw;
    use mindmbti_api::models::Compatibility;
    use mindmbti_app::protocol::{Route, UiUpdate};

    #[test]
    fn shows_sections_with_items() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Navigated(Route::Compatibility));
        apply_ui_update(
            &mut state,
            UiUpdate::Compatibility(Compatibility {
                type_a: "ENFP".parse().unwrap(),
                type_b: "INTJ".parse().unwrap(),
                relationship_type: "complementary".into(),
                relationship_key: None,
                conflict_points: vec!["Planning vs spontaneity".into()],
                communication_strategy: Vec::new(),
                long_term_tips: vec!["Schedule check-ins".into()],
            }),
        );
        let screen = draw(&state);
        assert!(screen.contains("complementary"));
        assert!(screen.contains("Planning vs spontaneity"));
        assert!(screen.contains("Schedule check-ins"));
    }
}
