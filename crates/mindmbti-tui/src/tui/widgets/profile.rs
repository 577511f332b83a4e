// Profile screen: account summary and the editable profile form.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{render_body, render_form, request_lines};
use crate::tui::layout::form_and_output;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let form = &state.profile_form;
    let (form_area, output_area) = form_and_output(area, form.fields.len() as u16 + 2);
    render_form(frame, form_area, "내 프로필", form);

    let mut lines = request_lines(state, RequestSlot::Profile, "불러오는 중...");
    lines.extend(request_lines(state, RequestSlot::UpdateProfile, "저장 중..."));
    if let Some(profile) = &state.profile {
        lines.push(Line::from(format!("이메일: {}", profile.email)));
        if let Some(created) = profile.created_at {
            lines.push(Line::from(Span::styled(
                format!("가입일: {}", created.format("%Y-%m-%d")),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    render_body(frame, output_area, "계정", lines, state.scroll);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::apply_ui_update;
    use crate::tui::tests::draw;
    use mindmbti_api::models::Profile;
    use mindmbti_app::protocol::{Route, UiUpdate};
    use serde_json::json;

    #[test]
    fn shows_email_and_form_values() {
        let mut state = ViewState::default();
        apply_ui_update(&mut state, UiUpdate::Navigated(Route::Profile));
        let profile: Profile = serde_json::from_value(json!({
            "id": "u1",
            "email": "mina@example.com",
            "nickname": "mina",
            "gender": null,
            "age_range": "20s",
            "profile_image_url": "https://img.example.com/a.png"
        }))
        .unwrap();
        apply_ui_update(&mut state, UiUpdate::Profile(profile));
        let screen = draw(&state);
        assert!(screen.contains("mina@example.com"));
        assert!(screen.contains("https://img.example.com/a.png"));
    }
}
