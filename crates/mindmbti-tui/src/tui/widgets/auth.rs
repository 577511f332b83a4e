// Login and register screens.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use mindmbti_app::protocol::RequestSlot;

use super::{render_form, request_lines};
use crate::tui::form::FormState;
use crate::tui::ViewState;

pub fn render_login(frame: &mut Frame, area: Rect, state: &ViewState) {
    render_auth(frame, area, state, "로그인", &state.login_form, RequestSlot::Login);
}

pub fn render_register(frame: &mut Frame, area: Rect, state: &ViewState) {
    render_auth(
        frame,
        area,
        state,
        "회원가입",
        &state.register_form,
        RequestSlot::Register,
    );
}

fn render_auth(
    frame: &mut Frame,
    area: Rect,
    state: &ViewState,
    title: &str,
    form: &FormState,
    slot: RequestSlot,
) {
    let form_rows = form.fields.len() as u16 + 2;
    let [form_area, status_area] =
        Layout::vertical([Constraint::Length(form_rows), Constraint::Min(0)]).areas(area);
    render_form(frame, form_area, title, form);
    frame.render_widget(
        Paragraph::new(request_lines(state, slot, "처리 중...")),
        status_area,
    );
}
