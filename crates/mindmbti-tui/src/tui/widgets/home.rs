// Home screen: the main menu.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use mindmbti_app::protocol::{Route, UserCommand};
use mindmbti_core::mbti::MbtiType;

use super::panel;
use crate::tui::{default_report_type, ViewState};

/// Menu entries in display order. The account entries depend on whether a
/// user is logged in.
pub fn menu_entries(authenticated: bool) -> Vec<(&'static str, UserCommand)> {
    let mut entries = vec![
        ("MBTI 검사하기", UserCommand::Navigate(Route::Test)),
        (
            "기본 리포트",
            UserCommand::Navigate(Route::Report {
                mbti_type: default_report_type(),
            }),
        ),
        ("궁합 분석", UserCommand::Navigate(Route::Compatibility)),
        (
            "직무 매칭",
            UserCommand::Navigate(Route::Career {
                mbti_type: MbtiType::default(),
            }),
        ),
        (
            "공유된 결과 보기",
            UserCommand::Navigate(Route::Share { share_id: None }),
        ),
        ("대시보드", UserCommand::Navigate(Route::Dashboard)),
        ("마이페이지", UserCommand::Navigate(Route::Profile)),
    ];
    if authenticated {
        entries.push(("로그아웃", UserCommand::Logout));
    } else {
        entries.push(("로그인", UserCommand::Navigate(Route::Login)));
        entries.push(("회원가입", UserCommand::Navigate(Route::Register)));
    }
    entries
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let [header, menu] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "MindMBTI",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "MBTI 기반 심리 분석 서비스",
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(title, header);

    let items: Vec<ListItem> = menu_entries(state.authenticated)
        .into_iter()
        .map(|(label, _)| ListItem::new(label))
        .collect();
    let list = List::new(items)
        .block(panel("메뉴"))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(state.menu_index));
    frame.render_stateful_widget(list, menu, &mut list_state);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
