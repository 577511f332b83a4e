// Dashboard: saved results and the comparison of two of them.

use chrono::NaiveDateTime;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use mindmbti_api::models::{Comparison, HistoryRecord};
use mindmbti_app::protocol::RequestSlot;

use super::{heading, panel, render_body, request_lines};
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let [status_area, list_area, compare_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Percentage(50),
        Constraint::Min(6),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(request_lines(state, RequestSlot::History, "불러오는 중...")),
        status_area,
    );

    if state.history.is_empty() && !state.is_loading(RequestSlot::History) {
        frame.render_widget(
            Paragraph::new(vec![
                Line::from("저장된 검사 결과가 없습니다."),
                Line::from(Span::styled(
                    "결과 화면에서 h 키로 기록에 저장해 보세요.",
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .block(panel("내 분석 기록")),
            list_area,
        );
    } else {
        let items: Vec<ListItem> = state
            .history
            .iter()
            .map(|record| ListItem::new(history_line(record, state)))
            .collect();
        let list = List::new(items)
            .block(panel("내 분석 기록"))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut list_state = ListState::default().with_selected(Some(state.history_index));
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }

    let mut lines = request_lines(state, RequestSlot::Compare, "비교 중...");
    lines.push(Line::from(format!(
        "A: {}   B: {}",
        state.compare_a.as_deref().unwrap_or("-"),
        state.compare_b.as_deref().unwrap_or("-"),
    )));
    if let Some(comparison) = &state.comparison {
        lines.extend(comparison_lines(comparison));
    }
    render_body(frame, compare_area, "재검사 비교", lines, state.scroll);
}

fn format_date(at: Option<NaiveDateTime>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn history_line(record: &HistoryRecord, state: &ViewState) -> Line<'static> {
    let pick = |id: &Option<String>, tag: &'static str| {
        if id.as_deref() == Some(record.session_id.as_str()) {
            Span::styled(tag, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        } else {
            Span::raw(" ")
        }
    };
    Line::from(vec![
        pick(&state.compare_a, "A"),
        pick(&state.compare_b, "B"),
        Span::raw(" "),
        Span::styled(
            record.mbti_type.to_string(),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::raw(format_date(record.created_at)),
        Span::styled(
            format!("  {}", record.session_id),
            Style::default().fg(Color::DarkGray),
        ),
    ])
}

pub fn comparison_lines(comparison: &Comparison) -> Vec<Line<'static>> {
    let a = &comparison.result_a;
    let b = &comparison.result_b;
    let mut lines = vec![heading(format!(
        "유형 변화: {} → {}{}",
        a.mbti_type,
        b.mbti_type,
        if comparison.type_changed { "" } else { " (변화 없음)" }
    ))];
    for change in &comparison.dimension_changes {
        let color = if change.change > 0.0 {
            Color::Green
        } else if change.change < 0.0 {
            Color::Red
        } else {
            Color::Gray
        };
        lines.push(Line::from(vec![
            Span::raw(format!("  {}  ", change.dimension)),
            Span::styled(format!("{:+.1}%p", change.change), Style::default().fg(color)),
        ]));
    }
    lines
}
