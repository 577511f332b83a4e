// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the
// orchestrator, or into local ViewState changes (focus, typing, selection).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use mindmbti_api::models::{AiReportRequest, ProfileUpdate};
use mindmbti_app::protocol::{PdfSource, Route, Screen, UserCommand};

use super::form::FormState;
use super::widgets::home::menu_entries;
use super::{default_report_type, field, ViewState};

/// Lines moved per PageUp/PageDown.
const PAGE: u16 = 5;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should be forwarded to the
/// orchestrator. Returns `None` when it was handled locally.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C always quits immediately regardless of mode
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    if view_state.confirm_quit {
        return handle_confirm_quit(key_event, view_state);
    }

    // Notices last until the next key press.
    view_state.notice = None;

    match key_event.code {
        KeyCode::Esc => {
            return (view_state.screen() != Screen::Home)
                .then_some(UserCommand::Navigate(Route::Home));
        }
        KeyCode::F(5) => return Some(UserCommand::Retry),
        KeyCode::PageUp => {
            view_state.scroll = view_state.scroll.saturating_sub(PAGE);
            return None;
        }
        KeyCode::PageDown => {
            view_state.scroll = view_state.scroll.saturating_add(PAGE);
            return None;
        }
        _ => {}
    }

    match view_state.screen() {
        Screen::Home => handle_home(key_event, view_state),
        Screen::Login => handle_login(key_event, view_state),
        Screen::Register => handle_register(key_event, view_state),
        Screen::Test => handle_test(key_event, view_state),
        Screen::Result => handle_result(key_event, view_state),
        Screen::Report => handle_report(key_event, view_state),
        Screen::Compatibility => handle_compatibility(key_event, view_state),
        Screen::Career => handle_career(key_event, view_state),
        Screen::Dashboard => handle_dashboard(key_event, view_state),
        Screen::Profile => handle_profile(key_event, view_state),
        Screen::Share => handle_share(key_event, view_state),
    }
}

/// Handle key events while in quit confirmation mode.
///
/// - `y` or `q` confirms quit (sends UserCommand::Quit)
/// - `n` or `Esc` cancels (returns to normal mode)
/// - All other keys are blocked (no-op)
fn handle_confirm_quit(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Char('q') | KeyCode::Char('Q') => {
            Some(UserCommand::Quit)
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_state.confirm_quit = false;
            None
        }
        _ => None,
    }
}

/// Shortcuts available whenever no text field has focus.
fn handle_common(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    match key_event.code {
        KeyCode::Char('q') => {
            view_state.confirm_quit = true;
            None
        }
        KeyCode::Char('r') => Some(UserCommand::Retry),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormKey {
    /// Consumed by the form (focus move, typing).
    Handled,
    /// A choice field changed.
    Cycled,
    Submit,
    /// Not a form key; fall through to the screen's shortcuts.
    Unhandled,
}

fn form_key(form: &mut FormState, key_event: KeyEvent) -> FormKey {
    match key_event.code {
        KeyCode::Tab | KeyCode::Down => {
            form.focus_next();
            FormKey::Handled
        }
        KeyCode::BackTab | KeyCode::Up => {
            form.focus_prev();
            FormKey::Handled
        }
        KeyCode::Enter => FormKey::Submit,
        KeyCode::Left | KeyCode::Right => {
            if form.cycle(key_event.code == KeyCode::Right) {
                FormKey::Cycled
            } else {
                FormKey::Handled
            }
        }
        KeyCode::Backspace => {
            form.backspace();
            FormKey::Handled
        }
        KeyCode::Char(c)
            if !key_event
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            if form.insert_char(c) {
                FormKey::Handled
            } else {
                FormKey::Unhandled
            }
        }
        _ => FormKey::Unhandled,
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

fn handle_home(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let entries = menu_entries(view_state.authenticated);
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.menu_index = view_state.menu_index.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if view_state.menu_index + 1 < entries.len() {
                view_state.menu_index += 1;
            }
            None
        }
        KeyCode::Enter => entries
            .into_iter()
            .nth(view_state.menu_index)
            .map(|(_, cmd)| cmd),
        _ => handle_common(key_event, view_state),
    }
}

fn handle_login(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.login_form;
    match form_key(form, key_event) {
        FormKey::Submit => Some(UserCommand::Login {
            email: form.value(field::EMAIL).trim().to_string(),
            password: form.value(field::PASSWORD).to_string(),
        }),
        FormKey::Handled | FormKey::Cycled => None,
        FormKey::Unhandled => handle_common(key_event, view_state),
    }
}

fn handle_register(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.register_form;
    match form_key(form, key_event) {
        FormKey::Submit => Some(UserCommand::Register {
            email: form.value(field::EMAIL).trim().to_string(),
            password: form.value(field::PASSWORD).to_string(),
            nickname: form.value(field::NICKNAME).trim().to_string(),
        }),
        FormKey::Handled | FormKey::Cycled => None,
        FormKey::Unhandled => handle_common(key_event, view_state),
    }
}

fn handle_test(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let count = view_state.questions.len();
    match key_event.code {
        KeyCode::Char(c @ '1'..='5') => {
            let question = view_state.questions.get(view_state.question_index)?;
            let cmd = UserCommand::Answer {
                question_id: question.id,
                value: c as u8 - b'0',
            };
            if view_state.question_index + 1 < count {
                view_state.question_index += 1;
            }
            Some(cmd)
        }
        KeyCode::Left | KeyCode::Char('h') => {
            view_state.question_index = view_state.question_index.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if view_state.question_index + 1 < count {
                view_state.question_index += 1;
            }
            None
        }
        KeyCode::Enter => {
            if count > 0 && view_state.question_index + 1 == count {
                Some(UserCommand::SubmitAnswers)
            } else {
                if view_state.question_index + 1 < count {
                    view_state.question_index += 1;
                }
                None
            }
        }
        KeyCode::Char('s') => Some(UserCommand::SubmitAnswers),
        _ => handle_common(key_event, view_state),
    }
}

fn handle_result(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let session_id = view_state.result_session()?.to_string();
    let mbti_type = view_state
        .result
        .as_ref()
        .map(|r| r.mbti_type)
        .unwrap_or_else(default_report_type);
    match key_event.code {
        KeyCode::Char('p') => Some(UserCommand::DownloadPdf(PdfSource::Result { session_id })),
        KeyCode::Char('s') => Some(UserCommand::CreateShare { session_id }),
        KeyCode::Char('h') => Some(UserCommand::SaveToHistory { session_id }),
        KeyCode::Char('d') => Some(UserCommand::Navigate(Route::Report { mbti_type })),
        KeyCode::Char('c') => Some(UserCommand::Navigate(Route::Career { mbti_type })),
        KeyCode::Char('t') => Some(UserCommand::Navigate(Route::Test)),
        _ => handle_common(key_event, view_state),
    }
}

fn handle_report(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.report_form;
    match form_key(form, key_event) {
        FormKey::Cycled => Some(UserCommand::LoadBasicReport(
            form.mbti_type(field::REPORT_TYPE),
        )),
        FormKey::Submit => Some(UserCommand::RequestAiReport(AiReportRequest::new(
            form.mbti_type(field::REPORT_TYPE),
            form.value(field::REPORT_JOB),
            form.value(field::REPORT_CONCERN),
            form.value(field::REPORT_RELATIONSHIP),
        ))),
        FormKey::Handled => None,
        FormKey::Unhandled => handle_common(key_event, view_state),
    }
}

fn handle_compatibility(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.compat_form;
    match form_key(form, key_event) {
        FormKey::Submit => Some(UserCommand::CheckCompatibility {
            type_a: form.mbti_type(field::COMPAT_A),
            type_b: form.mbti_type(field::COMPAT_B),
        }),
        FormKey::Handled | FormKey::Cycled => None,
        FormKey::Unhandled => handle_common(key_event, view_state),
    }
}

fn handle_career(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.career_form;
    let mbti_type = form.mbti_type(field::CAREER_TYPE);
    match form_key(form, key_event) {
        FormKey::Cycled => Some(UserCommand::LoadCareerMatch(
            form.mbti_type(field::CAREER_TYPE),
        )),
        FormKey::Submit if form.focus == field::CAREER_TYPE => {
            Some(UserCommand::LoadCareerMatch(mbti_type))
        }
        FormKey::Submit => Some(UserCommand::RequestCareerAdvice {
            mbti_type,
            current_job: form.value(field::CAREER_JOB).trim().to_string(),
        }),
        FormKey::Handled => None,
        FormKey::Unhandled => handle_common(key_event, view_state),
    }
}

fn handle_dashboard(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let selected = view_state
        .history
        .get(view_state.history_index)
        .map(|r| r.session_id.clone());
    match key_event.code {
        KeyCode::Up | KeyCode::Char('k') => {
            view_state.history_index = view_state.history_index.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if view_state.history_index + 1 < view_state.history.len() {
                view_state.history_index += 1;
            }
            None
        }
        KeyCode::Enter => selected.map(|session_id| UserCommand::Navigate(Route::Result { session_id })),
        KeyCode::Char('a') => {
            view_state.compare_a = selected;
            None
        }
        KeyCode::Char('b') => {
            view_state.compare_b = selected;
            None
        }
        KeyCode::Char('c') => Some(UserCommand::Compare {
            session_a: view_state.compare_a.clone().unwrap_or_default(),
            session_b: view_state.compare_b.clone().unwrap_or_default(),
        }),
        KeyCode::Char('t') => Some(UserCommand::Navigate(Route::Test)),
        _ => handle_common(key_event, view_state),
    }
}

fn handle_profile(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    let form = &mut view_state.profile_form;
    match form_key(form, key_event) {
        FormKey::Submit => Some(UserCommand::UpdateProfile(ProfileUpdate {
            nickname: non_blank(form.value(field::PROFILE_NICKNAME)),
            gender: non_blank(form.value(field::PROFILE_GENDER)),
            age_range: non_blank(form.value(field::PROFILE_AGE)),
            profile_image_url: non_blank(form.value(field::PROFILE_IMAGE)),
        })),
        FormKey::Handled | FormKey::Cycled => None,
        FormKey::Unhandled => handle_common(key_event, view_state),
    }
}

fn handle_share(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // The only field is text, so the PDF shortcut needs a modifier.
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('p')
    {
        return match &view_state.route {
            Route::Share {
                share_id: Some(share_id),
            } if view_state.shared.is_some() => Some(UserCommand::DownloadPdf(PdfSource::Shared {
                share_id: share_id.clone(),
            })),
            _ => None,
        };
    }

    let form = &mut view_state.share_form;
    match form_key(form, key_event) {
        FormKey::Submit => match non_blank(form.value(field::SHARE_ID)) {
            Some(share_id) => Some(UserCommand::Navigate(Route::Share {
                share_id: Some(share_id),
            })),
            // Let the orchestrator explain what is missing.
            None => Some(UserCommand::LoadSharedResult {
                share_id: String::new(),
            }),
        },
        FormKey::Handled | FormKey::Cycled => None,
        FormKey::Unhandled => handle_common(key_event, view_state),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
