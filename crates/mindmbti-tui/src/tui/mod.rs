// Terminal front end: view state, input handling, layout and screens.
//
// The TUI owns a `ViewState` that mirrors what the orchestrator has told it.
// The orchestrator pushes `UiUpdate` messages over an mpsc channel; the TUI
// applies them to `ViewState` and re-renders at ~30 fps.

pub mod form;
pub mod input;
pub mod layout;
pub mod widgets;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use mindmbti_api::models::{
    AiReport, BasicReport, CareerAdvice, CareerMatch, Comparison, Compatibility,
    HistoryRecord, MbtiResult, Profile, Question, SharedResult, AGE_RANGE_OPTIONS,
    GENDER_OPTIONS,
};
use mindmbti_app::protocol::{RequestSlot, Route, Screen, UiUpdate, UserCommand};
use mindmbti_core::mbti::MbtiType;

use form::{Field, FormState};
use layout::build_layout;

/// Field positions within each screen's form.
pub mod field {
    pub const EMAIL: usize = 0;
    pub const PASSWORD: usize = 1;
    pub const NICKNAME: usize = 2;

    pub const REPORT_TYPE: usize = 0;
    pub const REPORT_JOB: usize = 1;
    pub const REPORT_CONCERN: usize = 2;
    pub const REPORT_RELATIONSHIP: usize = 3;

    pub const COMPAT_A: usize = 0;
    pub const COMPAT_B: usize = 1;

    pub const CAREER_TYPE: usize = 0;
    pub const CAREER_JOB: usize = 1;

    pub const PROFILE_NICKNAME: usize = 0;
    pub const PROFILE_GENDER: usize = 1;
    pub const PROFILE_AGE: usize = 2;
    pub const PROFILE_IMAGE: usize = 3;

    pub const SHARE_ID: usize = 0;
}

// ---------------------------------------------------------------------------
// ServerStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    /// No health check has finished yet.
    Unknown,
    Reachable,
    Unreachable,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state that mirrors the orchestrator for rendering.
///
/// Updated incrementally via `UiUpdate` messages. The `render_frame`
/// function reads this struct to draw the current screen.
pub struct ViewState {
    pub base_url: String,
    pub route: Route,
    pub authenticated: bool,
    pub server: ServerStatus,
    /// Slots with a request in flight.
    pub loading: HashSet<RequestSlot>,
    /// Slots past the slow-hint delay.
    pub slow: HashSet<RequestSlot>,
    /// Last failure message per slot, cleared when the slot loads again.
    pub errors: HashMap<RequestSlot, String>,
    /// One-line message shown until the next key press.
    pub notice: Option<String>,
    pub confirm_quit: bool,
    /// Vertical scroll of the current screen's body.
    pub scroll: u16,

    // Home
    pub menu_index: usize,

    // Login / Register
    pub login_form: FormState,
    pub register_form: FormState,

    // Test
    pub questions: Vec<Question>,
    pub question_index: usize,
    /// Recorded answers as acknowledged by the orchestrator.
    pub answers: BTreeMap<u32, u8>,

    // Result
    pub result: Option<MbtiResult>,
    pub share_link: Option<String>,
    pub saved_to_history: bool,
    pub pdf_path: Option<PathBuf>,

    // Report
    pub report_form: FormState,
    pub basic_report: Option<BasicReport>,
    pub ai_report: Option<AiReport>,

    // Compatibility
    pub compat_form: FormState,
    pub compatibility: Option<Compatibility>,

    // Career
    pub career_form: FormState,
    pub career_match: Option<CareerMatch>,
    pub career_advice: Option<CareerAdvice>,

    // Dashboard
    pub history: Vec<HistoryRecord>,
    pub history_index: usize,
    pub compare_a: Option<String>,
    pub compare_b: Option<String>,
    pub comparison: Option<Comparison>,

    // Profile
    pub profile: Option<Profile>,
    pub profile_form: FormState,

    // Share
    pub share_form: FormState,
    pub shared: Option<SharedResult>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            base_url: String::new(),
            route: Route::Home,
            authenticated: false,
            server: ServerStatus::Unknown,
            loading: HashSet::new(),
            slow: HashSet::new(),
            errors: HashMap::new(),
            notice: None,
            confirm_quit: false,
            scroll: 0,
            menu_index: 0,
            login_form: FormState::new(vec![Field::text("이메일"), Field::secret("비밀번호")]),
            register_form: FormState::new(vec![
                Field::text("이메일"),
                Field::secret("비밀번호"),
                Field::text("닉네임"),
            ]),
            questions: Vec::new(),
            question_index: 0,
            answers: BTreeMap::new(),
            result: None,
            share_link: None,
            saved_to_history: false,
            pdf_path: None,
            report_form: FormState::new(vec![
                Field::mbti_type("MBTI 유형", default_report_type()),
                Field::text("직업"),
                Field::text("현재 고민"),
                Field::text("관계 고민"),
            ]),
            basic_report: None,
            ai_report: None,
            compat_form: FormState::new(vec![
                Field::mbti_type("유형 A", default_report_type()),
                Field::mbti_type("유형 B", MbtiType::default()),
            ]),
            compatibility: None,
            career_form: FormState::new(vec![
                Field::mbti_type("MBTI 유형", MbtiType::default()),
                Field::text("현재 직무"),
            ]),
            career_match: None,
            career_advice: None,
            history: Vec::new(),
            history_index: 0,
            compare_a: None,
            compare_b: None,
            comparison: None,
            profile: None,
            profile_form: FormState::new(vec![
                Field::text("닉네임"),
                Field::choice("성별", labelled(&GENDER_OPTIONS, gender_label)),
                Field::choice("연령대", labelled(&AGE_RANGE_OPTIONS, age_range_label)),
                Field::text("프로필 이미지 URL"),
            ]),
            share_form: FormState::new(vec![Field::text("공유 ID")]),
            shared: None,
        }
    }
}

/// The type the report screen opens with when none is given.
pub fn default_report_type() -> MbtiType {
    "ENFP".parse().unwrap_or_default()
}

fn labelled(values: &[&str], label: fn(&str) -> &'static str) -> Vec<(String, String)> {
    values
        .iter()
        .map(|v| (v.to_string(), label(v).to_string()))
        .collect()
}

pub fn gender_label(value: &str) -> &'static str {
    match value {
        "male" => "남성",
        "female" => "여성",
        "other" => "기타",
        "prefer_not_to_say" => "비공개",
        _ => "선택 안 함",
    }
}

pub fn age_range_label(value: &str) -> &'static str {
    match value {
        "10s" => "10대",
        "20s" => "20대",
        "30s" => "30대",
        "40s" => "40대",
        "50s" => "50대",
        "60+" => "60대 이상",
        _ => "선택 안 함",
    }
}

impl ViewState {
    pub fn new(base_url: impl Into<String>) -> Self {
        ViewState {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn screen(&self) -> Screen {
        self.route.screen()
    }

    pub fn is_loading(&self, slot: RequestSlot) -> bool {
        self.loading.contains(&slot)
    }

    pub fn is_slow(&self, slot: RequestSlot) -> bool {
        self.slow.contains(&slot)
    }

    pub fn error(&self, slot: RequestSlot) -> Option<&str> {
        self.errors.get(&slot).map(String::as_str)
    }

    /// The form that receives typing on the current screen, if any.
    pub fn active_form(&self) -> Option<&FormState> {
        match self.screen() {
            Screen::Login => Some(&self.login_form),
            Screen::Register => Some(&self.register_form),
            Screen::Report => Some(&self.report_form),
            Screen::Compatibility => Some(&self.compat_form),
            Screen::Career => Some(&self.career_form),
            Screen::Profile => Some(&self.profile_form),
            Screen::Share => Some(&self.share_form),
            Screen::Home | Screen::Test | Screen::Result | Screen::Dashboard => None,
        }
    }

    /// Whether printable keys go into a text field rather than shortcuts.
    pub fn is_typing(&self) -> bool {
        self.active_form().is_some_and(FormState::is_typing)
    }

    /// Session id of the result on screen, from the route.
    pub fn result_session(&self) -> Option<&str> {
        match &self.route {
            Route::Result { session_id } => Some(session_id),
            _ => None,
        }
    }

    fn enter_route(&mut self, route: Route) {
        self.scroll = 0;
        match &route {
            Route::Login => self.login_form.clear_secrets(),
            Route::Register => self.register_form.clear_secrets(),
            Route::Result { session_id } => {
                let same = self.result_session() == Some(session_id.as_str());
                if !same {
                    self.result = None;
                    self.share_link = None;
                    self.saved_to_history = false;
                    self.pdf_path = None;
                }
            }
            Route::Report { mbti_type } => {
                self.report_form
                    .set_value(field::REPORT_TYPE, &mbti_type.to_string());
                self.basic_report = None;
                self.ai_report = None;
            }
            Route::Career { mbti_type } => {
                self.career_form
                    .set_value(field::CAREER_TYPE, &mbti_type.to_string());
                self.career_match = None;
                self.career_advice = None;
            }
            Route::Dashboard => {
                self.history_index = 0;
                self.comparison = None;
            }
            Route::Share { share_id } => {
                if let Some(id) = share_id {
                    self.share_form.set_value(field::SHARE_ID, id);
                }
                self.shared = None;
            }
            Route::Home | Route::Test | Route::Compatibility | Route::Profile => {}
        }
        self.route = route;
    }

    fn fill_profile_form(&mut self, profile: &Profile) {
        let form = &mut self.profile_form;
        form.set_value(field::PROFILE_NICKNAME, &profile.nickname);
        form.set_value(field::PROFILE_GENDER, profile.gender.as_deref().unwrap_or(""));
        form.set_value(field::PROFILE_AGE, profile.age_range.as_deref().unwrap_or(""));
        form.set_value(
            field::PROFILE_IMAGE,
            profile.profile_image_url.as_deref().unwrap_or(""),
        );
    }
}

// ---------------------------------------------------------------------------
// UiUpdate processing
// ---------------------------------------------------------------------------

/// Apply a single UiUpdate to the ViewState.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Navigated(route) => state.enter_route(route),
        UiUpdate::AuthChanged { authenticated } => {
            state.authenticated = authenticated;
            let last = widgets::home::menu_entries(authenticated).len() - 1;
            state.menu_index = state.menu_index.min(last);
            if !authenticated {
                state.profile = None;
                state.history.clear();
                state.comparison = None;
            }
        }
        UiUpdate::ServerReachable(ok) => {
            state.server = if ok {
                ServerStatus::Reachable
            } else {
                ServerStatus::Unreachable
            };
        }
        UiUpdate::Loading(slot) => {
            state.loading.insert(slot);
            state.slow.remove(&slot);
            state.errors.remove(&slot);
        }
        UiUpdate::SlowHint(slot) => {
            state.slow.insert(slot);
        }
        UiUpdate::Settled(slot) => {
            state.loading.remove(&slot);
            state.slow.remove(&slot);
        }
        UiUpdate::Failed { slot, message } => {
            state.errors.insert(slot, message);
        }
        UiUpdate::Notice(text) => state.notice = Some(text),
        UiUpdate::Questions(questions) => {
            state.questions = questions;
            state.question_index = 0;
        }
        UiUpdate::AnswerRecorded {
            question_id, value, ..
        } => {
            state.answers.insert(question_id, value);
        }
        UiUpdate::AnswersCleared => {
            state.answers.clear();
            state.question_index = 0;
        }
        UiUpdate::Result(result) => state.result = Some(result),
        UiUpdate::PdfSaved { path } => {
            state.notice = Some(format!("PDF 저장됨: {}", path.display()));
            state.pdf_path = Some(path);
        }
        UiUpdate::ShareReady { link, .. } => state.share_link = Some(link),
        UiUpdate::SavedToHistory { .. } => state.saved_to_history = true,
        UiUpdate::BasicReport(report) => state.basic_report = Some(report),
        UiUpdate::AiReport(report) => state.ai_report = Some(report),
        UiUpdate::Compatibility(compat) => state.compatibility = Some(compat),
        UiUpdate::CareerMatch(matched) => state.career_match = Some(matched),
        UiUpdate::CareerAdvice(advice) => state.career_advice = Some(advice),
        UiUpdate::History(history) => {
            state.history_index = state.history_index.min(history.len().saturating_sub(1));
            // Picks that are no longer listed cannot be compared.
            let listed = |id: &Option<String>| {
                id.as_ref()
                    .is_some_and(|id| history.iter().any(|r| &r.session_id == id))
            };
            if !listed(&state.compare_a) {
                state.compare_a = None;
            }
            if !listed(&state.compare_b) {
                state.compare_b = None;
            }
            state.history = history;
        }
        UiUpdate::Comparison(comparison) => state.comparison = Some(comparison),
        UiUpdate::Profile(profile) => {
            state.fill_profile_form(&profile);
            state.profile = Some(profile);
        }
        UiUpdate::SharedResult(shared) => state.shared = Some(shared),
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

/// Render the complete frame: status bar, the current screen, the help bar,
/// and the quit dialog on top when it is open.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    widgets::notice::render(frame, layout.notice, state);

    let body = layout.body;
    match state.screen() {
        Screen::Home => widgets::home::render(frame, body, state),
        Screen::Login => widgets::auth::render_login(frame, body, state),
        Screen::Register => widgets::auth::render_register(frame, body, state),
        Screen::Test => widgets::test::render(frame, body, state),
        Screen::Result => widgets::result::render(frame, body, state),
        Screen::Report => widgets::report::render(frame, body, state),
        Screen::Compatibility => widgets::compatibility::render(frame, body, state),
        Screen::Career => widgets::career::render(frame, body, state),
        Screen::Dashboard => widgets::dashboard::render(frame, body, state),
        Screen::Profile => widgets::profile::render(frame, body, state),
        Screen::Share => widgets::share::render(frame, body, state),
    }

    widgets::help_bar::render(frame, layout.help_bar, state);

    if state.confirm_quit {
        widgets::quit_confirm::render(frame, frame.area());
    }
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop.
///
/// 1. Initializes the terminal (raw mode, alternate screen).
/// 2. Installs a panic hook that restores the terminal.
/// 3. Selects over UI updates, keyboard input and render ticks.
/// 4. Restores the terminal on exit.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
    base_url: String,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(base_url);
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => apply_ui_update(&mut view_state, update),
                    // The orchestrator has shut down.
                    None => break Ok(()),
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            debug!(?cmd, "dispatching command");
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "terminal input failed");
                        break Err(e.into());
                    }
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
