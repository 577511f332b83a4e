// Application state and orchestration logic.
//
// The central event loop receives user commands from the front end and
// outcomes from spawned API request tasks, keeps the session and the answer
// sheet, and pushes UI updates to the render loop.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use mindmbti_api::error::fallback;
use mindmbti_api::models::{PdfDocument, ShareCreated};
use mindmbti_api::{ApiClient, ApiError, CancelToken};
use mindmbti_core::answers::{AnswerError, AnswerSheet, LikertValue, REQUIRED_ANSWERS};
use mindmbti_core::config::UiConfig;
use mindmbti_core::session::SessionContext;
use mindmbti_core::token_store::TokenStore;

use crate::protocol::{
    ApiEvent, ApiOutcome, PdfSource, RequestSlot, Route, Screen, UiUpdate, UserCommand,
};

pub const LOGIN_REQUIRED: &str = "로그인이 필요합니다";

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

/// A spawned request that has not reported back yet.
struct InFlight {
    generation: u64,
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    pub client: ApiClient,
    /// Shared with `client`; login and logout write it.
    pub session: SessionContext,
    pub token_store: TokenStore,
    pub download_dir: PathBuf,
    pub share_origin: Option<String>,
    pub slow_hint_after: Duration,
    pub route: Route,
    pub answers: AnswerSheet,
    /// Per-slot counter bumped whenever a request is started or abandoned.
    /// Events carrying an older generation are discarded.
    generations: HashMap<RequestSlot, u64>,
    in_flight: HashMap<RequestSlot, InFlight>,
    /// Last replayable command per screen, for `Retry`.
    last_request: HashMap<Screen, UserCommand>,
    /// Spawned request tasks report through clones of this sender.
    api_tx: mpsc::Sender<ApiEvent>,
}

impl AppState {
    pub fn new(
        client: ApiClient,
        token_store: TokenStore,
        ui: &UiConfig,
        api_tx: mpsc::Sender<ApiEvent>,
    ) -> Self {
        let session = client.session().clone();
        AppState {
            client,
            session,
            token_store,
            download_dir: PathBuf::from(&ui.download_dir),
            share_origin: ui.share_origin.clone(),
            slow_hint_after: ui.slow_hint_after(),
            route: Route::Home,
            answers: AnswerSheet::new(),
            generations: HashMap::new(),
            in_flight: HashMap::new(),
            last_request: HashMap::new(),
            api_tx,
        }
    }

    pub fn generation(&self, slot: RequestSlot) -> u64 {
        self.generations.get(&slot).copied().unwrap_or(0)
    }

    pub fn is_in_flight(&self, slot: RequestSlot) -> bool {
        self.in_flight.contains_key(&slot)
    }

    fn bump_generation(&mut self, slot: RequestSlot) -> u64 {
        let generation = self.generations.entry(slot).or_insert(0);
        *generation += 1;
        *generation
    }

    /// Abandon the slot's in-flight request, if any. Returns whether one was
    /// running.
    pub fn cancel_slot(&mut self, slot: RequestSlot) -> bool {
        let Some(request) = self.in_flight.remove(&slot) else {
            return false;
        };
        request.cancel.cancel();
        request.handle.abort();
        // Anything the task already queued is now stale.
        self.bump_generation(slot);
        debug!(?slot, generation = request.generation, "cancelled request");
        true
    }

    /// Cancel every in-flight request that belongs to `screen`.
    pub fn cancel_screen(&mut self, screen: Screen) -> Vec<RequestSlot> {
        let slots: Vec<RequestSlot> = self
            .in_flight
            .keys()
            .copied()
            .filter(|slot| slot.screen() == Some(screen))
            .collect();
        for slot in &slots {
            self.cancel_slot(*slot);
        }
        slots
    }

    pub fn cancel_all(&mut self) {
        let slots: Vec<RequestSlot> = self.in_flight.keys().copied().collect();
        for slot in slots {
            self.cancel_slot(slot);
        }
    }

    /// Spawn `request` in `slot`, superseding whatever the slot was doing.
    ///
    /// The task races the request against the slot's cancel token and reports
    /// the outcome (wrapped by `wrap`) tagged with the new generation. Slots
    /// that show the slow hint also report `StillWaiting` once
    /// `slow_hint_after` has passed without a response.
    pub fn spawn_request<T, Fut>(
        &mut self,
        slot: RequestSlot,
        request: Fut,
        wrap: fn(Result<T, ApiError>) -> ApiOutcome,
    ) -> u64
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        self.cancel_slot(slot);
        let generation = self.bump_generation(slot);
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let tx = self.api_tx.clone();
        let slow_after = slot.shows_slow_hint().then_some(self.slow_hint_after);

        let handle = tokio::spawn(async move {
            let request = token.run(request);
            tokio::pin!(request);

            let result = match slow_after {
                Some(after) => {
                    let first = tokio::time::timeout(after, &mut request).await;
                    match first {
                        Ok(result) => result,
                        Err(_) => {
                            let _ = tx
                                .send(ApiEvent {
                                    slot,
                                    generation,
                                    outcome: ApiOutcome::StillWaiting,
                                })
                                .await;
                            request.await
                        }
                    }
                }
                None => request.await,
            };

            if matches!(result, Err(ApiError::Cancelled)) {
                debug!(?slot, generation, "dropping cancelled response");
                return;
            }
            let _ = tx
                .send(ApiEvent {
                    slot,
                    generation,
                    outcome: wrap(result),
                })
                .await;
        });

        self.in_flight.insert(
            slot,
            InFlight {
                generation,
                cancel,
                handle,
            },
        );
        debug!(?slot, generation, "spawned request");
        generation
    }
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the main application event loop.
///
/// Listens on two channels using `tokio::select!`:
/// 1. User commands from the front end
/// 2. Outcomes of spawned API requests
///
/// Pushes UI updates through `ui_tx` for the render loop.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut api_rx: mpsc::Receiver<ApiEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!(base_url = state.client.base_url(), "application event loop started");

    emit(
        &ui_tx,
        UiUpdate::AuthChanged {
            authenticated: state.session.is_authenticated(),
        },
    )
    .await;
    run_command(&mut state, UserCommand::CheckHealth, &ui_tx).await;

    // `state` holds a sender, so this only closes if that is ever dropped;
    // stop polling then instead of spinning on `None`.
    let mut api_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd, &ui_tx).await,
                    None => {
                        info!("command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = api_rx.recv(), if api_open => {
                match event {
                    Some(event) => handle_api_event(&mut state, event, &ui_tx).await,
                    None => {
                        info!("API event channel closed");
                        api_open = false;
                    }
                }
            }
        }
    }

    state.cancel_all();
    info!("application event loop exiting");
    Ok(())
}

async fn emit(ui_tx: &mpsc::Sender<UiUpdate>, update: UiUpdate) {
    let _ = ui_tx.send(update).await;
}

// ---------------------------------------------------------------------------
// User commands
// ---------------------------------------------------------------------------

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Navigate(route) => open(state, route, ui_tx).await,
        UserCommand::Retry => {
            let screen = state.route.screen();
            match state.last_request.get(&screen).cloned() {
                // Answers in progress survive a retry; only `StartTest` wipes them.
                Some(UserCommand::StartTest) => {
                    info!(?screen, "retrying question fetch");
                    fetch_questions(state, ui_tx).await;
                }
                Some(cmd) => {
                    info!(?screen, "retrying last request");
                    run_command(state, cmd, ui_tx).await;
                }
                None => debug!(?screen, "nothing to retry"),
            }
        }
        other => run_command(state, other, ui_tx).await,
    }
}

/// Navigate to `route` and issue the request that loads it.
async fn open(state: &mut AppState, route: Route, ui_tx: &mpsc::Sender<UiUpdate>) {
    if let Some(load) = navigate(state, route, ui_tx).await {
        run_command(state, load, ui_tx).await;
    }
}

/// Switch screens, cancelling the old screen's requests. Returns the command
/// that loads the new screen's content, if it has any.
async fn navigate(
    state: &mut AppState,
    route: Route,
    ui_tx: &mpsc::Sender<UiUpdate>,
) -> Option<UserCommand> {
    let from = state.route.screen();
    let to = route.screen();
    if from != to {
        for slot in state.cancel_screen(from) {
            emit(ui_tx, UiUpdate::Settled(slot)).await;
        }
    }
    info!(?from, ?to, "navigating");
    state.route = route.clone();
    emit(ui_tx, UiUpdate::Navigated(route.clone())).await;

    match route {
        Route::Test => Some(UserCommand::StartTest),
        Route::Result { session_id } => Some(UserCommand::LoadResult { session_id }),
        Route::Report { mbti_type } => Some(UserCommand::LoadBasicReport(mbti_type)),
        Route::Career { mbti_type } => Some(UserCommand::LoadCareerMatch(mbti_type)),
        Route::Dashboard => Some(UserCommand::LoadHistory),
        Route::Profile => Some(UserCommand::LoadProfile),
        Route::Share {
            share_id: Some(share_id),
        } => Some(UserCommand::LoadSharedResult { share_id }),
        Route::Home
        | Route::Login
        | Route::Register
        | Route::Compatibility
        | Route::Share { share_id: None } => None,
    }
}

/// Spawn a request and tell the view its slot is loading.
async fn start<T, Fut>(
    state: &mut AppState,
    slot: RequestSlot,
    request: Fut,
    wrap: fn(Result<T, ApiError>) -> ApiOutcome,
    ui_tx: &mpsc::Sender<UiUpdate>,
) where
    T: Send + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    state.spawn_request(slot, request, wrap);
    emit(ui_tx, UiUpdate::Loading(slot)).await;
}

async fn fetch_questions(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let client = state.client.clone();
    start(
        state,
        RequestSlot::Questions,
        async move { client.questions().await },
        ApiOutcome::Questions,
        ui_tx,
    )
    .await;
}

/// Without a token, send the user to the login screen instead.
async fn require_login(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) -> bool {
    if state.session.is_authenticated() {
        return true;
    }
    emit(ui_tx, UiUpdate::Notice(LOGIN_REQUIRED.to_string())).await;
    // The login screen loads nothing.
    let _ = navigate(state, Route::Login, ui_tx).await;
    false
}

async fn run_command(state: &mut AppState, cmd: UserCommand, ui_tx: &mpsc::Sender<UiUpdate>) {
    if cmd.is_replayable() {
        state.last_request.insert(state.route.screen(), cmd.clone());
    }
    let client = state.client.clone();

    match cmd {
        UserCommand::CheckHealth => {
            start(
                state,
                RequestSlot::Health,
                async move { client.health().await },
                ApiOutcome::Health,
                ui_tx,
            )
            .await;
        }
        UserCommand::Login { email, password } => {
            if email.trim().is_empty() || password.is_empty() {
                let message = "이메일과 비밀번호를 입력해 주세요".to_string();
                emit(ui_tx, UiUpdate::Failed { slot: RequestSlot::Login, message }).await;
                return;
            }
            info!("logging in");
            start(
                state,
                RequestSlot::Login,
                async move { client.login(email.trim(), &password).await },
                ApiOutcome::Login,
                ui_tx,
            )
            .await;
        }
        UserCommand::Register {
            email,
            password,
            nickname,
        } => {
            if email.trim().is_empty() || password.is_empty() || nickname.trim().is_empty() {
                let message = "이메일, 비밀번호, 닉네임을 모두 입력해 주세요".to_string();
                emit(ui_tx, UiUpdate::Failed { slot: RequestSlot::Register, message }).await;
                return;
            }
            info!("registering a new account");
            start(
                state,
                RequestSlot::Register,
                async move {
                    client
                        .register(email.trim(), &password, nickname.trim())
                        .await
                },
                ApiOutcome::Register,
                ui_tx,
            )
            .await;
        }
        UserCommand::Logout => logout(state, ui_tx).await,
        UserCommand::StartTest => {
            state.answers.clear();
            emit(ui_tx, UiUpdate::AnswersCleared).await;
            fetch_questions(state, ui_tx).await;
        }
        UserCommand::Answer { question_id, value } => {
            let recorded = LikertValue::new(value)
                .and_then(|value| state.answers.record(question_id, value));
            match recorded {
                Ok(_) => {
                    let answered = state.answers.len();
                    emit(
                        ui_tx,
                        UiUpdate::AnswerRecorded {
                            question_id,
                            value,
                            answered,
                        },
                    )
                    .await;
                }
                Err(e) => {
                    warn!(question_id, value, error = %e, "rejected answer");
                    let message = match e {
                        AnswerError::OutOfRange(_) => "1~5 사이의 값으로 답해 주세요".to_string(),
                        _ => format!("알 수 없는 문항입니다 ({question_id})"),
                    };
                    emit(ui_tx, UiUpdate::Notice(message)).await;
                }
            }
        }
        UserCommand::SubmitAnswers => match state.answers.complete() {
            Ok(sheet) => {
                info!(answers = sheet.answers().len(), "submitting answers");
                start(
                    state,
                    RequestSlot::Submit,
                    async move { client.submit_answers(&sheet, None).await },
                    ApiOutcome::Submit,
                    ui_tx,
                )
                .await;
            }
            Err(_) => {
                let message = format!(
                    "모든 문항({REQUIRED_ANSWERS}개)에 답해 주세요. (현재 {}개)",
                    state.answers.len()
                );
                emit(ui_tx, UiUpdate::Notice(message)).await;
            }
        },
        UserCommand::LoadResult { session_id } => {
            start(
                state,
                RequestSlot::Result,
                async move { client.result(&session_id).await },
                ApiOutcome::Result,
                ui_tx,
            )
            .await;
        }
        UserCommand::DownloadPdf(source) => {
            start(
                state,
                RequestSlot::Pdf,
                async move {
                    match source {
                        PdfSource::Result { session_id } => client.result_pdf(&session_id).await,
                        PdfSource::Shared { share_id } => client.shared_pdf(&share_id).await,
                    }
                },
                ApiOutcome::Pdf,
                ui_tx,
            )
            .await;
        }
        UserCommand::CreateShare { session_id } => {
            start(
                state,
                RequestSlot::CreateShare,
                async move { client.create_share(&session_id).await },
                ApiOutcome::CreateShare,
                ui_tx,
            )
            .await;
        }
        UserCommand::SaveToHistory { session_id } => {
            if !require_login(state, ui_tx).await {
                return;
            }
            start(
                state,
                RequestSlot::SaveHistory,
                async move { client.save_to_history(&session_id).await },
                ApiOutcome::SaveHistory,
                ui_tx,
            )
            .await;
        }
        UserCommand::LoadBasicReport(mbti_type) => {
            start(
                state,
                RequestSlot::BasicReport,
                async move { client.basic_report(mbti_type).await },
                ApiOutcome::BasicReport,
                ui_tx,
            )
            .await;
        }
        UserCommand::RequestAiReport(request) => {
            start(
                state,
                RequestSlot::AiReport,
                async move { client.ai_report(&request).await },
                ApiOutcome::AiReport,
                ui_tx,
            )
            .await;
        }
        UserCommand::CheckCompatibility { type_a, type_b } => {
            start(
                state,
                RequestSlot::Compatibility,
                async move { client.compatibility(type_a, type_b).await },
                ApiOutcome::Compatibility,
                ui_tx,
            )
            .await;
        }
        UserCommand::LoadCareerMatch(mbti_type) => {
            start(
                state,
                RequestSlot::CareerMatch,
                async move { client.career_match(mbti_type).await },
                ApiOutcome::CareerMatch,
                ui_tx,
            )
            .await;
        }
        UserCommand::RequestCareerAdvice {
            mbti_type,
            current_job,
        } => {
            if current_job.trim().is_empty() {
                let message = "현재 직무를 입력해 주세요".to_string();
                emit(ui_tx, UiUpdate::Notice(message)).await;
                return;
            }
            start(
                state,
                RequestSlot::CareerAdvice,
                async move { client.career_advice(mbti_type, current_job.trim()).await },
                ApiOutcome::CareerAdvice,
                ui_tx,
            )
            .await;
        }
        UserCommand::LoadHistory => {
            if !require_login(state, ui_tx).await {
                return;
            }
            start(
                state,
                RequestSlot::History,
                async move { client.history().await },
                ApiOutcome::History,
                ui_tx,
            )
            .await;
        }
        UserCommand::Compare {
            session_a,
            session_b,
        } => {
            if session_a.is_empty() || session_b.is_empty() {
                let message = "비교할 결과 두 개를 선택해 주세요".to_string();
                emit(ui_tx, UiUpdate::Notice(message)).await;
                return;
            }
            if !require_login(state, ui_tx).await {
                return;
            }
            start(
                state,
                RequestSlot::Compare,
                async move { client.compare(&session_a, &session_b).await },
                ApiOutcome::Compare,
                ui_tx,
            )
            .await;
        }
        UserCommand::LoadProfile => {
            if !require_login(state, ui_tx).await {
                return;
            }
            start(
                state,
                RequestSlot::Profile,
                async move { client.profile().await },
                ApiOutcome::Profile,
                ui_tx,
            )
            .await;
        }
        UserCommand::UpdateProfile(update) => {
            if !require_login(state, ui_tx).await {
                return;
            }
            start(
                state,
                RequestSlot::UpdateProfile,
                async move { client.update_profile(&update).await },
                ApiOutcome::UpdateProfile,
                ui_tx,
            )
            .await;
        }
        UserCommand::LoadSharedResult { share_id } => {
            let share_id = share_id.trim().to_string();
            if share_id.is_empty() {
                let message = "공유 ID를 입력해 주세요".to_string();
                emit(ui_tx, UiUpdate::Notice(message)).await;
                return;
            }
            start(
                state,
                RequestSlot::SharedResult,
                async move { client.shared_result(&share_id).await },
                ApiOutcome::SharedResult,
                ui_tx,
            )
            .await;
        }
        UserCommand::Navigate(_) | UserCommand::Retry | UserCommand::Quit => {
            // Handled by the caller.
        }
    }
}

/// Forget the token locally and tell the backend. The request carries the
/// old token; its failure is only logged.
async fn logout(state: &mut AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let departing = SessionContext::with_token(state.session.token());
    let client = state.client.with_session(departing);
    start(
        state,
        RequestSlot::Logout,
        async move { client.logout().await },
        ApiOutcome::Logout,
        ui_tx,
    )
    .await;

    forget_token(state);
    info!("logged out");
    emit(ui_tx, UiUpdate::AuthChanged { authenticated: false }).await;
    emit(ui_tx, UiUpdate::Notice("로그아웃되었습니다".to_string())).await;
}

fn forget_token(state: &mut AppState) {
    state.session.clear();
    if let Err(e) = state.token_store.clear() {
        warn!(error = %e, "failed to remove stored token");
    }
}

// ---------------------------------------------------------------------------
// API events
// ---------------------------------------------------------------------------

/// Apply the outcome of a spawned request.
///
/// **Generation check**: every event carries the slot generation at spawn
/// time. Starting or cancelling a request bumps the generation, so events
/// from superseded or abandoned requests never reach the view.
async fn handle_api_event(state: &mut AppState, event: ApiEvent, ui_tx: &mpsc::Sender<UiUpdate>) {
    let ApiEvent {
        slot,
        generation,
        outcome,
    } = event;

    let current = state.generation(slot);
    if generation != current {
        debug!(?slot, generation, current, "discarding stale API event");
        return;
    }

    if let ApiOutcome::StillWaiting = outcome {
        if state.is_in_flight(slot) {
            debug!(?slot, "request is slow, showing hint");
            emit(ui_tx, UiUpdate::SlowHint(slot)).await;
        }
        return;
    }

    state.in_flight.remove(&slot);
    emit(ui_tx, UiUpdate::Settled(slot)).await;

    match outcome {
        ApiOutcome::StillWaiting => {}
        ApiOutcome::Health(result) => {
            let reachable = match result {
                Ok(health) => health.ok,
                Err(e) => {
                    warn!(error = %e, "health check failed");
                    false
                }
            };
            emit(ui_tx, UiUpdate::ServerReachable(reachable)).await;
        }
        ApiOutcome::Login(Ok(response)) => match response.token() {
            Some(token) => {
                state.session.set_token(token.clone());
                if let Err(e) = state.token_store.save(&token) {
                    warn!(error = %e, "failed to persist token; login lasts for this run only");
                }
                info!("login succeeded");
                emit(ui_tx, UiUpdate::AuthChanged { authenticated: true }).await;
                emit(ui_tx, UiUpdate::Notice("로그인되었습니다".to_string())).await;
                open(state, Route::Home, ui_tx).await;
            }
            None => {
                warn!("login response carried an empty token");
                let message = fallback::LOGIN.to_string();
                emit(ui_tx, UiUpdate::Failed { slot, message }).await;
            }
        },
        ApiOutcome::Register(Ok(user)) => {
            info!("registration succeeded");
            let notice = format!("{} 님, 가입이 완료되었습니다. 로그인해 주세요.", user.nickname);
            emit(ui_tx, UiUpdate::Notice(notice)).await;
            open(state, Route::Login, ui_tx).await;
        }
        ApiOutcome::Logout(result) => {
            if let Err(e) = result {
                warn!(error = %e, "backend logout failed; local session already cleared");
            }
        }
        ApiOutcome::Questions(Ok(questions)) => {
            if questions.is_empty() {
                let message = fallback::QUESTIONS.to_string();
                emit(ui_tx, UiUpdate::Failed { slot, message }).await;
            } else {
                info!(count = questions.len(), "questions loaded");
                emit(ui_tx, UiUpdate::Questions(questions)).await;
            }
        }
        ApiOutcome::Submit(Ok(submitted)) => {
            info!(session_id = %submitted.session_id, "answers submitted");
            state.answers.clear();
            emit(ui_tx, UiUpdate::AnswersCleared).await;
            let route = Route::Result {
                session_id: submitted.session_id,
            };
            open(state, route, ui_tx).await;
        }
        ApiOutcome::Result(Ok(result)) => emit(ui_tx, UiUpdate::Result(result)).await,
        ApiOutcome::Pdf(Ok(document)) => match save_pdf(&state.download_dir, &document).await {
            Ok(path) => {
                info!(path = %path.display(), bytes = document.bytes.len(), "PDF saved");
                emit(ui_tx, UiUpdate::PdfSaved { path }).await;
            }
            Err(e) => {
                warn!(error = %e, "failed to write PDF");
                let message = format!("PDF 저장 실패: {e}");
                emit(ui_tx, UiUpdate::Failed { slot, message }).await;
            }
        },
        ApiOutcome::CreateShare(Ok(created)) => {
            let link = share_link(state.share_origin.as_deref(), &created);
            emit(
                ui_tx,
                UiUpdate::ShareReady {
                    share_id: created.share_id,
                    link,
                },
            )
            .await;
        }
        ApiOutcome::SaveHistory(Ok(saved)) => {
            emit(
                ui_tx,
                UiUpdate::SavedToHistory {
                    session_id: saved.record.session_id,
                },
            )
            .await;
            emit(ui_tx, UiUpdate::Notice("기록에 저장되었습니다".to_string())).await;
        }
        ApiOutcome::BasicReport(Ok(report)) => emit(ui_tx, UiUpdate::BasicReport(report)).await,
        ApiOutcome::AiReport(Ok(report)) => emit(ui_tx, UiUpdate::AiReport(report)).await,
        ApiOutcome::Compatibility(Ok(compat)) => {
            emit(ui_tx, UiUpdate::Compatibility(compat)).await
        }
        ApiOutcome::CareerMatch(Ok(matched)) => emit(ui_tx, UiUpdate::CareerMatch(matched)).await,
        ApiOutcome::CareerAdvice(Ok(advice)) => emit(ui_tx, UiUpdate::CareerAdvice(advice)).await,
        ApiOutcome::History(Ok(history)) => emit(ui_tx, UiUpdate::History(history)).await,
        ApiOutcome::Compare(Ok(comparison)) => emit(ui_tx, UiUpdate::Comparison(comparison)).await,
        ApiOutcome::Profile(Ok(profile)) => emit(ui_tx, UiUpdate::Profile(profile)).await,
        ApiOutcome::UpdateProfile(Ok(profile)) => {
            emit(ui_tx, UiUpdate::Profile(profile)).await;
            emit(ui_tx, UiUpdate::Notice("프로필이 저장되었습니다".to_string())).await;
        }
        ApiOutcome::SharedResult(Ok(shared)) => emit(ui_tx, UiUpdate::SharedResult(shared)).await,

        ApiOutcome::Login(Err(e))
        | ApiOutcome::Register(Err(e))
        | ApiOutcome::Questions(Err(e))
        | ApiOutcome::Submit(Err(e))
        | ApiOutcome::Result(Err(e))
        | ApiOutcome::Pdf(Err(e))
        | ApiOutcome::CreateShare(Err(e))
        | ApiOutcome::SaveHistory(Err(e))
        | ApiOutcome::BasicReport(Err(e))
        | ApiOutcome::AiReport(Err(e))
        | ApiOutcome::Compatibility(Err(e))
        | ApiOutcome::CareerMatch(Err(e))
        | ApiOutcome::CareerAdvice(Err(e))
        | ApiOutcome::History(Err(e))
        | ApiOutcome::Compare(Err(e))
        | ApiOutcome::Profile(Err(e))
        | ApiOutcome::UpdateProfile(Err(e))
        | ApiOutcome::SharedResult(Err(e)) => report_failure(state, slot, e, ui_tx).await,
    }
}

/// Show a failed request. A rejected token on an authenticated endpoint
/// logs the user out and opens the login screen.
async fn report_failure(
    state: &mut AppState,
    slot: RequestSlot,
    error: ApiError,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    warn!(?slot, error = %error, "request failed");

    if slot.requires_auth() && error.is_unauthorized() {
        forget_token(state);
        emit(ui_tx, UiUpdate::AuthChanged { authenticated: false }).await;
        emit(ui_tx, UiUpdate::Notice(LOGIN_REQUIRED.to_string())).await;
        let _ = navigate(state, Route::Login, ui_tx).await;
        return;
    }

    emit(
        ui_tx,
        UiUpdate::Failed {
            slot,
            message: error.user_message(),
        },
    )
    .await;
}

async fn save_pdf(dir: &Path, document: &PdfDocument) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(&document.file_name);
    tokio::fs::write(&path, &document.bytes).await?;
    Ok(path)
}

/// `<origin>/share/<id>` when a web origin is configured, otherwise the
/// backend's `share_url`, otherwise the bare id.
pub fn share_link(origin: Option<&str>, created: &ShareCreated) -> String {
    match (origin, created.share_url.as_deref()) {
        (Some(origin), _) => format!("{origin}/share/{}", created.share_id),
        (None, Some(url)) if !url.is_empty() => url.to_string(),
        _ => created.share_id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
