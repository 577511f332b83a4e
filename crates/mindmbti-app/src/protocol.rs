// Messages exchanged between the front end and the orchestrator.
//
// The front end sends `UserCommand`s; spawned request tasks report back with
// `ApiEvent`s; the orchestrator pushes `UiUpdate`s for the view to apply.

use std::path::PathBuf;

use mindmbti_api::models::{
    AiReport, AiReportRequest, BasicReport, CareerAdvice, CareerMatch, Comparison,
    Compatibility, Health, HistoryRecord, LoginResponse, MbtiResult, MessageResponse,
    PdfDocument, Profile, ProfileUpdate, Question, RegisteredUser, SavedRecord, ShareCreated,
    SharedResult, SubmitResponse,
};
use mindmbti_api::ApiError;
use mindmbti_core::mbti::MbtiType;

// ---------------------------------------------------------------------------
// Screens and routes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Login,
    Register,
    Test,
    Result,
    Report,
    Compatibility,
    Career,
    Dashboard,
    Profile,
    Share,
}

impl Screen {
    pub fn title(self) -> &'static str {
        match self {
            Screen::Home => "홈",
            Screen::Login => "로그인",
            Screen::Register => "회원가입",
            Screen::Test => "MBTI 검사",
            Screen::Result => "검사 결과",
            Screen::Report => "리포트",
            Screen::Compatibility => "궁합 분석",
            Screen::Career => "직무 매칭",
            Screen::Dashboard => "대시보드",
            Screen::Profile => "마이페이지",
            Screen::Share => "공유된 결과",
        }
    }
}

/// A screen plus the parameters it is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Test,
    Result { session_id: String },
    Report { mbti_type: MbtiType },
    Compatibility,
    Career { mbti_type: MbtiType },
    Dashboard,
    Profile,
    Share { share_id: Option<String> },
}

impl Route {
    pub fn screen(&self) -> Screen {
        match self {
            Route::Home => Screen::Home,
            Route::Login => Screen::Login,
            Route::Register => Screen::Register,
            Route::Test => Screen::Test,
            Route::Result { .. } => Screen::Result,
            Route::Report { .. } => Screen::Report,
            Route::Compatibility => Screen::Compatibility,
            Route::Career { .. } => Screen::Career,
            Route::Dashboard => Screen::Dashboard,
            Route::Profile => Screen::Profile,
            Route::Share { .. } => Screen::Share,
        }
    }
}

// ---------------------------------------------------------------------------
// Request slots
// ---------------------------------------------------------------------------

/// One logical request lane. At most one request per slot is in flight;
/// starting another supersedes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestSlot {
    Health,
    Login,
    Register,
    Logout,
    Questions,
    Submit,
    Result,
    Pdf,
    CreateShare,
    SaveHistory,
    BasicReport,
    AiReport,
    Compatibility,
    CareerMatch,
    CareerAdvice,
    History,
    Compare,
    Profile,
    UpdateProfile,
    SharedResult,
}

impl RequestSlot {
    /// The screen whose teardown cancels this slot. Slots without a screen
    /// (health, logout, PDF downloads) outlive navigation.
    pub fn screen(self) -> Option<Screen> {
        match self {
            RequestSlot::Health | RequestSlot::Logout | RequestSlot::Pdf => None,
            RequestSlot::Login => Some(Screen::Login),
            RequestSlot::Register => Some(Screen::Register),
            RequestSlot::Questions | RequestSlot::Submit => Some(Screen::Test),
            RequestSlot::Result | RequestSlot::CreateShare | RequestSlot::SaveHistory => {
                Some(Screen::Result)
            }
            RequestSlot::BasicReport | RequestSlot::AiReport => Some(Screen::Report),
            RequestSlot::Compatibility => Some(Screen::Compatibility),
            RequestSlot::CareerMatch | RequestSlot::CareerAdvice => Some(Screen::Career),
            RequestSlot::History | RequestSlot::Compare => Some(Screen::Dashboard),
            RequestSlot::Profile | RequestSlot::UpdateProfile => Some(Screen::Profile),
            RequestSlot::SharedResult => Some(Screen::Share),
        }
    }

    /// Slots whose endpoints need a bearer token.
    pub fn requires_auth(self) -> bool {
        matches!(
            self,
            RequestSlot::SaveHistory
                | RequestSlot::History
                | RequestSlot::Compare
                | RequestSlot::Profile
                | RequestSlot::UpdateProfile
        )
    }

    /// Slots that load a screen's first content, where a sleeping backend is
    /// most likely to be noticed.
    pub fn shows_slow_hint(self) -> bool {
        matches!(
            self,
            RequestSlot::Questions | RequestSlot::Result | RequestSlot::SharedResult
        )
    }
}

// ---------------------------------------------------------------------------
// Commands (front end -> orchestrator)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum PdfSource {
    Result { session_id: String },
    Shared { share_id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Navigate(Route),
    CheckHealth,
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        nickname: String,
    },
    Logout,
    /// Start a fresh attempt: discard answers and fetch the questions.
    StartTest,
    Answer {
        question_id: u32,
        value: u8,
    },
    SubmitAnswers,
    LoadResult {
        session_id: String,
    },
    DownloadPdf(PdfSource),
    CreateShare {
        session_id: String,
    },
    SaveToHistory {
        session_id: String,
    },
    LoadBasicReport(MbtiType),
    RequestAiReport(AiReportRequest),
    CheckCompatibility {
        type_a: MbtiType,
        type_b: MbtiType,
    },
    LoadCareerMatch(MbtiType),
    RequestCareerAdvice {
        mbti_type: MbtiType,
        current_job: String,
    },
    LoadHistory,
    Compare {
        session_a: String,
        session_b: String,
    },
    LoadProfile,
    UpdateProfile(ProfileUpdate),
    LoadSharedResult {
        share_id: String,
    },
    /// Re-issue the last request made on the current screen.
    Retry,
    Quit,
}

impl UserCommand {
    /// Whether `Retry` may replay this command. Credentials are never kept
    /// around for replay, and one-shot actions (saving, sharing, PDF
    /// downloads) must not run twice, so `Retry` reloads the screen instead.
    pub fn is_replayable(&self) -> bool {
        !matches!(
            self,
            UserCommand::Navigate(_)
                | UserCommand::Login { .. }
                | UserCommand::Register { .. }
                | UserCommand::Logout
                | UserCommand::Answer { .. }
                | UserCommand::DownloadPdf(_)
                | UserCommand::CreateShare { .. }
                | UserCommand::SaveToHistory { .. }
                | UserCommand::Retry
                | UserCommand::Quit
        )
    }
}

// ---------------------------------------------------------------------------
// Events (request task -> orchestrator)
// ---------------------------------------------------------------------------

/// Outcome of a spawned request, tagged with the generation of its slot at
/// spawn time.
#[derive(Debug)]
pub struct ApiEvent {
    pub slot: RequestSlot,
    pub generation: u64,
    pub outcome: ApiOutcome,
}

#[derive(Debug)]
pub enum ApiOutcome {
    /// The request is still pending after the slow-hint delay.
    StillWaiting,
    Health(Result<Health, ApiError>),
    Login(Result<LoginResponse, ApiError>),
    Register(Result<RegisteredUser, ApiError>),
    Logout(Result<MessageResponse, ApiError>),
    Questions(Result<Vec<Question>, ApiError>),
    Submit(Result<SubmitResponse, ApiError>),
    Result(Result<MbtiResult, ApiError>),
    Pdf(Result<PdfDocument, ApiError>),
    CreateShare(Result<ShareCreated, ApiError>),
    SaveHistory(Result<SavedRecord, ApiError>),
    BasicReport(Result<BasicReport, ApiError>),
    AiReport(Result<AiReport, ApiError>),
    Compatibility(Result<Compatibility, ApiError>),
    CareerMatch(Result<CareerMatch, ApiError>),
    CareerAdvice(Result<CareerAdvice, ApiError>),
    History(Result<Vec<HistoryRecord>, ApiError>),
    Compare(Result<Comparison, ApiError>),
    Profile(Result<Profile, ApiError>),
    UpdateProfile(Result<Profile, ApiError>),
    SharedResult(Result<SharedResult, ApiError>),
}

// ---------------------------------------------------------------------------
// UI updates (orchestrator -> front end)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum UiUpdate {
    Navigated(Route),
    AuthChanged {
        authenticated: bool,
    },
    /// Outcome of the latest health check.
    ServerReachable(bool),
    Loading(RequestSlot),
    SlowHint(RequestSlot),
    Settled(RequestSlot),
    Failed {
        slot: RequestSlot,
        message: String,
    },
    Notice(String),
    Questions(Vec<Question>),
    AnswerRecorded {
        question_id: u32,
        value: u8,
        answered: usize,
    },
    AnswersCleared,
    Result(MbtiResult),
    PdfSaved {
        path: PathBuf,
    },
    ShareReady {
        share_id: String,
        link: String,
    },
    SavedToHistory {
        session_id: String,
    },
    BasicReport(BasicReport),
    AiReport(AiReport),
    Compatibility(Compatibility),
    CareerMatch(CareerMatch),
    CareerAdvice(CareerAdvice),
    History(Vec<HistoryRecord>),
    Comparison(Comparison),
    Profile(Profile),
    SharedResult(SharedResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_maps_to_screen() {
        assert_eq!(
            Route::Result {
                session_id: "s1".into()
            }
            .screen(),
            Screen::Result
        );
        assert_eq!(Route::Share { share_id: None }.screen(), Screen::Share);
        assert_eq!(
            Route::Career {
                mbti_type: MbtiType::default()
            }
            .screen(),
            Screen::Career
        );
    }

    #[test]
    fn background_slots_outlive_navigation() {
        assert_eq!(RequestSlot::Pdf.screen(), None);
        assert_eq!(RequestSlot::Logout.screen(), None);
        assert_eq!(RequestSlot::Health.screen(), None);
        assert_eq!(RequestSlot::Questions.screen(), Some(Screen::Test));
        assert_eq!(RequestSlot::Compare.screen(), Some(Screen::Dashboard));
    }

    #[test]
    fn credentials_are_not_replayable() {
        assert!(!UserCommand::Login {
            email: "a@b.com".into(),
            password: "pw".into()
        }
        .is_replayable());
        assert!(!UserCommand::Retry.is_replayable());
        assert!(UserCommand::LoadHistory.is_replayable());
        assert!(UserCommand::StartTest.is_replayable());
    }

    #[test]
    fn one_shot_actions_are_not_replayable() {
        let session_id = "s1".to_string();
        assert!(!UserCommand::SaveToHistory {
            session_id: session_id.clone()
        }
        .is_replayable());
        assert!(!UserCommand::CreateShare { session_id }.is_replayable());
        assert!(UserCommand::LoadResult {
            session_id: "s1".into()
        }
        .is_replayable());
    }
}
