// MindMBTI backend client.
//
// One method per endpoint. Every method builds its URL from the configured
// base, attaches the bearer token only where the endpoint requires auth, and
// maps the response through the same status/detail/fallback translation.

use reqwest::header::{HeaderMap, CONTENT_DISPOSITION};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use mindmbti_core::answers::CompletedSheet;
use mindmbti_core::config::Config;
use mindmbti_core::mbti::MbtiType;
use mindmbti_core::session::SessionContext;

use crate::error::{extract_detail, fallback, ApiError};
use crate::models::{
    AiReport, AiReportRequest, BasicReport, CareerAdvice, CareerAdviceRequest, CareerMatch,
    Comparison, Compatibility, CompatibilityRequest, Health, HistoryEnvelope, HistoryRecord,
    LoginRequest, LoginResponse, MbtiResult, MessageResponse, PdfDocument, Profile,
    ProfileUpdate, Question, QuestionsEnvelope, RegisterRequest, RegisteredUser, SavedRecord,
    SessionRequest, ShareCreated, SharedResult, SubmitRequest, SubmitResponse,
};

#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// ---------------------------------------------------------------------------
// Per-call descriptor
// ---------------------------------------------------------------------------

/// Whether a call carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Public,
    /// Attached when the session holds a token.
    Bearer,
}

/// Name (for logs) and fallback message of one operation.
#[derive(Debug, Clone, Copy)]
struct Op {
    name: &'static str,
    fallback: &'static str,
}

const fn op(name: &'static str, fallback: &'static str) -> Op {
    Op { name, fallback }
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionContext,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://host/api`) that reads its
    /// bearer token from `session`.
    pub fn new(base_url: &str, session: SessionContext) -> Result<Self, ClientBuildError> {
        let invalid = |reason: String| ClientBuildError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base".to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("mindmbti/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(ApiClient {
            http,
            base_url: parsed,
            session,
        })
    }

    pub fn from_config(config: &Config, session: SessionContext) -> Result<Self, ClientBuildError> {
        Self::new(&config.api.base_url, session)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Same connection pool and base URL, different session.
    pub fn with_session(&self, session: SessionContext) -> ApiClient {
        ApiClient {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            session,
        }
    }

    // -- auth ---------------------------------------------------------------

    pub async fn health(&self) -> Result<Health, ApiError> {
        let op = op("health", fallback::HEALTH);
        self.get_json(op, &["health"], Auth::Public).await
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<RegisteredUser, ApiError> {
        let op = op("register", fallback::REGISTER);
        let body = RegisterRequest {
            email,
            password,
            nickname,
        };
        self.send_json(op, Method::POST, &["auth", "register"], Auth::Public, Some(&body))
            .await
    }

    /// Authenticate. The caller decides whether to store the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let op = op("login", fallback::LOGIN);
        let body = LoginRequest { email, password };
        self.send_json(op, Method::POST, &["auth", "login"], Auth::Public, Some(&body))
            .await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ApiError> {
        let op = op("logout", fallback::LOGOUT);
        self.send_json::<(), _>(op, Method::POST, &["auth", "logout"], Auth::Bearer, None)
            .await
    }

    // -- questionnaire ------------------------------------------------------

    pub async fn questions(&self) -> Result<Vec<Question>, ApiError> {
        let op = op("questions", fallback::QUESTIONS);
        let envelope: QuestionsEnvelope = self.get_json(op, &["mbti", "questions"], Auth::Public).await?;
        Ok(envelope.questions)
    }

    /// Submit a full answer sheet. `session_id` re-uses an existing session.
    pub async fn submit_answers(
        &self,
        sheet: &CompletedSheet,
        session_id: Option<&str>,
    ) -> Result<SubmitResponse, ApiError> {
        let op = op("submit_answers", fallback::SUBMIT);
        let body = SubmitRequest {
            answers: sheet.answers(),
            session_id,
        };
        self.send_json(op, Method::POST, &["mbti", "submit"], Auth::Public, Some(&body))
            .await
    }

    pub async fn result(&self, session_id: &str) -> Result<MbtiResult, ApiError> {
        let op = op("result", fallback::RESULT);
        self.get_json(op, &["mbti", "result", session_id], Auth::Public)
            .await
    }

    pub async fn result_pdf(&self, session_id: &str) -> Result<PdfDocument, ApiError> {
        let op = op("result_pdf", fallback::PDF);
        self.get_pdf(op, &["mbti", "result", session_id, "pdf"], session_id)
            .await
    }

    // -- reports ------------------------------------------------------------

    pub async fn basic_report(&self, mbti_type: MbtiType) -> Result<BasicReport, ApiError> {
        let op = op("basic_report", fallback::BASIC_REPORT);
        let type_str = mbti_type.to_string();
        self.get_json(op, &["report", "basic", &type_str], Auth::Public)
            .await
    }

    pub async fn ai_report(&self, request: &AiReportRequest) -> Result<AiReport, ApiError> {
        let op = op("ai_report", fallback::AI_REPORT);
        self.send_json(op, Method::POST, &["report", "ai"], Auth::Public, Some(request))
            .await
    }

    pub async fn compatibility(
        &self,
        type_a: MbtiType,
        type_b: MbtiType,
    ) -> Result<Compatibility, ApiError> {
        let op = op("compatibility", fallback::COMPATIBILITY);
        let body = CompatibilityRequest { type_a, type_b };
        self.send_json(op, Method::POST, &["compatibility"], Auth::Public, Some(&body))
            .await
    }

    pub async fn career_match(&self, mbti_type: MbtiType) -> Result<CareerMatch, ApiError> {
        let op = op("career_match", fallback::CAREER_MATCH);
        let type_str = mbti_type.to_string();
        self.get_json(op, &["career", "match", &type_str], Auth::Public)
            .await
    }

    pub async fn career_advice(
        &self,
        mbti_type: MbtiType,
        current_job: &str,
    ) -> Result<CareerAdvice, ApiError> {
        let op = op("career_advice", fallback::CAREER_ADVICE);
        let body = CareerAdviceRequest {
            mbti_type,
            current_job,
        };
        self.send_json(op, Method::POST, &["career", "ai-advice"], Auth::Public, Some(&body))
            .await
    }

    // -- sharing ------------------------------------------------------------

    pub async fn create_share(&self, session_id: &str) -> Result<ShareCreated, ApiError> {
        let op = op("create_share", fallback::CREATE_SHARE);
        let body = SessionRequest { session_id };
        self.send_json(op, Method::POST, &["share"], Auth::Public, Some(&body))
            .await
    }

    pub async fn shared_result(&self, share_id: &str) -> Result<SharedResult, ApiError> {
        let op = op("shared_result", fallback::SHARED_RESULT);
        self.get_json(op, &["share", share_id], Auth::Public).await
    }

    pub async fn shared_pdf(&self, share_id: &str) -> Result<PdfDocument, ApiError> {
        let op = op("shared_pdf", fallback::PDF);
        self.get_pdf(op, &["share", share_id, "pdf"], share_id).await
    }

    // -- profile ------------------------------------------------------------

    pub async fn profile(&self) -> Result<Profile, ApiError> {
        let op = op("profile", fallback::PROFILE);
        self.get_json(op, &["user", "me"], Auth::Bearer).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<Profile, ApiError> {
        let op = op("update_profile", fallback::UPDATE_PROFILE);
        self.send_json(op, Method::PATCH, &["user", "me"], Auth::Bearer, Some(update))
            .await
    }

    // -- dashboard ----------------------------------------------------------

    pub async fn save_to_history(&self, session_id: &str) -> Result<SavedRecord, ApiError> {
        let op = op("save_to_history", fallback::SAVE_HISTORY);
        let body = SessionRequest { session_id };
        self.send_json(op, Method::POST, &["dashboard", "save"], Auth::Bearer, Some(&body))
            .await
    }

    /// Saved results, newest first (backend order).
    pub async fn history(&self) -> Result<Vec<HistoryRecord>, ApiError> {
        let op = op("history", fallback::HISTORY);
        let envelope: HistoryEnvelope =
            self.get_json(op, &["dashboard", "history"], Auth::Bearer).await?;
        Ok(envelope.history)
    }

    pub async fn compare(&self, session_a: &str, session_b: &str) -> Result<Comparison, ApiError> {
        let op = op("compare", fallback::COMPARE);
        let mut url = self.endpoint(&["dashboard", "compare"]);
        url.query_pairs_mut()
            .append_pair("session_a", session_a)
            .append_pair("session_b", session_b);
        let request = self.request(Method::GET, url, Auth::Bearer);
        let response = self.execute(op, request).await?;
        parse_json(op, response).await
    }

    // -- plumbing -----------------------------------------------------------

    /// `<base>/<segments...>` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url, auth: Auth) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match (auth, self.session.token()) {
            (Auth::Bearer, Some(token)) => builder.bearer_auth(token.expose()),
            _ => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        op: Op,
        segments: &[&str],
        auth: Auth,
    ) -> Result<T, ApiError> {
        self.send_json::<(), T>(op, Method::GET, segments, auth, None)
            .await
    }

    async fn send_json<B, T>(
        &self,
        op: Op,
        method: Method,
        segments: &[&str],
        auth: Auth,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.request(method, self.endpoint(segments), auth);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.execute(op, request).await?;
        parse_json(op, response).await
    }

    async fn get_pdf(&self, op: Op, segments: &[&str], label: &str) -> Result<PdfDocument, ApiError> {
        let request = self.request(Method::GET, self.endpoint(segments), Auth::Public);
        let response = self.execute(op, request).await?;
        let file_name = pdf_file_name(response.headers(), label);
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(PdfDocument {
            file_name,
            bytes: bytes.to_vec(),
        })
    }

    /// Send the request; map transport failures and non-2xx statuses.
    async fn execute(&self, op: Op, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(operation = op.name, error = %e, "request failed before a response");
            ApiError::Network(e.to_string())
        })?;

        let status = response.status();
        debug!(
            operation = op.name,
            path = %response.url().path(),
            status = status.as_u16(),
            "response received"
        );
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let detail = extract_detail(&body);
        warn!(
            operation = op.name,
            status = status.as_u16(),
            detail = detail.as_deref().unwrap_or(""),
            "request rejected"
        );
        Err(ApiError::Http {
            status: status.as_u16(),
            detail,
            fallback: op.fallback,
        })
    }
}

async fn parse_json<T: DeserializeOwned>(op: Op, response: Response) -> Result<T, ApiError> {
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|e| {
        warn!(operation = op.name, error = %e, "response body did not match schema");
        ApiError::Parse {
            fallback: op.fallback,
            reason: e.to_string(),
        }
    })
}

/// File name from `Content-Disposition: attachment; filename="..."`, or
/// `MindMBTI_<label>.pdf`.
fn pdf_file_name(headers: &HeaderMap, label: &str) -> String {
    headers
        .get(CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.split(';')
                .map(str::trim)
                .find_map(|part| part.strip_prefix("filename="))
        })
        .map(|name| name.trim_matches('"').to_string())
        .filter(|name| is_plain_file_name(name))
        .unwrap_or_else(|| format!("MindMBTI_{label}.pdf"))
}

/// A single path component that cannot climb out of the download directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, SessionContext::new()).unwrap()
    }

    #[test]
    fn endpoint_appends_segments_to_base_path() {
        let c = client("http://localhost:8000/api");
        assert_eq!(
            c.endpoint(&["mbti", "result", "abc123"]).as_str(),
            "http://localhost:8000/api/mbti/result/abc123"
        );
    }

    #[test]
    fn endpoint_handles_trailing_slash() {
        let c = client("http://localhost:8000/api/");
        assert_eq!(
            c.endpoint(&["health"]).as_str(),
            "http://localhost:8000/api/health"
        );
    }

    #[test]
    fn endpoint_percent_encodes_segments() {
        let c = client("http://localhost:8000/api");
        assert_eq!(
            c.endpoint(&["share", "a b/c"]).as_str(),
            "http://localhost:8000/api/share/a%20b%2Fc"
        );
    }

    #[test]
    fn rejects_unusable_base_urls() {
        assert!(matches!(
            ApiClient::new("/api", SessionContext::new()),
            Err(ClientBuildError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", SessionContext::new()),
            Err(ClientBuildError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn pdf_file_name_from_content_disposition() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"MindMBTI_ENFP.pdf\""),
        );
        assert_eq!(pdf_file_name(&headers, "abc"), "MindMBTI_ENFP.pdf");
    }

    #[test]
    fn pdf_file_name_falls_back_to_label() {
        assert_eq!(pdf_file_name(&HeaderMap::new(), "abc"), "MindMBTI_abc.pdf");

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"../../etc/passwd\""),
        );
        assert_eq!(pdf_file_name(&headers, "abc"), "MindMBTI_abc.pdf");
    }

    #[test]
    fn pdf_file_name_rejects_dot_entries() {
        for name in ["\".\"", "\"..\"", "..", "\"\""] {
            let mut headers = HeaderMap::new();
            let value = format!("attachment; filename={name}");
            headers.insert(CONTENT_DISPOSITION, HeaderValue::from_str(&value).unwrap());
            assert_eq!(pdf_file_name(&headers, "abc"), "MindMBTI_abc.pdf", "{name}");
        }
    }
}
