// Error taxonomy for API calls.
//
// Every failure still resolves to one user-facing message (`message()`), but
// callers branch on the variant instead of matching on message text.

use thiserror::Error;

/// Shown instead of the raw transport error: the hosted backend sleeps after
/// 15 minutes of inactivity and the first request after that usually fails.
pub const COLD_START_HINT: &str =
    "서버 연결 실패. 무료 서버는 15분 비활성 시 Sleep 됩니다. 1분 후 다시 시도해 주세요.";

/// Fixed per-operation messages used when the backend gives no `detail`.
pub mod fallback {
    pub const HEALTH: &str = "서버 상태 확인 실패";
    pub const REGISTER: &str = "회원가입 실패";
    pub const LOGIN: &str = "로그인 실패";
    pub const LOGOUT: &str = "로그아웃 실패";
    pub const QUESTIONS: &str = "문항을 불러올 수 없습니다";
    pub const SUBMIT: &str = "답변 제출 실패";
    pub const RESULT: &str = "결과를 불러올 수 없습니다";
    pub const PDF: &str = "PDF 다운로드 실패";
    pub const BASIC_REPORT: &str = "리포트를 불러올 수 없습니다";
    pub const AI_REPORT: &str = "AI 리포트 생성 실패";
    pub const COMPATIBILITY: &str = "궁합 분석 실패";
    pub const CAREER_MATCH: &str = "직무 매칭 실패";
    pub const CAREER_ADVICE: &str = "AI 커리어 조언 생성 실패";
    pub const CREATE_SHARE: &str = "공유 생성 실패";
    pub const SHARED_RESULT: &str = "공유된 결과를 불러올 수 없습니다";
    pub const PROFILE: &str = "프로필 조회 실패";
    pub const UPDATE_PROFILE: &str = "프로필 수정 실패";
    pub const SAVE_HISTORY: &str = "저장 실패";
    pub const HISTORY: &str = "기록 조회 실패";
    pub const COMPARE: &str = "비교 실패";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}: {fallback} (detail: {detail:?})")]
    Http {
        status: u16,
        detail: Option<String>,
        fallback: &'static str,
    },

    /// A 2xx body that does not match the endpoint's schema.
    #[error("{fallback} (invalid response body: {reason})")]
    Parse {
        fallback: &'static str,
        reason: String,
    },

    /// The request was abandoned through its cancel token.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// The message a caller would show for this error: the backend's
    /// `detail` when it sent one, otherwise the operation's fallback.
    pub fn message(&self) -> String {
        match self {
            ApiError::Network(reason) => reason.clone(),
            ApiError::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            ApiError::Http { fallback, .. } | ApiError::Parse { fallback, .. } => {
                (*fallback).to_string()
            }
            ApiError::Cancelled => "요청이 취소되었습니다".to_string(),
        }
    }

    /// Like [`ApiError::message`], but transport failures become the
    /// cold-start hint.
    pub fn user_message(&self) -> String {
        if self.is_network() {
            COLD_START_HINT.to_string()
        } else {
            self.message()
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Pull a human-readable `detail` string out of an error body.
///
/// FastAPI validation errors carry `detail` as an array of objects; those
/// (and anything that is not JSON) yield `None`.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_wins_over_fallback() {
        let err = ApiError::Http {
            status: 400,
            detail: Some("이메일이 이미 등록되어 있습니다".into()),
            fallback: fallback::REGISTER,
        };
        assert_eq!(err.message(), "이메일이 이미 등록되어 있습니다");
        assert_eq!(err.user_message(), "이메일이 이미 등록되어 있습니다");
    }

    #[test]
    fn missing_detail_uses_fallback() {
        let err = ApiError::Http {
            status: 404,
            detail: None,
            fallback: fallback::RESULT,
        };
        assert_eq!(err.message(), "결과를 불러올 수 없습니다");
    }

    #[test]
    fn parse_error_uses_fallback() {
        let err = ApiError::Parse {
            fallback: fallback::HISTORY,
            reason: "missing field".into(),
        };
        assert_eq!(err.message(), fallback::HISTORY);
        assert_eq!(err.status(), None);
    }

    #[test]
    fn network_error_shows_cold_start_hint() {
        let err = ApiError::Network("connection refused".into());
        assert!(err.is_network());
        assert_eq!(err.user_message(), COLD_START_HINT);
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn unauthorized_statuses() {
        let err = |status| ApiError::Http {
            status,
            detail: None,
            fallback: fallback::HISTORY,
        };
        assert!(err(401).is_unauthorized());
        assert!(err(403).is_unauthorized());
        assert!(!err(400).is_unauthorized());
        assert!(!ApiError::Cancelled.is_unauthorized());
    }

    #[test]
    fn extract_detail_variants() {
        assert_eq!(
            extract_detail(br#"{"detail": "X"}"#),
            Some("X".to_string())
        );
        assert_eq!(extract_detail(br#"{"detail": "   "}"#), None);
        assert_eq!(
            extract_detail(br#"{"detail": [{"loc": ["body"], "msg": "field required"}]}"#),
            None
        );
        assert_eq!(extract_detail(br#"{"message": "X"}"#), None);
        assert_eq!(extract_detail(b"<html>Bad Gateway</html>"), None);
        assert_eq!(extract_detail(b""), None);
    }
}
