// Request bodies and typed response schemas, one per endpoint.
//
// Response structs ignore unknown fields and default the ones the backend
// may leave out, so additive backend changes do not break the client.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use mindmbti_core::answers::Answer;
use mindmbti_core::mbti::{Dimension, MbtiType};
use mindmbti_core::session::AuthToken;

/// Values `/user/me` accepts for `gender` (empty clears the field).
pub const GENDER_OPTIONS: [&str; 5] = ["", "male", "female", "other", "prefer_not_to_say"];

/// Values `/user/me` accepts for `age_range` (empty clears the field).
pub const AGE_RANGE_OPTIONS: [&str; 7] = ["", "10s", "20s", "30s", "40s", "50s", "60+"];

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub nickname: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequest<'a> {
    pub answers: &'a [Answer],
    pub session_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CompatibilityRequest {
    pub type_a: MbtiType,
    pub type_b: MbtiType,
}

#[derive(Debug, Serialize)]
pub(crate) struct CareerAdviceRequest<'a> {
    pub mbti_type: MbtiType,
    pub current_job: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionRequest<'a> {
    pub session_id: &'a str,
}

/// Inputs for `/report/ai`. Blank strings are dropped from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AiReportRequest {
    pub mbti_type: MbtiType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_concern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship_concern: Option<String>,
}

impl AiReportRequest {
    pub fn new(
        mbti_type: MbtiType,
        job: &str,
        current_concern: &str,
        relationship_concern: &str,
    ) -> Self {
        AiReportRequest {
            mbti_type,
            job: non_blank(job),
            current_concern: non_blank(current_concern),
            relationship_concern: non_blank(relationship_concern),
        }
    }
}

/// PATCH body for `/user/me`. Absent fields are left untouched by the
/// backend; `Some("")` clears a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_url: Option<String>,
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Health {
    pub ok: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
    pub nickname: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl LoginResponse {
    pub fn token(&self) -> Option<AuthToken> {
        AuthToken::new(self.access_token.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Questionnaire and results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    pub dimension: String,
    #[serde(default)]
    pub positive_pole: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionsEnvelope {
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmitResponse {
    pub session_id: String,
    #[serde(default)]
    pub saved: Option<u32>,
}

/// Per-dimension pole percentages, e.g. `{"E/I": {"E": 62.5, "I": 37.5}}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentages(pub BTreeMap<String, BTreeMap<String, f64>>);

impl Percentages {
    /// `(first pole %, second pole %)` for `dimension`, if reported.
    pub fn split(&self, dimension: Dimension) -> Option<(f64, f64)> {
        let poles = self.0.get(dimension.key())?;
        let (a, b) = dimension.poles();
        let pa = poles.get(&a.to_string()).copied();
        let pb = poles.get(&b.to_string()).copied();
        match (pa, pb) {
            (Some(pa), Some(pb)) => Some((pa, pb)),
            (Some(pa), None) => Some((pa, 100.0 - pa)),
            (None, Some(pb)) => Some((100.0 - pb, pb)),
            (None, None) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MbtiResult {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(rename = "type")]
    pub mbti_type: MbtiType,
    #[serde(default)]
    pub percentages: Percentages,
}

/// Raw bytes of a rendered result PDF.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportBody {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub stress_reaction: String,
    #[serde(default)]
    pub decision_style: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BasicReport {
    pub mbti_type: MbtiType,
    #[serde(flatten)]
    pub body: ReportBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AiReport {
    pub mbti_type: MbtiType,
    pub ai_interpretation: String,
}

// ---------------------------------------------------------------------------
// Compatibility and career
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Compatibility {
    pub type_a: MbtiType,
    pub type_b: MbtiType,
    pub relationship_type: String,
    #[serde(default)]
    pub relationship_key: Option<String>,
    #[serde(default)]
    pub conflict_points: Vec<String>,
    #[serde(default)]
    pub communication_strategy: Vec<String>,
    #[serde(default)]
    pub long_term_tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CareerMatch {
    pub mbti_type: MbtiType,
    #[serde(default)]
    pub recommended_careers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CareerAdvice {
    pub mbti_type: MbtiType,
    #[serde(default)]
    pub current_job: String,
    pub career_advice: String,
    #[serde(default)]
    pub strength_strategy: String,
}

// ---------------------------------------------------------------------------
// Sharing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ShareCreated {
    pub share_id: String,
    #[serde(default)]
    pub share_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SharedResult {
    #[serde(rename = "type")]
    pub mbti_type: MbtiType,
    #[serde(default)]
    pub percentages: Percentages,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub report: ReportBody,
}

// ---------------------------------------------------------------------------
// Profile and dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub id: String,
    pub email: String,
    pub nickname: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age_range: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoryRecord {
    pub session_id: String,
    #[serde(rename = "type")]
    pub mbti_type: MbtiType,
    #[serde(default)]
    pub percentages: Percentages,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryEnvelope {
    #[serde(default)]
    pub history: Vec<HistoryRecord>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SavedRecord {
    pub saved: bool,
    pub record: HistoryRecord,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComparedResult {
    pub session_id: String,
    #[serde(rename = "type")]
    pub mbti_type: MbtiType,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DimensionChange {
    pub dimension: String,
    /// Percentage-point change of the dimension's first pole (after - before).
    pub change: f64,
    #[serde(default)]
    pub before: BTreeMap<String, f64>,
    #[serde(default)]
    pub after: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comparison {
    pub result_a: ComparedResult,
    pub result_b: ComparedResult,
    pub type_changed: bool,
    #[serde(default)]
    pub dimension_changes: Vec<DimensionChange>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmbti_core::answers::LikertValue;
    use serde_json::json;

    #[test]
    fn ai_report_request_drops_blank_fields() {
        let req = AiReportRequest::new("enfp".parse().unwrap(), "개발자", "  ", "");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"mbti_type": "ENFP", "job": "개발자"}));
    }

    #[test]
    fn profile_update_omits_absent_fields() {
        let update = ProfileUpdate {
            nickname: Some("민수".into()),
            gender: Some(String::new()),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, json!({"nickname": "민수", "gender": ""}));
    }

    #[test]
    fn submit_request_serializes_null_session() {
        let answers = [Answer {
            question_id: 1,
            value: LikertValue::new(3).unwrap(),
        }];
        let body = serde_json::to_value(SubmitRequest {
            answers: &answers,
            session_id: None,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"answers": [{"question_id": 1, "value": 3}], "session_id": null})
        );
    }

    #[test]
    fn percentages_split_per_dimension() {
        let result: MbtiResult = serde_json::from_value(json!({
            "session_id": "abc",
            "type": "ENFP",
            "percentages": {
                "E/I": {"E": 62.5, "I": 37.5},
                "S/N": {"S": 40.0}
            }
        }))
        .unwrap();
        assert_eq!(
            result.percentages.split(Dimension::EnergyFocus),
            Some((62.5, 37.5))
        );
        assert_eq!(
            result.percentages.split(Dimension::Perception),
            Some((40.0, 60.0))
        );
        assert_eq!(result.percentages.split(Dimension::Judgement), None);
    }

    #[test]
    fn basic_report_flattens_body() {
        let report: BasicReport = serde_json::from_value(json!({
            "mbti_type": "INTJ",
            "keywords": ["전략적", "독립적"],
            "strengths": "장기 계획",
            "weaknesses": "감정 표현",
            "stress_reaction": "고립",
            "decision_style": "논리",
            "extra_field": 1
        }))
        .unwrap();
        assert_eq!(report.mbti_type.to_string(), "INTJ");
        assert_eq!(report.body.keywords, vec!["전략적", "독립적"]);
        assert_eq!(report.body.decision_style, "논리");
    }

    #[test]
    fn shared_result_tolerates_empty_report() {
        let shared: SharedResult = serde_json::from_value(json!({
            "type": "ISTJ",
            "percentages": {},
            "session_id": "s1",
            "report": {}
        }))
        .unwrap();
        assert_eq!(shared.report, ReportBody::default());
    }

    #[test]
    fn history_record_parses_backend_timestamps() {
        let record: HistoryRecord = serde_json::from_value(json!({
            "session_id": "s1",
            "type": "ESTP",
            "percentages": {"E/I": {"E": 70.0, "I": 30.0}},
            "created_at": "2025-03-14T09:26:53.589793"
        }))
        .unwrap();
        let created = record.created_at.unwrap();
        assert_eq!(created.format("%Y-%m-%d").to_string(), "2025-03-14");
    }

    #[test]
    fn history_record_allows_null_timestamp() {
        let record: HistoryRecord = serde_json::from_value(json!({
            "session_id": "s1",
            "type": "ESTP",
            "percentages": {},
            "created_at": null
        }))
        .unwrap();
        assert!(record.created_at.is_none());
    }

    #[test]
    fn invalid_type_is_rejected() {
        let parsed: Result<CareerMatch, _> = serde_json::from_value(json!({
            "mbti_type": "XXXX",
            "recommended_careers": []
        }));
        assert!(parsed.is_err());
    }
}
