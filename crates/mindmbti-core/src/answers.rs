// Questionnaire answers: Likert values, the ordered answer sheet, and the
// completed sheet that is the only thing allowed to reach the submit endpoint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of questions in the questionnaire. A sheet is submittable only
/// when every one of them has an answer.
pub const REQUIRED_ANSWERS: usize = 48;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnswerError {
    #[error("answer value must be between 1 and 5, got {0}")]
    OutOfRange(u8),

    #[error("question id must be between 1 and {max}, got {id}")]
    UnknownQuestion { id: u32, max: usize },

    #[error("{answered} of {required} questions answered")]
    Incomplete { answered: usize, required: usize },
}

// ---------------------------------------------------------------------------
// LikertValue
// ---------------------------------------------------------------------------

/// A single Likert-scale response: 1 (not at all) to 5 (very much).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct LikertValue(u8);

impl LikertValue {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, AnswerError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(LikertValue(value))
        } else {
            Err(AnswerError::OutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for LikertValue {
    type Error = AnswerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        LikertValue::new(value)
    }
}

impl From<LikertValue> for u8 {
    fn from(value: LikertValue) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// Answer
// ---------------------------------------------------------------------------

/// Wire shape of one answer: `{ "question_id": 7, "value": 4 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: u32,
    pub value: LikertValue,
}

// ---------------------------------------------------------------------------
// AnswerSheet
// ---------------------------------------------------------------------------

/// Answers collected during one test attempt, keyed and ordered by question id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerSheet {
    answers: BTreeMap<u32, LikertValue>,
}

impl AnswerSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or overwrite) the answer for `question_id`.
    ///
    /// Returns the previous value if the question had already been answered.
    pub fn record(
        &mut self,
        question_id: u32,
        value: LikertValue,
    ) -> Result<Option<LikertValue>, AnswerError> {
        if question_id == 0 || question_id as usize > REQUIRED_ANSWERS {
            return Err(AnswerError::UnknownQuestion {
                id: question_id,
                max: REQUIRED_ANSWERS,
            });
        }
        Ok(self.answers.insert(question_id, value))
    }

    pub fn get(&self, question_id: u32) -> Option<LikertValue> {
        self.answers.get(&question_id).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == REQUIRED_ANSWERS
    }

    pub fn clear(&mut self) {
        self.answers.clear();
    }

    /// Question ids (1-based) that still lack an answer, in ascending order.
    pub fn unanswered(&self) -> Vec<u32> {
        (1..=REQUIRED_ANSWERS as u32)
            .filter(|id| !self.answers.contains_key(id))
            .collect()
    }

    /// Iterate the recorded answers in question order.
    pub fn iter(&self) -> impl Iterator<Item = Answer> + '_ {
        self.answers.iter().map(|(&question_id, &value)| Answer { question_id, value })
    }

    /// Freeze the sheet for submission. Fails unless every question is answered.
    pub fn complete(&self) -> Result<CompletedSheet, AnswerError> {
        if !self.is_complete() {
            return Err(AnswerError::Incomplete {
                answered: self.answers.len(),
                required: REQUIRED_ANSWERS,
            });
        }
        Ok(CompletedSheet {
            answers: self.iter().collect(),
        })
    }
}

/// A sheet with exactly one answer per question, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSheet {
    answers: Vec<Answer>,
}

impl CompletedSheet {
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn likert(v: u8) -> LikertValue {
        LikertValue::new(v).unwrap()
    }

    fn full_sheet() -> AnswerSheet {
        let mut sheet = AnswerSheet::new();
        for id in 1..=REQUIRED_ANSWERS as u32 {
            sheet.record(id, likert((id % 5 + 1) as u8)).unwrap();
        }
        sheet
    }

    #[test]
    fn likert_accepts_one_through_five() {
        for v in 1..=5 {
            assert_eq!(LikertValue::new(v).unwrap().get(), v);
        }
    }

    #[test]
    fn likert_rejects_out_of_range() {
        assert_eq!(LikertValue::new(0), Err(AnswerError::OutOfRange(0)));
        assert_eq!(LikertValue::new(6), Err(AnswerError::OutOfRange(6)));
    }

    #[test]
    fn likert_deserialize_rejects_out_of_range() {
        let parsed: Result<Answer, _> =
            serde_json::from_str(r#"{"question_id": 1, "value": 9}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn answer_serializes_as_plain_integers() {
        let answer = Answer {
            question_id: 12,
            value: likert(4),
        };
        let json = serde_json::to_value(answer).unwrap();
        assert_eq!(json, serde_json::json!({"question_id": 12, "value": 4}));
    }

    #[test]
    fn record_overwrites_previous_answer() {
        let mut sheet = AnswerSheet::new();
        assert_eq!(sheet.record(3, likert(2)).unwrap(), None);
        assert_eq!(sheet.record(3, likert(5)).unwrap(), Some(likert(2)));
        assert_eq!(sheet.get(3), Some(likert(5)));
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn record_rejects_unknown_question_ids() {
        let mut sheet = AnswerSheet::new();
        assert!(matches!(
            sheet.record(0, likert(3)),
            Err(AnswerError::UnknownQuestion { id: 0, .. })
        ));
        assert!(matches!(
            sheet.record(49, likert(3)),
            Err(AnswerError::UnknownQuestion { id: 49, .. })
        ));
        assert!(sheet.is_empty());
    }

    #[test]
    fn iter_is_ordered_by_question_id() {
        let mut sheet = AnswerSheet::new();
        sheet.record(10, likert(1)).unwrap();
        sheet.record(2, likert(2)).unwrap();
        sheet.record(7, likert(3)).unwrap();
        let ids: Vec<u32> = sheet.iter().map(|a| a.question_id).collect();
        assert_eq!(ids, vec![2, 7, 10]);
    }

    #[test]
    fn incomplete_sheet_cannot_be_completed() {
        let mut sheet = full_sheet();
        sheet.answers.remove(&17);
        assert_eq!(
            sheet.complete(),
            Err(AnswerError::Incomplete {
                answered: 47,
                required: 48
            })
        );
        assert_eq!(sheet.unanswered(), vec![17]);
    }

    #[test]
    fn complete_sheet_yields_all_answers_in_order() {
        let sheet = full_sheet();
        assert!(sheet.is_complete());
        let completed = sheet.complete().unwrap();
        assert_eq!(completed.answers().len(), REQUIRED_ANSWERS);
        assert_eq!(completed.answers()[0].question_id, 1);
        assert_eq!(completed.answers()[47].question_id, 48);
    }

    #[test]
    fn clear_resets_sheet() {
        let mut sheet = full_sheet();
        sheet.clear();
        assert!(sheet.is_empty());
        assert_eq!(sheet.unanswered().len(), REQUIRED_ANSWERS);
    }
}
