//! Validated request types built from raw parameters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single answer whose shape has been checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question_id: Uuid,
    pub answer: String,
    pub measured_duration: f32,
}

impl TryFrom<crate::params::AnswerQuestion> for QuestionAnswer {
    type Error = crate::SurveyError;

    /// Convert a raw answer into a validated one.
    ///
    /// # Errors
    ///
    /// * `SurveyError::InvalidInput` - When the question id is missing or not
    ///   a UUID, the answer is missing, or the duration is negative or not
    ///   finite
    ///
    /// # Examples
    ///
    /// ```rust
    /// use survey_core::{models::QuestionAnswer, params::AnswerQuestion};
    ///
    /// let raw = AnswerQuestion {
    ///     question_id: Some("67e55044-10b1-426f-9247-bb680e5fe0c8".to_string()),
    ///     answer: Some("3".to_string()),
    ///     measured_duration: 4.2,
    /// };
    /// let answer: QuestionAnswer = raw.try_into()?;
    /// assert_eq!(answer.answer, "3");
    /// # Ok::<(), survey_core::SurveyError>(())
    /// ```
    fn try_from(params: crate::params::AnswerQuestion) -> Result<Self, Self::Error> {
        let question_id = params.validate()?;
        Ok(Self {
            question_id,
            answer: params.answer.unwrap_or_default(),
            measured_duration: params.measured_duration,
        })
    }
}
