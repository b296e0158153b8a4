use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::model::OperationMode;
use crate::scoring::MAX_POINTS_PER_QUESTION;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionSummaryError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many questions for a single session: {len}")]
    TooManyQuestions { len: usize },
}

/// Outcome of one question once the learner moved past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub correct: bool,
    /// Submissions made, including the successful one.
    pub attempts: u32,
    pub points: u32,
}

/// Aggregate summary for a completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    mode: OperationMode,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    total_questions: u32,
    correct: u32,
    score: u32,
    max_score: u32,
    history: Vec<QuestionRecord>,
}

impl SessionSummary {
    /// Build a summary from the per-question records of a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionSummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    /// Returns `SessionSummaryError::TooManyQuestions` if the record count cannot fit in `u32`.
    pub fn from_records(
        mode: OperationMode,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        records: &[QuestionRecord],
    ) -> Result<Self, SessionSummaryError> {
        if completed_at < started_at {
            return Err(SessionSummaryError::InvalidTimeRange);
        }
        let total_questions = u32::try_from(records.len())
            .map_err(|_| SessionSummaryError::TooManyQuestions { len: records.len() })?;

        let mut correct = 0_u32;
        let mut score = 0_u32;
        for record in records {
            if record.correct {
                correct = correct.saturating_add(1);
            }
            score = score.saturating_add(record.points);
        }

        Ok(Self {
            mode,
            started_at,
            completed_at,
            total_questions,
            correct,
            score,
            max_score: total_questions.saturating_mul(MAX_POINTS_PER_QUESTION),
            history: records.to_vec(),
        })
    }

    #[must_use]
    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct(&self) -> u32 {
        self.correct
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    #[must_use]
    pub fn history(&self) -> &[QuestionRecord] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn summary_counts_correct_answers_and_points() {
        let now = fixed_now();
        let records = [
            QuestionRecord {
                correct: true,
                attempts: 1,
                points: 5,
            },
            QuestionRecord {
                correct: true,
                attempts: 3,
                points: 1,
            },
            QuestionRecord {
                correct: false,
                attempts: 2,
                points: 0,
            },
        ];

        let summary =
            SessionSummary::from_records(OperationMode::Comparison, now, now, &records).unwrap();

        assert_eq!(summary.total_questions(), 3);
        assert_eq!(summary.correct(), 2);
        assert_eq!(summary.score(), 6);
        assert_eq!(summary.max_score(), 15);
        assert_eq!(summary.history().len(), 3);
    }

    #[test]
    fn rejects_inverted_time_range() {
        let now = fixed_now();
        let err = SessionSummary::from_records(
            OperationMode::Addition,
            now,
            now - chrono::Duration::seconds(1),
            &[],
        )
        .unwrap_err();
        assert_eq!(err, SessionSummaryError::InvalidTimeRange);
    }
}
