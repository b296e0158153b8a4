use chrono::{DateTime, Utc};
use std::fmt;

use drill_core::model::{CompletionReport, OperationMode, Problem, QuestionRecord, SessionSummary};
use drill_core::{Hint, InputError, MAX_POINTS_PER_QUESTION, RawInput, ScoringPolicy, validate};

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SUBMIT OUTCOME ────────────────────────────────────────────────────────────
//

/// What happened to one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The answer was right; the question is now answered and waits for `advance`.
    Correct { points: u32, hint: Option<Hint> },
    /// The answer was wrong; `attempts` counts wrong submissions on this question.
    Incorrect { attempts: u32 },
    /// The input could not be read. Nothing was counted.
    Rejected(InputError),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One scored run through a fixed list of problems.
///
/// Each question is submitted until correct (or skipped), then advanced past.
/// The session completes when the last question is advanced past or skipped.
pub struct QuizSession {
    mode: OperationMode,
    scoring: ScoringPolicy,
    problems: Vec<Problem>,
    current: usize,
    failures_on_current: u32,
    awarded_on_current: Option<u32>,
    history: Vec<QuestionRecord>,
    score: u32,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    reported: bool,
}

impl QuizSession {
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no problems are provided.
    pub fn new(
        mode: OperationMode,
        scoring: ScoringPolicy,
        problems: Vec<Problem>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if problems.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            mode,
            scoring,
            problems,
            current: 0,
            failures_on_current: 0,
            awarded_on_current: None,
            history: Vec::new(),
            score: 0,
            started_at,
            completed_at: None,
            reported: false,
        })
    }

    #[must_use]
    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    #[must_use]
    pub fn scoring(&self) -> ScoringPolicy {
        self.scoring
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.problems.len()
    }

    /// Zero-based index of the current question.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        self.problems.get(self.current)
    }

    /// Wrong submissions on the current question.
    #[must_use]
    pub fn attempts_on_current(&self) -> u32 {
        self.failures_on_current
    }

    #[must_use]
    pub fn is_current_answered(&self) -> bool {
        self.awarded_on_current.is_some()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn max_score(&self) -> u32 {
        u32::try_from(self.problems.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(MAX_POINTS_PER_QUESTION)
    }

    #[must_use]
    pub fn history(&self) -> &[QuestionRecord] {
        &self.history
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.history.iter().filter(|record| record.correct).count()
    }

    /// Whether the result has been accepted by the progress collaborator.
    #[must_use]
    pub fn is_reported(&self) -> bool {
        self.reported
    }

    /// Pre-submission hint for the current question.
    #[must_use]
    pub fn current_hint(&self) -> Option<Hint> {
        let problem = self.current_problem()?;
        let untouched = self.failures_on_current == 0 && self.awarded_on_current.is_none();
        (untouched && problem.has_simplifiable_raw_answer()).then_some(Hint::CanBeSimplified)
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.history.len(),
            remaining: self.problems.len().saturating_sub(self.current),
            score: self.score,
            max_score: self.max_score(),
            is_complete: self.is_complete(),
        }
    }

    /// Check an answer to the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is finished and
    /// `SessionError::AlreadyAnswered` if the current question was already
    /// answered correctly. Malformed input is not an error: it comes back as
    /// `SubmitOutcome::Rejected`.
    pub fn submit(&mut self, input: &RawInput) -> Result<SubmitOutcome, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.is_current_answered() {
            return Err(SessionError::AlreadyAnswered);
        }
        let problem = self.current_problem().ok_or(SessionError::Completed)?;

        let verdict = match validate(problem, input) {
            Ok(verdict) => verdict,
            Err(err) => return Ok(SubmitOutcome::Rejected(err)),
        };

        if verdict.correct {
            let points = self.scoring.points(self.failures_on_current);
            self.score = self.score.saturating_add(points);
            self.awarded_on_current = Some(points);
            Ok(SubmitOutcome::Correct {
                points,
                hint: verdict.hint,
            })
        } else {
            self.failures_on_current = self.failures_on_current.saturating_add(1);
            Ok(SubmitOutcome::Incorrect {
                attempts: self.failures_on_current,
            })
        }
    }

    /// Move past an answered question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once finished and
    /// `SessionError::NotAnswered` if the current question is not answered yet.
    pub fn advance(&mut self, at: DateTime<Utc>) -> Result<SessionProgress, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        let points = self.awarded_on_current.ok_or(SessionError::NotAnswered)?;
        self.history.push(QuestionRecord {
            correct: true,
            attempts: self.failures_on_current.saturating_add(1),
            points,
        });
        self.step(at);
        Ok(self.progress())
    }

    /// Give up on the current question for zero points.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once finished and
    /// `SessionError::AlreadyAnswered` if the question was already answered.
    pub fn skip(&mut self, at: DateTime<Utc>) -> Result<SessionProgress, SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        if self.is_current_answered() {
            return Err(SessionError::AlreadyAnswered);
        }
        self.history.push(QuestionRecord {
            correct: false,
            attempts: self.failures_on_current,
            points: 0,
        });
        self.step(at);
        Ok(self.progress())
    }

    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` before the last question is done.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let completed_at = self.completed_at.ok_or(SessionError::NotComplete)?;
        Ok(SessionSummary::from_records(
            self.mode,
            self.started_at,
            completed_at,
            &self.history,
        )?)
    }

    /// Payload for the progress collaborator.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` before the last question is done.
    pub fn completion_report(&self) -> Result<CompletionReport, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotComplete);
        }
        Ok(CompletionReport {
            level: self.mode,
            score: self.score,
            completed: true,
        })
    }

    pub(crate) fn mark_reported(&mut self) {
        self.reported = true;
    }

    fn step(&mut self, at: DateTime<Utc>) {
        self.current += 1;
        self.failures_on_current = 0;
        self.awarded_on_current = None;
        if self.current >= self.problems.len() {
            self.completed_at = Some(at);
            tracing::info!(
                mode = %self.mode,
                score = self.score,
                max_score = self.max_score(),
                "quiz session complete"
            );
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("scoring", &self.scoring)
            .field("problems_len", &self.problems.len())
            .field("current", &self.current)
            .field("failures_on_current", &self.failures_on_current)
            .field("score", &self.score)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::build_problem;
    use drill_core::model::{Fraction, Operands, Relation};
    use drill_core::time::fixed_now;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    fn quarter_sums(count: usize) -> Vec<Problem> {
        (0..count)
            .map(|_| {
                build_problem(
                    OperationMode::Addition,
                    Operands::pair(frac(1, 4), frac(1, 4)),
                    None,
                )
                .unwrap()
            })
            .collect()
    }

    fn session(scoring: ScoringPolicy, count: usize) -> QuizSession {
        QuizSession::new(
            OperationMode::Addition,
            scoring,
            quarter_sums(count),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn empty_session_returns_error() {
        let err = QuizSession::new(
            OperationMode::Addition,
            ScoringPolicy::Flat,
            Vec::new(),
            fixed_now(),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Empty));
    }

    #[test]
    fn tiered_scoring_drops_with_wrong_answers() {
        let mut quiz = session(ScoringPolicy::Tiered, 3);
        let wrong = RawInput::simple("1", "3");
        let right = RawInput::simple("1", "2");

        assert_eq!(
            quiz.submit(&wrong).unwrap(),
            SubmitOutcome::Incorrect { attempts: 1 }
        );
        assert_eq!(
            quiz.submit(&right).unwrap(),
            SubmitOutcome::Correct {
                points: 3,
                hint: None
            }
        );
        quiz.advance(fixed_now()).unwrap();

        for _ in 0..3 {
            quiz.submit(&wrong).unwrap();
        }
        assert_eq!(
            quiz.submit(&right).unwrap(),
            SubmitOutcome::Correct {
                points: 1,
                hint: None
            }
        );
        quiz.advance(fixed_now()).unwrap();

        assert_eq!(quiz.score(), 4);
        assert_eq!(quiz.history()[1].attempts, 4);
    }

    #[test]
    fn flat_scoring_ignores_wrong_answers() {
        let mut quiz = session(ScoringPolicy::Flat, 1);
        quiz.submit(&RawInput::simple("3", "4")).unwrap();
        quiz.submit(&RawInput::simple("3", "4")).unwrap();
        let outcome = quiz.submit(&RawInput::simple("2", "4")).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Correct {
                points: 5,
                hint: Some(Hint::CorrectButUnreduced)
            }
        );
    }

    #[test]
    fn malformed_input_is_not_counted() {
        let mut quiz = session(ScoringPolicy::Tiered, 1);
        let outcome = quiz.submit(&RawInput::simple("1", "0")).unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(InputError::ZeroDenominator));
        assert_eq!(quiz.attempts_on_current(), 0);
        assert_eq!(quiz.current_hint(), Some(Hint::CanBeSimplified));

        let outcome = quiz.submit(&RawInput::simple("1", "2")).unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Correct {
                points: 5,
                hint: None
            }
        );
    }

    #[test]
    fn answered_question_must_be_advanced() {
        let mut quiz = session(ScoringPolicy::Tiered, 2);
        assert!(matches!(
            quiz.advance(fixed_now()),
            Err(SessionError::NotAnswered)
        ));
        quiz.submit(&RawInput::simple("1", "2")).unwrap();
        assert!(matches!(
            quiz.submit(&RawInput::simple("1", "2")),
            Err(SessionError::AlreadyAnswered)
        ));
        assert!(matches!(
            quiz.skip(fixed_now()),
            Err(SessionError::AlreadyAnswered)
        ));
        let progress = quiz.advance(fixed_now()).unwrap();
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.remaining, 1);
        assert_eq!(quiz.current_index(), 1);
        assert_eq!(quiz.attempts_on_current(), 0);
    }

    #[test]
    fn hint_disappears_after_a_submission() {
        let mut quiz = session(ScoringPolicy::Tiered, 1);
        assert_eq!(quiz.current_hint(), Some(Hint::CanBeSimplified));
        quiz.submit(&RawInput::simple("1", "3")).unwrap();
        assert_eq!(quiz.current_hint(), None);
    }

    #[test]
    fn skip_records_a_miss_and_completes() {
        let mut quiz = session(ScoringPolicy::Tiered, 1);
        quiz.submit(&RawInput::simple("1", "3")).unwrap();
        let progress = quiz.skip(fixed_now()).unwrap();

        assert!(progress.is_complete);
        assert_eq!(
            quiz.history(),
            &[QuestionRecord {
                correct: false,
                attempts: 1,
                points: 0
            }]
        );
        assert_eq!(quiz.correct_count(), 0);
        assert!(matches!(
            quiz.submit(&RawInput::simple("1", "2")),
            Err(SessionError::Completed)
        ));
    }

    #[test]
    fn summary_and_report_require_completion() {
        let mut quiz = session(ScoringPolicy::Tiered, 1);
        assert!(matches!(quiz.summary(), Err(SessionError::NotComplete)));
        assert!(matches!(
            quiz.completion_report(),
            Err(SessionError::NotComplete)
        ));

        quiz.submit(&RawInput::mixed("", "1", "2")).unwrap();
        quiz.advance(fixed_now()).unwrap();

        let summary = quiz.summary().unwrap();
        assert_eq!(summary.score(), 5);
        assert_eq!(summary.max_score(), 5);
        assert_eq!(
            quiz.completion_report().unwrap(),
            CompletionReport {
                level: OperationMode::Addition,
                score: 5,
                completed: true
            }
        );
    }

    #[test]
    fn comparison_questions_take_choices() {
        let problems = vec![
            build_problem(
                OperationMode::Comparison,
                Operands::pair(frac(1, 3), frac(1, 2)),
                None,
            )
            .unwrap(),
        ];
        let mut quiz = QuizSession::new(
            OperationMode::Comparison,
            ScoringPolicy::Tiered,
            problems,
            fixed_now(),
        )
        .unwrap();

        assert!(matches!(
            quiz.submit(&RawInput::simple("1", "2")).unwrap(),
            SubmitOutcome::Rejected(InputError::ExpectedChoice)
        ));
        assert_eq!(
            quiz.submit(&RawInput::choice(Relation::Greater)).unwrap(),
            SubmitOutcome::Incorrect { attempts: 1 }
        );
        assert_eq!(
            quiz.submit(&RawInput::choice("right".parse().unwrap())).unwrap(),
            SubmitOutcome::Correct {
                points: 3,
                hint: None
            }
        );
    }
}
