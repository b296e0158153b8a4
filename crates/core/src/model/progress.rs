use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::LearnerId;
use crate::model::mode::OperationMode;

/// Payload sent to the progress collaborator when a session completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
    pub level: OperationMode,
    pub score: u32,
    pub completed: bool,
}

/// Per-level record kept across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelProgress {
    pub completed: bool,
    /// Best score reached so far.
    pub score: u32,
    pub attempts: u32,
    pub last_attempt: Option<DateTime<Utc>>,
}

/// Cross-session progress for one learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    #[serde(rename = "user_id")]
    pub learner_id: LearnerId,
    pub current_level: OperationMode,
    #[serde(default)]
    pub completed_levels: Vec<OperationMode>,
    #[serde(default)]
    pub progress: BTreeMap<OperationMode, LevelProgress>,
}

impl UserProgress {
    /// Fresh progress: every level present and untouched, first level current.
    #[must_use]
    pub fn new(learner_id: LearnerId) -> Self {
        let progress = OperationMode::ALL
            .into_iter()
            .map(|mode| (mode, LevelProgress::default()))
            .collect();
        Self {
            learner_id,
            current_level: OperationMode::ALL[0],
            completed_levels: Vec::new(),
            progress,
        }
    }

    #[must_use]
    pub fn level(&self, mode: OperationMode) -> Option<&LevelProgress> {
        self.progress.get(&mode)
    }

    #[must_use]
    pub fn is_completed(&self, mode: OperationMode) -> bool {
        self.completed_levels.contains(&mode)
    }

    /// Folds a finished session into the record.
    ///
    /// The best score is kept, attempts always increase, completion is sticky,
    /// and the first completion of a level moves `current_level` to the next one.
    pub fn record(&mut self, report: &CompletionReport, at: DateTime<Utc>) {
        let entry = self.progress.entry(report.level).or_default();
        entry.score = entry.score.max(report.score);
        entry.attempts = entry.attempts.saturating_add(1);
        entry.completed = entry.completed || report.completed;
        entry.last_attempt = Some(at);

        if report.completed && !self.completed_levels.contains(&report.level) {
            self.completed_levels.push(report.level);
            if let Some(next) = report.level.next_level() {
                self.current_level = next;
            }
        }
    }
}
