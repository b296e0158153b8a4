use serde::{Deserialize, Serialize};

use crate::model::OperationMode;

/// Points for a question answered correctly on the first try.
pub const MAX_POINTS_PER_QUESTION: u32 = 5;

/// How a correct answer is turned into points.
///
/// - `Tiered`: 5 points with no prior failures, 3 after one, 1 after two or more.
/// - `Flat`: 5 points for any eventual correct answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    Tiered,
    Flat,
}

impl ScoringPolicy {
    /// Default policy per exercise.
    ///
    /// Simplification and addition drills score flatly; every other mode is
    /// tiered by attempt count.
    #[must_use]
    pub fn for_mode(mode: OperationMode) -> Self {
        match mode {
            OperationMode::Simplification | OperationMode::Addition => ScoringPolicy::Flat,
            OperationMode::Comparison
            | OperationMode::Subtraction
            | OperationMode::Multiplication
            | OperationMode::Division
            | OperationMode::Conversion => ScoringPolicy::Tiered,
        }
    }

    /// Points earned by a correct answer after `prior_failures` wrong submissions.
    #[must_use]
    pub fn points(self, prior_failures: u32) -> u32 {
        match (self, prior_failures) {
            (ScoringPolicy::Flat, _) | (ScoringPolicy::Tiered, 0) => MAX_POINTS_PER_QUESTION,
            (ScoringPolicy::Tiered, 1) => 3,
            (ScoringPolicy::Tiered, _) => 1,
        }
    }
}
