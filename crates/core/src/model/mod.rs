mod fraction;
mod ids;
mod mixed;
mod mode;
mod problem;
mod progress;
mod session;

pub use fraction::{Fraction, FractionError};
pub use ids::{LearnerId, ParseIdError};
pub use mixed::MixedNumber;
pub use mode::{Difficulty, ModeParseError, OperandArity, OperationMode};
pub use problem::{Expected, Operands, Problem, Relation, RelationParseError};
pub use progress::{CompletionReport, LevelProgress, UserProgress};
pub use session::{QuestionRecord, SessionSummary, SessionSummaryError};
