mod engine;
mod progress;
mod quiz;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use engine::{LoadOutcome, LoadTicket, SessionEngine, SessionState};
pub use progress::SessionProgress;
pub use quiz::{QuizSession, SubmitOutcome};
pub use workflow::{CompletionService, ReportOutcome};
