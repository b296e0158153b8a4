#![forbid(unsafe_code)]

pub mod bank_loader;
pub mod config;
pub mod error;
pub mod sessions;

pub use drill_core::Clock;
pub use sessions as session;

pub use bank_loader::BankLoader;
pub use config::EngineConfig;
pub use error::{BankLoadError, SessionError};

pub use sessions::{
    CompletionService, LoadOutcome, LoadTicket, QuizSession, ReportOutcome, SessionEngine,
    SessionProgress, SessionState, SubmitOutcome,
};
