#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod generator;
pub mod model;
pub mod scoring;
pub mod settings;
pub mod time;
pub mod validator;

pub use error::Error;
pub use generator::{GenerateError, Generator, ProblemSource, build_problem};
pub use scoring::{MAX_POINTS_PER_QUESTION, ScoringPolicy};
pub use settings::{GeneratorConfig, SessionSettings, SettingsError};
pub use time::Clock;
pub use validator::{Answer, Hint, InputError, RawInput, Verdict, parse_input, validate};
