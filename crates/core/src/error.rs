use thiserror::Error;

use crate::bank::BankLineError;
use crate::generator::GenerateError;
use crate::model::{FractionError, ModeParseError, ParseIdError, SessionSummaryError};
use crate::settings::SettingsError;
use crate::validator::InputError;

/// Any error raised by the drill core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Fraction(#[from] FractionError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    BankLine(#[from] BankLineError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Summary(#[from] SessionSummaryError),
    #[error(transparent)]
    Mode(#[from] ModeParseError),
    #[error(transparent)]
    LearnerId(#[from] ParseIdError),
}
