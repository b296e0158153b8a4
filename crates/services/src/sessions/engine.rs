use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;
use storage::BankSource;

use drill_core::bank::ParsedBank;
use drill_core::model::{Difficulty, OperationMode, Problem};
use drill_core::{
    Clock, GenerateError, Generator, Hint, ProblemSource, RawInput, SessionSettings,
};

use super::progress::SessionProgress;
use super::quiz::{QuizSession, SubmitOutcome};
use crate::bank_loader::BankLoader;
use crate::config::EngineConfig;
use crate::error::{BankLoadError, SessionError};

/// Where the engine is in the session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    /// Waiting for a question bank; no session exists yet.
    Loading,
    InProgress,
    Complete,
}

/// Identifies one bank load request. Only the newest ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A new session is in progress.
    Started,
    /// A newer request superseded this one; the result was dropped.
    Stale,
}

/// Drives quiz sessions for one operation mode.
///
/// Random sessions start synchronously. Bank sessions go through a ticketed
/// load: `begin_bank_load` hands out a ticket and `complete_bank_load` applies a
/// result only if its ticket is still the newest.
pub struct SessionEngine<R = StdRng> {
    mode: OperationMode,
    settings: SessionSettings,
    clock: Clock,
    generator: Generator<R>,
    loader: Option<BankLoader>,
    difficulty: Option<Difficulty>,
    session: Option<QuizSession>,
    pending: Option<LoadTicket>,
    issued: u64,
    last_error: Option<BankLoadError>,
}

impl SessionEngine<StdRng> {
    #[must_use]
    pub fn new(mode: OperationMode, settings: SessionSettings, clock: Clock) -> Self {
        let generator = Generator::from_os_rng(mode, settings.generator());
        Self::with_generator(settings, clock, generator)
    }

    /// Engine with the configured session settings and a bank loader that
    /// honors the configured fetch timeout.
    #[must_use]
    pub fn from_config(
        mode: OperationMode,
        config: &EngineConfig,
        clock: Clock,
        banks: Arc<dyn BankSource>,
    ) -> Self {
        Self::new(mode, config.settings.clone(), clock)
            .with_bank_loader(BankLoader::from_config(banks, config))
    }

    /// Deterministic engine: the same seed yields the same problems.
    #[must_use]
    pub fn seeded(mode: OperationMode, settings: SessionSettings, clock: Clock, seed: u64) -> Self {
        let generator = Generator::seeded(mode, settings.generator(), seed);
        Self::with_generator(settings, clock, generator)
    }
}

impl<R: Rng> SessionEngine<R> {
    #[must_use]
    pub fn with_generator(settings: SessionSettings, clock: Clock, generator: Generator<R>) -> Self {
        Self {
            mode: generator.mode(),
            settings,
            clock,
            generator,
            loader: None,
            difficulty: None,
            session: None,
            pending: None,
            issued: 0,
            last_error: None,
        }
    }

    #[must_use]
    pub fn with_bank_loader(mut self, loader: BankLoader) -> Self {
        self.loader = Some(loader);
        self
    }

    #[must_use]
    pub fn mode(&self) -> OperationMode {
        self.mode
    }

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Difficulty of the bank behind the current session, if any.
    #[must_use]
    pub fn bank_loader(&self) -> Option<&BankLoader> {
        self.loader.as_ref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            return SessionState::Loading;
        }
        match &self.session {
            None => SessionState::NotStarted,
            Some(session) if session.is_complete() => SessionState::Complete,
            Some(_) => SessionState::InProgress,
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut QuizSession> {
        self.session.as_mut()
    }

    /// The error of the most recent failed bank load.
    #[must_use]
    pub fn last_error(&self) -> Option<&BankLoadError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub fn current_hint(&self) -> Option<Hint> {
        self.session.as_ref().and_then(QuizSession::current_hint)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.as_ref().map(QuizSession::progress)
    }

    /// Start a fresh session of random problems. Any pending bank load is
    /// abandoned.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Generate` if generation hits an arithmetic bug.
    pub fn start_random(&mut self) -> Result<&QuizSession, SessionError> {
        self.pending = None;
        self.difficulty = None;
        self.last_error = None;
        self.session = None;

        let count = self.question_count();
        let problems = self.generator.problems(ProblemSource::Random, count)?;
        let session = self.new_session(problems)?;
        Ok(self.session.insert(session))
    }

    /// Drop the current session and wait for a bank at `difficulty`.
    pub fn begin_bank_load(&mut self, difficulty: Difficulty) -> LoadTicket {
        self.issued += 1;
        let ticket = LoadTicket(self.issued);
        self.pending = Some(ticket);
        self.difficulty = Some(difficulty);
        self.last_error = None;
        self.session = None;
        tracing::debug!(mode = %self.mode, %difficulty, ticket = ticket.0, "bank load started");
        ticket
    }

    /// Apply the result of the load identified by `ticket`.
    ///
    /// Results for superseded tickets are discarded and report `LoadOutcome::Stale`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BankLoad` when the load failed or produced no
    /// usable problem. The engine is then `NotStarted` with the error kept in
    /// [`SessionEngine::last_error`].
    pub fn complete_bank_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<ParsedBank, BankLoadError>,
    ) -> Result<LoadOutcome, SessionError> {
        if self.pending != Some(ticket) {
            tracing::debug!(mode = %self.mode, ticket = ticket.0, "discarding stale bank load");
            return Ok(LoadOutcome::Stale);
        }
        self.pending = None;

        let bank = match result {
            Ok(bank) => bank,
            Err(err) => return Err(self.fail_load(err)),
        };

        let count = self.question_count();
        let problems = match self
            .generator
            .problems(ProblemSource::Bank(bank.entries), count)
        {
            Ok(problems) => problems,
            Err(GenerateError::EmptyBank) => {
                let err = BankLoadError::Empty {
                    mode: self.mode,
                    difficulty: self.difficulty.unwrap_or(Difficulty::Easy),
                };
                return Err(self.fail_load(err));
            }
            Err(err) => return Err(err.into()),
        };

        let session = self.new_session(problems)?;
        self.session = Some(session);
        Ok(LoadOutcome::Started)
    }

    /// Load the bank at `difficulty` through the configured loader and start a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::BankLoad` when no loader is configured or the load fails.
    pub async fn start_bank(&mut self, difficulty: Difficulty) -> Result<LoadOutcome, SessionError> {
        let ticket = self.begin_bank_load(difficulty);
        let Some(loader) = self.loader.clone() else {
            return self.complete_bank_load(ticket, Err(BankLoadError::NoSource));
        };
        let result = loader.load(self.mode, difficulty).await;
        self.complete_bank_load(ticket, result)
    }

    /// Start over with new problems: a reloaded bank if the last session came
    /// from one, otherwise random problems.
    ///
    /// # Errors
    ///
    /// Same as [`SessionEngine::start_bank`] and [`SessionEngine::start_random`].
    pub async fn reset(&mut self) -> Result<SessionState, SessionError> {
        match self.difficulty {
            Some(difficulty) => {
                self.start_bank(difficulty).await?;
            }
            None => {
                self.start_random()?;
            }
        }
        Ok(self.state())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Loading` while a bank loads, `SessionError::NotStarted`
    /// without a session, or the session's own errors.
    pub fn submit(&mut self, input: &RawInput) -> Result<SubmitOutcome, SessionError> {
        self.active_session()?.submit(input)
    }

    /// # Errors
    ///
    /// See [`QuizSession::advance`].
    pub fn advance(&mut self) -> Result<SessionProgress, SessionError> {
        let now = self.clock.now();
        self.active_session()?.advance(now)
    }

    /// # Errors
    ///
    /// See [`QuizSession::skip`].
    pub fn skip(&mut self) -> Result<SessionProgress, SessionError> {
        let now = self.clock.now();
        self.active_session()?.skip(now)
    }

    fn active_session(&mut self) -> Result<&mut QuizSession, SessionError> {
        if self.pending.is_some() {
            return Err(SessionError::Loading);
        }
        self.session.as_mut().ok_or(SessionError::NotStarted)
    }

    fn new_session(&self, problems: Vec<Problem>) -> Result<QuizSession, SessionError> {
        QuizSession::new(
            self.mode,
            self.settings.scoring_for(self.mode),
            problems,
            self.clock.now(),
        )
    }

    fn question_count(&self) -> usize {
        usize::try_from(self.settings.question_count()).unwrap_or(usize::MAX)
    }

    fn fail_load(&mut self, err: BankLoadError) -> SessionError {
        tracing::warn!(mode = %self.mode, %err, "bank load failed");
        self.last_error = Some(err.clone());
        SessionError::BankLoad(err)
    }
}
