use std::env;

use async_trait::async_trait;
use drill_core::model::{CompletionReport, LearnerId, UserProgress};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;

use crate::repository::{ProgressRepository, StorageError};

/// Location of the remote progress API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpProgressConfig {
    pub base_url: String,
}

impl HttpProgressConfig {
    /// Reads `DRILL_PROGRESS_URL`, e.g. `http://localhost:8000/api`.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("DRILL_PROGRESS_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Some(Self::new(base_url))
    }

    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
        }
    }

    fn progress_url(&self, learner: &LearnerId) -> String {
        format!("{}/progress/{}", self.base_url, learner.as_str())
    }
}

/// `ProgressRepository` backed by the REST progress API:
///
/// - `GET {base}/progress/{learner}`
/// - `POST {base}/progress/{learner}/level/{level}?score=..&completed=..`
#[derive(Clone)]
pub struct HttpProgressRepository {
    client: Client,
    config: HttpProgressConfig,
}

impl HttpProgressRepository {
    #[must_use]
    pub fn new(config: HttpProgressConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        HttpProgressConfig::from_env().map(Self::new)
    }

    #[must_use]
    pub fn config(&self) -> &HttpProgressConfig {
        &self.config
    }
}

#[async_trait]
impl ProgressRepository for HttpProgressRepository {
    async fn get_progress(&self, learner: &LearnerId) -> Result<UserProgress, StorageError> {
        let response = self
            .client
            .get(self.config.progress_url(learner))
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn record_completion(
        &self,
        learner: &LearnerId,
        report: &CompletionReport,
    ) -> Result<UserProgress, StorageError> {
        let url = format!(
            "{}/level/{}",
            self.config.progress_url(learner),
            report.level
        );
        let response = self
            .client
            .post(url)
            .query(&LevelQuery {
                score: report.score,
                completed: report.completed,
            })
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }
}

/// Query string of the level update endpoint.
#[derive(Debug, Serialize)]
struct LevelQuery {
    score: u32,
    completed: bool,
}

async fn decode(response: Response) -> Result<UserProgress, StorageError> {
    match response.status() {
        status if status.is_success() => response.json().await.map_err(transport_error),
        StatusCode::NOT_FOUND => Err(StorageError::NotFound),
        status => Err(StorageError::HttpStatus(status.as_u16())),
    }
}

fn transport_error(err: reqwest::Error) -> StorageError {
    if err.is_decode() {
        StorageError::Serialization(err.to_string())
    } else {
        StorageError::Connection(err.to_string())
    }
}
