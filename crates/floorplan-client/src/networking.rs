//! Scorer networking for the evaluation client.
//!
//! One round trip per evaluation:
//! `GET <server>/data_server/evaluation?floor_plan=<url-encoded JSON>`.
//! No retries; a failure is reported to the caller as an
//! [`EvaluationError`].

use std::future::Future;
use std::time::Duration;

use floorplan_logic::{EvaluationError, EvaluationResult, FloorPlanDocument};
use url::Url;

use crate::config::{ClientConfig, ConfigError};

/// Anything that can turn a floor-plan payload into a response body.
pub trait Scorer: Send + Sync + 'static {
    fn score(
        &self,
        floor_plan_json: String,
    ) -> impl Future<Output = Result<String, EvaluationError>> + Send;
}

/// The remote scorer, reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpScorer {
    http: reqwest::Client,
    endpoint: Url,
}

impl HttpScorer {
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(
        http: reqwest::Client,
        config: &ClientConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            http,
            endpoint: config.endpoint()?,
        })
    }

    /// Endpoint with the payload attached as the `floor_plan` query value.
    pub fn request_url(&self, floor_plan_json: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("floor_plan", floor_plan_json);
        url
    }
}

impl Scorer for HttpScorer {
    fn score(
        &self,
        floor_plan_json: String,
    ) -> impl Future<Output = Result<String, EvaluationError>> + Send {
        let url = self.request_url(&floor_plan_json);
        let http = self.http.clone();
        async move {
            log::debug!("GET {url}");
            let response = http.get(url).send().await.map_err(EvaluationError::network)?;
            let status = response.status();
            if !status.is_success() {
                return Err(EvaluationError::Status {
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(EvaluationError::network)
        }
    }
}

/// Evaluates documents through a [`Scorer`] with a bounded wait.
#[derive(Debug)]
pub struct EvaluationClient<S> {
    scorer: S,
    timeout: Duration,
}

impl<S: Scorer> EvaluationClient<S> {
    pub fn new(scorer: S, timeout: Duration) -> Self {
        Self { scorer, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sends `doc` to the scorer and decodes the reply.
    pub async fn evaluate(
        &self,
        doc: &FloorPlanDocument,
    ) -> Result<EvaluationResult, EvaluationError> {
        let payload = doc.to_json();
        let body = tokio::time::timeout(self.timeout, self.scorer.score(payload))
            .await
            .map_err(|_| EvaluationError::Timeout {
                after: self.timeout,
            })??;
        EvaluationResult::from_json_str(&body)
    }
}
