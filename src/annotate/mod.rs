//! Async annotation job poller
//!
//! The free-text annotation service is a submit-then-poll API: a
//! submission returns a session id, and results materialize on the
//! service's own schedule. Retrieval responses are messy in practice —
//! not-found while the job spins up, malformed-request errors that
//! actually mean "still processing", markup placeholder bodies — so
//! classification is its own function and the poll loop is a small
//! state machine over it.

use crate::util::RateLimiter;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Body signature of a malformed-request response that really means
/// the job is still running.
const STILL_PROCESSING_MARKER: &str = "Result is not ready";

/// Consecutive still-processing errors tolerated once the leniency
/// window has passed.
const MAX_TRANSIENT_REPEATS: usize = 3;

#[derive(Debug, Error)]
pub enum PollError {
    #[error("transport error: {0} — is the annotation service reachable?")]
    Transport(#[from] reqwest::Error),

    #[error("annotation service failure ({status}): {detail}")]
    Fatal { status: u16, detail: String },

    #[error("job kept reporting a processing error after {attempts} attempts — it likely failed upstream")]
    StuckProcessing { attempts: usize },

    #[error("annotation job timed out after {attempts} attempts over ~{waited_secs}s — retry later with the same text")]
    Timeout { attempts: usize, waited_secs: u64 },

    #[error("submission rejected: {0} — check the input text")]
    SubmitRejected(String),
}

/// One raw retrieval response, before classification.
#[derive(Debug, Clone)]
pub struct RetrieveResponse {
    pub status: u16,
    pub body: String,
}

/// What one retrieval response means for the poll loop.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// Keep polling; the job hasn't produced anything yet
    NotReady,
    /// Keep polling, but count it: a processing error that repeats
    /// past the leniency window is terminal
    TransientError,
    /// Terminal: the parsed result payload
    Ready(serde_json::Value),
    /// Terminal: unrecognized failure
    FatalError { status: u16, detail: String },
}

/// Classify one retrieval response.
pub fn classify(response: &RetrieveResponse) -> PollState {
    match response.status {
        404 => PollState::NotReady,
        status if (200..300).contains(&status) => {
            let trimmed = response.body.trim_start();
            if trimmed.starts_with('<') {
                // Markup placeholder page, not data.
                return PollState::NotReady;
            }
            match serde_json::from_str(&response.body) {
                Ok(value) => PollState::Ready(value),
                Err(_) => PollState::NotReady,
            }
        }
        status if (400..500).contains(&status)
            && response.body.contains(STILL_PROCESSING_MARKER) =>
        {
            PollState::TransientError
        }
        status => PollState::FatalError {
            status,
            detail: response.body.clone(),
        },
    }
}

/// The submit/retrieve interface of the annotation service.
#[async_trait]
pub trait AnnotationSession: Send + Sync {
    /// Submit free text, returning the session id to poll.
    async fn submit(&self, text: &str, concept_filter: Option<&str>) -> Result<String, PollError>;

    /// Fetch the current state of a session.
    async fn retrieve(&self, session_id: &str) -> Result<RetrieveResponse, PollError>;
}

/// Bounded submit-and-poll loop.
#[derive(Debug, Clone)]
pub struct JobPoller {
    /// Retrieval attempts before giving up
    pub max_attempts: usize,
    /// Delay between retrieval attempts
    pub interval: Duration,
    /// Attempts during which transient errors are tolerated without
    /// counting toward the repeat limit
    pub leniency: usize,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval: Duration::from_secs(10),
            leniency: 5,
        }
    }
}

impl JobPoller {
    /// Submit text and poll the resulting session to completion.
    pub async fn run(
        &self,
        session: &dyn AnnotationSession,
        text: &str,
        concept_filter: Option<&str>,
    ) -> Result<serde_json::Value, PollError> {
        let session_id = session.submit(text, concept_filter).await?;
        info!(%session_id, "annotation job submitted");
        self.poll(session, &session_id).await
    }

    /// Poll an existing session until a terminal state.
    pub async fn poll(
        &self,
        session: &dyn AnnotationSession,
        session_id: &str,
    ) -> Result<serde_json::Value, PollError> {
        let mut consecutive_transient = 0usize;

        for attempt in 1..=self.max_attempts {
            let response = session.retrieve(session_id).await?;
            match classify(&response) {
                PollState::Ready(value) => {
                    info!(session_id, attempt, "annotation result ready");
                    return Ok(value);
                }
                PollState::NotReady => {
                    consecutive_transient = 0;
                    debug!(session_id, attempt, "result not ready");
                }
                PollState::TransientError => {
                    consecutive_transient += 1;
                    warn!(session_id, attempt, consecutive_transient, "still-processing error");
                    if attempt > self.leniency && consecutive_transient > MAX_TRANSIENT_REPEATS {
                        return Err(PollError::StuckProcessing { attempts: attempt });
                    }
                }
                PollState::FatalError { status, detail } => {
                    return Err(PollError::Fatal { status, detail });
                }
            }
            tokio::time::sleep(self.interval).await;
        }

        Err(PollError::Timeout {
            attempts: self.max_attempts,
            waited_secs: (self.interval * self.max_attempts as u32).as_secs(),
        })
    }
}

/// HTTP implementation of the annotation service interface.
pub struct HttpAnnotationSession {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
}

#[derive(serde::Deserialize)]
struct SubmitResponse {
    session_id: String,
}

impl HttpAnnotationSession {
    pub fn new(base_url: impl Into<String>, min_call_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(min_call_interval),
        }
    }
}

#[async_trait]
impl AnnotationSession for HttpAnnotationSession {
    async fn submit(&self, text: &str, concept_filter: Option<&str>) -> Result<String, PollError> {
        self.limiter.wait().await;
        let mut body = serde_json::json!({ "text": text });
        if let Some(concepts) = concept_filter {
            body["concepts"] = serde_json::Value::String(concepts.to_string());
        }
        let response = self
            .client
            .post(format!("{}/annotate", self.base_url))
            .json(&body)
            .send()
            .await?;
        if !response.status().is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(PollError::SubmitRejected(detail));
        }
        let parsed: SubmitResponse = response.json().await?;
        Ok(parsed.session_id)
    }

    async fn retrieve(&self, session_id: &str) -> Result<RetrieveResponse, PollError> {
        self.limiter.wait().await;
        let response = self
            .client
            .get(format!("{}/annotate/retrieve/{}", self.base_url, session_id))
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(RetrieveResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> RetrieveResponse {
        RetrieveResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn not_found_means_not_ready() {
        assert_eq!(classify(&response(404, "")), PollState::NotReady);
    }

    #[test]
    fn processing_error_is_transient() {
        let state = classify(&response(400, "[Error]: Result is not ready"));
        assert_eq!(state, PollState::TransientError);
    }

    #[test]
    fn other_bad_request_is_fatal() {
        let state = classify(&response(400, "invalid session"));
        assert!(matches!(state, PollState::FatalError { status: 400, .. }));
    }

    #[test]
    fn markup_body_means_not_ready() {
        let state = classify(&response(200, "<html><body>waiting</body></html>"));
        assert_eq!(state, PollState::NotReady);
    }

    #[test]
    fn parseable_payload_is_ready() {
        let state = classify(&response(200, r#"{"documents": []}"#));
        assert_eq!(
            state,
            PollState::Ready(serde_json::json!({ "documents": [] }))
        );
    }

    #[test]
    fn server_error_is_fatal() {
        let state = classify(&response(500, "boom"));
        assert!(matches!(state, PollState::FatalError { status: 500, .. }));
    }
}
