use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ConfigError(pub String);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend '{0}' is not registered")]
    UnknownBackend(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("rating must be an integer between 1 and 5 (got {0})")]
pub struct RatingError(pub i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("event {0} not found")]
    EventNotFound(i64),
    #[error("event {0} already has a rating")]
    RatingAlreadySet(i64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    #[error("load limit must be a positive integer")]
    InvalidLimit,
}

/// Failures surfaced to callers of the orchestrator.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("generation failed on backend '{backend_id}': {source}")]
    Generation {
        backend_id: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to persist event: {0}")]
    Storage(#[source] anyhow::Error),
    #[error("cannot rate event {event_id}: {source}")]
    Rating {
        event_id: i64,
        #[source]
        source: anyhow::Error,
    },
}
