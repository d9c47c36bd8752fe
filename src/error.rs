use thiserror::Error;

/// Failures reading a resource from the data root. Season failures are logged and the season
/// left out; lookup-table failures abort the load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no {resource} found under {root}")]
    NotFound { resource: String, root: String },

    #[error("{resource} could not be read: {reason}")]
    Unavailable { resource: String, reason: String },

    #[error("request for {resource} failed with status {status}")]
    Http { resource: String, status: u16 },

    #[error("{resource} is malformed: {source}")]
    Malformed {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}
