use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("client certificate and key must be provided together")]
    IncompleteClientIdentity,

    /// IO operation failed.
    #[error("failed to read {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Roster(#[from] proven_etcd_membership::RosterError),

    #[error("{url} responded with {status}")]
    UnexpectedStatus { url: String, status: StatusCode },
}
