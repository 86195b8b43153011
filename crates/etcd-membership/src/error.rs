use std::fmt::{self, Display};

use thiserror::Error;

/// Boxed error used as the source of failed admin requests.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error constructing a [`Roster`](crate::Roster).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RosterError {
    /// Two members share the same name.
    #[error("duplicate member name in roster: {0}")]
    DuplicateName(String),
}

/// Error parsing a [`Scheme`](crate::Scheme).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unsupported scheme: {0} (expected http or https)")]
pub struct SchemeParseError(pub String);

/// The admin operation a request belonged to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AdminOperation {
    /// Listing cluster members.
    List,

    /// Registering a new member.
    Add,

    /// Removing a member by ID.
    Remove,
}

impl Display for AdminOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => f.write_str("list members"),
            Self::Add => f.write_str("add member"),
            Self::Remove => f.write_str("remove member"),
        }
    }
}

/// Errors surfaced by an [`AdminApi`](crate::AdminApi).
#[derive(Debug, Error)]
pub enum AdminError {
    /// No candidate answered its health probe.
    #[error("no healthy member found among {0} candidates")]
    NoHealthyMember(usize),

    /// A member cannot be removed without a cluster-assigned ID.
    #[error("member {0} has no cluster id")]
    MissingMemberId(String),

    /// A request to a confirmed-healthy member failed.
    #[error("{operation} request to {endpoint} failed: {source}")]
    RequestFailed {
        /// The operation that failed.
        operation: AdminOperation,

        /// The admin endpoint the request was sent to.
        endpoint: String,

        /// The underlying transport, status or decoding error.
        #[source]
        source: BoxError,
    },
}

impl AdminError {
    /// Wraps an underlying error as a failed admin request.
    pub fn request_failed(
        operation: AdminOperation,
        endpoint: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::RequestFailed {
            operation,
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }
}
