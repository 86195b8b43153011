use proven_etcd_membership::AdminError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Fatal reconciliation failures.
///
/// A directive must not be emitted when any of these is returned.
#[derive(Debug, Error)]
pub enum Error {
    /// Registering the local node with the cluster failed.
    #[error("failed to add local member {name}: {source}")]
    AddMember {
        /// Name of the local member.
        name: String,

        /// The failed admin request.
        #[source]
        source: AdminError,
    },

    /// Removing a stale member failed; remaining edits were not attempted.
    #[error("failed to remove stale member {name}: {source}")]
    RemoveMember {
        /// Name of the stale member.
        name: String,

        /// The failed admin request.
        #[source]
        source: AdminError,
    },

    /// The local node is not part of the roster it was given.
    #[error("local member {0} not found in expected members")]
    SelfNotInRoster(String),
}
