use proven_etcd_membership::BoxError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Admin(#[from] proven_etcd_admin::Error),

    #[error("failed to discover expected members: {0}")]
    Directory(#[source] BoxError),

    #[error(transparent)]
    Imds(#[from] proven_imds::Error),

    /// IO operation failed.
    #[error("{0}: {1}")]
    Io(&'static str, #[source] std::io::Error),

    #[error(transparent)]
    Reconcile(#[from] proven_etcd_reconciler::Error),
}
