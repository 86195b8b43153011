//! Membership model for etcd cluster bootstrap, and the abstract interfaces
//! to the cluster's member-management API and to the inventory of expected
//! members.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod directive;
mod endpoint;
mod error;
mod member;
mod roster;

pub use directive::{BootstrapDirective, BootstrapMode};
pub use endpoint::{DEFAULT_CLIENT_PORT, DEFAULT_PEER_PORT, EndpointConfig, Scheme};
pub use error::{AdminError, AdminOperation, BoxError, RosterError, SchemeParseError};
pub use member::Member;
pub use roster::Roster;

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use tracing::{debug, info};

/// Client for the member-management API of a running cluster member.
///
/// Implementations surface transport failures to the caller and never retry.
#[async_trait]
pub trait AdminApi
where
    Self: Send + Sync,
{
    /// Probes the member's health endpoint.
    ///
    /// Unreachable or unhealthy members yield `false`; this never fails.
    async fn check_health(&self, member: &Member) -> bool;

    /// Lists the members recorded by the cluster, via `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::RequestFailed`] if the request fails, the
    /// response is not a 2xx, or the member list cannot be decoded.
    async fn list_members(&self, endpoint: &Member) -> Result<Roster, AdminError>;

    /// Registers `new_member` with the cluster, via `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::RequestFailed`] if the request fails or the
    /// cluster does not accept the registration.
    async fn add_member(&self, endpoint: &Member, new_member: &Member) -> Result<(), AdminError>;

    /// Removes `victim` from the cluster by its cluster ID, via `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::MissingMemberId`] without sending a request if
    /// `victim` has no cluster ID, and [`AdminError::RequestFailed`] if the
    /// request fails or the cluster does not accept the removal.
    async fn remove_member(&self, endpoint: &Member, victim: &Member) -> Result<(), AdminError>;

    /// Returns the first candidate, in order, that reports healthy.
    ///
    /// This is sequential first-match-wins, not a load balancer: an earlier
    /// healthy member always beats a later one.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NoHealthyMember`] if every probe fails.
    async fn find_healthy_member(&self, candidates: &[Member]) -> Result<Member, AdminError> {
        for candidate in candidates {
            debug!("checking health of {}", candidate.client_url);

            if self.check_health(candidate).await {
                info!("found healthy member {candidate}");
                return Ok(candidate.clone());
            }

            info!("member {} is not healthy", candidate.name);
        }

        Err(AdminError::NoHealthyMember(candidates.len()))
    }
}

/// Source of the expected cluster roster and the local node's identity.
#[async_trait]
pub trait MemberDirectory
where
    Self: Send + Sync,
{
    /// The error type for this directory.
    type Error: Debug + Error + Send + Sync + 'static;

    /// The members that should belong to the cluster.
    ///
    /// # Errors
    ///
    /// Returns the directory's error if the inventory cannot be read.
    async fn expected_roster(&self) -> Result<Roster, Self::Error>;

    /// The name of the local node, as it appears in the expected roster.
    fn local_name(&self) -> &str;
}
