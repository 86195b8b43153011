//! Reconciles a live etcd cluster's membership against the expected roster
//! and derives how the local node should bootstrap.
//!
//! A run resolves the local node in the expected roster, probes the expected
//! members for a healthy one, lists the cluster through it, removes members
//! that are no longer expected, registers the local node if absent, and
//! yields a [`BootstrapDirective`]. Failing to find or enumerate a live
//! cluster degrades to a `new` bootstrap; failed edits abort the run.
//!
//! Runs keep no state of their own, so re-running against a converged
//! cluster performs no edits and yields the same directive.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use proven_etcd_membership::{AdminApi, BootstrapDirective, BootstrapMode, Member, Roster};
use tracing::{info, warn};

/// Drives membership edits through an [`AdminApi`].
///
/// Calls are issued strictly one after another.
pub struct Reconciler<'a, A>
where
    A: AdminApi,
{
    admin: &'a A,
}

impl<'a, A> Reconciler<'a, A>
where
    A: AdminApi,
{
    /// Creates a reconciler issuing requests through `admin`.
    pub const fn new(admin: &'a A) -> Self {
        Self { admin }
    }

    /// Reconciles the cluster against `expected` on behalf of `local_name`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `local_name` is not in the expected roster (checked before any request)
    /// - Removing a stale member fails
    /// - Adding the local member fails
    pub async fn reconcile(
        &self,
        expected: &Roster,
        local_name: &str,
    ) -> Result<BootstrapDirective> {
        let myself = expected
            .get(local_name)
            .ok_or_else(|| Error::SelfNotInRoster(local_name.to_string()))?;

        let healthy = match self.admin.find_healthy_member(expected.members()).await {
            Ok(healthy) => healthy,
            Err(e) => {
                info!("assuming new cluster: {e}");
                return Ok(BootstrapDirective::new(BootstrapMode::New, expected));
            }
        };

        let actual = match self.admin.list_members(&healthy).await {
            Ok(actual) => actual,
            Err(e) => {
                warn!("assuming new cluster, could not list members: {e}");
                return Ok(BootstrapDirective::new(BootstrapMode::New, expected));
            }
        };

        self.remove_stale_members(&healthy, expected, &actual).await?;
        self.ensure_member(&healthy, &actual, myself).await?;

        Ok(BootstrapDirective::new(BootstrapMode::Existing, expected))
    }

    // Stops at the first failure; a partially pruned cluster invalidates the
    // rest of the plan.
    async fn remove_stale_members(
        &self,
        healthy: &Member,
        expected: &Roster,
        actual: &Roster,
    ) -> Result<()> {
        for stale in actual.stale_members(expected) {
            info!("removing stale member {stale}");

            self.admin
                .remove_member(healthy, stale)
                .await
                .map_err(|source| Error::RemoveMember {
                    name: stale.name.clone(),
                    source,
                })?;
        }

        Ok(())
    }

    async fn ensure_member(
        &self,
        healthy: &Member,
        actual: &Roster,
        myself: &Member,
    ) -> Result<()> {
        if actual.has_registration(myself) {
            info!("local member {} already registered", myself.name);
            return Ok(());
        }

        self.admin
            .add_member(healthy, myself)
            .await
            .map_err(|source| Error::AddMember {
                name: myself.name.clone(),
                source,
            })
    }
}
