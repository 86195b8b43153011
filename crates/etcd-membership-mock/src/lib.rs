//! Mock implementations of the membership interfaces for testing purposes.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, InjectedFailure};

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use proven_etcd_membership::{
    AdminApi, AdminError, AdminOperation, Member, MemberDirectory, Roster,
};

/// A call made against the mock admin API.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AdminCall {
    /// Health probe of the named member.
    CheckHealth(String),

    /// List request sent to the named endpoint.
    List(String),

    /// Registration of a member with the given name and peer URL.
    Add {
        /// Name of the new member.
        name: String,

        /// Peer URL of the new member.
        peer_url: String,
    },

    /// Removal of the member with the given cluster ID.
    Remove(String),
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<AdminCall>,
    fail_add: bool,
    fail_list: bool,
    fail_remove: HashSet<String>,
    healthy: HashSet<String>,
    members: Vec<Member>,
    next_id: u64,
}

/// In-memory stand-in for a live cluster's member-management API.
///
/// Members are considered healthy by name. Adds and removals are applied to
/// the in-memory roster so a second run observes the first run's edits.
#[derive(Clone, Debug, Default)]
pub struct MockAdminApi {
    state: Arc<Mutex<State>>,
}

impl MockAdminApi {
    /// Creates a mock cluster whose recorded roster is `actual`.
    #[must_use]
    pub fn new(actual: Roster) -> Self {
        let members = actual.members().to_vec();

        Self {
            state: Arc::new(Mutex::new(State {
                next_id: members.len() as u64 + 1,
                members,
                ..State::default()
            })),
        }
    }

    /// Marks the named members as answering health probes.
    pub fn set_healthy<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .healthy
            .extend(names.into_iter().map(Into::into));
    }

    /// Makes every list request fail.
    pub fn fail_list(&self) {
        self.state.lock().fail_list = true;
    }

    /// Makes every add request fail.
    pub fn fail_add(&self) {
        self.state.lock().fail_add = true;
    }

    /// Makes removal of the member with the given cluster ID fail.
    pub fn fail_remove(&self, id: impl Into<String>) {
        self.state.lock().fail_remove.insert(id.into());
    }

    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<AdminCall> {
        self.state.lock().calls.clone()
    }

    /// Names of the members probed so far, in order.
    #[must_use]
    pub fn health_checks(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match call {
                AdminCall::CheckHealth(name) => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    /// Add and remove calls made so far, in order.
    #[must_use]
    pub fn mutations(&self) -> Vec<AdminCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| matches!(call, AdminCall::Add { .. } | AdminCall::Remove(_)))
            .cloned()
            .collect()
    }

    /// The roster currently recorded by the mock cluster.
    #[must_use]
    pub fn members(&self) -> Vec<Member> {
        self.state.lock().members.clone()
    }
}

#[async_trait]
impl AdminApi for MockAdminApi {
    async fn check_health(&self, member: &Member) -> bool {
        let mut state = self.state.lock();
        state.calls.push(AdminCall::CheckHealth(member.name.clone()));
        state.healthy.contains(&member.name)
    }

    async fn list_members(&self, endpoint: &Member) -> Result<Roster, AdminError> {
        let mut state = self.state.lock();
        state.calls.push(AdminCall::List(endpoint.name.clone()));

        if state.fail_list {
            return Err(AdminError::request_failed(
                AdminOperation::List,
                &endpoint.client_url,
                InjectedFailure("list"),
            ));
        }

        Roster::new(state.members.clone())
            .map_err(|e| AdminError::request_failed(AdminOperation::List, &endpoint.client_url, e))
    }

    async fn add_member(&self, endpoint: &Member, new_member: &Member) -> Result<(), AdminError> {
        let mut state = self.state.lock();
        state.calls.push(AdminCall::Add {
            name: new_member.name.clone(),
            peer_url: new_member.peer_url.clone(),
        });

        if state.fail_add {
            return Err(AdminError::request_failed(
                AdminOperation::Add,
                &endpoint.client_url,
                InjectedFailure("add"),
            ));
        }

        let id = format!("mock-{}", state.next_id);
        state.next_id += 1;
        state.members.push(Member {
            id,
            ..new_member.clone()
        });

        Ok(())
    }

    async fn remove_member(&self, endpoint: &Member, victim: &Member) -> Result<(), AdminError> {
        if !victim.is_admitted() {
            return Err(AdminError::MissingMemberId(victim.name.clone()));
        }

        let mut state = self.state.lock();
        state.calls.push(AdminCall::Remove(victim.id.clone()));

        if state.fail_remove.contains(&victim.id) {
            return Err(AdminError::request_failed(
                AdminOperation::Remove,
                &endpoint.client_url,
                InjectedFailure("remove"),
            ));
        }

        state.members.retain(|member| member.id != victim.id);

        Ok(())
    }
}

/// Fixed expected roster and local identity.
#[derive(Clone, Debug)]
pub struct MockMemberDirectory {
    failure: Option<String>,
    local_name: String,
    roster: Roster,
}

impl MockMemberDirectory {
    /// Creates a directory returning `roster`, with `local_name` as the local node.
    #[must_use]
    pub fn new(roster: Roster, local_name: impl Into<String>) -> Self {
        Self {
            failure: None,
            local_name: local_name.into(),
            roster,
        }
    }

    /// Creates a directory whose roster lookup always fails with `message`.
    #[must_use]
    pub fn failing(local_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            local_name: local_name.into(),
            roster: Roster::default(),
        }
    }
}

#[async_trait]
impl MemberDirectory for MockMemberDirectory {
    type Error = Error;

    async fn expected_roster(&self) -> Result<Roster, Self::Error> {
        match &self.failure {
            Some(message) => Err(Error::MockError(message.clone())),
            None => Ok(self.roster.clone()),
        }
    }

    fn local_name(&self) -> &str {
        &self.local_name
    }
}
