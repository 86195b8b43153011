use std::collections::HashSet;

use crate::Member;
use crate::error::RosterError;

/// An ordered, point-in-time view of cluster membership.
///
/// Named members are unique by name. Members with an empty name are allowed
/// because the cluster reports registered-but-unstarted members that way.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Roster {
    members: Vec<Member>,
}

impl Roster {
    /// Creates a roster, preserving the given order.
    ///
    /// # Errors
    ///
    /// Returns [`RosterError::DuplicateName`] if two members share a non-empty name.
    pub fn new(members: Vec<Member>) -> Result<Self, RosterError> {
        let mut seen = HashSet::with_capacity(members.len());

        for member in &members {
            if !member.name.is_empty() && !seen.insert(member.name.as_str()) {
                return Err(RosterError::DuplicateName(member.name.clone()));
            }
        }

        Ok(Self { members })
    }

    /// Returns the member with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.name == name)
    }

    /// Whether a member with the given name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates the members in roster order.
    pub fn iter(&self) -> std::slice::Iter<'_, Member> {
        self.members.iter()
    }

    /// The number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the roster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The members as a slice, in roster order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Whether `member` is registered in this roster.
    ///
    /// A member is registered if a member of the same name is present, or if
    /// an unnamed registration advertises its peer URL. The cluster reports
    /// members that were added but have not started yet without a name.
    #[must_use]
    pub fn has_registration(&self, member: &Member) -> bool {
        self.contains(&member.name) || self.pending(&member.peer_url).is_some()
    }

    /// Returns the unnamed registration advertising `peer_url`, if any.
    #[must_use]
    pub fn pending(&self, peer_url: &str) -> Option<&Member> {
        if peer_url.is_empty() {
            return None;
        }

        self.members
            .iter()
            .find(|member| member.name.is_empty() && member.peer_url == peer_url)
    }

    /// Members of this roster that do not belong to `expected`, in this
    /// roster's order.
    ///
    /// Named members are matched by name. Unnamed members are pending
    /// registrations and are matched against the expected peer URLs, so a
    /// registration made on behalf of an expected member is never stale.
    #[must_use]
    pub fn stale_members<'a>(&'a self, expected: &Self) -> Vec<&'a Member> {
        self.members
            .iter()
            .filter(|member| {
                if member.name.is_empty() {
                    member.peer_url.is_empty()
                        || !expected.iter().any(|e| e.peer_url == member.peer_url)
                } else {
                    !expected.contains(&member.name)
                }
            })
            .collect()
    }

    /// The ordered `name=peerURL` pairs for every member.
    #[must_use]
    pub fn initial_cluster(&self) -> Vec<String> {
        self.members
            .iter()
            .map(Member::initial_cluster_entry)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Member;
    type IntoIter = std::slice::Iter<'a, Member>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<Member>> for Roster {
    type Error = RosterError;

    fn try_from(members: Vec<Member>) -> Result<Self, Self::Error> {
        Self::new(members)
    }
}
