use std::fmt::{self, Display};

/// A node participating in, or intended to participate in, the cluster.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Member {
    /// Identifier assigned by the cluster once the member is admitted.
    ///
    /// Empty for members that only exist in the expected roster.
    pub id: String,

    /// Stable external identifier, e.g. the EC2 instance ID.
    pub name: String,

    /// The endpoint used for the data-plane client API.
    pub client_url: String,

    /// The endpoint used by other members for replication traffic.
    pub peer_url: String,
}

impl Member {
    /// Creates an expected member, i.e. one without a cluster-assigned ID.
    #[must_use]
    pub fn expected(
        name: impl Into<String>,
        client_url: impl Into<String>,
        peer_url: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            client_url: client_url.into(),
            peer_url: peer_url.into(),
        }
    }

    /// Whether the cluster has assigned an ID to this member.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        !self.id.is_empty()
    }

    /// The `name=peerURL` pair used in an initial cluster list.
    #[must_use]
    pub fn initial_cluster_entry(&self) -> String {
        format!("{}={}", self.name, self.peer_url)
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.id.is_empty() {
            write!(f, "{} (peer {})", self.name, self.peer_url)
        } else {
            write!(f, "{} [{}] (peer {})", self.name, self.id, self.peer_url)
        }
    }
}
