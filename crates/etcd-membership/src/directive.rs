use std::fmt::{self, Display};

use crate::Roster;

/// Whether the node founds a new cluster or joins an existing one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum BootstrapMode {
    /// No live cluster was found; all expected members start a fresh one.
    New,

    /// A live member answered; the node joins the running cluster.
    Existing,
}

impl BootstrapMode {
    /// The mode as understood by `ETCD_INITIAL_CLUSTER_STATE`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Existing => "existing",
        }
    }
}

impl Display for BootstrapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The initial peer list and bootstrap mode the local node starts with.
///
/// The peer list always reflects the expected roster, never the
/// post-reconciliation live state.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BootstrapDirective {
    /// The bootstrap mode.
    pub mode: BootstrapMode,

    /// Ordered `name=peerURL` pairs for every expected member.
    pub initial_cluster: Vec<String>,
}

impl BootstrapDirective {
    /// Builds a directive for the given expected roster.
    #[must_use]
    pub fn new(mode: BootstrapMode, expected: &Roster) -> Self {
        Self {
            mode,
            initial_cluster: expected.initial_cluster(),
        }
    }

    /// The comma-joined initial cluster list.
    #[must_use]
    pub fn initial_cluster_string(&self) -> String {
        self.initial_cluster.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EndpointConfig;

    #[test]
    fn joins_expected_members_in_order() {
        let config = EndpointConfig::default();
        let expected = Roster::new(vec![
            config.member("i-b", "10.0.0.2"),
            config.member("i-a", "10.0.0.1"),
        ])
        .unwrap();

        let directive = BootstrapDirective::new(BootstrapMode::Existing, &expected);

        assert_eq!(
            directive.initial_cluster_string(),
            "i-b=http://10.0.0.2:2380,i-a=http://10.0.0.1:2380"
        );
        assert_eq!(directive.mode.to_string(), "existing");
    }
}
