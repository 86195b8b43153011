use std::fmt::{self, Display};
use std::str::FromStr;

use crate::Member;
use crate::error::SchemeParseError;

/// Default port for the client API.
pub const DEFAULT_CLIENT_PORT: u16 = 2379;

/// Default port for peer traffic.
pub const DEFAULT_PEER_PORT: u16 = 2380;

/// URL scheme used to reach a member.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Scheme {
    /// Plaintext HTTP.
    #[default]
    Http,

    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// The scheme as it appears in a URL.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = SchemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(SchemeParseError(other.to_string())),
        }
    }
}

/// How client and peer URLs are derived from a host address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EndpointConfig {
    /// Scheme of the client URL.
    pub client_scheme: Scheme,

    /// Port of the client URL.
    pub client_port: u16,

    /// Scheme of the peer URL.
    pub peer_scheme: Scheme,

    /// Port of the peer URL.
    pub peer_port: u16,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            client_scheme: Scheme::Http,
            client_port: DEFAULT_CLIENT_PORT,
            peer_scheme: Scheme::Http,
            peer_port: DEFAULT_PEER_PORT,
        }
    }
}

impl EndpointConfig {
    /// The client URL for a host.
    #[must_use]
    pub fn client_url(&self, address: &str) -> String {
        format!("{}://{address}:{}", self.client_scheme, self.client_port)
    }

    /// The peer URL for a host.
    #[must_use]
    pub fn peer_url(&self, address: &str) -> String {
        format!("{}://{address}:{}", self.peer_scheme, self.peer_port)
    }

    /// Derives an expected member from an inventory entry.
    #[must_use]
    pub fn member(&self, name: impl Into<String>, address: &str) -> Member {
        Member::expected(name, self.client_url(address), self.peer_url(address))
    }
}
