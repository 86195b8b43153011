use proven_etcd_membership::Member;
use serde::{Deserialize, Serialize};

/// Body of `GET /health`.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    /// `"true"` when the member considers itself healthy.
    pub health: String,
}

impl HealthResponse {
    pub fn is_healthy(&self) -> bool {
        self.health == "true"
    }
}

/// Body of `GET /v2/members`.
#[derive(Debug, Deserialize)]
pub struct MembersResponse {
    #[serde(default)]
    pub members: Vec<ApiMember>,
}

/// A member as recorded by the cluster.
///
/// Members registered but not yet started have an empty name and no client
/// URLs.
#[derive(Debug, Deserialize)]
pub struct ApiMember {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, rename = "clientURLs")]
    pub client_urls: Vec<String>,

    #[serde(default, rename = "peerURLs")]
    pub peer_urls: Vec<String>,
}

impl From<ApiMember> for Member {
    // Only the first advertised URL of each kind is kept.
    fn from(member: ApiMember) -> Self {
        Self {
            id: member.id,
            name: member.name,
            client_url: member.client_urls.into_iter().next().unwrap_or_default(),
            peer_url: member.peer_urls.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Body of `POST /v2/members`.
#[derive(Debug, Serialize)]
pub struct AddMemberRequest<'a> {
    pub name: &'a str,

    #[serde(rename = "peerURLs")]
    pub peer_urls: [&'a str; 1],
}
