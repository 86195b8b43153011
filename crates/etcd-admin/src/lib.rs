//! Client for the etcd member-management HTTP API.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod types;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use proven_etcd_membership::{AdminApi, AdminError, AdminOperation, Member, Roster};
use reqwest::{Certificate, Client, Identity, Response};
use tracing::{debug, info, warn};
use types::{AddMemberRequest, HealthResponse, MembersResponse};

static HEALTH_PATH: &str = "/health";
static MEMBERS_PATH: &str = "/v2/members";

/// Default timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Optional TLS material for talking to members over HTTPS.
#[derive(Clone, Debug, Default)]
pub struct TlsOptions {
    /// CA bundle used to verify member certificates instead of the built-in roots.
    pub ca_file: Option<PathBuf>,

    /// Client certificate presented for mutual TLS.
    pub cert_file: Option<PathBuf>,

    /// Private key of the client certificate.
    pub key_file: Option<PathBuf>,
}

/// Options for configuring an `EtcdAdminClient`.
#[derive(Clone, Debug)]
pub struct AdminClientOptions {
    /// Timeout applied to every request.
    pub timeout: Duration,

    /// TLS configuration.
    pub tls: TlsOptions,
}

impl Default for AdminClientOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            tls: TlsOptions::default(),
        }
    }
}

/// `AdminApi` implementation speaking the etcd v2 members API.
///
/// Requests are addressed to the member's client URL. Transport, status and
/// decoding failures are surfaced to the caller; nothing is retried.
#[derive(Clone, Debug)]
pub struct EtcdAdminClient {
    client: Client,
}

impl EtcdAdminClient {
    /// Creates a new client.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The CA bundle, certificate or key cannot be read or parsed
    /// - Only one of the certificate and key is provided
    /// - The HTTP client cannot be built
    pub fn new(options: &AdminClientOptions) -> Result<Self> {
        let mut builder = Client::builder().use_rustls_tls().timeout(options.timeout);

        if let Some(ca_file) = &options.tls.ca_file {
            let bundle = read_file(ca_file)?;

            builder = builder.tls_built_in_root_certs(false);
            for certificate in Certificate::from_pem_bundle(&bundle)? {
                builder = builder.add_root_certificate(certificate);
            }
        }

        match (&options.tls.cert_file, &options.tls.key_file) {
            (Some(cert_file), Some(key_file)) => {
                let mut pem = read_file(cert_file)?;
                pem.push(b'\n');
                pem.extend(read_file(key_file)?);

                builder = builder.identity(Identity::from_pem(&pem)?);
            }
            (None, None) => {}
            _ => return Err(Error::IncompleteClientIdentity),
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn get_health(&self, member: &Member) -> Result<bool> {
        let url = endpoint_url(&member.client_url, HEALTH_PATH);
        let response = checked(self.client.get(&url).send().await?, &url)?;
        let body = response.text().await?;
        let health: HealthResponse = serde_json::from_str(&body)?;

        Ok(health.is_healthy())
    }

    async fn get_members(&self, url: &str) -> Result<Roster> {
        let response = checked(self.client.get(url).send().await?, url)?;
        let body = response.text().await?;
        let members: MembersResponse = serde_json::from_str(&body)?;

        Ok(Roster::new(
            members.members.into_iter().map(Member::from).collect(),
        )?)
    }

    async fn post_member(&self, url: &str, new_member: &Member) -> Result<()> {
        let request = AddMemberRequest {
            name: &new_member.name,
            peer_urls: [&new_member.peer_url],
        };

        checked(self.client.post(url).json(&request).send().await?, url)?;

        Ok(())
    }

    async fn delete_member(&self, url: &str) -> Result<()> {
        checked(self.client.delete(url).send().await?, url)?;

        Ok(())
    }
}

#[async_trait]
impl AdminApi for EtcdAdminClient {
    async fn check_health(&self, member: &Member) -> bool {
        match self.get_health(member).await {
            Ok(true) => true,
            Ok(false) => {
                debug!("member {} reports unhealthy", member.name);
                false
            }
            Err(e) => {
                debug!("health check of {} failed: {}", member.client_url, e);
                false
            }
        }
    }

    async fn list_members(&self, endpoint: &Member) -> std::result::Result<Roster, AdminError> {
        let url = endpoint_url(&endpoint.client_url, MEMBERS_PATH);
        info!("listing members using {url}");

        let roster = self
            .get_members(&url)
            .await
            .map_err(|e| AdminError::request_failed(AdminOperation::List, &url, e))?;

        info!("cluster reports {} members", roster.len());
        for member in &roster {
            debug!("existing member: {member}");
        }

        Ok(roster)
    }

    async fn add_member(
        &self,
        endpoint: &Member,
        new_member: &Member,
    ) -> std::result::Result<(), AdminError> {
        let url = endpoint_url(&endpoint.client_url, MEMBERS_PATH);
        info!("adding member {new_member}");

        self.post_member(&url, new_member)
            .await
            .map_err(|e| AdminError::request_failed(AdminOperation::Add, &url, e))?;

        info!("member {} added", new_member.name);

        Ok(())
    }

    async fn remove_member(
        &self,
        endpoint: &Member,
        victim: &Member,
    ) -> std::result::Result<(), AdminError> {
        if !victim.is_admitted() {
            return Err(AdminError::MissingMemberId(victim.name.clone()));
        }

        let url = format!(
            "{}/{}",
            endpoint_url(&endpoint.client_url, MEMBERS_PATH),
            victim.id
        );
        info!("removing member {victim}");

        self.delete_member(&url).await.map_err(|e| {
            warn!("failed to remove member {}: {}", victim.name, e);
            AdminError::request_failed(AdminOperation::Remove, &url, e)
        })?;

        info!("member {} removed", victim.name);

        Ok(())
    }
}

fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

fn checked(response: Response, url: &str) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::UnexpectedStatus {
            url: url.to_string(),
            status,
        })
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| Error::Io(path.to_path_buf(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slash() {
        assert_eq!(
            endpoint_url("http://10.0.0.1:2379/", MEMBERS_PATH),
            "http://10.0.0.1:2379/v2/members"
        );
        assert_eq!(
            endpoint_url("http://10.0.0.1:2379", HEALTH_PATH),
            "http://10.0.0.1:2379/health"
        );
    }

    #[test]
    fn rejects_certificate_without_key() {
        let options = AdminClientOptions {
            tls: TlsOptions {
                cert_file: Some(PathBuf::from("/etc/etcd/client.pem")),
                ..TlsOptions::default()
            },
            ..AdminClientOptions::default()
        };

        assert!(matches!(
            EtcdAdminClient::new(&options),
            Err(Error::IncompleteClientIdentity)
        ));
    }

    #[test]
    fn reports_unreadable_ca_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("ca.pem");
        let options = AdminClientOptions {
            tls: TlsOptions {
                ca_file: Some(missing.clone()),
                ..TlsOptions::default()
            },
            ..AdminClientOptions::default()
        };

        match EtcdAdminClient::new(&options) {
            Err(Error::Io(path, _)) => assert_eq!(path, missing),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
