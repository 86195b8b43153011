//! Helper crate to read the local instance's identity from the EC2 Instance
//! Metadata Service (IMDSv2).
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, info};

static IMDS_BASE_URL: &str = "http://169.254.169.254";
static IMDS_IDENTITY_PATH: &str = "/latest/dynamic/instance-identity/document";
static IMDS_TOKEN_PATH: &str = "/latest/api/token";

static TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
static TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
static TOKEN_TTL_SECONDS: &str = "21600";

/// The instance identity document.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityDocument {
    /// The AWS account ID of the instance.
    pub account_id: String,

    /// The availability zone of the instance.
    pub availability_zone: String,

    /// The instance ID of the instance.
    pub instance_id: String,

    /// The instance type of the instance.
    pub instance_type: String,

    /// The private IP address of the instance.
    pub private_ip: String,

    /// The region of the instance.
    pub region: String,
}

/// The IMDS client.
pub struct Imds {
    base_url: String,
    client: Client,
    token: String,
}

impl Imds {
    /// Creates a new instance of the IMDS client against the link-local endpoint.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP request to obtain the token fails
    /// - The response cannot be parsed as text
    pub async fn new(timeout: Duration) -> Result<Self> {
        Self::with_base_url(IMDS_BASE_URL, timeout).await
    }

    /// Creates a new instance of the IMDS client against `base_url`.
    ///
    /// # Errors
    ///
    /// See [`Imds::new`].
    pub async fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let client = Client::builder().timeout(timeout).build()?;

        let token_response = client
            .put(format!("{base_url}{IMDS_TOKEN_PATH}"))
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
            .send()
            .await?;

        let token = checked(token_response, IMDS_TOKEN_PATH)?.text().await?;
        debug!("obtained metadata session token");

        Ok(Self {
            base_url,
            client,
            token,
        })
    }

    /// Retrieves the instance identity document.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The HTTP request to obtain the identity document fails
    /// - The identity document cannot be deserialized
    pub async fn get_identity_document(&self) -> Result<IdentityDocument> {
        let body = self.get_from_endpoint(IMDS_IDENTITY_PATH).await?;
        let document: IdentityDocument = serde_json::from_str(&body)?;

        info!(
            "running as {} in {} ({})",
            document.instance_id, document.availability_zone, document.private_ip
        );

        Ok(document)
    }

    async fn get_from_endpoint(&self, path: &'static str) -> Result<String> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url))
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        let body = checked(response, path)?.text().await?;

        Ok(body)
    }
}

fn checked(response: Response, path: &'static str) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::UnexpectedStatus { path, status })
    }
}
