//! Binary run before etcd starts on an autoscaling group instance. Reconciles
//! the cluster's membership with the group and writes the systemd drop-in
//! etcd bootstraps from.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_pub_crate)]

mod bootstrap;
mod drop_in;
mod error;

use bootstrap::bootstrap;
use drop_in::DropIn;
use error::Result;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use proven_asg_directory::AsgMemberDirectory;
use proven_etcd_admin::{AdminClientOptions, EtcdAdminClient, TlsOptions};
use proven_etcd_membership::{DEFAULT_CLIENT_PORT, DEFAULT_PEER_PORT, EndpointConfig, Scheme};
use proven_imds::Imds;
use tracing::{Level, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .init();

    info!("drop-in file: {}", args.drop_in_file.display());
    info!("timeout: {}", humantime::format_duration(args.timeout));
    info!("client endpoint: {}://<address>:{}", args.client_scheme, args.client_port);
    info!("peer endpoint: {}://<address>:{}", args.peer_scheme, args.peer_port);

    let identity = Imds::new(args.timeout).await?.get_identity_document().await?;

    let directory = AsgMemberDirectory::new(
        identity.region,
        identity.instance_id,
        args.endpoint_config(),
    )
    .await;

    let admin = EtcdAdminClient::new(&AdminClientOptions {
        timeout: args.timeout,
        tls: args.tls_options(),
    })?;

    bootstrap(&directory, &admin, &DropIn::new(args.drop_in_file)).await?;

    Ok(())
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// CA bundle used to verify member certificates
    #[arg(long, env = "PROVEN_ETCD_BOOTSTRAP_CA_FILE")]
    ca_file: Option<PathBuf>,

    /// Client certificate presented to members
    #[arg(long, env = "PROVEN_ETCD_BOOTSTRAP_CERT_FILE")]
    cert_file: Option<PathBuf>,

    /// Port of the etcd client API
    #[arg(long, default_value_t = DEFAULT_CLIENT_PORT, env = "PROVEN_ETCD_BOOTSTRAP_CLIENT_PORT")]
    client_port: u16,

    /// Scheme of the etcd client API (http or https)
    #[arg(long, default_value_t = Scheme::Http, env = "PROVEN_ETCD_BOOTSTRAP_CLIENT_SCHEME")]
    client_scheme: Scheme,

    /// Whether to enable debug logging
    #[arg(long, default_value_t = false, env = "PROVEN_ETCD_BOOTSTRAP_DEBUG")]
    debug: bool,

    /// The systemd drop-in file to write
    #[arg(
        long,
        default_value = "/var/run/systemd/system/etcd2.service.d/50-etcd-bootstrap.conf",
        env = "PROVEN_ETCD_BOOTSTRAP_DROP_IN_FILE"
    )]
    drop_in_file: PathBuf,

    /// Private key of the client certificate
    #[arg(long, env = "PROVEN_ETCD_BOOTSTRAP_KEY_FILE")]
    key_file: Option<PathBuf>,

    /// Port of the etcd peer API
    #[arg(long, default_value_t = DEFAULT_PEER_PORT, env = "PROVEN_ETCD_BOOTSTRAP_PEER_PORT")]
    peer_port: u16,

    /// Scheme of the etcd peer API (http or https)
    #[arg(long, default_value_t = Scheme::Http, env = "PROVEN_ETCD_BOOTSTRAP_PEER_SCHEME")]
    peer_scheme: Scheme,

    /// Timeout applied to every metadata and etcd request
    #[arg(
        long,
        default_value = "5s",
        value_parser = humantime::parse_duration,
        env = "PROVEN_ETCD_BOOTSTRAP_TIMEOUT"
    )]
    timeout: Duration,
}

impl Args {
    const fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig {
            client_scheme: self.client_scheme,
            client_port: self.client_port,
            peer_scheme: self.peer_scheme,
            peer_port: self.peer_port,
        }
    }

    fn tls_options(&self) -> TlsOptions {
        TlsOptions {
            ca_file: self.ca_file.clone(),
            cert_file: self.cert_file.clone(),
            key_file: self.key_file.clone(),
        }
    }
}
