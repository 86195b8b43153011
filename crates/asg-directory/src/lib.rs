//! Expected etcd membership derived from the local instance's autoscaling group.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_autoscaling::types::LifecycleState;
use proven_etcd_membership::{EndpointConfig, MemberDirectory, Roster};
use tracing::{info, warn};

/// `MemberDirectory` listing the in-service instances of an autoscaling group.
///
/// Each instance becomes a member named by its instance ID, reachable on its
/// private IPv4 address.
#[derive(Clone, Debug)]
pub struct AsgMemberDirectory {
    autoscaling: aws_sdk_autoscaling::Client,
    ec2: aws_sdk_ec2::Client,
    endpoints: EndpointConfig,
    instance_id: String,
}

impl AsgMemberDirectory {
    /// Creates a directory for the group containing `instance_id`.
    pub async fn new(region: String, instance_id: String, endpoints: EndpointConfig) -> Self {
        let config = aws_config::from_env()
            .region(Region::new(region))
            .load()
            .await;

        Self {
            autoscaling: aws_sdk_autoscaling::Client::new(&config),
            ec2: aws_sdk_ec2::Client::new(&config),
            endpoints,
            instance_id,
        }
    }

    async fn group_name(&self) -> Result<String> {
        info!("looking for autoscaling group of instance {}", self.instance_id);

        let resp = self
            .autoscaling
            .describe_auto_scaling_instances()
            .instance_ids(&self.instance_id)
            .max_records(1)
            .send()
            .await
            .map_err(aws_sdk_autoscaling::Error::from)?;

        let details = resp
            .auto_scaling_instances()
            .first()
            .ok_or_else(|| Error::NotInAutoScalingGroup(self.instance_id.clone()))?;
        let group_name = required(details.auto_scaling_group_name())?;

        info!("found autoscaling group {group_name}");

        Ok(group_name)
    }

    async fn in_service_instance_ids(&self, group_name: &str) -> Result<Vec<String>> {
        info!("looking for instances in autoscaling group {group_name}");

        let resp = self
            .autoscaling
            .describe_auto_scaling_groups()
            .auto_scaling_group_names(group_name)
            .max_records(1)
            .send()
            .await
            .map_err(aws_sdk_autoscaling::Error::from)?;

        let group = resp
            .auto_scaling_groups()
            .first()
            .ok_or_else(|| Error::GroupNotFound(group_name.to_string()))?;

        let mut instance_ids = Vec::new();
        for instance in group.instances() {
            let instance_id = required(instance.instance_id())?;
            let state: Option<&LifecycleState> = instance.lifecycle_state().into();

            if state == Some(&LifecycleState::InService) {
                info!("found instance {instance_id}");
                instance_ids.push(instance_id);
            } else {
                info!("ignoring instance {instance_id} in state {state:?}");
            }
        }

        Ok(instance_ids)
    }

    async fn private_addresses(&self, instance_ids: &[String]) -> Result<HashMap<String, String>> {
        // An empty filter would describe every instance in the account.
        if instance_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let resp = self
            .ec2
            .describe_instances()
            .set_instance_ids(Some(instance_ids.to_vec()))
            .send()
            .await
            .map_err(aws_sdk_ec2::Error::from)?;

        resp.reservations
            .unwrap_or_default()
            .into_iter()
            .flat_map(|r| r.instances.unwrap_or_default())
            .map(|i| {
                Ok((
                    i.instance_id.ok_or(Error::MissingDetails)?,
                    i.private_ip_address.ok_or(Error::MissingDetails)?,
                ))
            })
            .collect()
    }
}

#[async_trait]
impl MemberDirectory for AsgMemberDirectory {
    type Error = Error;

    async fn expected_roster(&self) -> Result<Roster> {
        let group_name = self.group_name().await?;
        let instance_ids = self.in_service_instance_ids(&group_name).await?;
        let addresses = self.private_addresses(&instance_ids).await?;

        let roster = build_roster(&self.endpoints, &instance_ids, &addresses)?;
        for member in &roster {
            info!("expected member: {member}");
        }

        Ok(roster)
    }

    fn local_name(&self) -> &str {
        &self.instance_id
    }
}

/// Builds the roster in autoscaling group order.
///
/// Instances that disappeared between the group and instance lookups are
/// skipped.
fn build_roster(
    endpoints: &EndpointConfig,
    instance_ids: &[String],
    addresses: &HashMap<String, String>,
) -> Result<Roster> {
    let members = instance_ids
        .iter()
        .filter_map(|instance_id| {
            let address = addresses.get(instance_id);
            if address.is_none() {
                warn!("no address found for instance {instance_id}");
            }
            address.map(|address| endpoints.member(instance_id.as_str(), address))
        })
        .collect();

    Ok(Roster::new(members)?)
}

// Accepts both required (`&str`) and optional (`Option<&str>`) SDK getters.
fn required<'a>(value: impl Into<Option<&'a str>>) -> Result<String> {
    value
        .into()
        .map(str::to_string)
        .ok_or(Error::MissingDetails)
}
