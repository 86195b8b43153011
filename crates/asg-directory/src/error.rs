use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    AutoScaling(#[from] aws_sdk_autoscaling::Error),

    #[error("{0}")]
    EC2(#[from] aws_sdk_ec2::Error),

    #[error("autoscaling group {0} not found")]
    GroupNotFound(String),

    #[error("missing instance details")]
    MissingDetails,

    #[error("instance {0} is not in an autoscaling group")]
    NotInAutoScalingGroup(String),

    #[error(transparent)]
    Roster(#[from] proven_etcd_membership::RosterError),
}
