use crate::drop_in::DropIn;
use crate::error::{Error, Result};

use proven_etcd_membership::{AdminApi, BootstrapDirective, MemberDirectory};
use proven_etcd_reconciler::Reconciler;
use tracing::info;

/// Reconciles the cluster and persists the resulting directive.
///
/// Nothing is written when reconciliation fails.
pub async fn bootstrap<D, A>(
    directory: &D,
    admin: &A,
    drop_in: &DropIn,
) -> Result<BootstrapDirective>
where
    D: MemberDirectory,
    A: AdminApi,
{
    let expected = directory
        .expected_roster()
        .await
        .map_err(|e| Error::Directory(Box::new(e)))?;
    info!("expecting {} members", expected.len());

    let directive = Reconciler::new(admin)
        .reconcile(&expected, directory.local_name())
        .await?;

    drop_in.write(&directive)?;

    Ok(directive)
}

#[cfg(test)]
mod tests {
    use super::*;

    use proven_etcd_membership::{BootstrapMode, EndpointConfig, Member, Roster};
    use proven_etcd_membership_mock::{MockAdminApi, MockMemberDirectory};

    fn expected() -> Roster {
        let config = EndpointConfig::default();

        Roster::new(vec![
            config.member("i-a", "10.0.0.1"),
            config.member("i-b", "10.0.0.2"),
        ])
        .unwrap()
    }

    fn admitted(expected: &Roster, name: &str) -> Member {
        Member {
            id: format!("id-{name}"),
            ..expected.get(name).unwrap().clone()
        }
    }

    #[tokio::test]
    async fn writes_new_directive_without_live_cluster() {
        let dir = tempfile::tempdir().unwrap();
        let drop_in = DropIn::new(dir.path().join("etcd.conf"));
        let directory = MockMemberDirectory::new(expected(), "i-b");
        let admin = MockAdminApi::new(Roster::default());

        let directive = bootstrap(&directory, &admin, &drop_in).await.unwrap();

        assert_eq!(directive.mode, BootstrapMode::New);
        let contents = std::fs::read_to_string(drop_in.path()).unwrap();
        assert_eq!(contents, DropIn::render(&directive));
    }

    #[tokio::test]
    async fn writes_existing_directive_after_joining() {
        let dir = tempfile::tempdir().unwrap();
        let drop_in = DropIn::new(dir.path().join("etcd.conf"));
        let expected = expected();
        let directory = MockMemberDirectory::new(expected.clone(), "i-b");
        let admin = MockAdminApi::new(Roster::new(vec![admitted(&expected, "i-a")]).unwrap());
        admin.set_healthy(["i-a"]);

        let directive = bootstrap(&directory, &admin, &drop_in).await.unwrap();

        assert_eq!(directive.mode, BootstrapMode::Existing);
        assert!(admin.members().iter().any(|m| m.name == "i-b"));
        let contents = std::fs::read_to_string(drop_in.path()).unwrap();
        assert!(contents.contains("ETCD_INITIAL_CLUSTER_STATE=existing"));
    }

    #[tokio::test]
    async fn fatal_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let drop_in = DropIn::new(dir.path().join("etcd.conf"));
        let expected = expected();
        let directory = MockMemberDirectory::new(expected.clone(), "i-b");
        let admin = MockAdminApi::new(Roster::new(vec![admitted(&expected, "i-a")]).unwrap());
        admin.set_healthy(["i-a"]);
        admin.fail_add();

        let result = bootstrap(&directory, &admin, &drop_in).await;

        assert!(matches!(result, Err(Error::Reconcile(_))));
        assert!(!drop_in.path().exists());
    }

    #[tokio::test]
    async fn directory_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let drop_in = DropIn::new(dir.path().join("etcd.conf"));
        let directory = MockMemberDirectory::failing("i-a", "throttled");
        let admin = MockAdminApi::new(Roster::default());

        let result = bootstrap(&directory, &admin, &drop_in).await;

        assert!(matches!(result, Err(Error::Directory(_))));
        assert!(admin.calls().is_empty());
        assert!(!drop_in.path().exists());
    }
}
