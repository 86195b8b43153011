use proven_etcd_membership::{AdminApi, AdminError, EndpointConfig, Member, Roster};
use proven_etcd_membership_mock::MockAdminApi;

fn member(name: &str) -> Member {
    EndpointConfig::default().member(name, name)
}

#[tokio::test]
async fn returns_first_healthy_candidate() {
    let admin = MockAdminApi::new(Roster::default());
    admin.set_healthy(["b", "c"]);

    let found = admin
        .find_healthy_member(&[member("a"), member("b"), member("c")])
        .await
        .unwrap();

    assert_eq!(found.name, "b");
    assert_eq!(admin.health_checks(), vec!["a", "b"]);
}

#[tokio::test]
async fn fails_when_no_candidate_is_healthy() {
    let admin = MockAdminApi::new(Roster::default());

    let result = admin.find_healthy_member(&[member("a"), member("b")]).await;

    assert!(matches!(result, Err(AdminError::NoHealthyMember(2))));
    assert_eq!(admin.health_checks(), vec!["a", "b"]);
}

#[tokio::test]
async fn empty_candidate_list_has_no_healthy_member() {
    let admin = MockAdminApi::new(Roster::default());

    let result = admin.find_healthy_member(&[]).await;

    assert!(matches!(result, Err(AdminError::NoHealthyMember(0))));
    assert!(admin.health_checks().is_empty());
}
