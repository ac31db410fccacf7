use crate::{
    Presence, ServerPoolMembershipRequest,
    tests::support::{
        api, create_test_client, ident, job_accepted, mount_ids, mount_job_success, mount_object,
        mutations, vm_document,
    },
};
use wiremock::{
    Mock, MockServer,
    matchers::{body_json, method, path},
};

async fn mount_vm_in_pool(mock_server: &MockServer, pool: Option<(&str, &str)>) {
    mount_ids(mock_server, "Vm", &[("V1", "web01")]).await;
    mount_ids(mock_server, "ServerPool", &[("P1", "pool1"), ("P2", "pool2")]).await;
    let mut vm = vm_document("V1", "web01");
    if let Some((id, name)) = pool {
        vm["serverPoolId"] = ident("ServerPool", id, name);
    }
    mount_object(mock_server, "Vm", "V1", vm).await;
}

#[tokio::test]
async fn test_vm_added_to_pool() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_vm_in_pool(&mock_server, None).await;
    Mock::given(method("PUT"))
        .and(path(api("ServerPool/P1/addVm")))
        .and(body_json(ident("Vm", "V1", "web01")))
        .respond_with(job_accepted("J1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J1", None).await;

    let report = client
        .converge_server_pool_membership(&ServerPoolMembershipRequest::new(
            "web01",
            "pool1",
            Presence::Present,
        ))
        .await
        .unwrap();
    assert!(report.changed);
}

#[tokio::test]
async fn test_vm_moved_between_pools() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_vm_in_pool(&mock_server, Some(("P2", "pool2"))).await;
    Mock::given(method("PUT"))
        .and(path(api("ServerPool/P2/removeVm")))
        .respond_with(job_accepted("J1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J1", None).await;
    Mock::given(method("PUT"))
        .and(path(api("ServerPool/P1/addVm")))
        .respond_with(job_accepted("J2"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J2", None).await;

    let report = client
        .converge_server_pool_membership(&ServerPoolMembershipRequest::new(
            "web01",
            "pool1",
            Presence::Present,
        ))
        .await
        .unwrap();
    assert!(report.changed);

    let sent = mutations(&mock_server).await;
    assert_eq!(sent[0].url.path(), api("ServerPool/P2/removeVm"));
    assert_eq!(sent[1].url.path(), api("ServerPool/P1/addVm"));
}

#[tokio::test]
async fn test_membership_already_converged() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_vm_in_pool(&mock_server, Some(("P1", "pool1"))).await;

    let present = ServerPoolMembershipRequest::new("web01", "pool1", Presence::Present);
    assert!(!client.converge_server_pool_membership(&present).await.unwrap().changed);

    // Absent from pool2 holds: the VM lives in pool1.
    let absent = ServerPoolMembershipRequest::new("web01", "pool2", Presence::Absent);
    assert!(!client.converge_server_pool_membership(&absent).await.unwrap().changed);

    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_vm_removed_from_pool() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_vm_in_pool(&mock_server, Some(("P1", "pool1"))).await;
    Mock::given(method("PUT"))
        .and(path(api("ServerPool/P1/removeVm")))
        .and(body_json(ident("Vm", "V1", "web01")))
        .respond_with(job_accepted("J1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J1", None).await;

    let report = client
        .converge_server_pool_membership(&ServerPoolMembershipRequest::new(
            "web01",
            "pool1",
            Presence::Absent,
        ))
        .await
        .unwrap();
    assert!(report.changed);
}
