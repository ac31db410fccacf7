use crate::{
    NetworkAttachmentRequest, OvmError, Presence, ResourceKind, VnicRequest,
    tests::support::{
        api, create_test_client, ident, job_accepted, mount_ids, mount_job_success, mutations,
    },
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

fn vnic(id: &str, name: &str, vm: (&str, &str), network: Option<(&str, &str)>) -> Value {
    let mut nic = json!({
        "id": ident("VirtualNic", id, name),
        "name": name,
        "vmId": ident("Vm", vm.0, vm.1),
        "macAddress": "00:21:f6:00:00:01",
        "ipAddresses": [{"address": "10.0.0.5", "type": "IPV4"}]
    });
    if let Some((net_id, net_name)) = network {
        nic["networkId"] = ident("Network", net_id, net_name);
    }
    nic
}

async fn mount_vnics(mock_server: &MockServer, vnics: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(api("VirtualNic")))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(vnics)))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_vnic_created_with_default_name() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01"), ("V2", "web010")]).await;
    // web010 owns a vNIC; it must not count for web01.
    mount_vnics(&mock_server, vec![vnic("N9", "web010_VNIC", ("V2", "web010"), None)]).await;
    Mock::given(method("POST"))
        .and(path(api("Vm/V1/VirtualNic")))
        .and(body_json(json!({"name": "web01_VNIC"})))
        .respond_with(job_accepted("J1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J1", Some(ident("VirtualNic", "N1", "web01_VNIC"))).await;

    let report = client
        .converge_vnic(&VnicRequest::new("web01", Presence::Present))
        .await
        .unwrap();
    assert!(report.changed);
    assert_eq!(report.modified, vec!["web01_VNIC"]);
}

#[tokio::test]
async fn test_existing_vnic_satisfies_presence() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_vnics(&mock_server, vec![vnic("N1", "eth0", ("V1", "web01"), None)]).await;

    let report = client
        .converge_vnic(&VnicRequest::new("web01", Presence::Present))
        .await
        .unwrap();
    assert!(!report.changed);
    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_absent_vnic_deleted() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_vnics(
        &mock_server,
        vec![
            vnic("N1", "web01_VNIC", ("V1", "web01"), None),
            vnic("N2", "backup", ("V1", "web01"), None),
        ],
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path(api("Vm/V1/VirtualNic/N2")))
        .respond_with(job_accepted("J1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J1", None).await;

    let report = client
        .converge_vnic(&VnicRequest::new("web01", Presence::Absent).named("backup"))
        .await
        .unwrap();
    assert!(report.changed);
    assert_eq!(report.modified, vec!["backup"]);
}

#[tokio::test]
async fn test_vnic_moved_to_other_network() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_ids(&mock_server, "Network", &[("NET1", "mgmt"), ("NET2", "prod")]).await;
    mount_vnics(
        &mock_server,
        vec![vnic("N1", "web01_VNIC", ("V1", "web01"), Some(("NET1", "mgmt")))],
    )
    .await;
    Mock::given(method("PUT"))
        .and(path(api("Network/NET2/addVirtualNic")))
        .and(body_json(ident("VirtualNic", "N1", "web01_VNIC")))
        .respond_with(job_accepted("J1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J1", None).await;

    let report = client
        .attach_network(&NetworkAttachmentRequest::new("web01", "prod"))
        .await
        .unwrap();
    assert!(report.changed);
}

#[tokio::test]
async fn test_vnic_already_on_network() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_ids(&mock_server, "Network", &[("NET2", "prod")]).await;
    mount_vnics(
        &mock_server,
        vec![vnic("N1", "web01_VNIC", ("V1", "web01"), Some(("NET2", "prod")))],
    )
    .await;

    let report = client
        .attach_network(&NetworkAttachmentRequest::new("web01", "prod"))
        .await
        .unwrap();
    assert!(!report.changed);
    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_unknown_network_is_not_found() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_ids(&mock_server, "Network", &[("NET1", "mgmt")]).await;

    let err = client
        .attach_network(&NetworkAttachmentRequest::new("web01", "prod"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        OvmError::NotFound { kind: ResourceKind::Network, .. }
    ));
}

#[tokio::test]
async fn test_vm_ip_address() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01"), ("V2", "db01")]).await;
    mount_vnics(&mock_server, vec![vnic("N1", "web01_VNIC", ("V1", "web01"), None)]).await;

    let ip = client.vm_ip_address("web01").await.unwrap();
    assert_eq!(ip.as_deref(), Some("10.0.0.5"));

    let err = client.vm_ip_address("db01").await.unwrap_err();
    assert!(matches!(
        err,
        OvmError::NotFound { kind: ResourceKind::VirtualNic, .. }
    ));
}
