use crate::{
    DiskSpec, OvmError, ValidationError, VmModifyRequest, VmProperties, VmRequest, VmRunTarget,
    VmSizing, VmStateRequest,
    tests::support::{
        api, create_test_client, ident, job_accepted, job_document, mount_ids, mount_job_success,
        mount_object, mutations, vm_document,
    },
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

async fn mount_placement(mock_server: &MockServer) {
    mount_ids(mock_server, "Repository", &[("R1", "repo1")]).await;
    mount_ids(mock_server, "ServerPool", &[("P1", "pool1")]).await;
}

#[tokio::test]
async fn test_create_vm_with_sizing() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[]).await;
    mount_placement(&mock_server).await;
    Mock::given(method("POST"))
        .and(path(api("Vm")))
        .and(body_json(json!({
            "repositoryId": ident("Repository", "R1", "repo1"),
            "serverPoolId": ident("ServerPool", "P1", "pool1"),
            "vmDomainType": "XEN_HVM_PV_DRIVERS",
            "name": "web01",
            "cpuCount": 4,
            "cpuCountLimit": 4,
            "memory": 8192,
            "memoryLimit": 8192
        })))
        .respond_with(job_accepted("J1"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J1", Some(ident("Vm", "V1", "web01"))).await;

    let request = VmRequest::new("web01", "pool1", "repo1").with_sizing(VmSizing {
        cpu_count: 4,
        memory: 8192,
        domain_type: crate::VmDomainType::XenHvmPvDrivers,
        ..Default::default()
    });
    let report = client.converge_vm(&request).await.unwrap();

    assert!(report.changed);
    assert_eq!(report.modified, vec!["vm"]);
}

#[tokio::test]
async fn test_existing_vm_in_desired_state_is_left_alone() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let request = VmRequest::new("web01", "pool1", "repo1").with_sizing(VmSizing::default());
    let first = client.converge_vm(&request).await.unwrap();
    let second = client.converge_vm(&request).await.unwrap();

    assert!(!first.changed);
    assert!(!second.changed);
    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_sizing_drift_updates_merged_document() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let mut expected = vm_document("V1", "web01");
    expected["memory"] = json!(8192);
    expected["memoryLimit"] = json!(8192);
    Mock::given(method("PUT"))
        .and(path(api("Vm/V1")))
        .and(body_json(expected))
        .respond_with(job_accepted("J2"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J2", None).await;

    let request = VmRequest::new("web01", "pool1", "repo1").with_sizing(VmSizing {
        memory: 8192,
        memory_limit: Some(8192),
        ..Default::default()
    });
    let report = client.converge_vm(&request).await.unwrap();

    assert!(report.changed);
    assert_eq!(report.modified, vec!["memory", "memoryLimit"]);
}

#[tokio::test]
async fn test_growing_memory_raises_lower_limit() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let mut expected = vm_document("V1", "web01");
    expected["memory"] = json!(8192);
    expected["memoryLimit"] = json!(8192);
    Mock::given(method("PUT"))
        .and(path(api("Vm/V1")))
        .and(body_json(expected))
        .respond_with(job_accepted("J8"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J8", None).await;

    let request = VmRequest::new("web01", "pool1", "repo1").with_sizing(VmSizing {
        memory: 8192,
        ..Default::default()
    });
    let report = client.converge_vm(&request).await.unwrap();

    assert!(report.changed);
    assert_eq!(report.modified, vec!["memory", "memoryLimit"]);
}

#[tokio::test]
async fn test_growing_cpu_count_raises_lower_limit() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let mut expected = vm_document("V1", "web01");
    expected["cpuCount"] = json!(4);
    expected["cpuCountLimit"] = json!(4);
    Mock::given(method("PUT"))
        .and(path(api("Vm/V1")))
        .and(body_json(expected))
        .respond_with(job_accepted("J9"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J9", None).await;

    let request = VmRequest::new("web01", "pool1", "repo1").with_sizing(VmSizing {
        cpu_count: 4,
        ..Default::default()
    });
    let report = client.converge_vm(&request).await.unwrap();

    assert!(report.changed);
    assert_eq!(report.modified, vec!["cpuCount", "cpuCountLimit"]);
}

#[tokio::test]
async fn test_merge_that_breaks_cpu_limit_is_rejected() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let properties = VmProperties {
        cpu_count: Some(4),
        ..Default::default()
    };
    let err = client
        .modify_vm(&VmModifyRequest::new("web01", properties))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OvmError::Validation {
            source: ValidationError::ConstraintViolation(_),
            ..
        }
    ));
    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_modify_echoes_explicit_nulls() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    let mut current = vm_document("V1", "web01");
    current["serverPoolId"] = json!(null);
    current["repositoryId"] = json!(null);
    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", current.clone()).await;

    let mut expected = current;
    expected["description"] = json!("front end");
    Mock::given(method("PUT"))
        .and(path(api("Vm/V1")))
        .and(body_json(expected))
        .respond_with(job_accepted("J10"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J10", None).await;

    let properties = VmProperties {
        description: Some("front end".to_string()),
        ..Default::default()
    };
    let report = client
        .modify_vm(&VmModifyRequest::new("web01", properties))
        .await
        .unwrap();

    assert_eq!(report.modified, vec!["description"]);
}

#[tokio::test]
async fn test_merge_that_breaks_memory_limit_is_rejected() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let properties = VmProperties {
        memory: Some(8192),
        ..Default::default()
    };
    let err = client
        .modify_vm(&VmModifyRequest::new("web01", properties))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OvmError::Validation {
            source: ValidationError::ConstraintViolation(_),
            ..
        }
    ));
    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_unaligned_memory_rejected_before_any_request() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    let request = VmRequest::new("web01", "pool1", "repo1").with_sizing(VmSizing {
        memory: 4097,
        ..Default::default()
    });
    let err = client.converge_vm(&request).await.unwrap_err();
    assert!(matches!(err, OvmError::Validation { .. }));

    let request = VmRequest::new("web01", "pool1", "repo1").with_sizing(VmSizing {
        memory: 4096,
        memory_limit: Some(2048),
        ..Default::default()
    });
    let err = client.converge_vm(&request).await.unwrap_err();
    assert!(matches!(err, OvmError::Validation { .. }));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_absent_vm_is_deleted_once() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    Mock::given(method("GET"))
        .and(path(api("Vm/id")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([ident("Vm", "V1", "web01")])),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_ids(&mock_server, "Vm", &[]).await;
    Mock::given(method("DELETE"))
        .and(path(api("Vm/V1")))
        .respond_with(job_accepted("J3"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J3", None).await;

    let request = VmRequest::new("web01", "pool1", "repo1").absent();
    assert!(client.converge_vm(&request).await.unwrap().changed);
    assert!(!client.converge_vm(&request).await.unwrap().changed);
}

#[tokio::test]
async fn test_failed_create_stops_before_disks() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[]).await;
    mount_placement(&mock_server).await;
    Mock::given(method("POST"))
        .and(path(api("Vm")))
        .respond_with(job_accepted("J4"))
        .mount(&mock_server)
        .await;
    let mut failed = job_document("J4", true, "FAILURE", None);
    failed["error"] = json!("Server pool has no master");
    Mock::given(method("GET"))
        .and(path(api("Job/J4")))
        .respond_with(ResponseTemplate::new(200).set_body_json(failed))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(api("Repository/R1/VirtualDisk")))
        .respond_with(job_accepted("J5"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let request = VmRequest::new("web01", "pool1", "repo1")
        .with_disk(DiskSpec::new("web01_data", 10, "repo1"));
    let err = client.converge_vm(&request).await.unwrap_err();

    assert!(matches!(err, OvmError::JobFailure { ref detail, .. } if detail == "Server pool has no master"));
    assert_eq!(mutations(&mock_server).await.len(), 1);
}

#[tokio::test]
async fn test_modify_preserves_unmodelled_fields() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let mut expected = vm_document("V1", "web01");
    expected["description"] = json!("front end");
    Mock::given(method("PUT"))
        .and(path(api("Vm/V1")))
        .and(body_json(expected))
        .respond_with(job_accepted("J6"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J6", None).await;

    let properties = VmProperties {
        description: Some("front end".to_string()),
        cpu_count: Some(2),
        ..Default::default()
    };
    let report = client
        .modify_vm(&VmModifyRequest::new("web01", properties))
        .await
        .unwrap();

    assert!(report.changed);
    assert_eq!(report.modified, vec!["description"]);
}

#[tokio::test]
async fn test_modify_without_difference_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    let mut properties = VmProperties {
        memory: Some(4096),
        ..Default::default()
    };
    properties
        .other
        .insert("highAvailability".to_string(), json!(false));
    let report = client
        .modify_vm(&VmModifyRequest::new("web01", properties))
        .await
        .unwrap();

    assert!(!report.changed);
    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_running_vm_already_started() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;

    for target in [VmRunTarget::Started, VmRunTarget::Resumed] {
        let report = client
            .set_vm_state(&VmStateRequest::new("web01", target))
            .await
            .unwrap();
        assert!(!report.changed);
    }
    assert!(mutations(&mock_server).await.is_empty());
}

#[tokio::test]
async fn test_running_vm_is_stopped() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);

    mount_ids(&mock_server, "Vm", &[("V1", "web01")]).await;
    mount_object(&mock_server, "Vm", "V1", vm_document("V1", "web01")).await;
    Mock::given(method("PUT"))
        .and(path(api("Vm/V1/stop")))
        .respond_with(job_accepted("J7"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_job_success(&mock_server, "J7", None).await;

    let report = client
        .set_vm_state(&VmStateRequest::new("web01", VmRunTarget::Stopped))
        .await
        .unwrap();
    assert!(report.changed);
}

#[tokio::test]
async fn test_state_change_on_missing_vm_is_not_found() {
    let mock_server = MockServer::start().await;
    let client = create_test_client(&mock_server);
    mount_ids(&mock_server, "Vm", &[]).await;

    let err = client
        .set_vm_state(&VmStateRequest::new("ghost", VmRunTarget::Started))
        .await
        .unwrap_err();
    assert!(matches!(err, OvmError::NotFound { .. }));
}
