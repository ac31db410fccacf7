use crate::{OvmClient, PollingConfig};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, Request, ResponseTemplate,
    matchers::{method, path},
};

pub(crate) const API: &str = "/ovm/core/wsapi/rest";

/// Full request path for an API-relative path.
pub(crate) fn api(rel: &str) -> String {
    format!("{}/{}", API, rel)
}

pub(crate) fn fast_polling() -> PollingConfig {
    PollingConfig {
        initial_interval: Duration::from_millis(1),
        max_interval: Duration::from_millis(5),
        multiplier: 2.0,
        max_wait: Duration::from_secs(2),
    }
}

pub(crate) fn create_test_client(mock_server: &MockServer) -> OvmClient {
    OvmClient::builder()
        .url(mock_server.uri())
        .credentials("admin", "Welcome1")
        .polling(fast_polling())
        .build()
        .unwrap()
}

/// An identifier as the manager serializes it.
pub(crate) fn ident(kind: &str, value: &str, name: &str) -> Value {
    json!({
        "type": format!("com.oracle.ovm.mgr.ws.model.{}", kind),
        "value": value,
        "uri": format!("https://ovm:7002{}/{}/{}", API, kind, value),
        "name": name
    })
}

/// Serves `GET /{kind}/id` with `(value, name)` pairs.
pub(crate) async fn mount_ids(mock_server: &MockServer, kind: &str, entries: &[(&str, &str)]) {
    let ids: Vec<Value> = entries
        .iter()
        .map(|(value, name)| ident(kind, value, name))
        .collect();
    Mock::given(method("GET"))
        .and(path(api(&format!("{}/id", kind))))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(ids)))
        .mount(mock_server)
        .await;
}

/// Serves `GET /{kind}/{id}` with `body`.
pub(crate) async fn mount_object(mock_server: &MockServer, kind: &str, id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(api(&format!("{}/{}", kind, id))))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(mock_server)
        .await;
}

/// What a mutating call answers with.
pub(crate) fn job_accepted(job_id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": ident("Job", job_id, "queued job"),
        "summaryDone": false,
        "jobRunState": "RUNNING"
    }))
}

pub(crate) fn job_document(job_id: &str, done: bool, state: &str, result: Option<Value>) -> Value {
    let mut job = json!({
        "id": ident("Job", job_id, "job"),
        "summaryDone": done,
        "jobRunState": state
    });
    if let Some(result) = result {
        job["resultId"] = result;
    }
    job
}

/// Serves a job that is already done with `SUCCESS`.
pub(crate) async fn mount_job_success(mock_server: &MockServer, job_id: &str, result: Option<Value>) {
    Mock::given(method("GET"))
        .and(path(api(&format!("Job/{}", job_id))))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(job_document(job_id, true, "SUCCESS", result)),
        )
        .mount(mock_server)
        .await;
}

/// Every non-GET request the server received, in order.
pub(crate) async fn mutations(mock_server: &MockServer) -> Vec<Request> {
    mock_server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() != "GET")
        .collect()
}

/// A VM document with the fields most tests need.
pub(crate) fn vm_document(id: &str, name: &str) -> Value {
    json!({
        "id": ident("Vm", id, name),
        "name": name,
        "vmRunState": "RUNNING",
        "cpuCount": 2,
        "cpuCountLimit": 2,
        "memory": 4096,
        "memoryLimit": 4096,
        "vmDomainType": "XEN_HVM",
        "description": "managed by tests",
        "highAvailability": false
    })
}
