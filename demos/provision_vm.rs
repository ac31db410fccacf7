use leeca_ovm::{
    DiskSpec, NetworkAttachmentRequest, OvmClient, OvmResult, VmRequest, VmRunTarget, VmSizing,
    VmStateRequest,
};
use std::env;

#[tokio::main]
async fn main() -> OvmResult<()> {
    dotenvy::dotenv().ok();
    let host = env::var("OVM_HOST").unwrap_or_else(|_| "https://127.0.0.1:7002".to_string());
    let user = env::var("OVM_USER").unwrap_or_else(|_| "admin".to_string());
    let pass = env::var("OVM_PASS").unwrap_or_default();

    let client = OvmClient::builder()
        .url(host)
        .credentials(user, pass)
        .accept_invalid_certs(true)
        .build()?;

    let vm = VmRequest::new("web01", "pool1", "repo1")
        .with_sizing(VmSizing {
            cpu_count: 2,
            memory: 4096,
            memory_limit: Some(8192),
            ..Default::default()
        })
        .with_disk(DiskSpec::new("web01_root", 20, "repo1"))
        .with_network("web01_VNIC");
    println!("vm: {:?}", client.converge_vm(&vm).await?);

    let attach = NetworkAttachmentRequest::new("web01", "prod");
    println!("network: {:?}", client.attach_network(&attach).await?);

    let start = VmStateRequest::new("web01", VmRunTarget::Started);
    println!("state: {:?}", client.set_vm_state(&start).await?);

    match client.vm_ip_address("web01").await? {
        Some(ip) => println!("ip: {}", ip),
        None => println!("ip: not reported yet"),
    }
    Ok(())
}
