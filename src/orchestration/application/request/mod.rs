pub mod clone_request;
pub mod disk_request;
