pub mod clone_service;
pub mod disk_provision_service;
