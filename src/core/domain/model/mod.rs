pub mod identifier;
pub mod job;
pub mod ovm_config;
pub mod ovm_connection;
pub mod repository;
pub mod representation;
pub mod virtual_disk;
pub mod virtual_nic;
pub mod vm;
