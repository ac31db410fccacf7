mod ovm_password;
mod ovm_url;
mod ovm_username;

pub use ovm_password::OvmPassword;
pub use ovm_url::{OvmUrl, REST_API_PATH};
pub use ovm_username::OvmUsername;

// Re-export validation functions for internal use
pub(crate) use ovm_password::validate_password;
pub(crate) use ovm_url::validate_url;
pub(crate) use ovm_username::validate_username;
