use crate::core::domain::value_object::{OvmPassword, OvmUrl, OvmUsername};

/// Validated connection details of one manager.
#[derive(Debug, Clone)]
pub struct OvmConnection {
    ovm_url: OvmUrl,
    ovm_username: OvmUsername,
    ovm_password: OvmPassword,
}

impl OvmConnection {
    pub fn new(ovm_url: OvmUrl, ovm_username: OvmUsername, ovm_password: OvmPassword) -> Self {
        Self {
            ovm_url,
            ovm_username,
            ovm_password,
        }
    }

    pub fn url(&self) -> &OvmUrl {
        &self.ovm_url
    }

    pub fn username(&self) -> &OvmUsername {
        &self.ovm_username
    }

    pub fn password(&self) -> &OvmPassword {
        &self.ovm_password
    }
}
