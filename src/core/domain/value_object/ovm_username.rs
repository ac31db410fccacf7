use crate::core::domain::error::ValidationError;

/// A validated manager username.
#[derive(Debug, Clone)]
pub struct OvmUsername(String);

impl OvmUsername {
    /// Creates a new username without validation.
    pub(crate) fn new_unchecked(username: String) -> Self {
        Self(username)
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Validates a username.
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::Field {
            field: "username".to_string(),
            message: "Username cannot be empty".to_string(),
        });
    }
    if username.len() > 64 {
        return Err(ValidationError::Format(format!(
            "Username length must be at most 64 characters (got {})",
            username.len()
        )));
    }
    // Basic auth joins user and password with ':'
    if username.contains(':') || username.chars().any(char::is_control) {
        return Err(ValidationError::Format(
            "Username cannot contain ':' or control characters".to_string(),
        ));
    }
    Ok(())
}
