use crate::core::domain::error::ValidationError;
use url::Url;

/// Path of the REST API below the manager's base URL.
pub const REST_API_PATH: &str = "ovm/core/wsapi/rest";

/// A validated base URL of an Oracle VM Manager (e.g. `https://ovm.example.com:7002`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OvmUrl(Url);

impl OvmUrl {
    /// Creates a new URL without validation.
    pub(crate) fn new_unchecked(url: Url) -> Self {
        Self(url)
    }

    /// Returns the URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the REST endpoint for a path below the API root.
    ///
    /// `path` may start with a slash or not.
    pub(crate) fn endpoint(&self, path: &str) -> Result<Url, ValidationError> {
        let base = self.0.as_str().trim_end_matches('/');
        let full = format!("{}/{}/{}", base, REST_API_PATH, path.trim_start_matches('/'));
        Url::parse(&full).map_err(|e| ValidationError::Format(format!("Invalid endpoint: {}", e)))
    }
}

/// Parses and validates a manager base URL.
pub(crate) fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL cannot be empty".to_string(),
        });
    }
    if raw.len() > 2083 {
        return Err(ValidationError::Format(
            "URL exceeds maximum length of 2083 characters".to_string(),
        ));
    }
    let url =
        Url::parse(raw).map_err(|e| ValidationError::Format(format!("Invalid URL format: {}", e)))?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ValidationError::ConstraintViolation(format!(
            "Invalid scheme '{}'. Must be one of: https, http",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ValidationError::Field {
            field: "url".to_string(),
            message: "URL must contain a host".to_string(),
        });
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ValidationError::Format(
            "URL must not carry a query or fragment".to_string(),
        ));
    }
    Ok(url)
}
