//! Runtime configuration of a client: polling budget, rate limiting, transport knobs.

use crate::core::domain::error::ValidationError;
use std::time::Duration;

/// Name the manager gives its own `Manager` object.
pub const DEFAULT_MANAGER_NAME: &str = "OVM Manager";

/// Backoff schedule and ceiling for job polling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollingConfig {
    /// Delay before the second poll.
    pub initial_interval: Duration,
    /// Upper bound for the delay between polls.
    pub max_interval: Duration,
    /// Factor applied to the delay after every poll (>= 1.0).
    pub multiplier: f64,
    /// Elapsed time after which an unfinished job is reported as timed out.
    pub max_wait: Duration,
}

impl PollingConfig {
    /// Returns the delay that follows `current`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
            .map_or(self.max_interval, |next| next.min(self.max_interval))
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.initial_interval.is_zero() {
            return Err(ValidationError::Field {
                field: "polling.initial_interval".to_string(),
                message: "Polling interval must be greater than zero".to_string(),
            });
        }
        if self.max_interval < self.initial_interval {
            return Err(ValidationError::ConstraintViolation(
                "polling.max_interval must not be lower than polling.initial_interval"
                    .to_string(),
            ));
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ValidationError::Field {
                field: "polling.multiplier".to_string(),
                message: format!("Multiplier must be a finite value >= 1.0 (got {})", self.multiplier),
            });
        }
        if self.max_wait.is_zero() {
            return Err(ValidationError::Field {
                field: "polling.max_wait".to_string(),
                message: "Maximum wait must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
            max_wait: Duration::from_secs(30 * 60),
        }
    }
}

/// Client-side request rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct OvmConfig {
    /// Skip TLS certificate verification (self-signed manager certificates).
    pub accept_invalid_certs: bool,
    /// Timeout applied to every single HTTP request.
    pub request_timeout: Duration,
    /// Job polling schedule.
    pub polling: PollingConfig,
    /// Optional request rate limit; `None` disables limiting.
    pub rate_limit: Option<RateLimitConfig>,
    /// Name of the `Manager` object used for repository ownership checks.
    pub manager_name: String,
    /// Minimum zxcvbn score required for the password, if any.
    pub password_min_score: Option<zxcvbn::Score>,
}

impl OvmConfig {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        self.polling.validate()?;
        if self.request_timeout.is_zero() {
            return Err(ValidationError::Field {
                field: "request_timeout".to_string(),
                message: "Request timeout must be greater than zero".to_string(),
            });
        }
        if let Some(rl) = self.rate_limit {
            if rl.requests_per_second == 0 || rl.burst_size == 0 {
                return Err(ValidationError::Field {
                    field: "rate_limit".to_string(),
                    message: "Rate limit and burst size must be greater than zero".to_string(),
                });
            }
        }
        if self.manager_name.is_empty() {
            return Err(ValidationError::Field {
                field: "manager_name".to_string(),
                message: "Manager name cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for OvmConfig {
    fn default() -> Self {
        Self {
            accept_invalid_certs: false,
            request_timeout: Duration::from_secs(60),
            polling: PollingConfig::default(),
            rate_limit: None,
            manager_name: DEFAULT_MANAGER_NAME.to_string(),
            password_min_score: None,
        }
    }
}
