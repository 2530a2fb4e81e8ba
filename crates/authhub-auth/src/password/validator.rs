//! Password strength policy enforcement.

use authhub_core::config::auth::AuthConfig;

/// The accepted special-character set.
const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{}|;:'\",.<>/?`~\\";

/// The outcome of a strength check, listing every violated rule so the
/// caller can report a complete error list rather than the first failure.
#[derive(Debug, Clone)]
pub struct StrengthReport {
    /// Descriptions of all violated rules, empty when the password passes.
    pub violations: Vec<String>,
}

impl StrengthReport {
    /// Whether the password satisfies every rule.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validates password strength against the configured policy.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Checks a password against all rules and reports every violation.
    pub fn validate(&self, password: &str) -> StrengthReport {
        let mut violations = Vec::new();

        if password.chars().count() < self.min_length {
            violations.push(format!(
                "must be at least {} characters long",
                self.min_length
            ));
        }
        if !password.chars().any(|c| c.is_uppercase()) {
            violations.push("must contain at least one uppercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_lowercase()) {
            violations.push("must contain at least one lowercase letter".to_string());
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            violations.push("must contain at least one digit".to_string());
        }
        if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
            violations.push(format!(
                "must contain at least one special character ({SPECIAL_CHARS})"
            ));
        }

        StrengthReport { violations }
    }
}
