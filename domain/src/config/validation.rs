//! Configuration validation issues.
//!
//! Startup validation produces a list of [`ConfigIssue`]s instead of failing
//! on the first problem, so that every problem is reported at once. Any issue
//! with [`Severity::Error`] means the service must not start.
//!
//! # Examples
//!
//! ```
//! use council_domain::{ConfigIssue, Severity};
//!
//! let issues = vec![ConfigIssue::missing_api_key("OPENROUTER_API_KEY")];
//! assert!(ConfigIssue::has_errors(&issues));
//! assert_eq!(issues[0].severity, Severity::Error);
//! ```

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// No provider API key in the file or the environment.
    MissingApiKey,
    /// The council has no members, duplicate ids or blank fields.
    InvalidCouncil,
    /// A timeout or limit is zero.
    ZeroValue { field: String },
    /// A rate limit override names a role the table does not have.
    UnknownRole { role: String },
    /// A tenant entry is unusable (blank id, duplicate id).
    InvalidTenant { tenant_id: String },
    /// A specialty model override names a member the council does not have.
    UnknownMember { specialty: String, member_id: String },
    /// A CORS origin is neither `*` nor an http(s) origin.
    InvalidCorsOrigin { origin: String },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn missing_api_key(env_var: &str) -> Self {
        Self::error(
            ConfigIssueCode::MissingApiKey,
            format!("provider.api_key is not set and ${} is empty", env_var),
        )
    }

    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.severity == Severity::Error)
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
