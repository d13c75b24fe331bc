//! API credential value object

/// Prefix every council API key starts with
pub const CREDENTIAL_PREFIX: &str = "sk-chairmancouncil-";

/// Tenant and user segments parsed out of a credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialParts {
    pub tenant_id: String,
    pub user_id: String,
}

/// An opaque API key presented by a caller
///
/// The raw value is never printed: `Debug` is redacted so that credentials
/// cannot leak into logs through `{:?}`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    raw: String,
}

impl Credential {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Extract the credential from an `Authorization` header value.
    ///
    /// `Bearer <key>` yields `<key>`; any other non-empty value is taken
    /// verbatim. Returns `None` for a blank header.
    pub fn from_authorization_header(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        let parts: Vec<&str> = value.split(' ').collect();
        let key = if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
            parts[1]
        } else {
            value
        };
        if key.is_empty() {
            None
        } else {
            Some(Self::new(key))
        }
    }

    /// The raw key bytes, for hashing
    pub fn expose(&self) -> &str {
        &self.raw
    }

    /// Parse `sk-chairmancouncil-{tenant_id}-{user_id}`.
    ///
    /// Segments after the user id are ignored. Returns `None` when the prefix
    /// is missing or either segment is empty.
    pub fn parts(&self) -> Option<CredentialParts> {
        let rest = self.raw.strip_prefix(CREDENTIAL_PREFIX)?;
        let mut segments = rest.split('-');
        let tenant_id = segments.next().filter(|s| !s.is_empty())?;
        let user_id = segments.next().filter(|s| !s.is_empty())?;
        Some(CredentialParts {
            tenant_id: tenant_id.to_string(),
            user_id: user_id.to_string(),
        })
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
