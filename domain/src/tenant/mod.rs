//! Tenant domain
//!
//! Identity and authorization concepts for multi-tenant access:
//!
//! - [`credential::Credential`] - opaque API key presented by a caller
//! - [`identity::TenantIdentity`] - who the credential belongs to
//! - [`role::RoleTable`] - static role → permissions / rate limit table
//! - [`permission::PermissionContext`] - per-request authorization view

pub mod credential;
pub mod identity;
pub mod permission;
pub mod role;
