//! Council service
//!
//! The request path: authenticate, authorize, validate, admit, dispatch,
//! optionally synthesize, persist in the background.

use crate::config::{AuthParams, CouncilParams};
use crate::ports::clock::Clock;
use crate::ports::model_backend::ModelBackend;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::query_store::{QueryStore, StoreError, StoredQuery};
use crate::ports::tenant_registry::TenantRegistry;
use crate::use_cases::admission::{AdmissionController, RateLimitError};
use crate::use_cases::resolve_credential::{AuthError, CredentialResolver};
use crate::use_cases::run_council::{CouncilDispatcher, RunCouncilError};
use crate::use_cases::synthesize::ChairmanSynthesis;
use council_domain::{
    ContextReview, Credential, CouncilMember, CouncilResult, Permission, PermissionContext, Query,
    RoleTable, SpecialtyTable,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Request-level error union
#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Permission denied: requires '{permission}'")]
    PermissionDenied { permission: String },

    #[error(transparent)]
    RateLimited(#[from] RateLimitError),

    #[error("{0}")]
    Validation(String),

    #[error("Council unavailable: {0}")]
    CouncilUnavailable(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl QueryError {
    /// Stable machine-readable name for the error
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Auth(AuthError::MissingCredential) => "missing_credential",
            QueryError::Auth(AuthError::MalformedCredential) => "malformed_credential",
            QueryError::Auth(AuthError::UnknownTenant(_)) => "unknown_tenant",
            QueryError::Auth(AuthError::RegistryUnavailable(_)) => "registry_unavailable",
            QueryError::PermissionDenied { .. } => "permission_denied",
            QueryError::RateLimited(_) => "rate_limited",
            QueryError::Validation(_) => "validation_error",
            QueryError::CouncilUnavailable(_) => "council_unavailable",
            QueryError::NotFound(_) => "not_found",
            QueryError::Storage(_) => "storage_error",
        }
    }
}

impl From<RunCouncilError> for QueryError {
    fn from(e: RunCouncilError) -> Self {
        if e.is_validation() {
            return QueryError::Validation(e.to_string());
        }
        match e {
            RunCouncilError::CouncilUnavailable { opinions } => {
                let detail = opinions
                    .iter()
                    .map(|(id, o)| format!("{}: {}", id, o.error().unwrap_or("no response")))
                    .collect::<Vec<_>>()
                    .join("; ");
                QueryError::CouncilUnavailable(detail)
            }
            other => QueryError::CouncilUnavailable(other.to_string()),
        }
    }
}

/// Body of a council query request
#[derive(Debug, Clone, Deserialize)]
pub struct QueryRequest {
    /// A missing field is treated as empty and rejected by validation
    #[serde(default)]
    pub query: String,
    /// Run the chairman stage; falls back to the configured default
    #[serde(default)]
    pub synthesize: Option<bool>,
    /// Clinical context fields. Reviewed by name, never forwarded or stored.
    #[serde(default)]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            synthesize: None,
            context: BTreeMap::new(),
        }
    }

    pub fn with_synthesis(mut self, synthesize: bool) -> Self {
        self.synthesize = Some(synthesize);
        self
    }

    pub fn with_context_field(
        mut self,
        field: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.context.insert(field.into(), value.into());
        self
    }
}

/// Council service wiring every request-path component
pub struct CouncilService {
    resolver: CredentialResolver,
    roles: RoleTable,
    admission: AdmissionController,
    dispatcher: CouncilDispatcher,
    chairman: ChairmanSynthesis,
    members: Vec<CouncilMember>,
    specialties: SpecialtyTable,
    store: Option<Arc<dyn QueryStore>>,
    params: CouncilParams,
}

impl CouncilService {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        registry: Arc<dyn TenantRegistry>,
        members: Vec<CouncilMember>,
        roles: RoleTable,
        params: CouncilParams,
        auth: &AuthParams,
    ) -> Self {
        Self {
            resolver: CredentialResolver::new(registry, auth),
            roles,
            admission: AdmissionController::new(auth),
            dispatcher: CouncilDispatcher::new(Arc::clone(&backend), &params),
            chairman: ChairmanSynthesis::new(backend, &params),
            members,
            specialties: SpecialtyTable::default(),
            store: None,
            params,
        }
    }

    /// Use the given clock for cache expiry and rate windows
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.resolver = self.resolver.with_clock(Arc::clone(&clock));
        self.admission = self.admission.with_clock(clock);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn QueryStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Per-specialty model overrides and required context
    pub fn with_specialties(mut self, specialties: SpecialtyTable) -> Self {
        self.specialties = specialties;
        self
    }

    pub fn members(&self) -> &[CouncilMember] {
        &self.members
    }

    /// The council as dispatched for a tenant of `specialty`
    pub fn council_for(&self, specialty: &str) -> Vec<CouncilMember> {
        self.specialties.members_for(specialty, &self.members)
    }

    pub fn params(&self) -> &CouncilParams {
        &self.params
    }

    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    /// Resolve a credential into the permission context for this request
    pub async fn authenticate(
        &self,
        credential: Option<&Credential>,
    ) -> Result<PermissionContext, QueryError> {
        let credential = credential.ok_or(AuthError::MissingCredential)?;
        let resolution = self.resolver.resolve_with_role(credential).await?;
        Ok(PermissionContext::build(
            &resolution.identity,
            &resolution.role,
            &self.roles,
        ))
    }

    pub fn authorize(&self, ctx: &PermissionContext, permission: &str) -> Result<(), QueryError> {
        if ctx.has_permission(permission) {
            return Ok(());
        }
        warn!(
            tenant_id = %ctx.tenant_id,
            role = %ctx.role,
            permission,
            "Permission denied"
        );
        Err(QueryError::PermissionDenied {
            permission: permission.to_string(),
        })
    }

    pub fn admit(&self, ctx: &PermissionContext) -> Result<(), QueryError> {
        self.admission.admit(ctx).map_err(QueryError::from)
    }

    /// Full authenticated council query
    pub async fn query_council(
        &self,
        credential: Option<&Credential>,
        request: QueryRequest,
    ) -> Result<CouncilResult, QueryError> {
        let ctx = self.authenticate(credential).await?;
        self.authorize(&ctx, Permission::QUERY_COUNCIL)?;

        // Rejected before admission so bad input does not use up the window
        let query = Query::try_new(request.query).map_err(|e| QueryError::Validation(e.to_string()))?;
        self.admit(&ctx)?;

        info!(
            tenant_id = %ctx.tenant_id,
            user_id = %ctx.user_id,
            role = %ctx.role,
            "Council query admitted"
        );

        let review = ContextReview::review(
            &ctx.specialty,
            &self.specialties,
            request.context.keys().map(String::as_str),
        );
        if review.has_phi() {
            warn!(
                tenant_id = %ctx.tenant_id,
                phi_fields = ?review.phi_fields,
                "Request context carries PHI fields"
            );
        }
        if !review.is_complete() {
            info!(
                tenant_id = %ctx.tenant_id,
                specialty = %ctx.specialty,
                missing = ?review.missing_context,
                "Request context lacks specialty fields"
            );
        }

        let members = self.council_for(&ctx.specialty);
        let result = self
            .run(query.content(), &members, request.synthesize, &NoProgress)
            .await?
            .with_context_review(review);
        self.persist_detached(&ctx.tenant_id, &result);
        Ok(result)
    }

    /// Dispatch (and optionally synthesize) without the auth gate
    ///
    /// `specialty` selects the same model overrides a tenant of that
    /// specialty would get.
    pub async fn consult(
        &self,
        query: &str,
        specialty: Option<&str>,
        synthesize: Option<bool>,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilResult, QueryError> {
        let members = match specialty {
            Some(specialty) => self.council_for(specialty),
            None => self.members.clone(),
        };
        self.run(query, &members, synthesize, progress).await
    }

    async fn run(
        &self,
        query: &str,
        members: &[CouncilMember],
        synthesize: Option<bool>,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilResult, QueryError> {
        let result = self
            .dispatcher
            .dispatch_with_progress(query, members, self.params.council_timeout, progress)
            .await?;

        if !synthesize.unwrap_or(self.params.synthesize_by_default) {
            return Ok(result);
        }

        progress.on_synthesis_start();
        let result = self.chairman.apply(result).await;
        progress.on_synthesis_complete(result.synthesis.is_some());
        Ok(result)
    }

    /// Fetch a stored record belonging to the caller's tenant
    pub async fn get_record(
        &self,
        credential: Option<&Credential>,
        record_id: &str,
    ) -> Result<StoredQuery, QueryError> {
        let ctx = self.authenticate(credential).await?;
        self.authorize(&ctx, Permission::VIEW_HISTORY)?;
        self.admit(&ctx)?;

        let store = self
            .store
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("no query store configured".to_string()))?;

        store
            .get_query(record_id, &ctx.tenant_id)
            .await?
            .ok_or_else(|| QueryError::NotFound(record_id.to_string()))
    }

    /// Save a result on a background task. Failures are only logged.
    pub fn persist_detached(&self, tenant_id: &str, result: &CouncilResult) -> Option<JoinHandle<()>> {
        let store = Arc::clone(self.store.as_ref()?);
        let tenant_id = tenant_id.to_string();
        let domain = self.params.domain.clone();
        let result = result.clone();

        Some(tokio::spawn(async move {
            match store
                .save_query(&result.query, &result, &domain, &tenant_id)
                .await
            {
                Ok(record_id) => {
                    info!(%tenant_id, %record_id, session_id = %result.session_id, "Council query saved")
                }
                Err(e) => {
                    warn!(%tenant_id, session_id = %result.session_id, "Failed to save council query: {}", e)
                }
            }
        }))
    }
}
