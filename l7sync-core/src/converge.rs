//! Convergence controller for a protected resource and its origins.
//!
//! One pass drives the remote side to match the declared configuration:
//! create-then-correct for a resource that does not exist yet, diff-then-
//! update for one that does, followed by origin reconciliation and the SSL
//! carry-forward. Calls are strictly sequential; each one depends on
//! identifiers or state returned by the previous.

use tracing::{debug, info};

use l7sync_sdk::{l7resource, ApiError};

use crate::diff::merge_resource;
use crate::error::ConvergeError;
use crate::model::{ResourceSpec, ResourceState};
use crate::origins;
use crate::remote::RemoteApi;

/// Drives declared configurations to convergence against the remote
/// service. Holds nothing but the client; one value serves any number of
/// sequential passes.
pub struct Converger<A> {
    api: A,
}

impl<A: RemoteApi> Converger<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Converge the remote resource to `spec`.
    ///
    /// `last_known` is the state returned by the previous pass, or `None`
    /// when the resource has never been created. On failure the remote side
    /// is left wherever the last successful call put it — no rollback.
    /// Re-running with the same spec completes the remaining work, since
    /// matching is idempotent.
    pub async fn converge(
        &self,
        spec: &ResourceSpec,
        last_known: Option<&ResourceState>,
    ) -> Result<ResourceState, ConvergeError> {
        spec.validate()?;
        match last_known {
            None => self.converge_create(spec).await,
            Some(last) => self.converge_update(spec, last).await,
        }
    }

    /// Creation path: Create with the minimal field set the API accepts,
    /// then diff the server's defaults against the declared intent and
    /// issue at most one corrective update.
    async fn converge_create(&self, spec: &ResourceSpec) -> Result<ResourceState, ConvergeError> {
        let opts = l7resource::CreateOpts {
            l7_resource_name: spec.name.clone(),
            origin_data: spec.origins[0].ip.clone(),
        };
        info!(name = %spec.name, "creating resource");
        let created = self.api.create_resource(&opts).await?;
        let id = created.l7_resource_id;

        let (merged, changed) = merge_resource(&created, spec);
        let mut resource = if changed {
            debug!(id, "correcting server defaults");
            self.api.update_resource(&merged).await?
        } else {
            created
        };

        carry_forward_ssl(&mut resource, spec, None);

        let converged_origins = origins::reconcile(&self.api, id, &spec.origins).await?;
        Ok(ResourceState {
            resource,
            origins: converged_origins,
        })
    }

    /// Update path: diff last-known against declared; skip the resource
    /// entirely when nothing differs, otherwise update and re-read for the
    /// authoritative post-update record.
    async fn converge_update(
        &self,
        spec: &ResourceSpec,
        last: &ResourceState,
    ) -> Result<ResourceState, ConvergeError> {
        let id = last.resource.l7_resource_id;

        let (merged, changed) = merge_resource(&last.resource, spec);
        let mut resource = if changed {
            info!(id, "updating resource");
            self.api.update_resource(&merged).await?;
            self.api.get_resource(id).await?
        } else {
            debug!(id, "resource unchanged, skipping update");
            last.resource.clone()
        };

        carry_forward_ssl(&mut resource, spec, Some(&last.resource));

        let converged_origins = origins::reconcile(&self.api, id, &spec.origins).await?;
        Ok(ResourceState {
            resource,
            origins: converged_origins,
        })
    }

    /// Delete the remote resource. Succeeds only on the server's literal
    /// `"ok"` confirmation; anything else is an error and the caller's
    /// state must be kept.
    pub async fn destroy(&self, l7_resource_id: i64) -> Result<(), ConvergeError> {
        info!(l7_resource_id, "deleting resource");
        let marker = self.api.delete_resource(l7_resource_id).await?;
        if marker != "ok" {
            return Err(ConvergeError::DeleteRejected(format!(
                "resource {l7_resource_id}: got {marker:?}"
            )));
        }
        Ok(())
    }

    /// Whether the resource still exists remotely. `NotFound` is the one
    /// error treated as an answer rather than a failure.
    pub async fn exists(&self, l7_resource_id: i64) -> Result<bool, ConvergeError> {
        match self.api.get_resource(l7_resource_id).await {
            Ok(_) => Ok(true),
            Err(ApiError::NotFound(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

/// Re-inject the declared SSL key and certificate into a record about to be
/// reported. The server never returns these two fields, so any response
/// carries them empty; trusting it would wipe the carried state on every
/// pass. Falls back to the last-known value when the declaration is silent.
fn carry_forward_ssl(
    resource: &mut l7resource::Item,
    spec: &ResourceSpec,
    last: Option<&l7resource::Item>,
) {
    resource.custom_ssl_key = spec
        .custom_ssl_key
        .clone()
        .or_else(|| last.map(|item| item.custom_ssl_key.clone()))
        .unwrap_or_default();
    resource.custom_ssl_crt = spec
        .custom_ssl_crt
        .clone()
        .or_else(|| last.map(|item| item.custom_ssl_crt.clone()))
        .unwrap_or_default();
}
