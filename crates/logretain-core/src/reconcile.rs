//! Template reconciliation for managed log groups
//!
//! Five steps, in a fixed order: collect log-group candidates, probe the
//! stack for existence, match candidates against the external inventory
//! (only when logs are retained), purge matched duplicates together with
//! every `DependsOn` reference to them, then stamp a deletion policy on the
//! survivors. The purge must finish before policy application so policy is
//! only ever written onto resources that stay declared.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use tracing::{debug, info};

use crate::naming;
use crate::query::{InventoryQuery, StackQuery, StackQueryError};
use crate::template::{DeletionPolicy, Template};

/// The only provider this reconciler understands.
pub const SUPPORTED_PROVIDER: &str = "aws";

/// Caller-supplied reconciliation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileConfig {
    /// Retain log groups on stack removal and stop managing log groups that
    /// already exist externally. Off by default.
    pub retain_logs: bool,
}

/// The deployment target this reconciliation applies to.
#[derive(Debug, Clone)]
pub struct TargetContext {
    pub provider: String,
    pub stack_name: String,
    pub region: Option<String>,
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The deployment target is not an AWS stack. Raised before any remote
    /// call and before the template is touched.
    #[error("unsupported provider '{provider}': only aws deployments are reconciled")]
    UnsupportedProvider { provider: String },

    /// The existence probe failed with something other than "not found".
    #[error("failed to describe stack '{stack_name}'")]
    StackQuery {
        stack_name: String,
        #[source]
        source: anyhow::Error,
    },

    /// The inventory lookup failed during deduplication.
    #[error("failed to list log groups with prefix '{prefix}'")]
    InventoryQuery {
        prefix: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Mutates a template in place so its managed log groups carry the desired
/// deletion policy and no longer shadow externally-persisted log groups.
pub struct TemplateReconciler<S, I> {
    stack: S,
    inventory: I,
}

impl<S: StackQuery, I: InventoryQuery> TemplateReconciler<S, I> {
    pub fn new(stack: S, inventory: I) -> Self {
        Self { stack, inventory }
    }

    /// Consume the reconciler, handing back its collaborators.
    pub fn into_parts(self) -> (S, I) {
        (self.stack, self.inventory)
    }

    /// Reconcile `template` for `target`. Runs at most one stack describe
    /// and one inventory listing, sequentially; all mutation is synchronous
    /// and happens after both remote calls have succeeded.
    ///
    /// The caller must not submit the template if this returns an error.
    pub async fn reconcile(
        &self,
        template: &mut Template,
        config: &ReconcileConfig,
        target: &TargetContext,
    ) -> Result<(), ReconcileError> {
        if target.provider != SUPPORTED_PROVIDER {
            return Err(ReconcileError::UnsupportedProvider {
                provider: target.provider.clone(),
            });
        }

        // Step 1: collect managed log groups. Unnamed groups cannot be
        // matched against the inventory but still receive a policy later.
        let mut candidates: Vec<String> = Vec::new();
        let mut by_name: HashMap<String, Vec<String>> = HashMap::new();
        for (id, resource) in &template.resources {
            if !resource.is_log_group() {
                continue;
            }
            candidates.push(id.clone());
            if let Some(name) = resource.log_group_name() {
                by_name.entry(name.to_owned()).or_default().push(id.clone());
            }
        }
        info!(
            stack = %target.stack_name,
            candidates = candidates.len(),
            "collected managed log groups"
        );

        // Step 2: existence probe. "Not found" is the first-deploy branch;
        // anything else aborts the whole operation. The probe runs even when
        // retain_logs is off so first-deploy semantics stay uniform.
        match self.stack.describe(&target.stack_name).await {
            Ok(stack_info) => {
                debug!(stack = %target.stack_name, status = ?stack_info.status, "stack exists");
            }
            Err(StackQueryError::NotFound(_)) => {
                info!(stack = %target.stack_name, "stack not found, first deployment");
            }
            Err(StackQueryError::Other(source)) => {
                return Err(ReconcileError::StackQuery {
                    stack_name: target.stack_name.clone(),
                    source,
                });
            }
        }

        // Step 3: deduplication only applies when logs are being retained;
        // with retain_logs off the inventory is never consulted.
        let mut duplicates: HashSet<String> = HashSet::new();
        if config.retain_logs {
            let prefix = naming::log_group_prefix(&target.stack_name);
            let existing = self
                .inventory
                .list_by_prefix(&prefix)
                .await
                .map_err(|source| ReconcileError::InventoryQuery {
                    prefix: prefix.clone(),
                    source,
                })?;
            for group in &existing {
                // Names should be unique per stack; if several candidates
                // declare the same name anyway, all of them are redundant.
                if let Some(ids) = by_name.get(group.name.as_str()) {
                    duplicates.extend(ids.iter().cloned());
                }
            }
            info!(
                %prefix,
                existing = existing.len(),
                duplicates = duplicates.len(),
                "matched declared log groups against external inventory"
            );
        }

        // Step 4: drop duplicates, then scrub DependsOn across every
        // surviving resource so nothing dangles. Must fully complete before
        // any policy is written.
        if !duplicates.is_empty() {
            template.resources.retain(|id, _| !duplicates.contains(id));
            for resource in template.resources.values_mut() {
                resource.depends_on.retain(|dep| !duplicates.contains(dep));
            }
        }

        // Step 5: every surviving log group carries an explicit policy.
        let policy = if config.retain_logs {
            DeletionPolicy::Retain
        } else {
            DeletionPolicy::Delete
        };
        for id in &candidates {
            if let Some(resource) = template.resources.get_mut(id) {
                debug!(resource = %id, %policy, "applying deletion policy");
                resource.deletion_policy = Some(policy);
            }
        }

        Ok(())
    }
}
