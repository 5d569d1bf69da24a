// Collaborator seams for the reconciler
//
// Implementations:
// - CloudFormationStackQuery / CloudWatchLogsInventory (logretain-aws)
// - in-crate fakes (integration tests)

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Minimal view of a described deployment target.
#[derive(Debug, Clone, Default)]
pub struct StackInfo {
    pub stack_id: Option<String>,
    pub status: Option<String>,
}

/// A log group name observed in the external inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalLogGroup {
    pub name: String,
}

/// Failure modes of a stack describe call.
///
/// The collaborator classifies "never been created" itself, so the
/// reconciler never inspects transport status codes or message text.
#[derive(Debug, Error)]
pub enum StackQueryError {
    #[error("stack '{0}' does not exist")]
    NotFound(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Reports whether the deployment target already exists.
#[async_trait]
pub trait StackQuery: Send + Sync {
    async fn describe(&self, stack_name: &str) -> Result<StackInfo, StackQueryError>;
}

/// Lists externally-persisted log groups matching a name prefix.
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    /// Empty vec when nothing matches.
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<ExternalLogGroup>>;
}
