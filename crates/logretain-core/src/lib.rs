// logretain-core - deployment-time reconciliation of managed log groups
//
// Runs once per deployment, immediately before the generated CloudFormation
// template is frozen for submission. Decides per log group whether the
// resource is deleted or retained on stack update/teardown, and drops
// declarations for log groups that already exist externally so they are no
// longer managed by the stack.
//
// The two remote lookups (stack existence, external log group inventory) are
// injected behind narrow traits; this crate has no AWS SDK dependency.

pub mod naming;
pub mod query;
pub mod reconcile;
pub mod template;

pub use query::{ExternalLogGroup, InventoryQuery, StackInfo, StackQuery, StackQueryError};
pub use reconcile::{
    ReconcileConfig, ReconcileError, TargetContext, TemplateReconciler, SUPPORTED_PROVIDER,
};
pub use template::{DeletionPolicy, Resource, Template};
