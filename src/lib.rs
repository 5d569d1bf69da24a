// Host wiring for template reconciliation
//
// Exposes the lifecycle hook meant to run immediately before the generated
// template is frozen for submission: `before_finalize` resolves config from
// the standard sources, `before_finalize_with_config` takes it pre-resolved.
// A failure here must abort the surrounding deployment workflow; the caller
// surfaces the error and must not submit the template.

use anyhow::{Context, Result};
use logretain_aws::{load_sdk_config, CloudFormationStackQuery, CloudWatchLogsInventory};
use logretain_config::RuntimeConfig;
use logretain_core::{naming, ReconcileConfig, TargetContext, Template, TemplateReconciler};
use tracing::info;

mod init;

pub use init::init_tracing;

/// Build the deployment target context from resolved configuration.
pub fn target_context(config: &RuntimeConfig) -> TargetContext {
    TargetContext {
        provider: config.target.provider.clone(),
        stack_name: naming::stack_name(&config.target.service, config.target.stage.as_deref()),
        region: config.target.region.clone(),
    }
}

/// Lifecycle hook entry (loads configuration from the standard sources).
///
/// Fails before any remote call when configuration cannot be resolved.
pub async fn before_finalize(template: &mut Template) -> Result<()> {
    let config = logretain_config::load_config().context("Failed to load configuration")?;
    before_finalize_with_config(template, &config).await
}

/// Lifecycle hook entry with pre-resolved configuration (for CLI usage).
/// Reconciles `template` in place against the live deployment target.
pub async fn before_finalize_with_config(
    template: &mut Template,
    config: &RuntimeConfig,
) -> Result<()> {
    let target = target_context(config);
    let sdk_config = load_sdk_config(target.region.clone()).await;
    let reconciler = TemplateReconciler::new(
        CloudFormationStackQuery::new(&sdk_config),
        CloudWatchLogsInventory::new(&sdk_config),
    );

    let reconcile_config = ReconcileConfig {
        retain_logs: config.reconcile.retain_logs,
    };
    reconciler
        .reconcile(template, &reconcile_config, &target)
        .await
        .with_context(|| format!("failed to reconcile template for stack '{}'", target.stack_name))?;

    info!(
        stack = %target.stack_name,
        retain_logs = reconcile_config.retain_logs,
        "template reconciled"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_context_derives_stack_name() {
        let mut config = RuntimeConfig::default();
        config.target.service = "my-service".to_string();
        config.target.stage = Some("prod".to_string());
        config.target.region = Some("eu-west-1".to_string());

        let target = target_context(&config);
        assert_eq!(target.provider, "aws");
        assert_eq!(target.stack_name, "my-service-prod");
        assert_eq!(target.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    fn target_context_defaults_stage() {
        let mut config = RuntimeConfig::default();
        config.target.service = "my-service".to_string();

        assert_eq!(target_context(&config).stack_name, "my-service-dev");
    }

    #[tokio::test]
    async fn hook_rejects_unresolved_config_before_any_remote_call() {
        // No config file in the test cwd and no LOGRETAIN_SERVICE set: the
        // hook must fail at configuration loading, never reaching AWS.
        let mut template = Template::default();
        let err = before_finalize(&mut template).await.unwrap_err();
        assert!(format!("{:#}", err).contains("configuration"));
    }
}
