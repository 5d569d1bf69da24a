// logretain-aws - AWS-backed collaborators for the reconciler
//
// CloudFormation answers the stack existence probe, CloudWatch Logs serves
// the external log group inventory. Both clients share one SdkConfig.

use aws_config::BehaviorVersion;

mod inventory;
mod stack;

pub use inventory::CloudWatchLogsInventory;
pub use stack::CloudFormationStackQuery;

/// Load shared AWS SDK configuration, optionally pinning a region.
pub async fn load_sdk_config(region: Option<String>) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region));
    }
    loader.load().await
}
