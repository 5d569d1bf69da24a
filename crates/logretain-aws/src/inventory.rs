//! External log group inventory backed by CloudWatch Logs

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::Client;
use logretain_core::{ExternalLogGroup, InventoryQuery};
use tracing::debug;

pub struct CloudWatchLogsInventory {
    client: Client,
}

impl CloudWatchLogsInventory {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl InventoryQuery for CloudWatchLogsInventory {
    async fn list_by_prefix(&self, prefix: &str) -> Result<Vec<ExternalLogGroup>> {
        let mut groups = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .describe_log_groups()
                .log_group_name_prefix(prefix);
            if let Some(token) = next_token.take() {
                request = request.next_token(token);
            }

            let page = request
                .send()
                .await
                .with_context(|| format!("DescribeLogGroups failed for prefix '{}'", prefix))?;

            for group in page.log_groups() {
                if let Some(name) = group.log_group_name() {
                    groups.push(ExternalLogGroup {
                        name: name.to_string(),
                    });
                }
            }

            next_token = page.next_token().map(str::to_string);
            if next_token.is_none() {
                break;
            }
        }

        debug!(%prefix, count = groups.len(), "listed external log groups");
        Ok(groups)
    }
}
