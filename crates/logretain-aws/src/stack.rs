//! Stack existence probe backed by CloudFormation DescribeStacks

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_cloudformation::Client;
use logretain_core::{StackInfo, StackQuery, StackQueryError};
use tracing::debug;

pub struct CloudFormationStackQuery {
    client: Client,
}

impl CloudFormationStackQuery {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl StackQuery for CloudFormationStackQuery {
    async fn describe(&self, stack_name: &str) -> Result<StackInfo, StackQueryError> {
        let result = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await;

        match result {
            Ok(output) => {
                let stack = output.stacks().first();
                let info = StackInfo {
                    stack_id: stack.and_then(|s| s.stack_id()).map(str::to_string),
                    status: stack
                        .and_then(|s| s.stack_status())
                        .map(|s| s.as_str().to_string()),
                };
                debug!(stack = %stack_name, status = ?info.status, "described stack");
                Ok(info)
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if is_missing_stack(
                    service_err.meta().code(),
                    service_err.meta().message(),
                ) {
                    return Err(StackQueryError::NotFound(stack_name.to_string()));
                }
                Err(StackQueryError::Other(
                    anyhow::Error::new(service_err)
                        .context(format!("DescribeStacks failed for '{}'", stack_name)),
                ))
            }
        }
    }
}

/// CloudFormation reports a missing stack as a ValidationError with a
/// "does not exist" message rather than a dedicated error shape.
fn is_missing_stack(code: Option<&str>, message: Option<&str>) -> bool {
    code == Some("ValidationError") && message.is_some_and(|m| m.contains("does not exist"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_stack_classification() {
        assert!(is_missing_stack(
            Some("ValidationError"),
            Some("Stack with id my-service-dev does not exist"),
        ));
        assert!(!is_missing_stack(
            Some("ValidationError"),
            Some("Template format error"),
        ));
        assert!(!is_missing_stack(
            Some("InternalFailure"),
            Some("Stack with id my-service-dev does not exist"),
        ));
        assert!(!is_missing_stack(None, None));
    }
}
