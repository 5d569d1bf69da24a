//! Deterministic naming for deployment targets and their function logs
//!
//! Stack names join service and stage (`my-service-dev`); the log group
//! prefix prepends the Lambda functions-log namespace
//! (`/aws/lambda/my-service-dev`).

/// Namespace under which function log groups are created.
pub const FUNCTIONS_LOG_NAMESPACE: &str = "/aws/lambda/";

/// Stage used when the deployment does not name one.
pub const DEFAULT_STAGE: &str = "dev";

/// Derive the deployment target's stack name from service and stage.
pub fn stack_name(service: &str, stage: Option<&str>) -> String {
    format!("{}-{}", service, stage.unwrap_or(DEFAULT_STAGE))
}

/// The inventory prefix covering every function log group of a stack.
pub fn log_group_prefix(stack_name: &str) -> String {
    format!("{}{}", FUNCTIONS_LOG_NAMESPACE, stack_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_name_joins_service_and_stage() {
        assert_eq!(stack_name("my-service", Some("prod")), "my-service-prod");
        assert_eq!(stack_name("my-service", None), "my-service-dev");
    }

    #[test]
    fn prefix_uses_functions_log_namespace() {
        assert_eq!(
            log_group_prefix("my-service-dev"),
            "/aws/lambda/my-service-dev"
        );
    }
}
