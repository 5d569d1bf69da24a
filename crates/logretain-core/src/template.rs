// CloudFormation-shaped template model
//
// Only the Resources section is modeled structurally; every other section
// the template producer emits (Parameters, Outputs, format version) passes
// through untouched via flatten. The same applies to per-resource keys this
// stage does not act on (Condition, Metadata, UpdateReplacePolicy).

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// CloudFormation resource type marking a managed log group.
pub const LOG_GROUP_TYPE: &str = "AWS::Logs::LogGroup";

/// Property key carrying a log group's declared name.
pub const LOG_GROUP_NAME_KEY: &str = "LogGroupName";

/// A provisioning template, keyed by logical resource id.
///
/// Resource insertion order is preserved across a reconcile/serialize pass;
/// it affects iteration only, never semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Template {
    #[serde(rename = "Resources", default)]
    pub resources: IndexMap<String, Resource>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// One declared resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "Type")]
    pub kind: String,

    #[serde(
        rename = "Properties",
        default,
        skip_serializing_if = "serde_json::Map::is_empty"
    )]
    pub properties: serde_json::Map<String, Value>,

    /// Logical ids this resource requires to exist first. CloudFormation
    /// also accepts a bare string here; that form deserializes to a
    /// one-element list.
    #[serde(
        rename = "DependsOn",
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub depends_on: Vec<String>,

    #[serde(
        rename = "DeletionPolicy",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub deletion_policy: Option<DeletionPolicy>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl Resource {
    /// Whether this resource is a managed log group.
    pub fn is_log_group(&self) -> bool {
        self.kind == LOG_GROUP_TYPE
    }

    /// The declared log group name, if this resource carries one.
    pub fn log_group_name(&self) -> Option<&str> {
        self.properties.get(LOG_GROUP_NAME_KEY).and_then(Value::as_str)
    }
}

/// Controls whether removing a resource from the template also destroys the
/// underlying external resource. Absent means Delete semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeletionPolicy {
    Retain,
    #[default]
    Delete,
}

impl std::fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeletionPolicy::Retain => write!(f, "Retain"),
            DeletionPolicy::Delete => write!(f, "Delete"),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(id) => vec![id],
        OneOrMany::Many(ids) => ids,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn depends_on_accepts_bare_string() {
        let resource: Resource = serde_json::from_value(json!({
            "Type": "AWS::Lambda::Function",
            "DependsOn": "FirstLogGroup"
        }))
        .unwrap();
        assert_eq!(resource.depends_on, vec!["FirstLogGroup"]);
    }

    #[test]
    fn depends_on_accepts_list_and_defaults_empty() {
        let listed: Resource = serde_json::from_value(json!({
            "Type": "AWS::Lambda::Function",
            "DependsOn": ["A", "B"]
        }))
        .unwrap();
        assert_eq!(listed.depends_on, vec!["A", "B"]);

        let absent: Resource =
            serde_json::from_value(json!({"Type": "AWS::Lambda::Function"})).unwrap();
        assert!(absent.depends_on.is_empty());
        assert!(absent.deletion_policy.is_none());
    }

    #[test]
    fn log_group_helpers() {
        let group: Resource = serde_json::from_value(json!({
            "Type": "AWS::Logs::LogGroup",
            "Properties": {"LogGroupName": "/aws/lambda/my-service-dev-first"}
        }))
        .unwrap();
        assert!(group.is_log_group());
        assert_eq!(
            group.log_group_name(),
            Some("/aws/lambda/my-service-dev-first")
        );

        let function: Resource =
            serde_json::from_value(json!({"Type": "AWS::Lambda::Function"})).unwrap();
        assert!(!function.is_log_group());
        assert_eq!(function.log_group_name(), None);
    }

    #[test]
    fn deletion_policy_serializes_as_cloudformation_string() {
        let mut group: Resource = serde_json::from_value(json!({
            "Type": "AWS::Logs::LogGroup",
            "Properties": {"LogGroupName": "/aws/lambda/svc-dev-fn"}
        }))
        .unwrap();
        group.deletion_policy = Some(DeletionPolicy::Retain);

        let value = serde_json::to_value(&group).unwrap();
        assert_eq!(value["DeletionPolicy"], json!("Retain"));
    }

    #[test]
    fn unknown_sections_and_keys_round_trip() {
        let input = json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Resources": {
                "Fn": {
                    "Type": "AWS::Lambda::Function",
                    "Condition": "IsProd",
                    "Properties": {"Handler": "index.handler"}
                }
            },
            "Outputs": {"FnArn": {"Value": "x"}}
        });

        let template: Template = serde_json::from_value(input.clone()).unwrap();
        let output = serde_json::to_value(&template).unwrap();
        assert_eq!(output["AWSTemplateFormatVersion"], json!("2010-09-09"));
        assert_eq!(output["Outputs"], input["Outputs"]);
        assert_eq!(output["Resources"]["Fn"]["Condition"], json!("IsProd"));
    }

    #[test]
    fn resource_order_is_preserved() {
        let template: Template = serde_json::from_value(json!({
            "Resources": {
                "Zeta": {"Type": "AWS::Logs::LogGroup"},
                "Alpha": {"Type": "AWS::Lambda::Function"}
            }
        }))
        .unwrap();
        let ids: Vec<&str> = template.resources.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["Zeta", "Alpha"]);
    }
}
