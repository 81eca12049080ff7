//! CloudFormation template generation for layers.
//!
//! The orchestrator only needs "parameters in, serializable document out";
//! [`LayerTemplateGenerator`] is that seam. [`LayerVersionTemplate`] is the
//! default implementation, producing an `AWS::Lambda::LayerVersion` plus one
//! `AWS::Lambda::LayerVersionPermission` per grant of the current version.

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::models::{LayerParameters, LayerPermission};

const LAYER_VERSION_RESOURCE: &str = "LambdaLayerVersion";
const GET_LAYER_VERSION_ACTION: &str = "lambda:GetLayerVersion";

/// Produces the infrastructure template document for a layer.
pub trait LayerTemplateGenerator {
    /// Builds the template for `parameters`.
    fn generate(&self, parameters: &LayerParameters) -> Result<Value>;
}

/// Default generator for `AWS::Lambda::LayerVersion` stacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayerVersionTemplate;

impl LayerTemplateGenerator for LayerVersionTemplate {
    fn generate(&self, parameters: &LayerParameters) -> Result<Value> {
        let mut resources = Map::new();
        resources.insert(LAYER_VERSION_RESOURCE.to_string(), layer_version_resource(parameters));
        for (logical_id, resource) in permission_resources(parameters) {
            resources.insert(logical_id, resource);
        }

        Ok(json!({
            "AWSTemplateFormatVersion": "2010-09-09",
            "Description": "Lambda layer resource stack",
            "Parameters": {
                "env": { "Type": "String" },
                "deploymentBucketName": { "Type": "String" },
                "s3Key": { "Type": "String" },
                "description": { "Type": "String", "Default": "" }
            },
            "Conditions": {
                "HasEnvironmentParameter": {
                    "Fn::Not": [{ "Fn::Equals": [{ "Ref": "env" }, "NONE"] }]
                }
            },
            "Resources": resources,
            "Outputs": {
                "Arn": { "Value": { "Ref": LAYER_VERSION_RESOURCE } },
                "Region": { "Value": { "Ref": "AWS::Region" } }
            }
        }))
    }
}

fn layer_version_resource(parameters: &LayerParameters) -> Value {
    let name = &parameters.layer_name;
    let compatible_runtimes: Vec<&str> =
        parameters.runtimes.iter().map(|r| r.cloud_template_value.as_str()).collect();

    json!({
        "Type": "AWS::Lambda::LayerVersion",
        "Properties": {
            "CompatibleRuntimes": compatible_runtimes,
            "Content": {
                "S3Bucket": { "Ref": "deploymentBucketName" },
                "S3Key": { "Ref": "s3Key" }
            },
            "Description": { "Ref": "description" },
            "LayerName": {
                "Fn::If": [
                    "HasEnvironmentParameter",
                    { "Fn::Sub": [format!("{name}-${{env}}"), { "env": { "Ref": "env" } }] },
                    name
                ]
            }
        },
        "DeletionPolicy": "Delete",
        "UpdateReplacePolicy": "Retain"
    })
}

/// Version whose permissions the template grants: the requested version, else
/// the highest numbered entry of the version map.
fn current_version(parameters: &LayerParameters) -> Option<String> {
    parameters.layer_version.map(|v| v.to_string()).or_else(|| {
        parameters
            .layer_version_map
            .keys()
            .filter_map(|k| k.parse::<u32>().ok())
            .max()
            .map(|v| v.to_string())
    })
}

fn permission_resources(parameters: &LayerParameters) -> Vec<(String, Value)> {
    let Some(permissions) = current_version(parameters)
        .and_then(|version| parameters.layer_version_map.get(&version))
        .map(|meta| &meta.permissions)
    else {
        return Vec::new();
    };

    let mut resources = Vec::new();
    for permission in permissions {
        match permission {
            LayerPermission::Private => {}
            LayerPermission::Public => {
                let public = grant(json!("*"), None);
                resources.push(("LambdaLayerPermissionPublic".to_string(), public));
            }
            LayerPermission::AwsAccounts { accounts } => {
                for account in accounts {
                    resources.push((
                        format!("LambdaLayerPermissionAwsAccounts{}", logical_suffix(account)),
                        grant(json!(account), None),
                    ));
                }
            }
            LayerPermission::AwsOrg { orgs } => {
                for org in orgs {
                    resources.push((
                        format!("LambdaLayerPermissionAwsOrg{}", logical_suffix(org)),
                        grant(json!("*"), Some(org)),
                    ));
                }
            }
        }
    }
    resources
}

fn grant(principal: Value, organization_id: Option<&str>) -> Value {
    let mut properties = json!({
        "Action": GET_LAYER_VERSION_ACTION,
        "LayerVersionArn": { "Ref": LAYER_VERSION_RESOURCE },
        "Principal": principal
    });
    if let Some(org) = organization_id {
        properties["OrganizationId"] = json!(org);
    }
    json!({ "Type": "AWS::Lambda::LayerVersionPermission", "Properties": properties })
}

/// Logical IDs must be alphanumeric.
fn logical_suffix(value: &str) -> String {
    value.chars().filter(char::is_ascii_alphanumeric).collect()
}
