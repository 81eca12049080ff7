//! Parameter fixtures
//!
//! Plain functions are Python functions rendered from `index.py.tera` and
//! `Pipfile.tera`; trigger functions are Node functions rendered from
//! `index.js.tera`. [`write_function_templates`] writes all of them, plus
//! the CloudFormation templates, into a directory.

use anyhow::Result;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::models::{
    DependsOn, FunctionParameters, FunctionRuntime, FunctionTemplate, LayerDefaultFile,
    LayerParameters, LayerPermission, LayerRuntime, LayerVersionMetadata,
    PlainFunctionParameters, ProviderContext, TriggerFunctionParameters,
};

const PLAIN_CFN_TEMPLATE: &str = "lambda-cloudformation-template.json.tera";
const TRIGGER_CFN_TEMPLATE: &str = "trigger-cloudformation-template.json.tera";

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// A layer runtime whose default files seed `<path>/package.json`.
pub fn layer_runtime(name: &str, value: &str, path: &str, cloud_value: &str) -> LayerRuntime {
    LayerRuntime {
        name: name.to_string(),
        value: value.to_string(),
        layer_executable_path: path.to_string(),
        layer_default_files: vec![LayerDefaultFile {
            path: path.to_string(),
            filename: "package.json".to_string(),
            content: "{\n  \"version\": \"1.0.0\"\n}\n".to_string(),
        }],
        cloud_template_value: cloud_value.to_string(),
    }
}

/// Private layer with one NodeJS runtime and version 1.
pub fn layer_parameters(name: &str) -> LayerParameters {
    let mut layer_version_map = BTreeMap::new();
    layer_version_map.insert(
        "1".to_string(),
        LayerVersionMetadata {
            permissions: vec![LayerPermission::Private],
            ..Default::default()
        },
    );

    LayerParameters {
        layer_name: name.to_string(),
        runtimes: vec![layer_runtime("NodeJS", "nodejs", "nodejs", "nodejs12.x")],
        layer_version_map,
        provider_context: ProviderContext {
            provider: "awscloudformation".to_string(),
            service: "LambdaLayer".to_string(),
            project_name: Some("testproject".to_string()),
        },
        build: true,
        layer_version: None,
    }
}

/// Python function depending on a storage table.
pub fn plain_function(name: &str, template_root: &Path) -> FunctionParameters {
    let mut dest_map = BTreeMap::new();
    dest_map.insert("index.py.tera".to_string(), "src/index.py".to_string());
    dest_map.insert("Pipfile.tera".to_string(), "Pipfile".to_string());

    FunctionParameters::Plain(PlainFunctionParameters {
        resource_name: name.to_string(),
        depends_on: vec![DependsOn {
            category: "storage".to_string(),
            resource_name: "table".to_string(),
            attributes: vec!["Name".to_string(), "Arn".to_string()],
        }],
        mutable_parameters_state: object(json!({
            "permissions": {"storage": {"table": ["read"]}}
        })),
        lambda_layers: None,
        function_template: FunctionTemplate {
            source_root: template_root.to_path_buf(),
            source_files: vec!["index.py.tera".to_string(), "Pipfile.tera".to_string()],
            dest_map,
            default_editor_file: Some("src/index.py".to_string()),
        },
        cloud_resource_template_path: template_root.join(PLAIN_CFN_TEMPLATE),
        runtime: FunctionRuntime {
            name: "Python".to_string(),
            value: "python".to_string(),
            plugin_id: "amplify-python-function-runtime-provider".to_string(),
            cloud_template_value: Some("python3.8".to_string()),
        },
        cloudwatch_rule: None,
        extra: object(json!({"functionName": name})),
    })
}

/// Node trigger on a user pool, scheduled every five minutes.
pub fn trigger_function(name: &str, template_root: &Path) -> FunctionParameters {
    let mut dest_map = BTreeMap::new();
    dest_map.insert("index.js.tera".to_string(), "src/index.js".to_string());

    FunctionParameters::Trigger(TriggerFunctionParameters {
        resource_name: name.to_string(),
        trigger: true,
        modules: vec!["custom".to_string(), "email-filter".to_string()],
        parent_resource: Some("userPool".to_string()),
        cloudwatch_rule: Some("rate(5 minutes)".to_string()),
        trigger_envs: None,
        function_template: FunctionTemplate {
            source_root: template_root.to_path_buf(),
            source_files: vec!["index.js.tera".to_string()],
            dest_map,
            default_editor_file: Some("src/index.js".to_string()),
        },
        cloud_resource_template_path: template_root.join(TRIGGER_CFN_TEMPLATE),
        extra: Map::new(),
    })
}

/// Writes the templates used by [`plain_function`] and [`trigger_function`] into `dir`.
pub fn write_function_templates(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join("index.py.tera"),
        "def handler(event, context):\n    return {'function': '{{ resourceName }}'}\n",
    )?;
    fs::write(dir.join("Pipfile.tera"), "[packages]\n")?;
    fs::write(
        dir.join("index.js.tera"),
        "const modules = '{{ modules | join(sep=\",\") }}';\n\
         const domain = '{{ DOMAIN | default(value=\"\") }}';\n",
    )?;
    fs::write(
        dir.join(PLAIN_CFN_TEMPLATE),
        r#"{
  "Description": "Lambda resource {{ resourceName }}",
  "Cors": {% if enableCors %}true{% else %}false{% endif %}
}
"#,
    )?;
    fs::write(
        dir.join(TRIGGER_CFN_TEMPLATE),
        r#"{
  "Description": "Trigger {{ resourceName }} for {{ parentResource }}"
}
"#,
    )?;
    Ok(())
}
