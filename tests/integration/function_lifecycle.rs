//! Integration tests for function resources.

use anyhow::Result;
use fnstore::config::StoreConfig;
use fnstore::core::StoreError;
use fnstore::lifecycle::ResourceStore;
use fnstore::models::{FunctionParameters, LambdaLayer, ProjectLayerRef};
use fnstore::test_utils::{TestProject, plain_function, trigger_function};
use serde_json::json;
use std::fs;

fn trigger_with_envs(project: &TestProject, name: &str, envs: &str) -> FunctionParameters {
    let mut params = trigger_function(name, &project.templates_dir());
    if let FunctionParameters::Trigger(trigger) = &mut params {
        trigger.trigger_envs = Some(envs.to_string());
    }
    params
}

#[test]
fn test_create_plain_function() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context).config(StoreConfig::default().with_cors(true));

    store.create_function_resources(&plain_function("hello", &project.templates_dir()))?;

    let index = fs::read_to_string(project.path("amplify/backend/function/hello/src/index.py"))?;
    assert!(index.contains("'function': 'hello'"));
    assert!(project.path("amplify/backend/function/hello/Pipfile").is_file());

    let cfn =
        project.read_json("amplify/backend/function/hello/hello-cloudformation-template.json")?;
    assert_eq!(cfn["Description"], json!("Lambda resource hello"));
    assert_eq!(cfn["Cors"], json!(true));

    let meta = project.amplify_meta()?;
    let entry = &meta["function"]["hello"];
    assert_eq!(entry["build"], json!(true));
    assert_eq!(entry["providerPlugin"], json!("awscloudformation"));
    assert_eq!(entry["service"], json!("Lambda"));
    assert_eq!(entry["dependsOn"][0]["resourceName"], json!("table"));

    let state = project.read_json("amplify/backend/function/hello/function-parameters.json")?;
    assert_eq!(state, json!({"permissions": {"storage": {"table": ["read"]}}}));
    assert!(!project.path("amplify/backend/function/hello/parameters.json").exists());

    let crumbs = project.read_json("amplify/backend/function/hello/amplify.state")?;
    assert_eq!(
        crumbs,
        json!({
            "pluginId": "amplify-python-function-runtime-provider",
            "functionRuntime": "python",
            "useLegacyBuild": false,
            "defaultEditorFile": "src/index.py"
        })
    );
    Ok(())
}

#[test]
fn test_create_trigger_function_with_cloudwatch_rule() -> Result<()> {
    let project = TestProject::new()?;
    let mut team_provider = project.team_provider_info()?;
    team_provider["dev"]["categories"] =
        json!({"function": {"authTrigger": {"DOMAIN": "from-env.com"}}});
    project.write_json("amplify/team-provider-info.json", &team_provider)?;

    let context = project.context();
    let store = ResourceStore::new(&context).config(StoreConfig::default().with_cors(false));
    store.create_function_resources(&trigger_function("authTrigger", &project.templates_dir()))?;

    let cfn_params = project.read_json("amplify/backend/function/authTrigger/parameters.json")?;
    assert_eq!(cfn_params["CloudWatchRule"], json!("rate(5 minutes)"));
    assert_eq!(cfn_params["modules"], json!("custom,email-filter"));
    assert_eq!(cfn_params["resourceName"], json!("authTrigger"));

    let index =
        fs::read_to_string(project.path("amplify/backend/function/authTrigger/src/index.js"))?;
    assert!(index.contains("const modules = 'custom,email-filter';"));
    assert!(index.contains("const domain = 'from-env.com';"));

    let cfn_template = "authTrigger-cloudformation-template.json";
    let cfn = project.read_json(&format!("amplify/backend/function/authTrigger/{cfn_template}"))?;
    assert_eq!(cfn["Description"], json!("Trigger authTrigger for userPool"));

    let meta = project.amplify_meta()?;
    assert!(meta["function"]["authTrigger"].get("dependsOn").is_none());

    let crumbs = project.read_json("amplify/backend/function/authTrigger/amplify.state")?;
    assert_eq!(crumbs["pluginId"], json!("amplify-nodejs-function-runtime-provider"));
    assert_eq!(crumbs["functionRuntime"], json!("nodejs"));
    assert_eq!(crumbs["useLegacyBuild"], json!(true));
    Ok(())
}

#[test]
fn test_trigger_envs_override_environment_values() -> Result<()> {
    let project = TestProject::new()?;
    let mut team_provider = project.team_provider_info()?;
    team_provider["dev"]["categories"] =
        json!({"function": {"authTrigger": {"DOMAIN": "from-env.com"}}});
    project.write_json("amplify/team-provider-info.json", &team_provider)?;

    let context = project.context();
    let store = ResourceStore::new(&context).config(StoreConfig::default().with_cors(false));
    let params =
        trigger_with_envs(&project, "authTrigger", r#"[{"key":"DOMAIN","value":"declared.com"}]"#);
    store.create_function_resources(&params)?;

    let index =
        fs::read_to_string(project.path("amplify/backend/function/authTrigger/src/index.js"))?;
    assert!(index.contains("const domain = 'declared.com';"));
    Ok(())
}

#[test]
fn test_malformed_trigger_envs_fail() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context).config(StoreConfig::default().with_cors(false));

    let params = trigger_with_envs(&project, "authTrigger", "[{\"key\":");
    let err = store.create_function_resources(&params).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::InvalidTriggerEnvironment { .. })
    ));
    assert!(!project.path("amplify/backend/function/authTrigger/src/index.js").exists());
    Ok(())
}

#[test]
fn test_recreate_keeps_user_source_and_cleans_deprecated_state() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context).config(StoreConfig::default().with_cors(false));
    let params = plain_function("hello", &project.templates_dir());
    store.create_function_resources(&params)?;

    let index = project.path("amplify/backend/function/hello/src/index.py");
    fs::write(&index, "# edited by hand\n")?;
    project.write_json(
        "amplify/backend/function/hello/function-parameters.json",
        &json!({"mutableParametersState": {"stale": true}, "custom": 1}),
    )?;

    store.create_function_resources(&params)?;

    assert_eq!(fs::read_to_string(&index)?, "# edited by hand\n");
    let state = project.read_json("amplify/backend/function/hello/function-parameters.json")?;
    assert!(state.get("mutableParametersState").is_none());
    assert_eq!(state["custom"], json!(1));
    assert_eq!(state["permissions"], json!({"storage": {"table": ["read"]}}));
    Ok(())
}

#[test]
fn test_update_function_drops_depends_on_for_trigger() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context).config(StoreConfig::default().with_cors(false));

    let mut meta = project.amplify_meta()?;
    meta["function"] = json!({"authTrigger": {
        "dependsOn": [{"category": "auth", "resourceName": "pool", "attributes": []}],
        "lastPushTimeStamp": "2024-01-01T00:00:00.000Z"
    }});
    project.write_json("amplify/backend/amplify-meta.json", &meta)?;

    store.update_function_resources(&trigger_function("authTrigger", &project.templates_dir()))?;

    let entry = &project.amplify_meta()?["function"]["authTrigger"];
    assert!(entry.get("dependsOn").is_none());
    assert_eq!(entry["lastPushTimeStamp"], json!("2024-01-01T00:00:00.000Z"));
    assert_eq!(entry["service"], json!("Lambda"));
    // templates are not copied on update
    assert!(!project.path("amplify/backend/function/authTrigger/src/index.js").exists());
    Ok(())
}

#[test]
fn test_detaching_all_layers_clears_stored_layer_list() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context).config(StoreConfig::default().with_cors(false));

    let mut params = plain_function("hello", &project.templates_dir());
    if let FunctionParameters::Plain(plain) = &mut params {
        plain.lambda_layers = Some(vec![LambdaLayer::ProjectLayer(ProjectLayerRef {
            resource_name: "shared".to_string(),
            env: Some("dev".to_string()),
            version: json!(1),
            is_latest_version_selected: false,
        })]);
    }
    store.create_function_resources(&params)?;

    if let FunctionParameters::Plain(plain) = &mut params {
        plain.lambda_layers = None;
    }
    store.update_function_resources(&params)?;

    let state = project.read_json("amplify/backend/function/hello/function-parameters.json")?;
    assert!(state.get("lambdaLayers").is_none(), "stale layers: {state}");
    assert!(state["permissions"].is_object());

    // an explicit empty list is recorded as such
    if let FunctionParameters::Plain(plain) = &mut params {
        plain.lambda_layers = Some(Vec::new());
    }
    store.update_function_resources(&params)?;
    let state = project.read_json("amplify/backend/function/hello/function-parameters.json")?;
    assert_eq!(state["lambdaLayers"], json!([]));
    Ok(())
}
