//! Integration tests for single-environment layers.

use anyhow::Result;
use fnstore::lifecycle::ResourceStore;
use fnstore::models::{LayerPermission, LayerUpdateOptions, LayerVersionMetadata};
use fnstore::test_utils::{TestProject, layer_parameters, layer_runtime};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;

const LAYER_DIR: &str = "amplify/backend/function/myLayer";
const LAYER_TEMPLATE: &str = "myLayer-awscloudformation-template.json";

fn layer_path(project: &TestProject, relative: &str) -> PathBuf {
    project.path(LAYER_DIR).join(relative)
}

fn read_layer_json(project: &TestProject, relative: &str) -> Result<Value> {
    project.read_json(&format!("{LAYER_DIR}/{relative}"))
}

#[test]
fn test_create_single_env_layer_layout() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);

    let layer_dir = store.create_layer_artifacts(&layer_parameters("myLayer"))?;

    assert_eq!(layer_dir, project.path(LAYER_DIR));
    assert!(layer_path(&project, "opt").is_dir());
    assert!(layer_path(&project, "lib/nodejs").is_dir());
    assert_eq!(
        fs::read_to_string(layer_path(&project, "lib/nodejs/README.txt"))?,
        "Replace this file with your layer files"
    );
    assert!(layer_path(&project, "lib/nodejs/package.json").is_file());

    let parameters = read_layer_json(&project, "parameters.json")?;
    assert_eq!(parameters["layerVersionMap"]["1"]["permissions"], json!([{"type": "private"}]));
    assert_eq!(
        parameters["runtimes"],
        json!([{
            "value": "nodejs",
            "name": "NodeJS",
            "layerExecutablePath": "nodejs",
            "cloudTemplateValue": "nodejs12.x"
        }])
    );
    assert_eq!(parameters["layerVersion"], json!(1));

    let meta = project.amplify_meta()?;
    let entry = &meta["function"]["myLayer"];
    assert_eq!(entry["providerPlugin"], json!("awscloudformation"));
    assert_eq!(entry["service"], json!("LambdaLayer"));
    assert_eq!(entry["build"], json!(true));
    assert_eq!(entry["runtimes"][0]["value"], json!("nodejs"));
    // unrelated metadata survives
    assert_eq!(meta["providers"]["awscloudformation"]["Region"], json!("us-east-1"));

    let backend_config = project.read_json("amplify/backend/backend-config.json")?;
    assert_eq!(backend_config["function"]["myLayer"], *entry);

    let template = read_layer_json(&project, LAYER_TEMPLATE)?;
    let properties = &template["Resources"]["LambdaLayerVersion"]["Properties"];
    assert_eq!(properties["CompatibleRuntimes"], json!(["nodejs12.x"]));

    // single-environment layers leave the team-provider document alone
    assert_eq!(
        project.team_provider_info()?,
        json!({"dev": {"awscloudformation": {"Region": "us-east-1"}}})
    );
    Ok(())
}

#[test]
fn test_provisioning_twice_preserves_user_edits() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);
    let mut params = layer_parameters("myLayer");

    store.create_layer_artifacts(&params)?;
    let readme = layer_path(&project, "lib/nodejs/README.txt");
    let package = layer_path(&project, "lib/nodejs/package.json");
    fs::write(&readme, "my notes")?;
    fs::write(&package, "{\"name\": \"edited\"}")?;

    params.runtimes.push(layer_runtime("Python", "python", "python", "python3.8"));
    store.update_layer_artifacts(&params, LayerUpdateOptions::default())?;

    assert_eq!(fs::read_to_string(&readme)?, "my notes");
    assert_eq!(fs::read_to_string(&package)?, "{\"name\": \"edited\"}");
    // the newly declared runtime is provisioned
    assert!(layer_path(&project, "lib/python/README.txt").is_file());
    assert!(layer_path(&project, "lib/python/package.json").is_file());

    let parameters = read_layer_json(&project, "parameters.json")?;
    assert_eq!(parameters["runtimes"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn test_update_without_amplify_meta() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);
    let mut params = layer_parameters("myLayer");
    store.create_layer_artifacts(&params)?;
    let meta_before = project.amplify_meta()?;

    params.layer_version_map.insert(
        "2".to_string(),
        LayerVersionMetadata {
            permissions: vec![LayerPermission::Public],
            ..Default::default()
        },
    );
    params.layer_version = Some(2);
    let options = LayerUpdateOptions {
        amplify_meta: false,
        ..Default::default()
    };
    store.update_layer_artifacts(&params, options)?;

    assert_eq!(project.amplify_meta()?, meta_before);

    let parameters = read_layer_json(&project, "parameters.json")?;
    assert!(parameters["layerVersionMap"]["2"].is_object());
    assert_eq!(parameters["layerVersion"], json!(2));

    let template = read_layer_json(&project, LAYER_TEMPLATE)?;
    assert!(template["Resources"]["LambdaLayerPermissionPublic"].is_object());
    Ok(())
}

#[test]
fn test_update_keeps_recorded_meta_fields() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);
    let params = layer_parameters("myLayer");
    store.create_layer_artifacts(&params)?;

    let mut meta = project.amplify_meta()?;
    meta["function"]["myLayer"]["output"] = json!({"Arn": "arn:aws:lambda:layer:1"});
    project.write_json("amplify/backend/amplify-meta.json", &meta)?;

    store.update_layer_artifacts(&params, LayerUpdateOptions::default())?;

    let meta = project.amplify_meta()?;
    assert_eq!(meta["function"]["myLayer"]["output"]["Arn"], json!("arn:aws:lambda:layer:1"));
    Ok(())
}

#[test]
fn test_remove_single_env_layer_is_noop() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);
    store.create_layer_artifacts(&layer_parameters("myLayer"))?;
    let team_provider_before = project.team_provider_info()?;

    store.remove_layer_artifacts("myLayer")?;

    assert_eq!(project.team_provider_info()?, team_provider_before);
    assert!(layer_path(&project, "parameters.json").is_file());
    Ok(())
}

#[test]
fn test_unsafe_runtime_path_rejected() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);
    let mut params = layer_parameters("myLayer");
    params.runtimes = vec![layer_runtime("Evil", "evil", "../../outside", "nodejs12.x")];

    let err = store.create_layer_artifacts(&params).unwrap_err();
    assert!(err.to_string().contains("../../outside"), "unexpected error: {err:#}");
    assert!(!project.path("amplify/backend/outside").exists());
    Ok(())
}
