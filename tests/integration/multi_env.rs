//! Integration tests for multi-environment layers.

use anyhow::Result;
use fnstore::lifecycle::ResourceStore;
use fnstore::models::LayerUpdateOptions;
use fnstore::test_utils::{TestProject, layer_parameters, layer_runtime};
use serde_json::json;

const LAYER_DIR: &str = "amplify/backend/function/myLayer";

#[test]
fn test_create_multi_env_layer() -> Result<()> {
    let project = TestProject::new()?;
    project.enable_multi_env_layers()?;
    let context = project.context();
    let store = ResourceStore::new(&context);

    store.create_layer_artifacts(&layer_parameters("myLayer"))?;

    let local = project.read_json(&format!("{LAYER_DIR}/parameters.json"))?;
    assert!(local.get("runtimes").is_none());
    assert!(local["layerVersionMap"]["1"].is_object());
    assert_eq!(local["layerVersion"], json!(1));

    let meta = project.amplify_meta()?;
    assert!(meta["function"]["myLayer"].get("runtimes").is_none());
    assert_eq!(meta["function"]["myLayer"]["service"], json!("LambdaLayer"));

    let team_provider = project.team_provider_info()?;
    let entry = &team_provider["dev"]["nonCFNdata"]["function"]["myLayer"];
    assert_eq!(entry["runtimes"][0]["cloudTemplateValue"], json!("nodejs12.x"));
    assert!(entry["layerVersionMap"]["1"].is_object());
    assert_eq!(team_provider["dev"]["awscloudformation"]["Region"], json!("us-east-1"));

    let runtimes = project.read_json(&format!("{LAYER_DIR}/layer-runtimes.json"))?;
    assert_eq!(runtimes[0]["value"], json!("nodejs"));
    Ok(())
}

#[test]
fn test_remove_prunes_team_provider_entry() -> Result<()> {
    let project = TestProject::new()?;
    project.enable_multi_env_layers()?;
    let context = project.context();
    let store = ResourceStore::new(&context);

    store.create_layer_artifacts(&layer_parameters("myLayer"))?;
    store.remove_layer_artifacts("myLayer")?;

    assert_eq!(
        project.team_provider_info()?,
        json!({"dev": {"awscloudformation": {"Region": "us-east-1"}}})
    );

    // removing again is harmless
    store.remove_layer_artifacts("myLayer")?;
    Ok(())
}

#[test]
fn test_environments_keep_separate_state() -> Result<()> {
    let project = TestProject::new()?;
    project.enable_multi_env_layers()?;
    let context = project.context();
    let store = ResourceStore::new(&context);
    let mut params = layer_parameters("myLayer");
    store.create_layer_artifacts(&params)?;

    project.switch_env("prod")?;
    params.runtimes.push(layer_runtime("Python", "python", "python", "python3.8"));
    store.update_layer_artifacts(&params, LayerUpdateOptions::default())?;

    let team_provider = project.team_provider_info()?;
    let dev = &team_provider["dev"]["nonCFNdata"]["function"]["myLayer"];
    let prod = &team_provider["prod"]["nonCFNdata"]["function"]["myLayer"];
    assert_eq!(dev["runtimes"].as_array().map(Vec::len), Some(1));
    assert_eq!(prod["runtimes"].as_array().map(Vec::len), Some(2));

    assert_eq!(store.layer_runtimes("myLayer")?.len(), 2);
    project.switch_env("dev")?;
    assert_eq!(store.layer_runtimes("myLayer")?.len(), 1);

    // removal only touches the current environment
    store.remove_layer_artifacts("myLayer")?;
    let team_provider = project.team_provider_info()?;
    assert!(team_provider["dev"].get("nonCFNdata").is_none());
    assert!(team_provider["prod"]["nonCFNdata"]["function"]["myLayer"].is_object());
    Ok(())
}

#[test]
fn test_read_layer_state_falls_back_to_local_file() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);
    store.create_layer_artifacts(&layer_parameters("myLayer"))?;

    // flag turned on after creation; no team-provider entry yet
    project.enable_multi_env_layers()?;
    let state = store.read_layer_state("myLayer")?;
    assert!(state.layer_version_map.contains_key("1"));
    assert_eq!(state.runtimes.as_ref().map(Vec::len), Some(1));

    store.update_layer_artifacts(&layer_parameters("myLayer"), LayerUpdateOptions::default())?;
    let local = project.read_json(&format!("{LAYER_DIR}/parameters.json"))?;
    assert!(local.get("runtimes").is_none());
    assert_eq!(store.layer_runtimes("myLayer")?[0].value, "nodejs");
    Ok(())
}
