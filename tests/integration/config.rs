//! Store configuration applied to real projects.

use anyhow::Result;
use fnstore::config::StoreConfig;
use fnstore::constants::CORS_HEADER_ENV_VAR;
use fnstore::lifecycle::ResourceStore;
use fnstore::test_utils::{TestProject, layer_parameters, plain_function};
use serde_json::json;
use serial_test::serial;

#[test]
fn test_custom_file_names_from_toml() -> Result<()> {
    let project = TestProject::new()?;
    let config_path = project.path("fnstore.toml");
    std::fs::write(
        &config_path,
        "layer-parameters-file = \"layer-parameters.json\"\n\
         function-parameters-file = \"state.json\"\n\
         enable-cors = false\n",
    )?;
    let config = StoreConfig::load(&config_path)?;

    let context = project.context();
    let store = ResourceStore::new(&context).config(config);
    store.create_layer_artifacts(&layer_parameters("myLayer"))?;
    store.create_function_resources(&plain_function("hello", &project.templates_dir()))?;

    let layer_state = project.read_json("amplify/backend/function/myLayer/layer-parameters.json")?;
    assert!(layer_state["layerVersionMap"]["1"].is_object());
    assert!(layer_state.get("layerVersion").is_none());

    let version = project.read_json("amplify/backend/function/myLayer/parameters.json")?;
    assert_eq!(version, json!({"layerVersion": 1}));

    let function_state = project.read_json("amplify/backend/function/hello/state.json")?;
    assert!(function_state["permissions"].is_object());
    assert!(!project.path("amplify/backend/function/hello/function-parameters.json").exists());

    assert_eq!(store.read_layer_state("myLayer")?.runtimes.map(|r| r.len()), Some(1));
    Ok(())
}

#[test]
#[serial]
fn test_cors_header_from_environment() -> Result<()> {
    let project = TestProject::new()?;
    let context = project.context();
    let store = ResourceStore::new(&context);

    // SAFETY: serialized with other env-mutating tests
    unsafe { std::env::set_var(CORS_HEADER_ENV_VAR, "true") };
    let params = plain_function("hello", &project.templates_dir());
    let result = store.create_function_resources(&params);
    unsafe { std::env::remove_var(CORS_HEADER_ENV_VAR) };
    result?;

    let cfn =
        project.read_json("amplify/backend/function/hello/hello-cloudformation-template.json")?;
    assert_eq!(cfn["Cors"], json!(true));
    Ok(())
}
