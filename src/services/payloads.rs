//! Request bodies for the mutating Cattle calls.
//!
//! Everything here is pure: services go in, JSON bodies come out.

use crate::domain::models::{LbConfig, Service};
use crate::services::cattle::CattleError;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

pub fn docker_image(image: &str) -> String {
    format!("docker:{}", image)
}

/// Shallow merge: top-level keys of `patch` replace those in `target`.
pub fn merge_object(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (k, v) in patch {
        target.insert(k.clone(), v.clone());
    }
}

pub fn rename_body(new_name: &str) -> Value {
    json!({ "name": new_name })
}

pub fn create_body(
    stack_id: &str,
    name: &str,
    image_name: &str,
    config: Option<&Map<String, Value>>,
    launch_config: Option<&Map<String, Value>>,
) -> Value {
    let mut body = Map::new();
    body.insert("scale".into(), json!(1));
    body.insert("startOnCreate".into(), json!(true));
    let mut lc = Map::new();
    lc.insert("tty".into(), json!(true));

    if let Some(c) = config {
        merge_object(&mut body, c);
    }
    if let Some(c) = launch_config {
        merge_object(&mut lc, c);
    }

    lc.insert("imageUuid".into(), json!(docker_image(image_name)));
    body.insert("type".into(), json!("service"));
    body.insert("name".into(), json!(name));
    body.insert("stackId".into(), json!(stack_id));
    body.insert("launchConfig".into(), Value::Object(lc));
    Value::Object(body)
}

pub fn clone_body(
    svc: &Service,
    new_name: &str,
    new_image: Option<&str>,
    config: Option<&Map<String, Value>>,
    launch_config: Option<&Map<String, Value>>,
) -> Result<Value, CattleError> {
    let mut body = match serde_json::to_value(svc).map_err(CattleError::Decode)? {
        Value::Object(m) => m,
        _ => Map::new(),
    };
    if let Some(c) = config {
        merge_object(&mut body, c);
    }

    let mut lc = match body.remove("launchConfig") {
        Some(Value::Object(m)) => m,
        _ => Map::new(),
    };
    if let Some(c) = launch_config {
        merge_object(&mut lc, c);
    }
    if let Some(img) = new_image {
        lc.insert("imageUuid".into(), json!(docker_image(img)));
    }
    body.insert("launchConfig".into(), Value::Object(lc));
    body.insert("name".into(), json!(new_name));
    Ok(Value::Object(body))
}

pub fn upgrade_body(
    svc: &Service,
    new_image: Option<&str>,
    new_secondary_images: Option<&BTreeMap<String, String>>,
) -> Result<Value, CattleError> {
    let mut launch_config = svc.launch_config.clone().unwrap_or_default();
    let mut secondaries = svc.secondary_launch_configs.clone();

    if let Some(img) = new_image {
        launch_config.insert("imageUuid".into(), json!(docker_image(img)));
    }
    if let Some(images) = new_secondary_images {
        for (name, img) in images {
            let slc = secondaries
                .iter_mut()
                .find(|s| s.get("name").and_then(Value::as_str) == Some(name.as_str()))
                .ok_or_else(|| CattleError::UnknownSidekick(name.clone()))?;
            slc.insert("imageUuid".into(), json!(docker_image(img)));
        }
    }

    Ok(json!({
        "inServiceStrategy": {
            "launchConfig": launch_config,
            "secondaryLaunchConfigs": secondaries,
        }
    }))
}

pub fn restart_body(batch_size: u32, interval_ms: u64) -> Value {
    json!({
        "rollingRestartStrategy": {
            "batchSize": batch_size,
            "intervalMillis": interval_ms,
        }
    })
}

/// Copy of the balancer config with the first matching rule pointed at `target_svc_id`.
pub fn retarget_lb_config(
    lb_config: &LbConfig,
    source_port: u16,
    path: Option<&str>,
    target_svc_id: &str,
) -> Result<LbConfig, CattleError> {
    let mut lb_config = lb_config.clone();
    let rule = lb_config
        .port_rules
        .iter_mut()
        .find(|pr| pr.matches(source_port, path))
        .ok_or_else(|| CattleError::PortRuleNotFound {
            source_port,
            path: path.map(str::to_string),
        })?;
    rule.service_id = Some(target_svc_id.to_string());
    Ok(lb_config)
}
