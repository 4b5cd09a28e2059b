use crate::cli::{ServiceCommands, StackCommands};
use crate::commands::Session;
use crate::services::output::{print_one, print_service};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

pub fn handle_stack_commands(
    session: &Session,
    json: bool,
    command: &StackCommands,
) -> anyhow::Result<()> {
    match command {
        StackCommands::Find { project, name } => {
            let stack = session.client.get_stack_by_name(project, name)?;
            print_one(json, &stack, |s| format!("{}\t{}", s.id, s.name))?;
        }
    }
    Ok(())
}

pub fn handle_service_commands(
    session: &Session,
    json: bool,
    command: &ServiceCommands,
) -> anyhow::Result<()> {
    let client = &session.client;
    match command {
        ServiceCommands::Get { project, service } => {
            print_service(json, &client.get_svc(project, service)?)?;
        }
        ServiceCommands::Find {
            project,
            stack,
            name,
        } => {
            let stack = client.get_stack_by_name(project, stack)?;
            print_service(json, &client.get_svc_by_stack_and_name(&stack, name)?)?;
        }
        ServiceCommands::Rename {
            project,
            service,
            new_name,
        } => {
            let svc = client.get_svc(project, service)?;
            print_service(json, &client.rename_svc(&svc, new_name)?)?;
        }
        ServiceCommands::AwaitActive {
            project,
            service,
            timeout,
        } => {
            let svc = client.get_svc(project, service)?;
            let svc = client.await_active(svc, timeout.map(Duration::from_secs))?;
            print_service(json, &svc)?;
        }
        ServiceCommands::AwaitHealthy {
            project,
            service,
            timeout,
        } => {
            let svc = client.get_svc(project, service)?;
            let svc = client.await_healthy(svc, timeout.map(Duration::from_secs))?;
            print_service(json, &svc)?;
        }
        ServiceCommands::FinishUpgrade { project, service } => {
            let svc = client.get_svc(project, service)?;
            print_service(json, &client.finish_any_previous_upgrade(svc)?)?;
        }
        ServiceCommands::Create {
            project,
            stack_id,
            name,
            image,
            config,
            launch_config,
        } => {
            let config = parse_object_arg("--config", config.as_deref())?;
            let launch_config = parse_object_arg("--launch-config", launch_config.as_deref())?;
            let svc = client.create_svc(
                project,
                stack_id,
                name,
                image,
                config.as_ref(),
                launch_config.as_ref(),
            )?;
            print_service(json, &svc)?;
        }
        ServiceCommands::CloneService {
            project,
            service,
            new_name,
            image,
            config,
            launch_config,
        } => {
            let config = parse_object_arg("--config", config.as_deref())?;
            let launch_config = parse_object_arg("--launch-config", launch_config.as_deref())?;
            let svc = client.get_svc(project, service)?;
            let cloned = client.clone_svc(
                &svc,
                new_name,
                image.as_deref(),
                config.as_ref(),
                launch_config.as_ref(),
            )?;
            print_service(json, &cloned)?;
        }
        ServiceCommands::Upgrade {
            project,
            service,
            image,
            sidekicks,
        } => {
            let sidekicks = parse_sidekicks(sidekicks)?;
            let svc = client.get_svc(project, service)?;
            let upgraded = client.upgrade_svc_images(
                svc,
                image.as_deref(),
                (!sidekicks.is_empty()).then_some(&sidekicks),
            )?;
            print_service(json, &upgraded)?;
        }
        ServiceCommands::Restart {
            project,
            service,
            batch_size,
            interval_ms,
        } => {
            let svc = client.get_svc(project, service)?;
            print_service(json, &client.restart_svc(&svc, *batch_size, *interval_ms)?)?;
        }
    }
    Ok(())
}

fn parse_object_arg(flag: &str, raw: Option<&str>) -> anyhow::Result<Option<Map<String, Value>>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(m)) => Ok(Some(m)),
        Ok(_) => anyhow::bail!("{} must be a JSON object", flag),
        Err(e) => anyhow::bail!("{} is not valid JSON: {}", flag, e),
    }
}

fn parse_sidekicks(raw: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for item in raw {
        match item.split_once('=') {
            Some((name, image)) if !name.is_empty() && !image.is_empty() => {
                out.insert(name.to_string(), image.to_string());
            }
            _ => anyhow::bail!("--sidekick expects NAME=IMAGE, got {:?}", item),
        }
    }
    Ok(out)
}
