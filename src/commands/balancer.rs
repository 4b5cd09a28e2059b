use crate::cli::LbCommands;
use crate::commands::Session;
use crate::services::output::print_service;

pub fn handle_lb_commands(session: &Session, json: bool, command: &LbCommands) -> anyhow::Result<()> {
    let client = &session.client;
    match command {
        LbCommands::Target {
            project,
            lb_service,
            source_port,
            path,
        } => {
            let lb = client.get_svc(project, lb_service)?;
            let target = client.get_lb_svc_target(&lb, *source_port, path.as_deref())?;
            print_service(json, &target)?;
        }
        LbCommands::Retarget {
            project,
            lb_service,
            source_port,
            path,
            target,
        } => {
            let lb = client.get_svc(project, lb_service)?;
            let updated = client.change_lb_svc_target(&lb, *source_port, path.as_deref(), target)?;
            print_service(json, &updated)?;
        }
    }
    Ok(())
}
