use crate::domain::models::{JsonOut, Service, ServiceRow};
use serde::Serialize;

pub fn print_one<T: Serialize>(
    json: bool,
    data: T,
    row: impl Fn(&T) -> String,
) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&JsonOut { ok: true, data })?
        );
    } else {
        println!("{}", row(&data));
    }
    Ok(())
}

pub fn service_row(s: &Service) -> String {
    let r = ServiceRow::from(s);
    format!(
        "{}\t{}\t{}\t{}\t{}",
        r.id, r.name, r.state, r.health, r.image
    )
}

pub fn print_service(json: bool, svc: &Service) -> anyhow::Result<()> {
    print_one(json, svc, |s| service_row(s))
}
