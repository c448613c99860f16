use super::to_json;
use pridolog_core::{ServiceDescriptor, ServiceTable};
use serde_json::json;

fn render(table: &ServiceTable) -> String {
    let width = table.iter().map(|s| s.name.len()).max().unwrap_or(0);
    let mut out = String::from("Services\n========\n");
    for service in table.iter() {
        out.push_str(&format!(
            "  {:width$}  {}  {}\n",
            service.name,
            service.log_file.as_str(),
            service.request_path.as_ref().map_or("-", |m| m.as_str()),
            width = width
        ));
    }
    out
}

fn to_value(service: &ServiceDescriptor) -> serde_json::Value {
    json!({
        "name": service.name,
        "logFile": service.log_file.as_str(),
        "requestPath": service.request_path.as_ref().map(|m| m.as_str()),
    })
}

pub fn run(json: bool) -> anyhow::Result<()> {
    let table = ServiceTable::builtin();
    if json {
        let services: Vec<_> = table.iter().map(to_value).collect();
        println!("{}", to_json(&services)?);
    } else {
        print!("{}", render(table));
    }
    Ok(())
}
