//! Hosts command - list registered hosts

use crate::api::ApiClient;
use crate::cli::args::{HostsArgs, OutputFormat};
use crate::config::Config;
use crate::error::RubickResult;
use crate::hosts::{Host, HostDirectory};
use crate::ui::{self, Level, UiContext};
use console::style;
use serde::Serialize;

#[derive(Serialize)]
struct HostRow<'a> {
    #[serde(flatten)]
    host: &'a Host,
    current: bool,
}

/// Execute the hosts command
pub async fn execute(args: HostsArgs, config: &Config) -> RubickResult<()> {
    let client = ApiClient::new(&config.api);
    let directory = super::load_directory(&client).await?;

    if directory.is_empty() {
        match args.format {
            OutputFormat::Json => println!("[]"),
            OutputFormat::Plain => {}
            OutputFormat::Table => {
                let ctx = UiContext::detect();
                ui::line(&ctx, Level::Info, "No hosts registered");
            }
        }
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&directory),
        OutputFormat::Json => print_json(&directory)?,
        OutputFormat::Plain => {
            for host in directory.hosts() {
                println!("{}\t{}", host.id, host.name);
            }
        }
    }

    Ok(())
}

fn is_current(directory: &HostDirectory, host: &Host) -> bool {
    directory
        .current_id()
        .is_some_and(|id| id.as_str() == host.id)
}

fn print_table(directory: &HostDirectory) {
    let ctx = UiContext::detect();
    ui::heading(&ctx, "Hosts");

    println!(
        "  {:<20} {:<24} {:<8} {:<32}",
        style("ID").bold(),
        style("NAME").bold(),
        style("TYPE").bold(),
        style("ENDPOINT").bold()
    );
    println!("{}", "-".repeat(86));

    for host in directory.hosts() {
        let marker = if is_current(directory, host) {
            style("*").green().bold()
        } else {
            style(" ")
        };
        let mut name = host.name.clone();
        if host.is_default {
            name.push_str(" (default)");
        }
        let name = if host.is_active {
            style(name)
        } else {
            style(name).dim()
        };

        println!(
            "{} {:<20} {:<24} {:<8} {:<32}",
            marker,
            host.id,
            name,
            host.host_type.as_str(),
            host.endpoint()
        );
    }

    println!();
    println!("{} host(s), * = current", directory.hosts().len());
}

fn print_json(directory: &HostDirectory) -> RubickResult<()> {
    let rows: Vec<HostRow<'_>> = directory
        .hosts()
        .iter()
        .map(|host| HostRow {
            host,
            current: is_current(directory, host),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
