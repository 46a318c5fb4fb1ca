//! Status command - check that the backend answers

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::RubickResult;
use crate::ui::{self, Level, TaskSpinner, UiContext};

/// Execute the status command
pub async fn execute(config: &Config) -> RubickResult<()> {
    let ctx = UiContext::detect();
    let client = ApiClient::new(&config.api);

    ui::heading(&ctx, "Rubick Status");
    ui::line(&ctx, Level::Info, &format!("Backend {}", client.base_url()));

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start("Contacting backend...");

    let health = match client.health().await {
        Ok(health) => health,
        Err(e) => {
            spinner.stop_error("Backend unreachable");
            return Err(e.into());
        }
    };
    let status = if health.status.is_empty() {
        "ok"
    } else {
        health.status.as_str()
    };
    spinner.stop(&format!("Backend healthy ({})", status));

    let directory = super::load_directory(&client).await?;
    match directory.current_host() {
        Some(host) => {
            ui::line(
                &ctx,
                Level::Ok,
                &format!("{} host(s) registered", directory.hosts().len()),
            );
            ui::details(
                &ctx,
                "Current host",
                &[
                    ("Name", host.name.clone()),
                    ("Id", host.id.clone()),
                    ("Endpoint", host.endpoint()),
                ],
            );
            ui::closing(&ctx, Level::Ok, "Ready");
        }
        None => {
            ui::line_with_hint(&ctx, Level::Warn, "No hosts registered", "add one in the web console");
            ui::closing(&ctx, Level::Warn, "Backend up, nothing to browse");
        }
    }

    Ok(())
}
