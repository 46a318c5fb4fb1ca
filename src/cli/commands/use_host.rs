//! Use command - choose the current host

use crate::api::ApiClient;
use crate::cli::args::UseArgs;
use crate::config::Config;
use crate::error::{RubickError, RubickResult};
use crate::hosts::CurrentHostStore;
use crate::ui::{self, Level, UiContext};

/// Execute the use command
pub async fn execute(args: UseArgs, config: &Config) -> RubickResult<()> {
    let ctx = UiContext::detect();
    let client = ApiClient::new(&config.api);
    let mut directory = super::load_directory(&client).await?;

    if directory.is_empty() {
        return Err(RubickError::NoHosts);
    }

    let key = match args.host {
        Some(key) => key,
        None => {
            if !ctx.is_interactive() {
                return Err(RubickError::NotInteractive("Choosing a host without an argument"));
            }
            let current = directory.current_id().cloned();
            let options: Vec<(String, String, String)> = directory
                .hosts()
                .iter()
                .map(|h| {
                    let hint = if current.as_ref().is_some_and(|c| c.as_str() == h.id) {
                        format!("{} (current)", h.endpoint())
                    } else {
                        h.endpoint()
                    };
                    (h.id.clone(), h.name.clone(), hint)
                })
                .collect();
            ui::select(&ctx, "Select a host", &options).await?
        }
    };

    let host = directory.set_current(&key)?.clone();
    CurrentHostStore::new().save(&host.host_id()).await?;

    ui::line(&ctx, Level::Ok, &format!("Now using {} ({})", host.name, host.id));
    Ok(())
}
