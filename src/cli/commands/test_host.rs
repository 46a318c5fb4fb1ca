//! Test command - ask the backend whether it can reach a host

use crate::api::{ApiClient, HostCheck, ResourceActions};
use crate::cli::args::TestArgs;
use crate::config::Config;
use crate::error::{RubickError, RubickResult};
use crate::hosts::Host;
use crate::ui::{TaskSpinner, UiContext};

/// Execute the test command
pub async fn execute(args: TestArgs, config: &Config) -> RubickResult<()> {
    let ctx = UiContext::detect();
    let client = ApiClient::new(&config.api);
    let directory = super::load_directory(&client).await?;
    let host = directory.resolve(args.host.as_deref())?;

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("Testing connection to {}...", host.name));

    let check = match check_host(&client, host).await {
        Ok(check) => check,
        Err(e) => {
            spinner.stop_error(&format!("{} is unreachable", host.name));
            return Err(e);
        }
    };
    spinner.stop(&format!("{} is reachable ({})", host.name, check.message));
    Ok(())
}

/// Backend-side connection test; an unsuccessful check is an error
pub(crate) async fn check_host(
    actions: &dyn ResourceActions,
    host: &Host,
) -> RubickResult<HostCheck> {
    let check = actions.test_host(&host.host_id()).await?;
    if check.success {
        Ok(check)
    } else {
        Err(RubickError::HostCheckFailed {
            host: host.name.clone(),
            message: check.message,
        })
    }
}
