//! Config command - show, locate or initialize the config file

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigFile};
use crate::error::RubickResult;
use crate::ui::{self, Level, UiContext};

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, file: &ConfigFile) -> RubickResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => print!("{}", toml::to_string_pretty(config)?),
        Some(ConfigAction::Path) => println!("{}", file.path().display()),
        Some(ConfigAction::Init { force }) => {
            file.write_default(force).await?;
            ui::line(
                &UiContext::detect(),
                Level::Ok,
                &format!("Wrote default config to {}", file.path().display()),
            );
        }
    }

    Ok(())
}
