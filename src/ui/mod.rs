//! Terminal output for the CLI
//!
//! Uses `cliclack` for prompts and log lines, with plain `[OK]`/`[WARN]`
//! output when stdout is not a terminal or a CI system is detected.
//!
//! # Example
//!
//! ```rust,ignore
//! use rubick::ui::{self, Level, UiContext, TaskSpinner};
//!
//! let ctx = UiContext::detect();
//!
//! let mut spinner = TaskSpinner::new(&ctx);
//! spinner.start("Loading resources...");
//! spinner.stop("Loaded 12 containers");
//!
//! ui::line_with_hint(&ctx, Level::Warn, "Images unavailable", "showing previous listing");
//! ```

mod context;
mod output;
mod progress;
mod prompts;

pub use context::UiContext;
pub use output::{
    closing, details, heading, line, line_with_hint, load_report, plain_line, report_lines, Level,
};
pub use progress::{HostLoadProgress, TaskSpinner};
pub use prompts::{confirm_destructive, select};
