//! Status lines, headings and load reports
//!
//! On a terminal everything goes through `cliclack`'s log lines. Otherwise a
//! line is a bracketed tag followed by the message, which keeps CI logs and
//! pipes greppable.

use super::context::UiContext;
use crate::cache::LoadOutcome;
use console::style;

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Self::Ok => "[OK]",
            Self::Info => "[INFO]",
            Self::Warn => "[WARN]",
            Self::Fail => "[FAIL]",
        }
    }

    fn styled_tag(self) -> String {
        let tag = style(self.tag());
        match self {
            Self::Ok => tag.green(),
            Self::Info => tag.cyan(),
            Self::Warn => tag.yellow(),
            Self::Fail => tag.red(),
        }
        .to_string()
    }
}

/// Unstyled form of a status line
pub fn plain_line(level: Level, message: &str, hint: Option<&str>) -> String {
    match hint {
        Some(hint) => format!("{} {} - {}", level.tag(), message, hint),
        None => format!("{} {}", level.tag(), message),
    }
}

/// Print a status line
pub fn line(ctx: &UiContext, level: Level, message: &str) {
    emit(ctx, level, message, None);
}

/// Print a status line with a dimmed hint after it
pub fn line_with_hint(ctx: &UiContext, level: Level, message: &str, hint: &str) {
    emit(ctx, level, message, Some(hint));
}

fn emit(ctx: &UiContext, level: Level, message: &str, hint: Option<&str>) {
    if !ctx.use_fancy_output() {
        match hint {
            Some(hint) => println!("  {} {} - {}", level.styled_tag(), message, hint),
            None => println!("  {} {}", level.styled_tag(), message),
        }
        return;
    }

    let text = match hint {
        Some(hint) => format!("{} - {}", message, style(hint).dim()),
        None => message.to_string(),
    };
    let _ = match level {
        Level::Ok => cliclack::log::success(text),
        Level::Info => cliclack::log::info(text),
        Level::Warn => cliclack::log::warning(text),
        Level::Fail => cliclack::log::error(text),
    };
}

/// Open a command's output
pub fn heading(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::intro(style(title).cyan().bold());
    } else {
        println!("{}", style(title).cyan().bold());
    }
}

/// Close a command's output with a final status
pub fn closing(ctx: &UiContext, level: Level, message: &str) {
    if ctx.use_fancy_output() {
        let text = match level {
            Level::Ok | Level::Info => style(message).green().bold(),
            Level::Warn => style(message).yellow().bold(),
            Level::Fail => style(message).red().bold(),
        };
        let _ = cliclack::outro(text);
    } else {
        println!("{}", plain_line(level, message, None));
    }
}

/// Print labelled rows under a title
pub fn details(ctx: &UiContext, title: &str, rows: &[(&str, String)]) {
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    let body = rows
        .iter()
        .map(|(k, v)| format!("{:<width$}  {}", k, v, width = width))
        .collect::<Vec<_>>()
        .join("\n");

    if ctx.use_fancy_output() {
        let _ = cliclack::note(title, body);
    } else {
        println!("{}:", style(title).bold());
        for row in body.lines() {
            println!("  {}", row);
        }
    }
}

/// Lines describing how a host load settled
///
/// Partial failures are not listed here; the diagnostic sink reports them
/// once per applied fetch.
pub fn report_lines(host_name: &str, outcome: &LoadOutcome) -> Vec<(Level, String, Option<String>)> {
    match outcome {
        LoadOutcome::Applied(report) if report.is_clean() => {
            vec![(Level::Ok, format!("Loaded {}", host_name), None)]
        }
        LoadOutcome::Applied(_) | LoadOutcome::Cached => Vec::new(),
        LoadOutcome::Superseded => vec![(
            Level::Info,
            format!("{} was closed before loading finished", host_name),
            None,
        )],
        LoadOutcome::Abandoned => vec![(
            Level::Warn,
            format!("Loading {} was interrupted", host_name),
            Some("pick it again to retry".to_string()),
        )],
    }
}

/// Print the lines of `report_lines`
pub fn load_report(ctx: &UiContext, host_name: &str, outcome: &LoadOutcome) {
    for (level, message, hint) in report_lines(host_name, outcome) {
        emit(ctx, level, &message, hint.as_deref());
    }
}
