//! Interactive prompts with non-interactive fallback

use super::context::UiContext;
use crate::error::{RubickError, RubickResult};

/// Prompt for selection from a list of options
///
/// Returns the first option when not interactive.
pub async fn select<T: Clone + Send + Eq + 'static>(
    ctx: &UiContext,
    message: &str,
    options: &[(T, String, String)], // (value, label, hint)
) -> RubickResult<T> {
    let first = options
        .first()
        .ok_or_else(|| RubickError::Internal("select called without options".to_string()))?;

    if !ctx.is_interactive() {
        return Ok(first.0.clone());
    }

    let message = message.to_string();
    let items = options.to_vec();

    blocking_prompt("select", move || {
        let mut select = cliclack::select(&message);
        for (value, label, hint) in items {
            select = select.item(value, label, hint);
        }
        select.interact()
    })
    .await
}

/// Ask before an irreversible change
///
/// Without a terminal nobody can answer, so the answer is no.
pub async fn confirm_destructive(ctx: &UiContext, message: &str) -> RubickResult<bool> {
    if !ctx.is_interactive() {
        return Ok(false);
    }

    let message = message.to_string();
    blocking_prompt("confirm", move || {
        cliclack::confirm(&message).initial_value(false).interact()
    })
    .await
}

/// cliclack prompts block on stdin, keep them off the runtime threads
async fn blocking_prompt<T, F>(what: &'static str, prompt: F) -> RubickResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> std::io::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .map_err(|e| RubickError::Prompt(format!("{} task failed: {}", what, e)))?
        .map_err(|e| RubickError::Prompt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn select_non_interactive_first() {
        let ctx = UiContext::non_interactive();
        let options = vec![
            ("a".to_string(), "Host A".to_string(), "local".to_string()),
            ("b".to_string(), "Host B".to_string(), "ssh".to_string()),
        ];
        let result = select(&ctx, "Choose:", &options).await.unwrap();
        assert_eq!(result, "a");
    }

    #[tokio::test]
    async fn destructive_confirm_defaults_to_no() {
        let ctx = UiContext::non_interactive();
        assert!(!confirm_destructive(&ctx, "Remove web?").await.unwrap());
    }

    #[tokio::test]
    async fn select_without_options_fails() {
        let ctx = UiContext::non_interactive();
        let options: Vec<(String, String, String)> = Vec::new();
        assert!(select(&ctx, "Choose:", &options).await.is_err());
    }
}
