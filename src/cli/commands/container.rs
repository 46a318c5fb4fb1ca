//! Container command - lifecycle actions and stats for one container
//!
//! The container is looked up in the host's freshly loaded listing, so it
//! can be named by id, unique id prefix or name. After a successful action
//! the host's cache entry is refreshed.

use super::ConsoleSink;
use crate::api::{ApiClient, ContainerAction, ResourceActions};
use crate::cache::{LoadOutcome, ResourceCache};
use crate::cli::args::{ContainerArgs, ContainerCommand};
use crate::config::Config;
use crate::error::{RubickError, RubickResult};
use crate::hosts::Host;
use crate::resource::{Container, HostId, HostResources};
use crate::ui::{self, TaskSpinner, UiContext};
use std::sync::Arc;
use tracing::info;

/// Execute the container command
pub async fn execute(args: ContainerArgs, config: &Config) -> RubickResult<()> {
    let ctx = UiContext::detect();
    let client = Arc::new(ApiClient::new(&config.api));
    let directory = super::load_directory(&client).await?;

    let target = args.action.target();
    let host = directory.resolve(target.host.as_deref())?.clone();
    let host_id = host.host_id();

    let cache = super::build_cache(
        client.clone(),
        config,
        Arc::new(ConsoleSink::new(ctx.clone())),
    );
    cache.load(&host_id).await;
    let resources = cache
        .get(&host_id)
        .map(|entry| entry.resources)
        .unwrap_or_default();
    let container = find_container(&resources, &host, &target.container)?;

    let Some(action) = container_action(&args.action) else {
        let stats = client.container_stats(&host_id, &container.id).await?;
        ui::details(&ctx, &container.name, &stats.rows());
        return Ok(());
    };

    let mut spinner = TaskSpinner::new(&ctx);
    spinner.start(&format!("{} {}...", capitalized(action.verb()), container.name));
    match run_container_action(&*client, &cache, &host_id, &container.id, action).await {
        Ok(outcome) => {
            spinner.stop(&format!("{} {}", capitalized(action.done()), container.name));
            ui::load_report(&ctx, &host.name, &outcome);
            Ok(())
        }
        Err(e) => {
            spinner.stop_error(&format!("Could not {} {}", action.verb(), container.name));
            Err(e)
        }
    }
}

/// Apply an action, then refresh the host so listings show its effect
pub(crate) async fn run_container_action(
    actions: &dyn ResourceActions,
    cache: &ResourceCache,
    host: &HostId,
    container_id: &str,
    action: ContainerAction,
) -> RubickResult<LoadOutcome> {
    actions.container_action(host, container_id, action).await?;
    info!(host = %host, container = container_id, "Container {}", action.done());
    Ok(cache.refresh(host).await)
}

fn container_action(command: &ContainerCommand) -> Option<ContainerAction> {
    match *command {
        ContainerCommand::Start(_) => Some(ContainerAction::Start),
        ContainerCommand::Stop { timeout, .. } => Some(ContainerAction::Stop { timeout }),
        ContainerCommand::Restart { timeout, .. } => Some(ContainerAction::Restart { timeout }),
        ContainerCommand::Remove { force, volumes, .. } => {
            Some(ContainerAction::Remove { force, volumes })
        }
        ContainerCommand::Stats(_) => None,
    }
}

/// Exact id or name first, then a unique id prefix
pub(crate) fn find_container(
    resources: &HostResources,
    host: &Host,
    query: &str,
) -> RubickResult<Container> {
    let containers = resources.containers.as_slice();
    if let Some(found) = containers
        .iter()
        .find(|c| c.id == query || c.name.trim_start_matches('/') == query)
    {
        return Ok(found.clone());
    }

    let prefixed: Vec<&Container> = containers.iter().filter(|c| c.id.starts_with(query)).collect();
    match prefixed.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(RubickError::ContainerNotFound {
            host: host.name.clone(),
            query: query.to_string(),
        }),
        many => Err(RubickError::AmbiguousContainer {
            host: host.name.clone(),
            query: query.to_string(),
            count: many.len(),
        }),
    }
}

pub(crate) fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
