//! Resources command - load and print a host's resource tree

use super::ConsoleSink;
use crate::api::ApiClient;
use crate::cache::{CacheEntry, DiagnosticSink, EntryState, LoadOutcome, LogSink, ResourceCache};
use crate::cli::args::{OutputFormat, ResourcesArgs};
use crate::config::Config;
use crate::error::{RubickError, RubickResult};
use crate::hosts::Host;
use crate::resource::{HostResources, ResourceKind};
use crate::ui::{HostLoadProgress, TaskSpinner, UiContext};
use console::style;
use futures_util::future::join_all;
use serde_json::{json, Value};
use std::sync::Arc;

/// Execute the resources command
pub async fn execute(args: ResourcesArgs, config: &Config) -> RubickResult<()> {
    let ctx = UiContext::detect();
    let client = Arc::new(ApiClient::new(&config.api));
    let directory = super::load_directory(&client).await?;

    // Warnings would corrupt machine-readable output
    let sink: Arc<dyn DiagnosticSink> = match args.format {
        OutputFormat::Table => Arc::new(ConsoleSink::new(ctx.clone())),
        _ => Arc::new(LogSink),
    };
    let cache = super::build_cache(client, config, sink);

    let hosts: Vec<Host> = if args.all_hosts {
        if directory.is_empty() {
            return Err(RubickError::NoHosts);
        }
        directory.hosts().to_vec()
    } else {
        vec![directory.resolve(args.host.as_deref())?.clone()]
    };

    let loaded = if hosts.len() == 1 && args.format == OutputFormat::Table {
        load_one(&ctx, &cache, &hosts[0], args.refresh).await
    } else {
        load_many(&ctx, &cache, &hosts, args.refresh, args.format).await
    };

    match args.format {
        OutputFormat::Table => {
            for (host, entry) in &loaded {
                for line in render_tree(host, entry, args.kind) {
                    println!("{}", line);
                }
                println!();
            }
        }
        OutputFormat::Json => {
            let value: Vec<Value> = loaded
                .iter()
                .map(|(host, entry)| entry_json(host, entry, args.kind))
                .collect::<Result<_, _>>()?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Plain => {
            for (host, entry) in &loaded {
                for line in render_plain(host, &entry.resources, args.kind) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}

async fn fetch(cache: &ResourceCache, host: &Host, refresh: bool) -> (LoadOutcome, CacheEntry) {
    let id = host.host_id();
    let outcome = if refresh {
        cache.refresh(&id).await
    } else {
        cache.load(&id).await
    };
    let entry = cache.get(&id).unwrap_or_else(|| CacheEntry {
        host: id,
        state: EntryState::Empty,
        generation: 0,
        resources: HostResources::default(),
        loaded_at: None,
    });
    (outcome, entry)
}

async fn load_one(
    ctx: &UiContext,
    cache: &ResourceCache,
    host: &Host,
    refresh: bool,
) -> Vec<(Host, CacheEntry)> {
    let mut spinner = TaskSpinner::new(ctx);
    spinner.start(&format!("Loading resources of {}...", host.name));

    let (outcome, entry) = fetch(cache, host, refresh).await;
    match outcome {
        LoadOutcome::Abandoned => {
            spinner.stop_error(&format!("Loading {} was interrupted", host.name))
        }
        ref o if !o.failures().is_empty() => {
            spinner.stop_warn(&format!("Loaded {} with gaps", host.name))
        }
        _ => spinner.stop(&format!("Loaded {}", host.name)),
    }

    vec![(host.clone(), entry)]
}

async fn load_many(
    ctx: &UiContext,
    cache: &ResourceCache,
    hosts: &[Host],
    refresh: bool,
    format: OutputFormat,
) -> Vec<(Host, CacheEntry)> {
    let progress = match format {
        OutputFormat::Table => Some(HostLoadProgress::new(ctx, hosts.len())),
        _ => None,
    };

    let loads = hosts.iter().map(|host| {
        let progress = progress.as_ref();
        async move {
            let (outcome, entry) = fetch(cache, host, refresh).await;
            if let Some(progress) = progress {
                let ok = matches!(outcome, LoadOutcome::Cached)
                    || matches!(&outcome, LoadOutcome::Applied(report) if report.is_clean());
                progress.host_done(&host.name, ok);
            }
            (host.clone(), entry)
        }
    });
    let loaded = join_all(loads).await;

    if let Some(progress) = progress {
        progress.finish();
    }
    loaded
}

fn kinds(filter: Option<ResourceKind>) -> Vec<ResourceKind> {
    match filter {
        Some(kind) => vec![kind],
        None => ResourceKind::ALL.to_vec(),
    }
}

/// Indented tree of one host's groups and records
pub(crate) fn render_tree(
    host: &Host,
    entry: &CacheEntry,
    filter: Option<ResourceKind>,
) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {}",
        style(&host.name).bold(),
        style(format!("({})", host.id)).dim()
    )];

    for kind in kinds(filter) {
        let records = entry.resources.records(kind);
        lines.push(format!("  {} ({})", style(kind.label()).cyan(), records.len()));
        for record in records {
            lines.push(format!(
                "    {:<32} {}",
                record.name(),
                style(record.summary()).dim()
            ));
        }
    }

    if let Some(at) = entry.loaded_at {
        lines.push(format!(
            "  {}",
            style(format!("loaded {}", at.format("%Y-%m-%d %H:%M:%S UTC"))).dim()
        ));
    }
    lines
}

/// Tab separated `host kind id name` lines
pub(crate) fn render_plain(
    host: &Host,
    resources: &HostResources,
    filter: Option<ResourceKind>,
) -> Vec<String> {
    kinds(filter)
        .into_iter()
        .flat_map(|kind| {
            resources
                .records(kind)
                .into_iter()
                .map(move |r| format!("{}\t{}\t{}\t{}", host.id, kind.key(), r.id(), r.name()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// JSON object for one host, restricted to `filter` when given
pub(crate) fn entry_json(
    host: &Host,
    entry: &CacheEntry,
    filter: Option<ResourceKind>,
) -> serde_json::Result<Value> {
    let resources = match filter {
        None => serde_json::to_value(&entry.resources)?,
        Some(kind) => {
            let records = match kind {
                ResourceKind::Container => serde_json::to_value(&entry.resources.containers)?,
                ResourceKind::Image => serde_json::to_value(&entry.resources.images)?,
                ResourceKind::Volume => serde_json::to_value(&entry.resources.volumes)?,
                ResourceKind::Network => serde_json::to_value(&entry.resources.networks)?,
                ResourceKind::ComposeProject => {
                    serde_json::to_value(&entry.resources.compose_projects)?
                }
            };
            let mut map = serde_json::Map::new();
            map.insert(kind.key().to_string(), records);
            Value::Object(map)
        }
    };

    Ok(json!({
        "host": { "id": host.id, "name": host.name },
        "state": entry.state,
        "loaded_at": entry.loaded_at,
        "resources": resources,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Container, Image};

    fn sample() -> (Host, CacheEntry) {
        let host = Host {
            id: "h1".to_string(),
            name: "local".to_string(),
            ..Default::default()
        };
        let resources = HostResources {
            containers: Arc::new(vec![Container {
                id: "c1".to_string(),
                name: "web".to_string(),
                image: "nginx".to_string(),
                state: "running".to_string(),
                ..Default::default()
            }]),
            images: Arc::new(vec![Image {
                id: "sha256:0123456789abcdef".to_string(),
                repo_tags: vec!["nginx:latest".to_string()],
                ..Default::default()
            }]),
            ..Default::default()
        };
        let entry = CacheEntry {
            host: host.host_id(),
            state: EntryState::Loaded,
            generation: 1,
            resources,
            loaded_at: None,
        };
        (host, entry)
    }

    #[test]
    fn tree_lists_every_group() {
        let (host, entry) = sample();
        let lines = render_tree(&host, &entry, None);
        // header plus five group lines plus two records
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().any(|l| l.contains("web")));
        assert!(lines.iter().any(|l| l.contains("compose projects")));
    }

    #[test]
    fn tree_respects_kind_filter() {
        let (host, entry) = sample();
        let lines = render_tree(&host, &entry, Some(ResourceKind::Image));
        assert_eq!(lines.len(), 3);
        assert!(lines[2].contains("nginx:latest"));
    }

    #[test]
    fn plain_lines_are_tab_separated() {
        let (host, entry) = sample();
        let lines = render_plain(&host, &entry.resources, None);
        assert_eq!(
            lines,
            vec![
                "h1\tcontainer\tc1\tweb".to_string(),
                "h1\timage\tsha256:0123456789abcdef\tnginx:latest".to_string(),
            ]
        );
    }

    #[test]
    fn json_filters_to_one_kind() {
        let (host, entry) = sample();
        let value = entry_json(&host, &entry, Some(ResourceKind::Container)).unwrap();
        assert_eq!(value["state"], "loaded");
        assert_eq!(value["resources"]["container"][0]["name"], "web");
        assert!(value["resources"].get("image").is_none());
    }
}
