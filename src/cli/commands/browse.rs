//! Browse command - interactive resource tree
//!
//! Each round renders the tree as a select list. Picking a host toggles it
//! (loading or evicting its resources), picking a group toggles it, and
//! picking a record selects it. Containers open an action menu; every
//! action that changes a container refreshes its host afterwards.

use super::container::{capitalized, run_container_action};
use super::test_host::check_host;
use super::ConsoleSink;
use crate::api::{ApiClient, ContainerAction, ResourceActions};
use crate::cache::{EntryState, LoadOutcome};
use crate::config::Config;
use crate::error::{RubickError, RubickResult};
use crate::hosts::HostDirectory;
use crate::resource::{Container, HostId, ResourceKind};
use crate::tracker::{GroupKey, HostToggle, ResourceTracker, Selection};
use crate::ui::{self, Level, UiContext};
use std::sync::Arc;

/// One line of the browse list
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BrowseItem {
    Host(HostId),
    /// Expanded host whose last load never finished
    Retry(HostId),
    Group(GroupKey),
    Record {
        host: HostId,
        kind: ResourceKind,
        id: String,
        name: String,
    },
    Refresh(HostId),
    TestHost(HostId),
    Quit,
}

/// Entry of a container's action menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RecordChoice {
    Back,
    Action(ContainerAction),
    Stats,
}

/// Execute the browse command
pub async fn execute(config: &Config) -> RubickResult<()> {
    let ctx = UiContext::detect();
    if !ctx.is_interactive() {
        return Err(RubickError::NotInteractive("Browsing"));
    }

    let client = Arc::new(ApiClient::new(&config.api));
    let directory = super::load_directory(&client).await?;
    if directory.is_empty() {
        return Err(RubickError::NoHosts);
    }

    let cache = super::build_cache(
        client.clone(),
        config,
        Arc::new(ConsoleSink::new(ctx.clone())),
    );
    let mut tracker = ResourceTracker::new(cache);

    ui::heading(&ctx, "Rubick");
    loop {
        let items = tree_items(&tracker, &directory);
        let header = match tracker.selection() {
            Some(sel) => format!("Selected: {}", sel.name),
            None => "Hosts".to_string(),
        };

        match ui::select(&ctx, &header, &items).await? {
            BrowseItem::Quit => break,
            item => apply(&ctx, &mut tracker, &*client, &directory, item).await?,
        }
    }

    tracker.clear_all();
    ui::closing(&ctx, Level::Ok, "Bye");
    Ok(())
}

fn host_name(directory: &HostDirectory, id: &HostId) -> String {
    directory
        .find(id.as_str())
        .map(|h| h.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Only prompt failures end the session; backend errors become lines
async fn apply(
    ctx: &UiContext,
    tracker: &mut ResourceTracker,
    actions: &dyn ResourceActions,
    directory: &HostDirectory,
    item: BrowseItem,
) -> RubickResult<()> {
    match item {
        BrowseItem::Host(id) => {
            let name = host_name(directory, &id);
            tracker.set_selection(Some(Selection::host(id.clone(), name.clone())));
            if let HostToggle::Expanded(outcome) = tracker.toggle_host_expand(&id).await {
                if outcome != LoadOutcome::Cached {
                    ui::load_report(ctx, &name, &outcome);
                }
            }
        }
        BrowseItem::Retry(id) | BrowseItem::Refresh(id) => {
            let outcome = tracker.refresh_host(&id).await;
            ui::load_report(ctx, &host_name(directory, &id), &outcome);
        }
        BrowseItem::Group(key) => {
            tracker.toggle_group_expand(key);
        }
        BrowseItem::Record {
            host,
            kind,
            id,
            name,
        } => {
            tracker.set_selection(Some(Selection::resource(
                host.clone(),
                kind,
                id.clone(),
                name.clone(),
            )));
            let Some(entry) = tracker.host_cache(&host) else {
                return Ok(());
            };

            if kind == ResourceKind::Container {
                let Some(container) = entry.resources.containers.iter().find(|c| c.id == id).cloned()
                else {
                    return Ok(());
                };
                let menu = record_menu(&container);
                let choice = ui::select(ctx, &format!("{} ({})", name, container.state), &menu).await?;
                run_record_choice(ctx, tracker, actions, directory, &host, &container, choice).await?;
            } else if let Some(record) = entry.resources.records(kind).into_iter().find(|r| r.id() == id) {
                ui::details(
                    ctx,
                    &name,
                    &[("Id", record.id().to_string()), ("Status", record.summary())],
                );
            }
        }
        BrowseItem::TestHost(host) => {
            let Some(found) = directory.find(host.as_str()) else {
                return Ok(());
            };
            match check_host(actions, found).await {
                Ok(_) => ui::line(ctx, Level::Ok, &format!("{} is reachable", found.name)),
                Err(e) => ui::line_with_hint(
                    ctx,
                    Level::Fail,
                    &e.to_string(),
                    e.hint().unwrap_or("try again later"),
                ),
            }
        }
        BrowseItem::Quit => {}
    }
    Ok(())
}

/// Back first, so a stray Enter changes nothing
pub(crate) fn record_menu(container: &Container) -> Vec<(RecordChoice, String, String)> {
    let mut menu = vec![(RecordChoice::Back, "Back".to_string(), String::new())];
    for action in ContainerAction::available(container.is_running()) {
        let hint = match action {
            ContainerAction::Remove { force: true, .. } => "forced, container is running",
            _ => "",
        };
        menu.push((
            RecordChoice::Action(action),
            capitalized(action.verb()),
            hint.to_string(),
        ));
    }
    menu.push((RecordChoice::Stats, "Stats".to_string(), String::new()));
    menu
}

/// Carry out a menu choice for a container
pub(crate) async fn run_record_choice(
    ctx: &UiContext,
    tracker: &mut ResourceTracker,
    actions: &dyn ResourceActions,
    directory: &HostDirectory,
    host: &HostId,
    container: &Container,
    choice: RecordChoice,
) -> RubickResult<()> {
    let action = match choice {
        RecordChoice::Back => return Ok(()),
        RecordChoice::Stats => {
            match actions.container_stats(host, &container.id).await {
                Ok(stats) => ui::details(ctx, &container.name, &stats.rows()),
                Err(e) => ui::line(ctx, Level::Fail, &e.to_string()),
            }
            return Ok(());
        }
        RecordChoice::Action(action) => action,
    };

    if let ContainerAction::Remove { .. } = action {
        let question = format!("Remove {}? This cannot be undone", container.name);
        if !ui::confirm_destructive(ctx, &question).await? {
            ui::line(ctx, Level::Info, "Kept the container");
            return Ok(());
        }
    }

    match run_container_action(actions, tracker.cache(), host, &container.id, action).await {
        Ok(outcome) => {
            ui::line(ctx, Level::Ok, &format!("{} {}", container.name, action.done()));
            ui::load_report(ctx, &host_name(directory, host), &outcome);
            if let ContainerAction::Remove { .. } = action {
                let name = host_name(directory, host);
                tracker.set_selection(Some(Selection::host(host.clone(), name)));
            }
        }
        Err(e) => ui::line_with_hint(
            ctx,
            Level::Fail,
            &format!("Could not {} {}", action.verb(), container.name),
            &e.to_string(),
        ),
    }
    Ok(())
}

/// Flatten the visible tree into select options
pub(crate) fn tree_items(
    tracker: &ResourceTracker,
    directory: &HostDirectory,
) -> Vec<(BrowseItem, String, String)> {
    let mut items = Vec::new();

    for host in directory.hosts() {
        let id = host.host_id();
        let expanded = tracker.is_host_expanded(&id);
        let marker = if expanded { "▾" } else { "▸" };
        let hint = if directory.current_id() == Some(&id) {
            format!("{} (current)", host.endpoint())
        } else {
            host.endpoint()
        };
        items.push((
            BrowseItem::Host(id.clone()),
            format!("{} {}", marker, host.name),
            hint,
        ));

        if !expanded {
            continue;
        }

        let entry = match tracker.host_cache(&id) {
            Some(entry) if entry.state == EntryState::Loaded => entry,
            Some(entry) if entry.state == EntryState::Loading => {
                items.push((BrowseItem::Host(id.clone()), "    loading...".to_string(), String::new()));
                continue;
            }
            _ => {
                items.push((
                    BrowseItem::Retry(id.clone()),
                    "    not loaded, pick to retry".to_string(),
                    String::new(),
                ));
                continue;
            }
        };

        for kind in ResourceKind::ALL {
            let key = GroupKey::new(id.clone(), kind);
            let open = tracker.is_group_expanded(&key);
            let records = entry.resources.records(kind);
            items.push((
                BrowseItem::Group(key),
                format!("  {} {} ({})", if open { "▾" } else { "▸" }, kind.label(), records.len()),
                String::new(),
            ));

            if open {
                for record in records {
                    items.push((
                        BrowseItem::Record {
                            host: id.clone(),
                            kind,
                            id: record.id().to_string(),
                            name: record.name().to_string(),
                        },
                        format!("      {}", record.name()),
                        record.summary(),
                    ));
                }
            }
        }
    }

    if let Some(host) = tracker.selected_host_id() {
        if tracker.is_host_expanded(host) {
            items.push((
                BrowseItem::Refresh(host.clone()),
                format!("Refresh {}", host),
                String::new(),
            ));
            items.push((
                BrowseItem::TestHost(host.clone()),
                format!("Test connection to {}", host),
                String::new(),
            ));
        }
    }
    items.push((BrowseItem::Quit, "Quit".to_string(), String::new()));
    items
}
